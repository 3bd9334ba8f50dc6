//! Insert, update, get, delete, bulk ops for memories.

use std::collections::{HashMap, HashSet};

use rusqlite::{params, Connection, OptionalExtension};

use cortex_core::{CortexError, CortexResult, Memory, MemoryKind};

use crate::to_storage_err;

const SELECT_COLUMNS: &str = "id, scope_id, content, tags, source, kind, quality_score, \
    quality_factors, embedding, access_count, last_accessed, valid_from, valid_until, \
    invalidated_by, correction_count, is_invariant, created_at, content_hash";

/// spec.md §8: "Dim mismatch at save → Contract error, no write."
/// `embedding_dim == 0` means the store has no fixed dimension configured.
fn check_embedding_dim(embedding: &[f32], embedding_dim: usize) -> CortexResult<()> {
    if embedding_dim != 0 && embedding.len() != embedding_dim {
        return Err(CortexError::contract(format!(
            "embedding has {} dims, store requires {embedding_dim}",
            embedding.len()
        )));
    }
    Ok(())
}

pub fn insert_memory(conn: &Connection, memory: &Memory, embedding_dim: usize) -> CortexResult<()> {
    check_embedding_dim(&memory.embedding, embedding_dim)?;
    let tags_json = serde_json::to_string(&memory.tags).map_err(|e| to_storage_err(e.to_string()))?;
    let kind_json = serde_json::to_string(&memory.kind).map_err(|e| to_storage_err(e.to_string()))?;
    let quality_factors_json = memory
        .quality_factors
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| to_storage_err(e.to_string()))?;

    conn.execute(
        "INSERT INTO memories (
            id, scope_id, content, tags, source, kind, quality_score, quality_factors,
            embedding, access_count, last_accessed, valid_from, valid_until,
            invalidated_by, correction_count, is_invariant, created_at, content_hash
        ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18)",
        params![
            memory.id,
            memory.scope_id.clone().unwrap_or_default(),
            memory.content,
            tags_json,
            memory.source,
            kind_json.trim_matches('"'),
            memory.quality_score,
            quality_factors_json,
            crate::vector::f32_vec_to_bytes(&memory.embedding),
            memory.access_count,
            memory.last_accessed.map(|t| t.to_rfc3339()),
            memory.valid_from.map(|t| t.to_rfc3339()),
            memory.valid_until.map(|t| t.to_rfc3339()),
            memory.invalidated_by,
            memory.correction_count,
            memory.is_invariant as i32,
            memory.created_at.to_rfc3339(),
            memory.content_hash,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_memory(conn: &Connection, id: &str) -> CortexResult<Option<Memory>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {SELECT_COLUMNS} FROM memories WHERE id = ?1"))
        .map_err(|e| to_storage_err(e.to_string()))?;
    stmt.query_row(params![id], |row| Ok(row_to_memory(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?
        .transpose()
}

pub fn bulk_get(conn: &Connection, ids: &[String]) -> CortexResult<Vec<Memory>> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(m) = get_memory(conn, id)? {
            out.push(m);
        }
    }
    Ok(out)
}

pub fn bulk_insert(conn: &Connection, memories: &[Memory], embedding_dim: usize) -> CortexResult<usize> {
    if memories.is_empty() {
        return Ok(0);
    }
    conn.execute_batch("BEGIN IMMEDIATE")
        .map_err(|e| to_storage_err(e.to_string()))?;
    for memory in memories {
        if let Err(e) = insert_memory(conn, memory, embedding_dim) {
            let _ = conn.execute_batch("ROLLBACK");
            return Err(e);
        }
    }
    conn.execute_batch("COMMIT").map_err(|e| to_storage_err(e.to_string()))?;
    Ok(memories.len())
}

pub fn soft_invalidate(conn: &Connection, id: &str, superseded_by: &str) -> CortexResult<()> {
    let rows = conn
        .execute(
            "UPDATE memories SET invalidated_by = ?2 WHERE id = ?1",
            params![id, superseded_by],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if rows == 0 {
        return Err(cortex_core::CortexError::not_found("memory", id));
    }
    tracing::info!(target: "cortex::audit", op = "soft_invalidate", id, superseded_by, "memory soft-invalidated");
    Ok(())
}

pub fn restore(conn: &Connection, id: &str) -> CortexResult<()> {
    let rows = conn
        .execute("UPDATE memories SET invalidated_by = NULL WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    if rows == 0 {
        return Err(cortex_core::CortexError::not_found("memory", id));
    }
    tracing::info!(target: "cortex::audit", op = "restore", id, "memory restored");
    Ok(())
}

pub fn access(conn: &Connection, ids: &[String], weight: f64) -> CortexResult<()> {
    let now = chrono::Utc::now().to_rfc3339();
    for id in ids {
        conn.execute(
            "UPDATE memories SET access_count = access_count + ?2, last_accessed = ?3 WHERE id = ?1",
            params![id, weight, now],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}

pub fn delete_memory(conn: &Connection, id: &str) -> CortexResult<()> {
    conn.execute("DELETE FROM memories WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    tracing::info!(target: "cortex::audit", op = "delete_memory", id, "memory hard-deleted");
    Ok(())
}

pub(crate) fn row_to_memory(row: &rusqlite::Row<'_>) -> CortexResult<Memory> {
    let scope_id_col: String = row.get(1).map_err(|e| to_storage_err(e.to_string()))?;
    let tags_json: String = row.get(3).map_err(|e| to_storage_err(e.to_string()))?;
    let kind_str: String = row.get(5).map_err(|e| to_storage_err(e.to_string()))?;
    let quality_factors_json: Option<String> = row.get(7).map_err(|e| to_storage_err(e.to_string()))?;
    let embedding_blob: Vec<u8> = row.get(8).map_err(|e| to_storage_err(e.to_string()))?;

    let parse_opt_dt = |s: Option<String>| -> CortexResult<Option<chrono::DateTime<chrono::Utc>>> {
        s.map(|s| {
            chrono::DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
        })
        .transpose()
    };

    let created_at_str: String = row.get(16).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(Memory {
        id: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        scope_id: if scope_id_col.is_empty() { None } else { Some(scope_id_col) },
        content: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        tags: serde_json::from_str::<HashSet<String>>(&tags_json)
            .map_err(|e| to_storage_err(format!("parse tags: {e}")))?,
        source: row.get(4).map_err(|e| to_storage_err(e.to_string()))?,
        kind: serde_json::from_str::<MemoryKind>(&format!("\"{kind_str}\""))
            .map_err(|e| to_storage_err(format!("parse kind '{kind_str}': {e}")))?,
        quality_score: row.get(6).map_err(|e| to_storage_err(e.to_string()))?,
        quality_factors: quality_factors_json
            .map(|s| serde_json::from_str::<HashMap<String, f64>>(&s))
            .transpose()
            .map_err(|e| to_storage_err(format!("parse quality_factors: {e}")))?,
        embedding: crate::vector::bytes_to_f32_vec(&embedding_blob),
        access_count: row.get(9).map_err(|e| to_storage_err(e.to_string()))?,
        last_accessed: parse_opt_dt(row.get(10).map_err(|e| to_storage_err(e.to_string()))?)?,
        valid_from: parse_opt_dt(row.get(11).map_err(|e| to_storage_err(e.to_string()))?)?,
        valid_until: parse_opt_dt(row.get(12).map_err(|e| to_storage_err(e.to_string()))?)?,
        invalidated_by: row.get(13).map_err(|e| to_storage_err(e.to_string()))?,
        correction_count: row.get(14).map_err(|e| to_storage_err(e.to_string()))?,
        is_invariant: row.get::<_, i32>(15).map_err(|e| to_storage_err(e.to_string()))? != 0,
        created_at: chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .map_err(|e| to_storage_err(format!("parse created_at: {e}")))?,
        content_hash: row.get(17).map_err(|e| to_storage_err(e.to_string()))?,
    })
}
