//! Typed memory-to-memory edges. `link` is idempotent on
//! `(source_id, target_id, relation)` — a repeat call is a no-op that
//! returns the existing row (spec.md §3, §4.6).

use rusqlite::{params, Connection, OptionalExtension};

use cortex_core::{CortexError, CortexResult, MemoryLink, RelationKind};

use crate::to_storage_err;

const SELECT_COLUMNS: &str =
    "id, source_id, target_id, relation, weight, valid_from, valid_until, llm_enriched, created_at";

/// Both endpoints' `scope_id` column, empty string meaning `Scope::Global`.
/// Returns `None` for an endpoint that doesn't exist (a dangling id is a
/// separate contract error the insert's own foreign key will surface).
fn scope_of(conn: &Connection, memory_id: &str) -> CortexResult<Option<String>> {
    conn.query_row(
        "SELECT scope_id FROM memories WHERE id = ?1",
        params![memory_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Graph edges must have both endpoints in the same visibility set
/// (spec.md §4.8): a project-scoped memory may only link to the same
/// project or to global memories, never to a different project.
fn check_same_scope(conn: &Connection, source_id: &str, target_id: &str) -> CortexResult<()> {
    let source_scope = scope_of(conn, source_id)?;
    let target_scope = scope_of(conn, target_id)?;
    if let (Some(s), Some(t)) = (&source_scope, &target_scope) {
        if !s.is_empty() && !t.is_empty() && s != t {
            return Err(CortexError::scope_mismatch(format!(
                "cannot link {source_id} (scope {s:?}) to {target_id} (scope {t:?}): different project scopes"
            )));
        }
    }
    Ok(())
}

pub fn link(
    conn: &Connection,
    source_id: &str,
    target_id: &str,
    relation: RelationKind,
    weight: f64,
) -> CortexResult<MemoryLink> {
    let relation_json = serde_json::to_string(&relation).map_err(|e| to_storage_err(e.to_string()))?;
    let relation_str = relation_json.trim_matches('"');

    if let Some(existing) = get_by_unique_key(conn, source_id, target_id, relation)? {
        return Ok(existing);
    }

    check_same_scope(conn, source_id, target_id)?;

    let id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO memory_links (id, source_id, target_id, relation, weight, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(source_id, target_id, relation) DO NOTHING",
        params![id, source_id, target_id, relation_str, weight, now],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    // Another writer may have raced us onto the same unique key; either way
    // the row now exists — fetch whichever version won.
    get_by_unique_key(conn, source_id, target_id, relation)?
        .ok_or_else(|| to_storage_err("link row missing immediately after insert"))
}

fn get_by_unique_key(
    conn: &Connection,
    source_id: &str,
    target_id: &str,
    relation: RelationKind,
) -> CortexResult<Option<MemoryLink>> {
    let relation_json = serde_json::to_string(&relation).map_err(|e| to_storage_err(e.to_string()))?;
    let relation_str = relation_json.trim_matches('"');

    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM memory_links \
             WHERE source_id = ?1 AND target_id = ?2 AND relation = ?3"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    stmt.query_row(params![source_id, target_id, relation_str], |row| Ok(row_to_link(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?
        .transpose()
}

pub fn invalidate_link(
    conn: &Connection,
    source_id: &str,
    target_id: &str,
    relation: Option<RelationKind>,
) -> CortexResult<usize> {
    let now = chrono::Utc::now().to_rfc3339();
    let rows = match relation {
        Some(r) => {
            let relation_json = serde_json::to_string(&r).map_err(|e| to_storage_err(e.to_string()))?;
            let relation_str = relation_json.trim_matches('"');
            conn.execute(
                "UPDATE memory_links SET valid_until = ?4 \
                 WHERE source_id = ?1 AND target_id = ?2 AND relation = ?3 \
                   AND (valid_until IS NULL OR valid_until > ?4)",
                params![source_id, target_id, relation_str, now],
            )
        }
        None => conn.execute(
            "UPDATE memory_links SET valid_until = ?3 \
             WHERE source_id = ?1 AND target_id = ?2 \
               AND (valid_until IS NULL OR valid_until > ?3)",
            params![source_id, target_id, now],
        ),
    }
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(rows)
}

pub fn links_of(conn: &Connection, memory_id: &str) -> CortexResult<Vec<MemoryLink>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM memory_links WHERE source_id = ?1 OR target_id = ?1"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![memory_id], |row| Ok(row_to_link(row)))
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?
        .into_iter()
        .collect::<CortexResult<Vec<_>>>()?;
    Ok(rows)
}

pub fn delete_links_of(conn: &Connection, memory_id: &str) -> CortexResult<usize> {
    let rows = conn
        .execute(
            "DELETE FROM memory_links WHERE source_id = ?1 OR target_id = ?1",
            params![memory_id],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    tracing::info!(target: "cortex::audit", op = "delete_links_of", memory_id, rows, "links cascaded");
    Ok(rows)
}

fn row_to_link(row: &rusqlite::Row<'_>) -> CortexResult<MemoryLink> {
    let relation_str: String = row.get(3).map_err(|e| to_storage_err(e.to_string()))?;
    let valid_from_str: Option<String> = row.get(5).map_err(|e| to_storage_err(e.to_string()))?;
    let valid_until_str: Option<String> = row.get(6).map_err(|e| to_storage_err(e.to_string()))?;
    let created_at_str: String = row.get(8).map_err(|e| to_storage_err(e.to_string()))?;

    let parse_dt = |s: &str| -> CortexResult<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
    };

    Ok(MemoryLink {
        id: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        source_id: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        target_id: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        relation: serde_json::from_str::<RelationKind>(&format!("\"{relation_str}\""))
            .map_err(|e| to_storage_err(format!("parse relation '{relation_str}': {e}")))?,
        weight: row.get(4).map_err(|e| to_storage_err(e.to_string()))?,
        valid_from: valid_from_str.as_deref().map(parse_dt).transpose()?,
        valid_until: valid_until_str.as_deref().map(parse_dt).transpose()?,
        llm_enriched: row.get::<_, i32>(7).map_err(|e| to_storage_err(e.to_string()))? != 0,
        created_at: parse_dt(&created_at_str)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;

    #[test]
    fn link_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO memories (id, content, kind, embedding, created_at, content_hash) \
             VALUES ('a', 'x', 'observation', X'', '2020-01-01T00:00:00Z', 'h')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO memories (id, content, kind, embedding, created_at, content_hash) \
             VALUES ('b', 'y', 'observation', X'', '2020-01-01T00:00:00Z', 'h2')",
            [],
        )
        .unwrap();

        let first = link(&conn, "a", "b", RelationKind::Related, 0.5).unwrap();
        let second = link(&conn, "a", "b", RelationKind::Related, 0.9).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.weight, 0.5, "repeat link call must not overwrite the existing edge");
    }

    #[test]
    fn delete_links_of_cascades_both_directions() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO memories (id, content, kind, embedding, created_at, content_hash) \
             VALUES ('a', 'x', 'observation', X'', '2020-01-01T00:00:00Z', 'h')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO memories (id, content, kind, embedding, created_at, content_hash) \
             VALUES ('b', 'y', 'observation', X'', '2020-01-01T00:00:00Z', 'h2')",
            [],
        )
        .unwrap();
        link(&conn, "a", "b", RelationKind::Related, 1.0).unwrap();
        link(&conn, "b", "a", RelationKind::CausedBy, 1.0).unwrap();

        let deleted = delete_links_of(&conn, "a").unwrap();
        assert_eq!(deleted, 2);
        assert!(links_of(&conn, "b").unwrap().is_empty());
    }
}
