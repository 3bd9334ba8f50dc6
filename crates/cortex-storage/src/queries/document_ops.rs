//! Code/doc chunk CRUD and the file-hash ledger that lets ingestion skip
//! unchanged files (spec.md §4.1).

use rusqlite::{params, Connection, OptionalExtension};

use cortex_core::{CortexError, CortexResult, Document, Scope, SymbolType};

use crate::scope_col::{scope_col, scope_from_col, visible_scope_ids};
use crate::to_storage_err;

const SELECT_COLUMNS: &str = "id, scope_id, path, chunk_index, content, start_line, end_line, \
    embedding, symbol_name, symbol_type, signature, created_at, updated_at";

pub fn upsert_document(conn: &Connection, doc: &Document, embedding_dim: usize) -> CortexResult<()> {
    if embedding_dim != 0 && doc.embedding.len() != embedding_dim {
        return Err(CortexError::contract(format!(
            "document embedding has {} dims, store requires {embedding_dim}",
            doc.embedding.len()
        )));
    }
    let symbol_type_str = doc
        .symbol_type
        .map(|st| serde_json::to_string(&st))
        .transpose()
        .map_err(|e| to_storage_err(e.to_string()))?
        .map(|s| s.trim_matches('"').to_string());

    conn.execute(
        "INSERT INTO documents (
            id, scope_id, path, chunk_index, content, start_line, end_line,
            embedding, symbol_name, symbol_type, signature, created_at, updated_at
        ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13)
        ON CONFLICT(scope_id, path, chunk_index) DO UPDATE SET
            id = excluded.id,
            content = excluded.content,
            start_line = excluded.start_line,
            end_line = excluded.end_line,
            embedding = excluded.embedding,
            symbol_name = excluded.symbol_name,
            symbol_type = excluded.symbol_type,
            signature = excluded.signature,
            updated_at = excluded.updated_at",
        params![
            doc.id,
            scope_col(&doc.scope),
            doc.path,
            doc.chunk_index,
            doc.content,
            doc.start_line,
            doc.end_line,
            crate::vector::f32_vec_to_bytes(&doc.embedding),
            doc.symbol_name,
            symbol_type_str,
            doc.signature,
            doc.created_at.to_rfc3339(),
            doc.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn delete_documents_by_path(conn: &Connection, scope: &Scope, path: &str) -> CortexResult<usize> {
    let rows = conn
        .execute(
            "DELETE FROM documents WHERE scope_id = ?1 AND path = ?2",
            params![scope_col(scope), path],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "DELETE FROM file_hashes WHERE scope_id = ?1 AND path = ?2",
        params![scope_col(scope), path],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    tracing::info!(target: "cortex::audit", op = "delete_documents_by_path", path, rows, "documents deleted");
    Ok(rows)
}

pub fn get_document(conn: &Connection, scope: &Scope, id: &str) -> CortexResult<Option<Document>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM documents WHERE id = ?1 AND scope_id = ?2"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    stmt.query_row(params![id, scope_col(scope)], |row| Ok(row_to_document(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?
        .transpose()
}

pub fn file_unchanged(conn: &Connection, scope: &Scope, path: &str, content: &str) -> CortexResult<bool> {
    let hash = blake3::hash(content.as_bytes()).to_hex().to_string();
    let existing: Option<String> = conn
        .query_row(
            "SELECT content_hash FROM file_hashes WHERE scope_id = ?1 AND path = ?2",
            params![scope_col(scope), path],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(existing.as_deref() == Some(hash.as_str()))
}

pub fn record_file_hash(conn: &Connection, scope: &Scope, path: &str, content: &str) -> CortexResult<()> {
    let hash = blake3::hash(content.as_bytes()).to_hex().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO file_hashes (scope_id, path, content_hash, indexed_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(scope_id, path) DO UPDATE SET content_hash = excluded.content_hash, indexed_at = excluded.indexed_at",
        params![scope_col(scope), path, hash, now],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_documents_bulk(conn: &Connection, scope: &Scope, ids: &[String]) -> CortexResult<Vec<Document>> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(d) = get_document(conn, scope, id)? {
            out.push(d);
        }
    }
    Ok(out)
}

pub fn all_documents(conn: &Connection, scope: &Scope, corpus: &str) -> CortexResult<Vec<Document>> {
    let scope_ids = visible_scope_ids(scope, true);
    let placeholders: Vec<String> = (0..scope_ids.len()).map(|i| format!("?{}", i + 1)).collect();
    let path_prefix_clause = match corpus {
        "code" => "path LIKE 'code:%'",
        _ => "path NOT LIKE 'code:%'",
    };

    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM documents WHERE scope_id IN ({}) AND {path_prefix_clause}",
        placeholders.join(", ")
    );

    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(scope_ids.iter()), |row| Ok(row_to_document(row)))
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?
        .into_iter()
        .collect::<CortexResult<Vec<_>>>()?;
    Ok(rows)
}

pub fn document_by_symbol(
    conn: &Connection,
    scope: &Scope,
    symbol_type: SymbolType,
) -> CortexResult<Vec<Document>> {
    let scope_ids = visible_scope_ids(scope, true);
    let type_json = serde_json::to_string(&symbol_type).map_err(|e| to_storage_err(e.to_string()))?;
    let type_str = type_json.trim_matches('"');

    let placeholders: Vec<String> = (1..=scope_ids.len()).map(|i| format!("?{}", i + 1)).collect();
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM documents WHERE symbol_type = ?1 AND scope_id IN ({})",
        placeholders.join(", ")
    );

    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let mut bind: Vec<&dyn rusqlite::ToSql> = vec![&type_str];
    bind.extend(scope_ids.iter().map(|s| s as &dyn rusqlite::ToSql));

    let rows = stmt
        .query_map(rusqlite::params_from_iter(bind), |row| Ok(row_to_document(row)))
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?
        .into_iter()
        .collect::<CortexResult<Vec<_>>>()?;
    Ok(rows)
}

fn row_to_document(row: &rusqlite::Row<'_>) -> CortexResult<Document> {
    let scope_id_col: String = row.get(1).map_err(|e| to_storage_err(e.to_string()))?;
    let embedding_blob: Vec<u8> = row.get(7).map_err(|e| to_storage_err(e.to_string()))?;
    let symbol_type_str: Option<String> = row.get(9).map_err(|e| to_storage_err(e.to_string()))?;
    let created_at_str: String = row.get(11).map_err(|e| to_storage_err(e.to_string()))?;
    let updated_at_str: String = row.get(12).map_err(|e| to_storage_err(e.to_string()))?;

    let parse_dt = |s: &str| -> CortexResult<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
    };

    Ok(Document {
        id: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        scope: scope_from_col(&scope_id_col),
        path: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        chunk_index: row.get(3).map_err(|e| to_storage_err(e.to_string()))?,
        content: row.get(4).map_err(|e| to_storage_err(e.to_string()))?,
        start_line: row.get(5).map_err(|e| to_storage_err(e.to_string()))?,
        end_line: row.get(6).map_err(|e| to_storage_err(e.to_string()))?,
        embedding: crate::vector::bytes_to_f32_vec(&embedding_blob),
        symbol_name: row.get(8).map_err(|e| to_storage_err(e.to_string()))?,
        symbol_type: symbol_type_str
            .map(|s| serde_json::from_str::<SymbolType>(&format!("\"{s}\"")))
            .transpose()
            .map_err(|e| to_storage_err(format!("parse symbol_type: {e}")))?,
        signature: row.get(10).map_err(|e| to_storage_err(e.to_string()))?,
        created_at: parse_dt(&created_at_str)?,
        updated_at: parse_dt(&updated_at_str)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;

    fn doc(path: &str, chunk_index: u32) -> Document {
        Document {
            id: uuid::Uuid::new_v4().to_string(),
            scope: Scope::project("p"),
            path: path.into(),
            chunk_index,
            content: "fn f() {}".into(),
            start_line: 1,
            end_line: 1,
            embedding: vec![0.1, 0.2],
            symbol_name: Some("f".into()),
            symbol_type: Some(SymbolType::Function),
            signature: Some("fn f()".into()),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn upsert_is_idempotent_on_unique_key() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let mut d = doc("code:src/a.rs", 0);
        upsert_document(&conn, &d, 2).unwrap();
        d.content = "fn f() { 1 }".into();
        upsert_document(&conn, &d, 2).unwrap();

        let all = all_documents(&conn, &Scope::project("p"), "code").unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].content, "fn f() { 1 }");
    }

    #[test]
    fn upsert_rejects_embedding_dimension_mismatch() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let err = upsert_document(&conn, &doc("code:src/a.rs", 0), 384).unwrap_err();
        assert!(matches!(err, cortex_core::CortexError::Contract { .. }));
        assert!(all_documents(&conn, &Scope::project("p"), "code").unwrap().is_empty());
    }

    #[test]
    fn file_unchanged_detects_content_drift() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let scope = Scope::project("p");
        record_file_hash(&conn, &scope, "code:src/a.rs", "v1").unwrap();
        assert!(file_unchanged(&conn, &scope, "code:src/a.rs", "v1").unwrap());
        assert!(!file_unchanged(&conn, &scope, "code:src/a.rs", "v2").unwrap());
    }

    #[test]
    fn delete_by_path_cascades_file_hash() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let scope = Scope::project("p");
        upsert_document(&conn, &doc("code:src/a.rs", 0), 2).unwrap();
        record_file_hash(&conn, &scope, "code:src/a.rs", "v1").unwrap();

        let deleted = delete_documents_by_path(&conn, &scope, "code:src/a.rs").unwrap();
        assert_eq!(deleted, 1);
        assert!(!file_unchanged(&conn, &scope, "code:src/a.rs", "v1").unwrap());
    }
}
