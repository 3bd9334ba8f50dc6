//! v002: indexed code/doc chunks and the per-file content-hash ledger that
//! lets re-indexing skip unchanged files.

use rusqlite::Connection;

use cortex_core::CortexResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CortexResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS documents (
            id            TEXT PRIMARY KEY,
            scope_id      TEXT NOT NULL DEFAULT '',
            path          TEXT NOT NULL,
            chunk_index   INTEGER NOT NULL,
            content       TEXT NOT NULL,
            start_line    INTEGER NOT NULL,
            end_line      INTEGER NOT NULL,
            embedding     BLOB NOT NULL,
            symbol_name   TEXT,
            symbol_type   TEXT,
            signature     TEXT,
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL,
            UNIQUE(scope_id, path, chunk_index)
        );

        CREATE INDEX IF NOT EXISTS idx_documents_scope_path ON documents(scope_id, path);
        CREATE INDEX IF NOT EXISTS idx_documents_symbol_type ON documents(scope_id, symbol_type);

        CREATE TABLE IF NOT EXISTS file_hashes (
            scope_id      TEXT NOT NULL DEFAULT '',
            path          TEXT NOT NULL,
            content_hash  TEXT NOT NULL,
            indexed_at    TEXT NOT NULL,
            PRIMARY KEY (scope_id, path)
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
