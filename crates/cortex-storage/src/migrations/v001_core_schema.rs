//! v001: memories and memory_links — the temporal knowledge base core.

use rusqlite::Connection;

use cortex_core::CortexResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CortexResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE TABLE IF NOT EXISTS memories (
            id               TEXT PRIMARY KEY,
            scope_id         TEXT NOT NULL DEFAULT '',
            content          TEXT NOT NULL,
            tags             TEXT NOT NULL DEFAULT '[]',
            source           TEXT,
            kind             TEXT NOT NULL,
            quality_score    REAL,
            quality_factors  TEXT,
            embedding        BLOB NOT NULL,
            access_count     REAL NOT NULL DEFAULT 0,
            last_accessed    TEXT,
            valid_from       TEXT,
            valid_until      TEXT,
            invalidated_by   TEXT,
            correction_count INTEGER NOT NULL DEFAULT 0,
            is_invariant     INTEGER NOT NULL DEFAULT 0,
            created_at       TEXT NOT NULL,
            content_hash     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_memories_scope ON memories(scope_id);
        CREATE INDEX IF NOT EXISTS idx_memories_kind ON memories(kind);
        CREATE INDEX IF NOT EXISTS idx_memories_content_hash ON memories(content_hash);
        CREATE INDEX IF NOT EXISTS idx_memories_valid_until ON memories(valid_until);

        CREATE TABLE IF NOT EXISTS memory_links (
            id           TEXT PRIMARY KEY,
            source_id    TEXT NOT NULL,
            target_id    TEXT NOT NULL,
            relation     TEXT NOT NULL,
            weight       REAL NOT NULL DEFAULT 1.0,
            valid_from   TEXT,
            valid_until  TEXT,
            llm_enriched INTEGER NOT NULL DEFAULT 0,
            created_at   TEXT NOT NULL,
            UNIQUE(source_id, target_id, relation),
            FOREIGN KEY (source_id) REFERENCES memories(id) ON DELETE CASCADE,
            FOREIGN KEY (target_id) REFERENCES memories(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_links_source ON memory_links(source_id);
        CREATE INDEX IF NOT EXISTS idx_links_target ON memory_links(target_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
