//! Ordered, idempotent schema migrations, tracked in `schema_version`.

mod v001_core_schema;
mod v002_documents;

use rusqlite::Connection;

use cortex_core::CortexResult;

use crate::to_storage_err;

type Migration = fn(&Connection) -> CortexResult<()>;

const MIGRATIONS: &[(i64, Migration)] = &[
    (1, v001_core_schema::migrate),
    (2, v002_documents::migrate),
];

pub fn run_migrations(conn: &Connection) -> CortexResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let current: i64 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    for (version, migrate) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        migrate(conn)?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [*version],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    }

    Ok(())
}
