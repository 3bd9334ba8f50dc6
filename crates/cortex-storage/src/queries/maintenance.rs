//! Periodic upkeep and the read-only `stats` rollup (spec.md §4.6,
//! ambient `vacuum`/`integrity_check` per SPEC_FULL.md §4).

use std::collections::HashMap;

use rusqlite::Connection;

use cortex_core::{CortexResult, Scope};

use crate::scope_col::visible_scope_ids;
use crate::to_storage_err;

/// Counts backing `cortex-graph`'s `stats(scope)` (spec.md §4.6): total
/// memories, total links, memories with no incident edge, and a tally of
/// active links per relation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageStats {
    pub memory_count: usize,
    pub link_count: usize,
    pub isolated_count: usize,
    pub links_by_relation: HashMap<String, usize>,
}

pub fn vacuum(conn: &Connection) -> CortexResult<()> {
    conn.execute_batch("PRAGMA incremental_vacuum").map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE)")
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn full_vacuum(conn: &Connection) -> CortexResult<()> {
    conn.execute_batch("VACUUM").map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// `true` iff SQLite's own integrity check reports `ok`. A `false` result
/// is the trigger for the Backend-error repair-on-startup path (spec.md §7).
pub fn integrity_check(conn: &Connection) -> CortexResult<bool> {
    let result: String = conn
        .query_row("PRAGMA integrity_check", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(result == "ok")
}

pub fn stats(conn: &Connection, scope: &Scope) -> CortexResult<StorageStats> {
    let scope_ids = visible_scope_ids(scope, true);
    let placeholders: Vec<String> = (0..scope_ids.len()).map(|i| format!("?{}", i + 1)).collect();

    let memory_count: i64 = conn
        .query_row(
            &format!("SELECT COUNT(*) FROM memories WHERE scope_id IN ({})", placeholders.join(", ")),
            rusqlite::params_from_iter(scope_ids.iter()),
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let link_count: i64 = conn
        .query_row(
            &format!(
                "SELECT COUNT(*) FROM memory_links \
                 WHERE (valid_until IS NULL OR valid_until > strftime('%Y-%m-%dT%H:%M:%fZ','now')) \
                   AND source_id IN (SELECT id FROM memories WHERE scope_id IN ({}))",
                placeholders.join(", ")
            ),
            rusqlite::params_from_iter(scope_ids.iter()),
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let isolated_count: i64 = conn
        .query_row(
            &format!(
                "SELECT COUNT(*) FROM memories m \
                 WHERE m.scope_id IN ({}) \
                   AND NOT EXISTS ( \
                     SELECT 1 FROM memory_links l \
                     WHERE (l.source_id = m.id OR l.target_id = m.id) \
                       AND (l.valid_until IS NULL OR l.valid_until > strftime('%Y-%m-%dT%H:%M:%fZ','now')) \
                   )",
                placeholders.join(", ")
            ),
            rusqlite::params_from_iter(scope_ids.iter()),
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut stmt = conn
        .prepare(&format!(
            "SELECT relation, COUNT(*) FROM memory_links \
             WHERE (valid_until IS NULL OR valid_until > strftime('%Y-%m-%dT%H:%M:%fZ','now')) \
               AND source_id IN (SELECT id FROM memories WHERE scope_id IN ({})) \
             GROUP BY relation",
            placeholders.join(", ")
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let links_by_relation = stmt
        .query_map(rusqlite::params_from_iter(scope_ids.iter()), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize))
        })
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<Result<HashMap<_, _>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(StorageStats {
        memory_count: memory_count as usize,
        link_count: link_count as usize,
        isolated_count: isolated_count as usize,
        links_by_relation,
    })
}
