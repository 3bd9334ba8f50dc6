//! Scope- and temporal-filtered memory queries (spec.md §4.5).

use rusqlite::{params_from_iter, Connection, ToSql};

use cortex_core::traits::TemporalFilter;
use cortex_core::{CortexResult, Memory, Scope};

use crate::queries::memory_crud::row_to_memory;
use crate::scope_col::visible_scope_ids;
use crate::to_storage_err;

const SELECT_COLUMNS: &str = "id, scope_id, content, tags, source, kind, quality_score, \
    quality_factors, embedding, access_count, last_accessed, valid_from, valid_until, \
    invalidated_by, correction_count, is_invariant, created_at, content_hash";

/// All memories visible to `scope`, honoring `filter`. Visibility always
/// includes global memories per `Scope::visible_to`.
pub fn search_candidates(
    conn: &Connection,
    scope: &Scope,
    filter: &TemporalFilter,
) -> CortexResult<Vec<Memory>> {
    let scope_ids = visible_scope_ids(scope, true);
    let placeholders: Vec<String> = (0..scope_ids.len()).map(|i| format!("?{}", i + 1)).collect();

    let mut sql = format!(
        "SELECT {SELECT_COLUMNS} FROM memories WHERE scope_id IN ({})",
        placeholders.join(", ")
    );

    let mut params: Vec<Box<dyn ToSql>> =
        scope_ids.iter().map(|s| Box::new(s.clone()) as Box<dyn ToSql>).collect();

    if !filter.include_expired {
        if let Some(as_of) = filter.as_of {
            let idx = params.len() + 1;
            sql.push_str(&format!(
                " AND invalidated_by IS NULL \
                  AND (valid_from IS NULL OR valid_from <= ?{idx}) \
                  AND (valid_until IS NULL OR valid_until > ?{idx})"
            ));
            params.push(Box::new(as_of.to_rfc3339()));
        } else {
            sql.push_str(
                " AND invalidated_by IS NULL \
                  AND (valid_until IS NULL OR valid_until > strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))",
            );
        }
    }

    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();

    let rows = stmt
        .query_map(params_from_iter(param_refs), |row| Ok(row_to_memory(row)))
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?
        .into_iter()
        .collect::<CortexResult<Vec<_>>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;
    use crate::queries::memory_crud::insert_memory;
    use cortex_core::MemoryKind;

    fn seed(conn: &Connection) -> Memory {
        Memory {
            id: "m1".into(),
            scope_id: None,
            content: "hello".into(),
            tags: Default::default(),
            source: None,
            kind: MemoryKind::Observation,
            quality_score: None,
            quality_factors: None,
            embedding: vec![1.0, 0.0],
            access_count: 0.0,
            last_accessed: None,
            valid_from: None,
            valid_until: None,
            invalidated_by: None,
            correction_count: 0,
            is_invariant: false,
            created_at: chrono::Utc::now(),
            content_hash: Memory::compute_content_hash("hello"),
        }
    }

    #[test]
    fn global_memory_visible_from_project_scope() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let m = seed(&conn);
        insert_memory(&conn, &m).unwrap();

        let results = search_candidates(&conn, &Scope::project("p"), &TemporalFilter::default()).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn project_memory_invisible_to_other_project() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let mut m = seed(&conn);
        m.scope_id = Some("p1".into());
        insert_memory(&conn, &m).unwrap();

        let results = search_candidates(&conn, &Scope::project("p2"), &TemporalFilter::default()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn expired_memory_excluded_unless_requested() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let mut m = seed(&conn);
        m.valid_until = Some(chrono::Utc::now() - chrono::Duration::days(1));
        insert_memory(&conn, &m).unwrap();

        let default_filter = TemporalFilter::default();
        assert!(search_candidates(&conn, &Scope::Global, &default_filter).unwrap().is_empty());

        let include_expired = TemporalFilter { include_expired: true, as_of: None };
        assert_eq!(search_candidates(&conn, &Scope::Global, &include_expired).unwrap().len(), 1);
    }
}
