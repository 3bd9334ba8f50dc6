//! k-NN over document/memory embeddings. Loads the candidate set from
//! SQLite into a [`BruteForceIndex`](crate::vector::BruteForceIndex) and
//! delegates ranking to it (spec.md §4.1, §9 "dynamic dispatch" —
//! `StorageEngine` always has a correct, if unaccelerated, path).

use rusqlite::Connection;

use cortex_core::traits::{Neighbor, TemporalFilter, VectorIndex};
use cortex_core::{CortexResult, Scope};

use crate::to_storage_err;
use crate::vector::BruteForceIndex;

pub fn knn_documents(
    conn: &Connection,
    scope: &Scope,
    corpus: &str,
    query: &[f32],
    k: usize,
) -> CortexResult<Vec<Neighbor>> {
    let docs = super::document_ops::all_documents(conn, scope, corpus)?;
    let mut index = BruteForceIndex::new();
    for doc in &docs {
        index.upsert(&doc.id, &doc.embedding);
    }
    Ok(index.knn(query, k))
}

pub fn knn_memories(
    conn: &Connection,
    scope: &Scope,
    query: &[f32],
    k: usize,
    include_global: bool,
    filter: &TemporalFilter,
) -> CortexResult<Vec<Neighbor>> {
    // `search_candidates` always includes global memories; when the caller
    // wants project-only results, filter them back out afterward.
    let memories = super::memory_query::search_candidates(conn, scope, filter)?;
    let mut index = BruteForceIndex::new();
    for memory in &memories {
        if !include_global && memory.scope_id.is_none() {
            continue;
        }
        index.upsert(&memory.id, &memory.embedding);
    }
    Ok(index.knn(query, k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;
    use crate::queries::document_ops::upsert_document;
    use cortex_core::Document;

    fn doc(id: &str, embedding: Vec<f32>) -> Document {
        Document {
            id: id.into(),
            scope: Scope::project("p"),
            path: "code:src/a.rs".into(),
            chunk_index: 0,
            content: "fn f() {}".into(),
            start_line: 1,
            end_line: 1,
            embedding,
            symbol_name: None,
            symbol_type: None,
            signature: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn knn_documents_ranks_closest_first() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        upsert_document(&conn, &doc("near", vec![1.0, 0.0]), 2).unwrap();
        let mut far = doc("far", vec![0.0, 1.0]);
        far.path = "code:src/b.rs".into();
        upsert_document(&conn, &far, 2).unwrap();

        let results = knn_documents(&conn, &Scope::project("p"), "code", &[1.0, 0.0], 2).unwrap();
        assert_eq!(results[0].entity_id, "near");
    }
}
