//! Shared builders for `Memory`/`Document`/`MemoryLink` test data, so each
//! crate's test suite doesn't hand-roll the same full struct literal.
//! Every field has a sane default; override what the test actually cares
//! about via the `*_with` variants or plain struct-update syntax.

use std::collections::HashSet;

use chrono::Utc;
use cortex_core::{Document, Memory, MemoryKind, MemoryLink, RelationKind, Scope, SymbolType};

/// A `Memory` with `id`, `content`, and `embedding` set; everything else
/// defaulted (global scope, `Observation` kind, no quality score, just
/// created, active).
pub fn memory(id: &str, content: &str, embedding: Vec<f32>) -> Memory {
    Memory {
        id: id.into(),
        scope_id: None,
        content: content.into(),
        tags: HashSet::new(),
        source: None,
        kind: MemoryKind::Observation,
        quality_score: None,
        quality_factors: None,
        embedding,
        access_count: 0.0,
        last_accessed: None,
        valid_from: None,
        valid_until: None,
        invalidated_by: None,
        correction_count: 0,
        is_invariant: false,
        created_at: Utc::now(),
        content_hash: Memory::compute_content_hash(content),
    }
}

/// Like [`memory`], but backdated by `age_days` and carrying `quality`.
pub fn aged_memory(id: &str, content: &str, embedding: Vec<f32>, quality: f64, age_days: i64) -> Memory {
    Memory {
        quality_score: Some(quality),
        created_at: Utc::now() - chrono::Duration::days(age_days),
        ..memory(id, content, embedding)
    }
}

/// A code-corpus `Document` (`path` prefixed `code:`) with `symbol_name`
/// and `symbol_type: Function` set.
pub fn code_document(id: &str, symbol_name: &str, content: &str) -> Document {
    Document {
        id: id.into(),
        scope: Scope::Global,
        path: format!("code:src/{id}.rs"),
        chunk_index: 0,
        content: content.into(),
        start_line: 1,
        end_line: content.lines().count().max(1) as u32,
        embedding: vec![0.1, 0.2],
        symbol_name: Some(symbol_name.into()),
        symbol_type: Some(SymbolType::Function),
        signature: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// A prose `Document` (no `code:` prefix, no symbol metadata).
pub fn prose_document(id: &str, path: &str, content: &str) -> Document {
    Document {
        id: id.into(),
        scope: Scope::Global,
        path: path.into(),
        chunk_index: 0,
        content: content.into(),
        start_line: 1,
        end_line: content.lines().count().max(1) as u32,
        embedding: vec![0.1, 0.2],
        symbol_name: None,
        symbol_type: None,
        signature: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// A `MemoryLink` with `weight` and `relation` set, created "yesterday" so
/// it reads as already-settled rather than just-created in tests that
/// check ordering by `created_at`.
pub fn link(source_id: &str, target_id: &str, relation: RelationKind, weight: f64) -> MemoryLink {
    MemoryLink {
        id: format!("{source_id}-{target_id}-{relation:?}"),
        source_id: source_id.into(),
        target_id: target_id.into(),
        relation,
        weight,
        valid_from: None,
        valid_until: None,
        llm_enriched: false,
        created_at: Utc::now() - chrono::Duration::days(1),
    }
}
