//! Step 6 of the hybrid ranker (spec.md §4.4): drop candidates whose
//! `symbol_type` doesn't match the requested type. An unknown/absent type
//! is never satisfied by any candidate (spec.md: "unknown symbol_type ->
//! empty result").

use cortex_core::{Document, SymbolType};

use crate::candidate::Candidate;

pub fn apply_type_filter(candidates: Vec<Candidate<Document>>, symbol_type: SymbolType) -> Vec<Candidate<Document>> {
    candidates.into_iter().filter(|c| c.payload.symbol_type == Some(symbol_type)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cortex_core::Scope;

    fn doc(symbol_type: Option<SymbolType>) -> Candidate<Document> {
        let document = Document {
            id: "d1".into(),
            scope: Scope::Global,
            path: "code:a.rs".into(),
            chunk_index: 0,
            content: "fn f() {}".into(),
            start_line: 1,
            end_line: 1,
            embedding: vec![0.1],
            symbol_name: None,
            symbol_type,
            signature: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        Candidate {
            id: document.id.clone(),
            payload: document,
            score: 1.0,
            bm25_rank: None,
            vector_rank: None,
            vector_similarity: None,
        }
    }

    #[test]
    fn keeps_only_the_requested_type() {
        let candidates = vec![doc(Some(SymbolType::Function)), doc(Some(SymbolType::Struct))];
        let kept = apply_type_filter(candidates, SymbolType::Function);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn untyped_candidate_never_matches() {
        let candidates = vec![doc(None)];
        let kept = apply_type_filter(candidates, SymbolType::Function);
        assert!(kept.is_empty());
    }
}
