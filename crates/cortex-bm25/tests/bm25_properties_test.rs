//! Property tests over `BmIndex::score`: whatever the document set, scores
//! stay non-negative and a repeated query term never lowers a document's
//! rank relative to the same query without the repeat.

use cortex_bm25::{BmIndex, BmParams};
use proptest::prelude::*;

fn build_index(docs: &[Vec<String>]) -> BmIndex {
    let mut idx = BmIndex::new();
    for (i, tokens) in docs.iter().enumerate() {
        idx.upsert_document(&format!("d{i}"), tokens);
    }
    idx
}

proptest! {
    #[test]
    fn scores_are_never_negative(
        docs in prop::collection::vec(prop::collection::vec("[a-z]{1,6}", 0..8), 0..6),
        query in prop::collection::vec("[a-z]{1,6}", 0..4),
    ) {
        let idx = build_index(&docs);
        let scored = idx.score(&query, BmParams::default());
        for (_, score) in &scored {
            prop_assert!(*score >= 0.0);
        }
    }

    #[test]
    fn repeating_a_query_term_never_lowers_its_top_score(
        docs in prop::collection::vec(prop::collection::vec("[a-z]{1,6}", 1..8), 1..6),
        term in "[a-z]{1,6}",
    ) {
        let idx = build_index(&docs);
        let single = idx.score(&[term.clone()], BmParams::default());
        let doubled = idx.score(&[term.clone(), term.clone()], BmParams::default());

        let top_single = single.first().map(|(_, s)| *s).unwrap_or(0.0);
        let top_doubled = doubled.first().map(|(_, s)| *s).unwrap_or(0.0);
        prop_assert!(top_doubled >= top_single - f64::EPSILON);
    }

    #[test]
    fn removing_every_document_empties_the_index(
        docs in prop::collection::vec(prop::collection::vec("[a-z]{1,6}", 0..8), 0..6),
    ) {
        let mut idx = build_index(&docs);
        for i in 0..docs.len() {
            idx.remove_document(&format!("d{i}"));
        }
        prop_assert!(idx.is_empty());
        prop_assert_eq!(idx.doc_count(), 0);
    }
}
