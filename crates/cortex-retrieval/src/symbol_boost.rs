//! Step 4 of the hybrid ranker (spec.md §4.4, code corpus only): boost a
//! candidate whose `symbol_name` matches the query's normalized tokens.

use std::sync::OnceLock;

use regex::Regex;

use cortex_core::Document;
use cortex_tokens::identifier::split_parts;

use crate::candidate::Candidate;

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\p{L}\p{N}_]+").expect("static regex is valid"))
}

/// Normalize to a flat, caseless run of identifier parts so `getUserById`,
/// `get_user_by_id`, and `Get User By Id` all compare equal.
fn normalize(s: &str) -> String {
    let mut parts = Vec::new();
    for m in word_re().find_iter(s) {
        let word = m.as_str();
        let split = split_parts(word);
        if split.is_empty() {
            parts.push(word.to_lowercase());
        } else {
            parts.extend(split);
        }
    }
    parts.join("")
}

/// Apply the AST symbol boost to every code candidate in place: `+exact`
/// when the normalized query equals the candidate's normalized
/// `symbol_name`, `+partial` on a substring match, nothing otherwise.
pub fn apply_symbol_boost(candidates: &mut [Candidate<Document>], query: &str, exact: f64, partial: f64) {
    let query_norm = normalize(query);
    if query_norm.is_empty() {
        return;
    }
    for c in candidates.iter_mut() {
        let Some(symbol_name) = c.payload.symbol_name.as_deref() else {
            continue;
        };
        let symbol_norm = normalize(symbol_name);
        if symbol_norm.is_empty() {
            continue;
        }
        if symbol_norm == query_norm {
            c.score += exact;
        } else if symbol_norm.contains(&query_norm) || query_norm.contains(&symbol_norm) {
            c.score += partial;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cortex_core::Scope;

    fn doc(symbol_name: Option<&str>) -> Document {
        Document {
            id: "d1".into(),
            scope: Scope::Global,
            path: "code:a.rs".into(),
            chunk_index: 0,
            content: "fn f() {}".into(),
            start_line: 1,
            end_line: 1,
            embedding: vec![0.1],
            symbol_name: symbol_name.map(String::from),
            symbol_type: None,
            signature: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn candidate(document: Document) -> Candidate<Document> {
        Candidate {
            id: document.id.clone(),
            payload: document,
            score: 0.5,
            bm25_rank: Some(0),
            vector_rank: None,
            vector_similarity: None,
        }
    }

    #[test]
    fn exact_match_gets_the_bigger_boost() {
        // S1 — code hybrid ranking symbol boost seed scenario from spec.md §8.
        let mut candidates = vec![candidate(doc(Some("getUserById")))];
        apply_symbol_boost(&mut candidates, "get_user_by_id", 0.15, 0.08);
        assert!((candidates[0].score - 0.65).abs() < 1e-9);
    }

    #[test]
    fn substring_match_gets_the_partial_boost() {
        let mut candidates = vec![candidate(doc(Some("getUserByIdAndTenant")))];
        apply_symbol_boost(&mut candidates, "getUserById", 0.15, 0.08);
        assert!((candidates[0].score - 0.58).abs() < 1e-9);
    }

    #[test]
    fn unrelated_symbol_is_unboosted() {
        let mut candidates = vec![candidate(doc(Some("deleteOrder")))];
        apply_symbol_boost(&mut candidates, "getUserById", 0.15, 0.08);
        assert!((candidates[0].score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn missing_symbol_name_is_unboosted() {
        let mut candidates = vec![candidate(doc(None))];
        apply_symbol_boost(&mut candidates, "getUserById", 0.15, 0.08);
        assert!((candidates[0].score - 0.5).abs() < 1e-9);
    }
}
