//! A single corpus's BM25 inverted index.
//!
//! Deliberately hand-rolled rather than backed by SQLite FTS5: the ranking
//! signals this needs (AST-aware symbol-name boosts applied by the caller,
//! configurable k1/b, exact postings for regex/type filtering) aren't
//! reachable through FTS5's built-in `bm25()` ranking function.

use std::collections::HashMap;

/// BM25 free parameters (spec.md default k1=1.2, b=0.75).
#[derive(Debug, Clone, Copy)]
pub struct BmParams {
    pub k1: f64,
    pub b: f64,
}

impl Default for BmParams {
    fn default() -> Self {
        Self {
            k1: cortex_core::constants::BM25_K1,
            b: cortex_core::constants::BM25_B,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Posting {
    term_freq: u32,
}

/// An inverted index over one corpus (e.g. "code", "docs", or a
/// scope-qualified memory corpus). Not thread-safe on its own — callers
/// share it behind the synchronization `cache::IndexCache` provides.
#[derive(Debug, Default)]
pub struct BmIndex {
    /// term -> doc_id -> posting
    postings: HashMap<String, HashMap<String, Posting>>,
    doc_lengths: HashMap<String, u32>,
    total_length: u64,
}

impl BmIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn doc_count(&self) -> usize {
        self.doc_lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_lengths.is_empty()
    }

    fn avgdl(&self) -> f64 {
        if self.doc_lengths.is_empty() {
            0.0
        } else {
            self.total_length as f64 / self.doc_lengths.len() as f64
        }
    }

    /// Insert or replace a document's tokens. Replacing removes the prior
    /// postings first, so re-indexing an edited document never double-counts.
    pub fn upsert_document(&mut self, doc_id: &str, tokens: &[String]) {
        self.remove_document(doc_id);

        let mut tf: HashMap<&str, u32> = HashMap::new();
        for t in tokens {
            *tf.entry(t.as_str()).or_insert(0) += 1;
        }

        for (term, freq) in tf {
            self.postings
                .entry(term.to_string())
                .or_default()
                .insert(doc_id.to_string(), Posting { term_freq: freq });
        }

        self.doc_lengths.insert(doc_id.to_string(), tokens.len() as u32);
        self.total_length += tokens.len() as u64;
    }

    /// Remove a document and all its postings. No-op if absent.
    pub fn remove_document(&mut self, doc_id: &str) {
        if let Some(len) = self.doc_lengths.remove(doc_id) {
            self.total_length -= len as u64;
            for postings in self.postings.values_mut() {
                postings.remove(doc_id);
            }
            self.postings.retain(|_, p| !p.is_empty());
        }
    }

    fn idf(&self, term: &str) -> f64 {
        let n = self.doc_lengths.len() as f64;
        let df = self.postings.get(term).map(|p| p.len()).unwrap_or(0) as f64;
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    /// Score every document containing at least one query term, returned in
    /// descending-score order. `query_tokens` may repeat a term; repeats
    /// compound the term's contribution, matching standard BM25 over a
    /// bag-of-words query.
    pub fn score(&self, query_tokens: &[String], params: BmParams) -> Vec<(String, f64)> {
        if self.doc_lengths.is_empty() || query_tokens.is_empty() {
            return Vec::new();
        }

        let avgdl = self.avgdl();
        let mut scores: HashMap<String, f64> = HashMap::new();

        let mut query_tf: HashMap<&str, u32> = HashMap::new();
        for t in query_tokens {
            *query_tf.entry(t.as_str()).or_insert(0) += 1;
        }

        for (term, qf) in query_tf {
            let Some(postings) = self.postings.get(term) else {
                continue;
            };
            let idf = self.idf(term);
            for (doc_id, posting) in postings {
                let dl = self.doc_lengths.get(doc_id).copied().unwrap_or(0) as f64;
                let tf = posting.term_freq as f64;
                let denom = tf + params.k1 * (1.0 - params.b + params.b * dl / avgdl.max(1.0));
                let term_score = idf * (tf * (params.k1 + 1.0)) / denom.max(f64::EPSILON);
                *scores.entry(doc_id.clone()).or_insert(0.0) += term_score * qf as f64;
            }
        }

        let mut ranked: Vec<(String, f64)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }
}
