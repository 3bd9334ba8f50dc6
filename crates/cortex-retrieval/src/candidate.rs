//! The fused candidate type the ranking pipeline threads through its
//! stages, plus a small trait so the generic stages (regex filter, MMR)
//! don't need to know whether they're ranking `Document`s or `Memory`s.

use chrono::{DateTime, Utc};

use cortex_core::{Document, Memory};

/// A fused BM25+vector candidate carrying its originating ranks and the
/// payload being ranked. `score` starts as the RRF score and accumulates
/// every subsequent boost in place.
#[derive(Debug, Clone)]
pub struct Candidate<P> {
    pub id: String,
    pub payload: P,
    pub score: f64,
    pub bm25_rank: Option<usize>,
    pub vector_rank: Option<usize>,
    /// `1 - distance` from the vector candidate list, when present. Used
    /// only for the tie-break rule and MMR's similarity term.
    pub vector_similarity: Option<f64>,
}

/// What the generic pipeline stages (regex filter, MMR) need from a
/// candidate's payload, regardless of whether it's a `Document` or a
/// `Memory`.
pub trait Scorable {
    fn content(&self) -> &str;
    fn embedding(&self) -> &[f32];
    fn created_at(&self) -> DateTime<Utc>;
}

impl Scorable for Document {
    fn content(&self) -> &str {
        &self.content
    }

    fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Scorable for Memory {
    fn content(&self) -> &str {
        &self.content
    }

    fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl<P> Candidate<P> {
    /// Sort in final-ranking order: score descending, then the spec.md
    /// §4.4 tie-break (higher vector score, then lower entity id).
    pub fn cmp_ranked(a: &Candidate<P>, b: &Candidate<P>) -> std::cmp::Ordering {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                b.vector_similarity
                    .partial_cmp(&a.vector_similarity)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.id.cmp(&b.id))
    }
}

pub fn sort_ranked<P>(candidates: &mut [Candidate<P>]) {
    candidates.sort_by(Candidate::cmp_ranked);
}
