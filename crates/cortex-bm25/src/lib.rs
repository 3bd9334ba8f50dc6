//! # cortex-bm25
//!
//! C4's lexical half and C9 (index cache coordinator): a hand-rolled,
//! per-corpus BM25 inverted index plus Reciprocal Rank Fusion for combining
//! it with vector similarity candidates. `cortex-retrieval` owns query
//! planning; this crate owns scoring.

pub mod cache;
pub mod index;
pub mod rrf;

pub use cache::IndexCache;
pub use index::{BmIndex, BmParams};
pub use rrf::{fuse, RrfCandidate};
