//! # cortex-retrieval
//!
//! C4: the hybrid ranker (BM25 + vector RRF fusion, symbol/regex/type
//! filters, quality/recency/centrality boosts, MMR diversification) and
//! the public `save`/`batch_save`/`search_*` entry points that tie
//! `cortex-storage`, `cortex-graph`, `cortex-bm25`, and `cortex-tokens`
//! together (spec.md §4.4, §4.5).

pub mod boosts;
pub mod candidate;
pub mod facade;
pub mod fusion;
pub mod mmr;
pub mod pipeline;
pub mod regex_filter;
pub mod symbol_boost;
pub mod type_filter;

pub use candidate::{Candidate, Scorable};
pub use facade::RetrievalEngine;
pub use pipeline::{search_code, search_docs, search_memories, RankedResult};
