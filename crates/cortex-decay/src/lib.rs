//! # cortex-decay
//!
//! C7 (retention half): the `effective = quality · recency_factor ·
//! access_boost` score and the guarded eviction sweep (spec.md §4.7).
//! Consolidation (dedup-merge) is `cortex-consolidation`.

pub mod engine;
pub mod formula;

pub use engine::{RetentionDecision, RetentionEngine, RetentionReport};
pub use formula::{access_boost, effective_score, recency_factor};
