//! # cortex-consolidation
//!
//! C7 (consolidation half): pairwise dedup-merge of near-duplicate active
//! memories, `supersedes` edges, and `undo` (spec.md §4.7). Retention
//! (decay-based eviction) is `cortex-decay`.

pub mod candidates;
pub mod engine;
pub mod merge;

pub use candidates::{find_candidates, MergeCandidate};
pub use engine::{ConsolidationEngine, ConsolidationOutcome};
pub use merge::build_merged_memory;
