//! Configuration types. Each feature toggle is a tagged enum with its own
//! associated parameters — "disabled" is a distinct variant, not a struct
//! field defaulted away — per the "config as tagged variants" design note
//! in spec.md §9.

pub mod consolidation;
pub mod decay;
pub mod retrieval;
pub mod storage;
pub mod tokens;

pub use consolidation::ConsolidationConfig;
pub use decay::DecayConfig;
pub use retrieval::{
    CentralityBoost, MmrDiversification, QualityBoost, QueryExpansion, RecencyDecay,
    RetrievalConfig,
};
pub use storage::StorageConfig;
pub use tokens::TokensConfig;

use serde::{Deserialize, Serialize};

/// Top-level config aggregating every subsystem's config. Loading this from
/// TOML/env files is a caller concern (out of scope per spec.md §1); this
/// struct and its `Default` impl are the contract other crates build
/// against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CortexConfig {
    pub storage: StorageConfig,
    pub tokens: TokensConfig,
    pub retrieval: RetrievalConfig,
    pub consolidation: ConsolidationConfig,
    pub decay: DecayConfig,
}
