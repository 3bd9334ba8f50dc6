use serde::{Deserialize, Serialize};

/// Quality-boost reranker toggle (spec.md §4.4 step 7).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum QualityBoost {
    Disabled,
    Enabled { weight: f64 },
}

impl Default for QualityBoost {
    fn default() -> Self {
        QualityBoost::Enabled { weight: 0.2 }
    }
}

/// Recency-decay reranker toggle (spec.md §4.4 step 8).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RecencyDecay {
    Disabled,
    Enabled {
        half_life_hours: f64,
        floor: f64,
        /// Skip decay entirely for candidates ≤24h old.
        temporal_auto_skip: bool,
    },
}

impl Default for RecencyDecay {
    fn default() -> Self {
        RecencyDecay::Enabled {
            half_life_hours: 168.0,
            floor: 0.1,
            temporal_auto_skip: true,
        }
    }
}

/// Centrality-boost reranker toggle (spec.md §4.4 step 9).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CentralityBoost {
    Disabled,
    Enabled { weight: f64, ttl_secs: u64 },
}

impl Default for CentralityBoost {
    fn default() -> Self {
        CentralityBoost::Disabled
    }
}

/// MMR diversification toggle (spec.md §4.4 step 10).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MmrDiversification {
    Disabled,
    Enabled { lambda: f64 },
}

impl Default for MmrDiversification {
    fn default() -> Self {
        MmrDiversification::Disabled
    }
}

/// Query-expansion toggle, consumed by callers that sit above the core
/// ranker; kept here because it is still one of the named tagged-variant
/// toggles in spec.md §9.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum QueryExpansion {
    Disabled,
    Synonyms { max_expansions: usize },
}

impl Default for QueryExpansion {
    fn default() -> Self {
        QueryExpansion::Disabled
    }
}

/// Full configuration for `cortex-retrieval`'s hybrid ranker (spec.md §4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub k_bm25: usize,
    pub k_vec: usize,
    pub rrf_k: u32,
    /// α bias toward vector (1.0) vs BM25 (0.0) in RRF.
    pub alpha: f64,
    pub symbol_boost_exact: f64,
    pub symbol_boost_partial: f64,
    pub max_regex_len: usize,
    pub quality_boost: QualityBoost,
    pub recency_decay: RecencyDecay,
    pub centrality_boost: CentralityBoost,
    pub mmr: MmrDiversification,
    pub query_expansion: QueryExpansion,
    pub default_threshold: f64,
    pub default_limit: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            k_bm25: 100,
            k_vec: 100,
            rrf_k: 60,
            alpha: 0.4,
            symbol_boost_exact: 0.15,
            symbol_boost_partial: 0.08,
            max_regex_len: 500,
            quality_boost: QualityBoost::default(),
            recency_decay: RecencyDecay::default(),
            centrality_boost: CentralityBoost::default(),
            mmr: MmrDiversification::default(),
            query_expansion: QueryExpansion::default(),
            default_threshold: 0.0,
            default_limit: 20,
        }
    }
}
