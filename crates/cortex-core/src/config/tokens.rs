use serde::{Deserialize, Serialize};

/// Tokenizer/segmenter thresholds (spec.md §4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokensConfig {
    /// Corpus token-count threshold `T` above which flatcase segmentation
    /// is attempted at all. Default 10,000.
    pub segmentation_threshold: u64,
    /// Minimum per-part frequency required to accept a segmentation.
    pub min_part_frequency: u64,
    /// Margin the joint log-probability of a segmentation must beat the
    /// unsegmented token's probability by, to be accepted.
    pub segmentation_margin: f64,
    /// How many times symbol-name tokens are emitted (triple TF).
    pub symbol_tf_multiplier: usize,
}

impl Default for TokensConfig {
    fn default() -> Self {
        Self {
            segmentation_threshold: 10_000,
            min_part_frequency: 5,
            segmentation_margin: 1.0,
            symbol_tf_multiplier: 3,
        }
    }
}
