use serde::{Deserialize, Serialize};

/// Observed unigram frequency, driving the flatcase segmenter (spec.md §4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenFrequency {
    pub token: String,
    pub count: u64,
}
