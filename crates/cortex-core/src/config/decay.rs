use serde::{Deserialize, Serialize};

/// Shape of the recency factor in the retention score (spec.md §4.7):
/// exponential half-life or hyperbolic decay, selected by config rather
/// than `Option`-with-defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum RecencyShape {
    ExponentialHalfLife { half_life_hours: f64 },
    Hyperbolic { decay_rate: f64 },
}

impl Default for RecencyShape {
    fn default() -> Self {
        RecencyShape::ExponentialHalfLife { half_life_hours: 168.0 }
    }
}

/// Retention/eviction configuration (spec.md §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    pub enabled: bool,
    pub recency_shape: RecencyShape,
    pub access_weight: f64,
    pub max_access_boost: f64,
    pub keep_threshold: f64,
    pub delete_threshold: f64,
    pub min_memory_age_days: u32,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            recency_shape: RecencyShape::default(),
            access_weight: 0.3,
            max_access_boost: 2.0,
            keep_threshold: 0.5,
            delete_threshold: 0.15,
            min_memory_age_days: 7,
        }
    }
}
