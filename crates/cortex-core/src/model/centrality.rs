use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cached degree-centrality score for a memory node. Recomputed by a
/// periodic job; readers tolerate staleness up to a configured TTL
/// (spec.md §4.6, §5).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CentralityScore {
    pub degree: u32,
    pub normalized_degree: f64,
    pub updated_at: DateTime<Utc>,
}

impl CentralityScore {
    pub fn zero() -> Self {
        Self {
            degree: 0,
            normalized_degree: 0.0,
            updated_at: Utc::now(),
        }
    }

    pub fn is_stale(&self, ttl: chrono::Duration, now: DateTime<Utc>) -> bool {
        now - self.updated_at > ttl
    }
}
