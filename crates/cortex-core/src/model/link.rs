use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Typed relation between two memories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Related,
    CausedBy,
    LeadsTo,
    SimilarTo,
    Contradicts,
    Implements,
    Supersedes,
    References,
}

/// A typed directed edge between two memories. Idempotent on
/// `(source_id, target_id, relation)` per spec.md §3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryLink {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub relation: RelationKind,
    pub weight: f64,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub llm_enriched: bool,
    pub created_at: DateTime<Utc>,
}

impl MemoryLink {
    pub fn unique_key(&self) -> (String, String, RelationKind) {
        (self.source_id.clone(), self.target_id.clone(), self.relation)
    }

    /// Active per the same validity predicate as `Memory`, evaluated at
    /// `as_of` for point-in-time queries.
    pub fn is_active_at(&self, as_of: DateTime<Utc>) -> bool {
        if let Some(from) = self.valid_from {
            if as_of < from {
                return false;
            }
        }
        if let Some(until) = self.valid_until {
            if as_of >= until {
                return false;
            }
        }
        true
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }

    /// For `connected_as_of`: the edge must have been created before
    /// `as_of` *and* be active at `as_of` (spec.md §4.6).
    pub fn was_visible_as_of(&self, as_of: DateTime<Utc>) -> bool {
        self.created_at < as_of && self.is_active_at(as_of)
    }
}
