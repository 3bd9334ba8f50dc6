use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scope::Scope;

/// The kind of durable fact a `Memory` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    Observation,
    Decision,
    Learning,
    Pattern,
    Error,
    Preference,
}

/// A durable fact the assistant has learned, with bitemporal validity and a
/// quality/decay profile. See spec.md §3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub id: String,
    /// `None` (global) is allowed here because `Memory.scope` is optional
    /// per spec.md §3 ("`scope_id?`"); store-level `Scope` is still used for
    /// the visibility check, constructed via `Memory::scope()`.
    pub scope_id: Option<String>,
    pub content: String,
    pub tags: HashSet<String>,
    pub source: Option<String>,
    pub kind: MemoryKind,
    pub quality_score: Option<f64>,
    pub quality_factors: Option<HashMap<String, f64>>,
    pub embedding: Vec<f32>,
    pub access_count: f64,
    pub last_accessed: Option<DateTime<Utc>>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub invalidated_by: Option<String>,
    pub correction_count: u32,
    pub is_invariant: bool,
    pub created_at: DateTime<Utc>,
    /// blake3 hash of `content`; a cheap pre-filter ahead of the embedding
    /// dedup scan (see SPEC_FULL.md §3).
    pub content_hash: String,
}

impl Memory {
    pub fn scope(&self) -> Scope {
        match &self.scope_id {
            None => Scope::Global,
            Some(id) => Scope::Project(id.clone()),
        }
    }

    pub fn compute_content_hash(content: &str) -> String {
        blake3::hash(content.as_bytes()).to_hex().to_string()
    }

    /// A memory is active iff not invalidated and within its validity
    /// window, evaluated at `now` (spec.md §3 Invariants).
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        if self.invalidated_by.is_some() {
            return false;
        }
        if let Some(from) = self.valid_from {
            if now < from {
                return false;
            }
        }
        if let Some(until) = self.valid_until {
            if now >= until {
                return false;
            }
        }
        true
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }
}
