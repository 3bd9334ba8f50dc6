//! `RetentionEngine`: scores active memories and evicts the ones that fall
//! below `delete_threshold`, guarded by min-age and active-`supersedes`
//! checks (spec.md §4.7).

use chrono::Utc;
use cortex_core::config::DecayConfig;
use cortex_core::errors::CortexResult;
use cortex_core::traits::{LinkStore, MemoryStore, TemporalFilter};
use cortex_core::{RelationKind, Scope};

use crate::formula::effective_score;

/// What `RetentionEngine::evaluate` decided for one memory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RetentionDecision {
    Keep,
    Delete,
}

#[derive(Debug, Clone)]
pub struct RetentionReport {
    pub memory_id: String,
    pub effective_score: f64,
    pub decision: RetentionDecision,
}

pub struct RetentionEngine<'a> {
    store: &'a (dyn MemoryStore + Sync),
    links: &'a (dyn LinkStore + Sync),
    config: DecayConfig,
}

impl<'a> RetentionEngine<'a> {
    pub fn new(store: &'a (dyn MemoryStore + Sync), links: &'a (dyn LinkStore + Sync), config: DecayConfig) -> Self {
        Self { store, links, config }
    }

    /// A memory is protected from deletion when it's younger than
    /// `min_memory_age_days`, or has any currently-active incoming or
    /// outgoing `supersedes` edge (spec.md §4.7 invariant).
    fn is_protected(&self, memory_id: &str, created_at: chrono::DateTime<Utc>, now: chrono::DateTime<Utc>) -> CortexResult<bool> {
        let min_age = chrono::Duration::days(self.config.min_memory_age_days as i64);
        if now - created_at < min_age {
            return Ok(true);
        }
        let edges = self.links.links_of(memory_id)?;
        let has_active_supersedes =
            edges.iter().any(|l| l.relation == RelationKind::Supersedes && l.is_active_at(now));
        Ok(has_active_supersedes)
    }

    /// Scores every active memory visible to `scope` and reports the
    /// keep/delete decision per the config's thresholds, without mutating
    /// storage. `sweep` applies the `Delete` decisions.
    pub fn evaluate(&self, scope: &Scope) -> CortexResult<Vec<RetentionReport>> {
        if !self.config.enabled {
            return Ok(Vec::new());
        }
        let now = Utc::now();
        let memories = self.store.search_candidates(scope, &TemporalFilter::default())?;

        let mut reports = Vec::with_capacity(memories.len());
        for memory in memories.iter().filter(|m| m.is_active_at(now)) {
            let score = effective_score(
                memory,
                &self.config.recency_shape,
                self.config.access_weight,
                self.config.max_access_boost,
                now,
            );
            let protected = self.is_protected(&memory.id, memory.created_at, now)?;
            let decision = if protected {
                RetentionDecision::Keep
            } else if score >= self.config.keep_threshold {
                RetentionDecision::Keep
            } else if score < self.config.delete_threshold {
                RetentionDecision::Delete
            } else {
                RetentionDecision::Keep
            };
            reports.push(RetentionReport { memory_id: memory.id.clone(), effective_score: score, decision });
        }
        Ok(reports)
    }

    /// Runs `evaluate` and hard-deletes every `Delete` decision.
    pub fn sweep(&self, scope: &Scope) -> CortexResult<Vec<RetentionReport>> {
        let reports = self.evaluate(scope)?;
        for report in &reports {
            if report.decision == RetentionDecision::Delete {
                self.store.delete(&report.memory_id)?;
                tracing::info!(memory_id = %report.memory_id, score = report.effective_score, "evicted by retention sweep");
            }
        }
        Ok(reports)
    }
}
