//! The root error taxonomy (spec.md §7). Each crate's own error enum
//! converts into `CortexError` at the crate boundary.

use thiserror::Error;

pub type CortexResult<T> = Result<T, CortexError>;

/// Taxonomy: `NotFound` is returned as `Option::None` by most APIs and only
/// appears here for operations (e.g. `soft_invalidate`) that have no other
/// way to report "no such id". `ScopeMismatch` and `Contract` are surfaced
/// with no partial state written. `Transient` is recovered internally and
/// only observed via logs; it is public so tests can assert on the recovery
/// path. `Backend` indicates corruption/drift that requires startup repair.
#[derive(Debug, Error)]
pub enum CortexError {
    #[error("not found: {what} {id}")]
    NotFound { what: &'static str, id: String },

    #[error("scope mismatch: {reason}")]
    ScopeMismatch { reason: String },

    #[error("contract violation: {reason}")]
    Contract { reason: String },

    #[error("transient failure (recovered): {reason}")]
    Transient { reason: String },

    #[error("backend failure: {reason}")]
    Backend { reason: String },
}

impl CortexError {
    pub fn not_found(what: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { what, id: id.into() }
    }

    pub fn contract(reason: impl Into<String>) -> Self {
        Self::Contract { reason: reason.into() }
    }

    pub fn scope_mismatch(reason: impl Into<String>) -> Self {
        Self::ScopeMismatch { reason: reason.into() }
    }

    pub fn transient(reason: impl Into<String>) -> Self {
        Self::Transient { reason: reason.into() }
    }

    pub fn backend(reason: impl Into<String>) -> Self {
        Self::Backend { reason: reason.into() }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, CortexError::Transient { .. })
    }
}
