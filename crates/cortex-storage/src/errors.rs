//! Mapping from SQLite/rusqlite failures into the shared `CortexError`
//! taxonomy (spec.md §7). A busy/locked database is transient and worth
//! retrying; everything else from the backend is not.

use cortex_core::CortexError;

pub fn to_storage_err(reason: impl Into<String>) -> CortexError {
    let reason = reason.into();
    if reason.contains("database is locked") || reason.contains("SQLITE_BUSY") {
        CortexError::transient(reason)
    } else {
        CortexError::backend(reason)
    }
}
