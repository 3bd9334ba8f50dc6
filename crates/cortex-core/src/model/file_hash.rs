use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scope::Scope;

/// Tracks the content hash of an ingested file so unchanged files can skip
/// re-chunking and re-embedding on the next ingest pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileHash {
    pub scope: Scope,
    pub path: String,
    pub content_hash: String,
    pub indexed_at: DateTime<Utc>,
}

impl FileHash {
    pub fn of(scope: Scope, path: impl Into<String>, content: &str) -> Self {
        Self {
            scope,
            path: path.into(),
            content_hash: blake3::hash(content.as_bytes()).to_hex().to_string(),
            indexed_at: Utc::now(),
        }
    }

    /// Whether `content` still matches the recorded hash (i.e. re-ingest can
    /// be skipped).
    pub fn matches(&self, content: &str) -> bool {
        self.content_hash == blake3::hash(content.as_bytes()).to_hex().to_string()
    }
}
