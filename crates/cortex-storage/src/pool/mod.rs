//! Connection pool managing the single writer and the read pool.

pub mod pragmas;
pub mod read_pool;
pub mod write_connection;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cortex_core::config::StorageConfig;
use cortex_core::CortexResult;

pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

/// Owns the writer and read pool, shareable across engines built atop the
/// same database.
pub struct ConnectionPool {
    pub writer: Arc<WriteConnection>,
    pub readers: Arc<ReadPool>,
    pub db_path: Option<PathBuf>,
}

impl ConnectionPool {
    pub fn open(path: &Path, cfg: &StorageConfig) -> CortexResult<Self> {
        let writer = Arc::new(WriteConnection::open(path, cfg.busy_timeout_ms)?);
        let readers = Arc::new(ReadPool::open(
            path,
            cfg.read_pool_size,
            cfg.busy_timeout_ms,
        )?);
        Ok(Self {
            writer,
            readers,
            db_path: Some(path.to_path_buf()),
        })
    }

    /// In-memory mode: writer and readers are separate isolated databases,
    /// so reads are routed straight through the writer (see
    /// `StorageEngine::open_in_memory`) and this read pool is never used.
    pub fn open_in_memory(cfg: &StorageConfig) -> CortexResult<Self> {
        let writer = Arc::new(WriteConnection::open_in_memory(cfg.busy_timeout_ms)?);
        let readers = Arc::new(ReadPool::open_in_memory(1, cfg.busy_timeout_ms)?);
        Ok(Self {
            writer,
            readers,
            db_path: None,
        })
    }
}
