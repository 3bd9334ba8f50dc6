//! SQLite-backed storage engine: documents, memories, links, and a
//! brute-force vector index, behind the `DocumentStore` / `MemoryStore` /
//! `LinkStore` traits from `cortex-core` (spec.md §4.1, §4.5, §4.6).

pub mod engine;
pub mod errors;
pub mod migrations;
pub mod pool;
pub mod queries;
pub mod scope_col;
pub mod vector;

pub use engine::StorageEngine;
pub use errors::to_storage_err;
pub use queries::StorageStats;
