//! # cortex-core
//!
//! Foundation crate for the Cortex memory and code-knowledge system.
//! Defines the data model, traits, errors, config, and constants that every
//! other crate in the workspace depends on.

pub mod config;
pub mod constants;
pub mod errors;
pub mod model;
pub mod traits;

pub use config::CortexConfig;
pub use errors::{CortexError, CortexResult};
pub use model::{
    CentralityScore, Document, FileHash, Memory, MemoryKind, MemoryLink, RelationKind, Scope,
    SymbolType, TokenFrequency,
};
