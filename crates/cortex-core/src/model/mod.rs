//! The data model: `Document`, `Memory`, `MemoryLink`, `CentralityScore`,
//! `TokenFrequency`, and the cross-cutting `Scope` type.

pub mod centrality;
pub mod document;
pub mod file_hash;
pub mod link;
pub mod memory;
pub mod scope;
pub mod token_frequency;

pub use centrality::CentralityScore;
pub use document::{Document, SymbolType};
pub use file_hash::FileHash;
pub use link::{MemoryLink, RelationKind};
pub use memory::{Memory, MemoryKind};
pub use scope::Scope;
pub use token_frequency::TokenFrequency;
