pub mod embedding;
pub mod llm;
pub mod memory_store;
pub mod vector_index;

pub use embedding::Embedder;
pub use llm::Llm;
pub use memory_store::{DocumentStore, LinkStore, MemoryStore, SaveOptions, SaveOutcome, TemporalFilter};
pub use vector_index::{IndexCapability, Neighbor, VectorIndex};
