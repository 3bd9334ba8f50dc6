//! # cortex-tokens
//!
//! C2: code-aware tokenization and sub-token (flatcase) segmentation for
//! BM25 indexing. Deterministic given the same frequency table —
//! invalid caller-supplied regexes are silently skipped (see
//! `cortex-retrieval`'s regex filter, which reuses `is_safe_regex` from
//! here).

pub mod frequency;
pub mod identifier;
pub mod regex_safety;
pub mod segmenter;
pub mod stopwords;
pub mod tokenizer;

pub use cortex_core::config::TokensConfig;
pub use frequency::FrequencyTable;
pub use regex_safety::is_safe_regex;
pub use tokenizer::{tokenize, tokenize_document, Mode};
