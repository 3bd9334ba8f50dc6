use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scope::Scope;

/// The kind of symbol a code chunk was extracted from. Drives both the
/// tokenizer's AST-aware triple-TF boost and the ranker's type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolType {
    Function,
    Method,
    Class,
    Interface,
    Struct,
    Enum,
    Module,
    Trait,
    Variable,
}

/// A chunk of a source artifact (code or prose). Path prefix `code:`
/// distinguishes source code from prose per spec.md §3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub scope: Scope,
    pub path: String,
    pub chunk_index: u32,
    pub content: String,
    pub start_line: u32,
    pub end_line: u32,
    pub embedding: Vec<f32>,
    pub symbol_name: Option<String>,
    pub symbol_type: Option<SymbolType>,
    pub signature: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Whether `path` designates source code rather than prose, per the
    /// `code:` path-prefix convention from spec.md §3.
    pub fn is_code(&self) -> bool {
        self.path.starts_with("code:")
    }

    /// The corpus this document belongs to for BM25/vector indexing.
    pub fn corpus(&self) -> &'static str {
        if self.is_code() {
            "code"
        } else {
            "docs"
        }
    }

    /// The unique key documents upsert on: (scope, path, chunk_index).
    pub fn unique_key(&self) -> (Scope, String, u32) {
        (self.scope.clone(), self.path.clone(), self.chunk_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(path: &str) -> Document {
        Document {
            id: "d1".into(),
            scope: Scope::project("p"),
            path: path.into(),
            chunk_index: 0,
            content: "fn f() {}".into(),
            start_line: 1,
            end_line: 1,
            embedding: vec![0.1, 0.2],
            symbol_name: None,
            symbol_type: None,
            signature: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn corpus_by_prefix() {
        assert_eq!(doc("code:src/a.rs").corpus(), "code");
        assert_eq!(doc("docs/readme.md").corpus(), "docs");
    }
}
