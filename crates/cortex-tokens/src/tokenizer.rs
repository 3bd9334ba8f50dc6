//! The public tokenizer entry points (spec.md §4.2).

use std::sync::OnceLock;

use cortex_core::config::TokensConfig;
use regex::Regex;

use crate::frequency::FrequencyTable;
use crate::{identifier, segmenter, stopwords};

/// Which tokenization ruleset to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Code,
    Prose,
}

fn word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\p{L}\p{N}_]+").expect("static regex is valid"))
}

/// Tokenize `text` under `mode`. Deterministic given `freq`/`cfg`.
///
/// Code mode preserves the full identifier *and* splits camelCase/
/// snake_case into parts; a lowercase identifier that has no case/
/// underscore boundary is additionally offered to the flatcase segmenter.
/// Prose mode lowercases, splits on Unicode word boundaries, stems, and
/// drops stopwords.
pub fn tokenize(text: &str, mode: Mode, freq: &FrequencyTable, cfg: &TokensConfig) -> Vec<String> {
    match mode {
        Mode::Code => code_tokens(text, freq, cfg),
        Mode::Prose => prose_tokens(text),
    }
}

fn code_tokens(text: &str, freq: &FrequencyTable, cfg: &TokensConfig) -> Vec<String> {
    let mut tokens = Vec::new();
    for m in word_regex().find_iter(text) {
        let raw = m.as_str();
        if raw.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let lower = raw.to_lowercase();
        tokens.push(lower.clone());

        let parts = identifier::split_parts(raw);
        if parts.len() > 1 {
            tokens.extend(parts);
        } else if let Some(segmented) = segmenter::segment(&lower, freq, cfg) {
            tokens.extend(segmented);
        }
    }
    tokens
}

fn prose_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for m in word_regex().find_iter(text) {
        let lower = m.as_str().to_lowercase();
        if lower.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if stopwords::is_stopword(&lower) {
            continue;
        }
        tokens.push(stopwords::stem(&lower));
    }
    tokens
}

/// Tokenize an indexable document, applying the AST-aware TF boost: symbol
/// name tokens are emitted `cfg.symbol_tf_multiplier` times (default 3) and
/// signature tokens once, in addition to the body tokens (spec.md §4.2).
pub fn tokenize_document(
    content: &str,
    symbol_name: Option<&str>,
    signature: Option<&str>,
    freq: &FrequencyTable,
    cfg: &TokensConfig,
) -> Vec<String> {
    let mut tokens = tokenize(content, Mode::Code, freq, cfg);

    if let Some(name) = symbol_name {
        let name_tokens = tokenize(name, Mode::Code, freq, cfg);
        for _ in 0..cfg.symbol_tf_multiplier {
            tokens.extend(name_tokens.iter().cloned());
        }
    }

    if let Some(sig) = signature {
        tokens.extend(tokenize(sig, Mode::Code, freq, cfg));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_mode_indexes_both_full_and_parts() {
        let freq = FrequencyTable::new();
        let cfg = TokensConfig::default();
        let tokens = tokenize("function getUserById(id) {}", Mode::Code, &freq, &cfg);
        assert!(tokens.contains(&"getuserbyid".to_string()));
        assert!(tokens.contains(&"get".to_string()));
        assert!(tokens.contains(&"user".to_string()));
        assert!(tokens.contains(&"by".to_string()));
        assert!(tokens.contains(&"id".to_string()));
    }

    #[test]
    fn prose_mode_strips_stopwords_and_stems() {
        let tokens = prose_tokens("The caches are running");
        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.contains(&"are".to_string()));
        assert!(tokens.iter().any(|t| t.starts_with("cach")));
    }

    #[test]
    fn symbol_tf_boost_triples_symbol_tokens() {
        let freq = FrequencyTable::new();
        let cfg = TokensConfig::default();
        let tokens = tokenize_document(
            "fn body() {}",
            Some("getUserById"),
            Some("fn getUserById(id: u64) -> User"),
            &freq,
            &cfg,
        );
        let get_count = tokens.iter().filter(|t| t.as_str() == "get").count();
        // 3x from symbol_name + 1x from signature = 4.
        assert_eq!(get_count, 4);
    }

    #[test]
    fn deterministic() {
        let freq = FrequencyTable::new();
        let cfg = TokensConfig::default();
        let a = tokenize("getUserById fooBarBaz", Mode::Code, &freq, &cfg);
        let b = tokenize("getUserById fooBarBaz", Mode::Code, &freq, &cfg);
        assert_eq!(a, b);
    }
}
