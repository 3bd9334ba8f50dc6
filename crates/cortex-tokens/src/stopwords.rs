//! Prose-mode stopword list and a light Porter-style stemmer (spec.md
//! §4.2 — "applies a light stemmer... discards a fixed stopword list").

use std::collections::HashSet;
use std::sync::OnceLock;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "he", "in",
    "is", "it", "its", "of", "on", "or", "that", "the", "to", "was", "were", "will", "with",
    "this", "these", "those", "but", "not", "so", "if", "then", "than", "such", "also", "can",
    "could", "should", "would", "into", "onto", "over", "under", "about", "above", "below",
];

fn stopword_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOPWORDS.iter().copied().collect())
}

pub fn is_stopword(token: &str) -> bool {
    stopword_set().contains(token)
}

/// A light Porter-style stemmer: strips the most common English suffixes.
/// Not a full implementation of Porter's algorithm — deliberately simple
/// and deterministic, matching spec.md's "English Porter-style is
/// sufficient".
pub fn stem(word: &str) -> String {
    if word.len() <= 3 {
        return word.to_string();
    }

    let suffixes: &[(&str, &str)] = &[
        ("ational", "ate"),
        ("ization", "ize"),
        ("iveness", "ive"),
        ("fulness", "ful"),
        ("ousness", "ous"),
        ("ing", ""),
        ("edly", ""),
        ("ed", ""),
        ("ies", "y"),
        ("ied", "y"),
        ("ness", ""),
        ("ment", ""),
        ("sses", "ss"),
        ("s", ""),
    ];

    for (suffix, replacement) in suffixes {
        if word.len() > suffix.len() + 2 && word.ends_with(suffix) {
            let stem_len = word.len() - suffix.len();
            let mut out = String::with_capacity(stem_len + replacement.len());
            out.push_str(&word[..stem_len]);
            out.push_str(replacement);
            return out;
        }
    }
    word.to_string()
}
