//! Step 5 of the hybrid ranker (spec.md §4.4): an optional regex content
//! filter. Invalid or overlong patterns are a ReDoS guard, not a caller
//! error — they're silently ignored, matching `cortex_tokens::is_safe_regex`.

use regex::Regex;

use cortex_tokens::is_safe_regex;

use crate::candidate::{Candidate, Scorable};

/// Drop every candidate whose content doesn't match `pattern`. An
/// unsafe/invalid pattern is a no-op (spec.md: "invalid regex -> silent
/// skip").
pub fn apply_regex_filter<P: Scorable>(candidates: Vec<Candidate<P>>, pattern: &str, max_len: usize) -> Vec<Candidate<P>> {
    if !is_safe_regex(pattern, max_len) {
        return candidates;
    }
    let re = match Regex::new(pattern) {
        Ok(re) => re,
        Err(_) => return candidates,
    };
    candidates.into_iter().filter(|c| re.is_match(c.payload.content())).collect()
}
