//! A conservative ReDoS guard shared by anything that compiles
//! caller-supplied regexes against indexed content (`cortex-retrieval`'s
//! regex filter is the main consumer).

use regex::Regex;

/// Reject patterns that are either too long or fail to compile under the
/// `regex` crate's linear-time guarantees. `regex` itself refuses
/// constructs with exponential backtracking (no backreferences, no
/// lookaround), so compilation success plus a length cap is sufficient.
pub fn is_safe_regex(pattern: &str, max_len: usize) -> bool {
    if pattern.len() > max_len {
        return false;
    }
    Regex::new(pattern).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_overlong_patterns() {
        let pattern = "a".repeat(1000);
        assert!(!is_safe_regex(&pattern, 500));
    }

    #[test]
    fn accepts_ordinary_pattern() {
        assert!(is_safe_regex(r"fn\s+\w+\(", 500));
    }

    #[test]
    fn rejects_invalid_pattern() {
        assert!(!is_safe_regex("(unclosed", 500));
    }
}
