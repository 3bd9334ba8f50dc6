//! Flatcase segmentation: Viterbi-style decomposition of an unsplit
//! lowercase token into dictionary words, driven by observed unigram
//! frequencies (spec.md §4.2).

use cortex_core::config::TokensConfig;

use crate::frequency::FrequencyTable;

/// Minimum length of any segment considered during decomposition. Prevents
/// pathological single-character splits from dominating the search.
const MIN_PART_LEN: usize = 2;

/// Attempt to segment `token` against `freq`. Returns `None` when
/// segmentation is not attempted (corpus too small) or not accepted (no
/// decomposition beats the unsegmented token by the configured margin).
pub fn segment(token: &str, freq: &FrequencyTable, cfg: &TokensConfig) -> Option<Vec<String>> {
    if freq.total() < cfg.segmentation_threshold {
        return None;
    }
    if token.len() < MIN_PART_LEN * 2 {
        return None;
    }

    let chars: Vec<char> = token.chars().collect();
    let n = chars.len();

    // best_score[i] = best joint log-probability of a segmentation of
    // chars[0..i]; best_back[i] = the start of the last part in that
    // segmentation.
    let neg_inf = f64::NEG_INFINITY;
    let mut best_score = vec![neg_inf; n + 1];
    let mut best_back = vec![0usize; n + 1];
    best_score[0] = 0.0;

    for i in 1..=n {
        for j in (0..i).rev() {
            let part_len = i - j;
            if part_len < MIN_PART_LEN && j != 0 {
                continue;
            }
            if best_score[j] == neg_inf {
                continue;
            }
            let part: String = chars[j..i].iter().collect();
            let part_freq = freq.count(&part);
            if part_len < n && part_freq < cfg.min_part_frequency {
                // Below the minimum frequency, this part can't be used
                // unless it's the whole token (handled by the overall
                // acceptance check below).
                continue;
            }
            let score = best_score[j] + freq.log_prob(&part);
            if score > best_score[i] {
                best_score[i] = score;
                best_back[i] = j;
            }
        }
    }

    if best_score[n] == neg_inf {
        return None;
    }

    // Reconstruct the path.
    let mut parts = Vec::new();
    let mut i = n;
    while i > 0 {
        let j = best_back[i];
        parts.push(chars[j..i].iter().collect::<String>());
        i = j;
    }
    parts.reverse();

    if parts.len() < 2 {
        return None;
    }
    if parts.iter().any(|p| freq.count(p) < cfg.min_part_frequency) {
        return None;
    }

    let unsegmented_score = freq.log_prob(token);
    let joint_score: f64 = parts.iter().map(|p| freq.log_prob(p)).sum();

    if joint_score > unsegmented_score + cfg.segmentation_margin {
        Some(parts)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn freq_with(counts: &[(&str, u64)]) -> FrequencyTable {
        let mut m = HashMap::new();
        for (k, v) in counts {
            m.insert(k.to_string(), *v);
        }
        FrequencyTable::from_counts(m)
    }

    #[test]
    fn segments_getusername_when_frequent() {
        // S2 — flatcase segmentation seed scenario from spec.md §8.
        let freq = freq_with(&[
            ("get", 500),
            ("user", 200),
            ("name", 200),
            ("getusername", 0),
            ("filler", 10_000),
        ]);
        let cfg = TokensConfig::default();
        let parts = segment("getusername", &freq, &cfg).expect("should segment");
        assert_eq!(parts, vec!["get", "user", "name"]);
    }

    #[test]
    fn leaves_unsegmented_when_frequencies_empty() {
        let freq = FrequencyTable::new();
        let cfg = TokensConfig::default();
        assert!(segment("getusername", &freq, &cfg).is_none());
    }

    #[test]
    fn below_threshold_corpus_never_segments() {
        let mut freq = freq_with(&[("get", 500), ("user", 200), ("name", 200)]);
        // total() is well below the default 10_000 threshold.
        let cfg = TokensConfig::default();
        assert!(freq.total() < cfg.segmentation_threshold);
        assert!(segment("getusername", &freq, &cfg).is_none());
        freq.record("noop");
    }
}
