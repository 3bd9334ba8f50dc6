use std::collections::HashMap;

/// Observed unigram frequencies driving flatcase segmentation (spec.md
/// §4.2). Corpus-scoped is acceptable per spec.md; callers own the scoping
/// (one table per corpus, or one global table).
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
    total: u64,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_counts(counts: HashMap<String, u64>) -> Self {
        let total = counts.values().sum();
        Self { counts, total }
    }

    pub fn record(&mut self, token: &str) {
        *self.counts.entry(token.to_string()).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn record_many<'a, I: IntoIterator<Item = &'a str>>(&mut self, tokens: I) {
        for t in tokens {
            self.record(t);
        }
    }

    pub fn count(&self, token: &str) -> u64 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Total observed token occurrences — the `T` spec.md §4.2 compares
    /// against the segmentation threshold.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// log-probability of `token` under this frequency table, using
    /// add-one smoothing so unseen tokens get a finite (very negative)
    /// score rather than `-inf`.
    pub fn log_prob(&self, token: &str) -> f64 {
        let c = self.count(token) as f64 + 1.0;
        let denom = self.total as f64 + self.counts.len() as f64 + 1.0;
        (c / denom).ln()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_totals() {
        let mut t = FrequencyTable::new();
        t.record("get");
        t.record("get");
        t.record("user");
        assert_eq!(t.count("get"), 2);
        assert_eq!(t.count("user"), 1);
        assert_eq!(t.total(), 3);
    }

    #[test]
    fn unseen_token_has_finite_log_prob() {
        let t = FrequencyTable::new();
        assert!(t.log_prob("whatever").is_finite());
    }
}
