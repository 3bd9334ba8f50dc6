use cortex_core::config::TokensConfig;
use cortex_tokens::frequency::FrequencyTable;
use cortex_tokens::{tokenize, Mode};
use proptest::prelude::*;

proptest! {
    /// Tokenizing never panics on arbitrary Unicode input, in either mode.
    #[test]
    fn tokenize_never_panics(s in ".*") {
        let freq = FrequencyTable::new();
        let cfg = TokensConfig::default();
        let _ = tokenize(&s, Mode::Code, &freq, &cfg);
        let _ = tokenize(&s, Mode::Prose, &freq, &cfg);
    }

    /// Code-mode tokenization is deterministic: same input, same output.
    #[test]
    fn code_tokenize_is_deterministic(s in "[a-zA-Z0-9_ ]{0,64}") {
        let freq = FrequencyTable::new();
        let cfg = TokensConfig::default();
        let a = tokenize(&s, Mode::Code, &freq, &cfg);
        let b = tokenize(&s, Mode::Code, &freq, &cfg);
        prop_assert_eq!(a, b);
    }

    /// Every identifier-shaped word survives as its lowercase whole even
    /// when split into parts.
    #[test]
    fn whole_identifier_always_present(word in "[a-zA-Z][a-zA-Z0-9]{1,20}") {
        let freq = FrequencyTable::new();
        let cfg = TokensConfig::default();
        let tokens = tokenize(&word, Mode::Code, &freq, &cfg);
        prop_assert!(tokens.contains(&word.to_lowercase()));
    }

    /// Prose-mode tokens never include a stopword.
    #[test]
    fn prose_tokens_exclude_stopwords(s in "[a-zA-Z ]{0,64}") {
        let freq = FrequencyTable::new();
        let cfg = TokensConfig::default();
        let tokens = tokenize(&s, Mode::Prose, &freq, &cfg);
        for t in &tokens {
            prop_assert!(!cortex_tokens::stopwords::is_stopword(t));
        }
    }
}
