//! Token normalization for layout alignment.
//!
//! Backend sentence text and renderer-extracted run text come from different
//! pipelines and rarely agree byte-for-byte. This crate reduces both to a
//! shared token vocabulary so the matching layer can compare them:
//!
//! - Unicode normalization (NFKC)
//! - locale-free lowercasing
//! - everything outside the word/hyphen/apostrophe classes becomes a separator
//! - short tokens are dropped (configurable minimum length)
//! - keyword extraction adds a stopword filter and a longer minimum
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no locale dependence. Same text and config give
//! the same tokens on any machine.

mod config;
mod error;
mod stopwords;
mod token;

pub use crate::config::NormalizeConfig;
pub use crate::error::NormalizeError;
pub use crate::stopwords::is_stopword;
pub use crate::token::{keywords, normalize};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_normalize_default() {
        let cfg = NormalizeConfig::default();
        let tokens = normalize("  The tenant MUST vacate\nwithin 30 days.  ", &cfg);
        assert_eq!(
            tokens,
            vec!["the", "tenant", "must", "vacate", "within", "30", "days"]
        );
    }

    #[test]
    fn short_tokens_dropped() {
        let cfg = NormalizeConfig::default();
        let tokens = normalize("a is to be or I am", &cfg);
        // min_token_len = 2: single-character tokens disappear
        assert_eq!(tokens, vec!["is", "to", "be", "or", "am"]);
    }

    #[test]
    fn hyphen_and_apostrophe_survive_inside_tokens() {
        let cfg = NormalizeConfig::default();
        let tokens = normalize("the tenant's lease is month-to-month", &cfg);
        assert_eq!(
            tokens,
            vec!["the", "tenant's", "lease", "is", "month-to-month"]
        );
    }

    #[test]
    fn punctuation_becomes_separator() {
        let cfg = NormalizeConfig::default();
        let tokens = normalize("vacate,within;30:days!(now)", &cfg);
        assert_eq!(tokens, vec!["vacate", "within", "30", "days", "now"]);
    }

    #[test]
    fn unicode_equivalence_nfkc() {
        let cfg = NormalizeConfig::default();
        let composed = normalize("Caf\u{00E9} terrace", &cfg);
        let decomposed = normalize("Cafe\u{0301} terrace", &cfg);
        assert_eq!(composed, decomposed);
    }

    #[test]
    fn pure_separator_runs_yield_no_tokens() {
        let cfg = NormalizeConfig::default();
        assert!(normalize("  --- ''' ...  ", &cfg).is_empty());
        assert!(normalize("", &cfg).is_empty());
    }

    #[test]
    fn keywords_filter_stopwords_and_dedupe() {
        let cfg = NormalizeConfig::default();
        let kw = keywords("The tenant must vacate the premises, the tenant agreed", &cfg);
        assert_eq!(kw, vec!["tenant", "must", "vacate", "premises", "agreed"]);
    }

    #[test]
    fn keywords_respect_min_length() {
        let cfg = NormalizeConfig::default();
        // keyword_min_len = 3: "30" is too short for keyword extraction even
        // though plain normalization keeps it
        let kw = keywords("vacate within 30 days", &cfg);
        assert_eq!(kw, vec!["vacate", "within", "days"]);
    }

    #[test]
    fn normalize_is_deterministic() {
        let cfg = NormalizeConfig::default();
        let text = "Quarterly report: revenue grew 14% year-over-year.";
        assert_eq!(normalize(text, &cfg), normalize(text, &cfg));
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = NormalizeConfig {
            min_token_len: 0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(NormalizeError::InvalidConfig(_))
        ));
    }
}
