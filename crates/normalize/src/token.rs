use unicode_normalization::UnicodeNormalization;

use crate::config::NormalizeConfig;
use crate::stopwords::is_stopword;

/// Reduce raw text to comparable tokens.
///
/// NFKC normalization runs first because it can change character boundaries;
/// lowercasing follows (it may expand a character, e.g. German ß). Characters
/// outside the word/hyphen/apostrophe classes act as separators. Tokens
/// shorter than `cfg.min_token_len` or without a single alphanumeric
/// character are dropped.
pub fn normalize(text: &str, cfg: &NormalizeConfig) -> Vec<String> {
    collect_tokens(text, cfg.min_token_len)
}

/// Extract locating keywords from raw text.
///
/// Same pipeline as [`normalize`] with a longer minimum length
/// (`cfg.keyword_min_len`), a stopword filter, and first-occurrence
/// deduplication. Order is preserved so anchors keep their sentence position.
pub fn keywords(text: &str, cfg: &NormalizeConfig) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    collect_tokens(text, cfg.keyword_min_len)
        .into_iter()
        .filter(|t| !is_stopword(t))
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

fn collect_tokens(text: &str, min_len: usize) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in text.nfkc() {
        if ch.is_alphanumeric() || ch == '-' || ch == '\'' {
            for lower in ch.to_lowercase() {
                current.push(lower);
            }
        } else {
            flush(&mut tokens, &mut current, min_len);
        }
    }
    flush(&mut tokens, &mut current, min_len);

    tokens
}

fn flush(tokens: &mut Vec<String>, current: &mut String, min_len: usize) {
    if current.is_empty() {
        return;
    }
    // Token length is measured in characters, not bytes.
    let keep = current.chars().count() >= min_len
        && current.chars().any(|c| c.is_alphanumeric());
    if keep {
        tokens.push(std::mem::take(current));
    } else {
        current.clear();
    }
}
