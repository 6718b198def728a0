use std::collections::HashSet;

use once_cell::sync::Lazy;

/// English stopwords excluded from keyword extraction. Function words carry
/// no locating power: nearly every run on a page contains "the".
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "for", "are", "but", "not", "you", "all", "any", "can",
        "had", "has", "have", "her", "his", "its", "our", "out", "was", "were",
        "will", "with", "this", "that", "these", "those", "from", "they",
        "them", "then", "than", "there", "their", "what", "when", "where",
        "which", "while", "who", "whom", "why", "how", "been", "being", "both",
        "each", "few", "more", "most", "other", "some", "such", "only", "own",
        "same", "too", "very", "just", "into", "over", "under", "again",
        "once", "here", "about", "after", "before", "between", "during",
        "above", "below", "off", "down", "she", "him", "does", "did", "doing",
        "would", "should", "could", "also", "upon",
    ]
    .into_iter()
    .collect()
});

/// Returns true if `token` is a common English function word.
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}
