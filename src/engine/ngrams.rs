//! Contiguous token-window extraction.

use std::collections::HashSet;

/// Number of windows a token sequence yields for lengths in
/// `[min_len, max_len]`, before de-duplication.
pub fn window_count(token_count: usize, min_len: usize, max_len: usize) -> usize {
    (min_len.max(1)..=max_len)
        .filter(|n| *n <= token_count)
        .map(|n| token_count - n + 1)
        .sum()
}

/// Distinct n-grams of one document, for every token length in
/// `[min_len, max_len]`, each joined with single spaces.
///
/// Returning a set is what makes downstream counts document frequencies: a
/// phrase repeated twenty times in one document still contributes exactly
/// one observation for that document.
pub fn distinct_ngrams(tokens: &[String], min_len: usize, max_len: usize) -> HashSet<String> {
    let min_len = min_len.max(1);
    let mut grams = HashSet::with_capacity(window_count(tokens.len(), min_len, max_len));
    for n in min_len..=max_len {
        if n > tokens.len() {
            break;
        }
        for window in tokens.windows(n) {
            grams.insert(window.join(" "));
        }
    }
    grams
}
