//! Forbidden-word filtering for inbound questions.
//!
//! The filter mirrors a censor service contract: `censor` returns the input
//! with disallowed terms replaced by [`REJECTION_SENTINEL`], and callers
//! treat any output containing the sentinel as a rejected input.

#[cfg(test)]
mod tests;

use std::collections::HashSet;

/// Marker substituted for forbidden words. Its presence in censored output
/// signals rejection.
pub const REJECTION_SENTINEL: &str = "[filtered]";

/// Terms a family-facing benefit service refuses to search for.
const BUILTIN_WORDS: &[&str] = &[
    "casino",
    "betting",
    "gambling",
    "lottery",
    "escort",
    "narcotics",
];

/// Word-level censor over a lowercase blocklist.
#[derive(Debug, Clone)]
pub struct ForbiddenWordFilter {
    words: HashSet<String>,
}

impl ForbiddenWordFilter {
    /// Builds a filter from an explicit word list (lowercased).
    pub fn new(words: impl IntoIterator<Item = String>) -> Self {
        Self {
            words: words.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Builtin blocklist plus `extra` words from configuration.
    pub fn with_extra_words(extra: &[String]) -> Self {
        Self::new(
            BUILTIN_WORDS
                .iter()
                .map(|w| w.to_string())
                .chain(extra.iter().cloned()),
        )
    }

    /// Replaces forbidden words with [`REJECTION_SENTINEL`].
    ///
    /// Matching is per whitespace-separated token, case-insensitive, with
    /// leading/trailing punctuation ignored. Whitespace is normalized to
    /// single spaces; the output is only consumed for sentinel detection
    /// and logging.
    pub fn censor(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|token| {
                let core = token.trim_matches(|c: char| !c.is_alphanumeric());
                if !core.is_empty() && self.words.contains(&core.to_lowercase()) {
                    REJECTION_SENTINEL
                } else {
                    token
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether censored output signals a rejection.
    pub fn is_rejected(censored: &str) -> bool {
        censored.contains(REJECTION_SENTINEL)
    }
}

impl Default for ForbiddenWordFilter {
    fn default() -> Self {
        Self::with_extra_words(&[])
    }
}
