//! Watchlist ticker matching.

use std::collections::BTreeSet;

use regex::Regex;

use crate::error::SentimentError;

/// Finds watched tickers in free text.
///
/// Matching is whole-word and case-insensitive: the text is upper-cased and
/// searched with `\b(T1|T2|...)\b`. A leading `$` (cashtag) still matches.
#[derive(Debug, Clone)]
pub struct TickerMatcher {
    pattern: Regex,
}

impl TickerMatcher {
    /// Build a matcher for already-normalized (upper-case) tickers.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Config`] for an empty ticker list, or
    /// [`SentimentError::Pattern`] if the regex cannot be compiled.
    pub fn new(tickers: &[String]) -> Result<Self, SentimentError> {
        if tickers.is_empty() {
            return Err(SentimentError::Config(
                "ticker matcher needs at least one ticker".to_string(),
            ));
        }

        // Longest first so "BRK.B" wins over "BRK".
        let mut alternatives: Vec<&str> = tickers.iter().map(String::as_str).collect();
        alternatives.sort_by_key(|t| std::cmp::Reverse(t.len()));
        let body = alternatives
            .iter()
            .map(|t| regex::escape(&t.to_uppercase()))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = Regex::new(&format!(r"\b({body})\b"))?;
        Ok(Self { pattern })
    }

    /// Distinct tickers found in `text`, sorted.
    #[must_use]
    pub fn find(&self, text: &str) -> Vec<String> {
        let upper = text.to_uppercase();
        self.pattern
            .find_iter(&upper)
            .map(|m| m.as_str().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
