//! Market-chatter lexicon scorer.

use async_trait::async_trait;

use crate::error::ScoringError;
use crate::scorer::SentimentScorer;

/// Bullish and bearish word weights.
///
/// Keys are lowercase single words. Positive weights are bullish, negative
/// weights bearish.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Bullish
    ("buy", 1.0),
    ("buying", 1.0),
    ("bullish", 1.0),
    ("bull", 0.8),
    ("moon", 1.0),
    ("rocket", 1.0),
    ("calls", 0.6),
    ("gains", 0.8),
    ("gain", 0.6),
    ("up", 0.4),
    ("rise", 0.6),
    ("rising", 0.6),
    ("rally", 0.8),
    ("good", 0.5),
    ("great", 0.7),
    ("excellent", 0.8),
    ("strong", 0.6),
    ("beat", 0.8),
    ("beats", 0.8),
    ("winning", 0.7),
    ("profit", 0.7),
    ("profits", 0.7),
    ("growth", 0.6),
    ("increase", 0.5),
    ("positive", 0.5),
    ("optimistic", 0.7),
    ("upgrade", 0.9),
    ("upgraded", 0.9),
    // Bearish
    ("sell", -1.0),
    ("selling", -1.0),
    ("bearish", -1.0),
    ("bear", -0.8),
    ("puts", -0.6),
    ("crash", -1.0),
    ("dump", -1.0),
    ("loss", -0.8),
    ("losses", -0.8),
    ("down", -0.4),
    ("fall", -0.6),
    ("falling", -0.6),
    ("bad", -0.5),
    ("terrible", -0.8),
    ("weak", -0.6),
    ("miss", -0.8),
    ("missed", -0.8),
    ("losing", -0.7),
    ("decline", -0.6),
    ("decrease", -0.5),
    ("negative", -0.5),
    ("pessimistic", -0.7),
    ("downgrade", -0.9),
    ("downgraded", -0.9),
    ("short", -0.6),
];

/// Keyword scorer over [`LEXICON`].
///
/// The score is the sum of matched weights divided by the sum of their
/// magnitudes, so it always lies in `[-1.0, 1.0]`: all-bullish text scores
/// `1.0`, all-bearish `-1.0`. Text with no lexicon hit is unscoreable rather
/// than neutral.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    /// Score `text`, or `None` when no word matches the lexicon.
    #[must_use]
    pub fn score_text(text: &str) -> Option<f64> {
        let mut sum = 0.0_f64;
        let mut magnitude = 0.0_f64;

        for word in text.split_whitespace() {
            let w = word
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if let Some(&(_, weight)) = LEXICON.iter().find(|(lex_word, _)| *lex_word == w) {
                sum += weight;
                magnitude += weight.abs();
            }
        }

        (magnitude > 0.0).then(|| sum / magnitude)
    }
}

#[async_trait]
impl SentimentScorer for LexiconScorer {
    fn name(&self) -> &'static str {
        "lexicon"
    }

    async fn score(&self, text: &str) -> Result<f64, ScoringError> {
        Self::score_text(text).ok_or(ScoringError::Unscoreable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_unscoreable() {
        assert_eq!(LexiconScorer::score_text(""), None);
        assert_eq!(LexiconScorer::score_text("   "), None);
    }

    #[test]
    fn unknown_text_is_unscoreable() {
        assert_eq!(LexiconScorer::score_text("the quick brown fox"), None);
    }

    #[test]
    fn all_bullish_text_scores_one() {
        let score = LexiconScorer::score_text("AAPL to the moon, very bullish").unwrap();
        assert!((score - 1.0).abs() < f64::EPSILON, "got {score}");
    }

    #[test]
    fn all_bearish_text_scores_minus_one() {
        let score = LexiconScorer::score_text("TSLA will crash, dump it").unwrap();
        assert!((score + 1.0).abs() < f64::EPSILON, "got {score}");
    }

    #[test]
    fn mixed_text_is_weighted() {
        // buy (+1.0) and weak (-0.6): 0.4 / 1.6
        let score = LexiconScorer::score_text("buy the dip even if guidance is weak").unwrap();
        assert!((score - 0.25).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn matches_whole_words_only() {
        // "support" and "upside" must not match "up".
        assert_eq!(LexiconScorer::score_text("support upside"), None);
    }

    #[test]
    fn punctuation_and_case_are_ignored() {
        let score = LexiconScorer::score_text("BULLISH!!!").unwrap();
        assert!(score > 0.0, "got {score}");
    }

    #[test]
    fn lexicon_weights_are_in_range() {
        for &(word, weight) in LEXICON {
            assert!(
                weight.abs() > 0.0 && weight.abs() <= 1.0,
                "bad weight for {word}: {weight}"
            );
            assert_eq!(word, word.to_lowercase(), "lexicon keys must be lowercase");
        }
    }

    #[tokio::test]
    async fn trait_score_reports_unscoreable() {
        let err = LexiconScorer.score("nothing to see").await.unwrap_err();
        assert!(matches!(err, ScoringError::Unscoreable));
        assert_eq!(LexiconScorer.name(), "lexicon");
    }
}
