//! Threshold policy turning an [`Aggregate`] into a trading signal.

use std::fmt;

use advisor_core::SignalThresholds;
use serde::Serialize;

use crate::aggregate::Aggregate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub symbol: String,
    pub action: Action,
    pub score: Option<f64>,
    pub mention_count: usize,
    pub rationale: String,
}

/// Apply the BUY/SELL/HOLD threshold policy.
///
/// ```text
/// mention_count < min_mentions  -> HOLD (insufficient evidence)
/// score >= buy                  -> BUY
/// score <= sell                 -> SELL
/// otherwise                     -> HOLD (neutral zone)
/// ```
///
/// An aggregate with no score answers HOLD. Pure and deterministic.
#[must_use]
pub fn recommend(aggregate: &Aggregate, thresholds: &SignalThresholds) -> Recommendation {
    let count = aggregate.mention_count;

    let (action, rationale) = if count == 0 {
        (Action::Hold, "no data: no mentions in window".to_string())
    } else if count < thresholds.min_mentions {
        (
            Action::Hold,
            format!(
                "insufficient evidence: {count} mentions, need at least {}",
                thresholds.min_mentions
            ),
        )
    } else {
        match aggregate.weighted_score {
            None => (
                Action::Hold,
                format!("no scoreable mentions among {count}"),
            ),
            Some(score) if score >= thresholds.buy => (
                Action::Buy,
                format!("score {score:.2} at or above buy threshold {:.2}", thresholds.buy),
            ),
            Some(score) if score <= thresholds.sell => (
                Action::Sell,
                format!("score {score:.2} at or below sell threshold {:.2}", thresholds.sell),
            ),
            Some(score) => (
                Action::Hold,
                format!(
                    "score {score:.2} in neutral zone ({:.2}, {:.2})",
                    thresholds.sell, thresholds.buy
                ),
            ),
        }
    };

    Recommendation {
        symbol: aggregate.symbol.clone(),
        action,
        score: aggregate.weighted_score,
        mention_count: count,
        rationale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg(mention_count: usize, score: Option<f64>) -> Aggregate {
        Aggregate {
            symbol: "AAPL".to_string(),
            mention_count,
            scored_count: if score.is_some() { mention_count } else { 0 },
            failed_count: if score.is_some() { 0 } else { mention_count },
            weighted_score: score,
        }
    }

    fn action(mention_count: usize, score: Option<f64>) -> Action {
        recommend(&agg(mention_count, score), &SignalThresholds::default()).action
    }

    #[test]
    fn buy_at_exact_thresholds() {
        assert_eq!(action(5, Some(0.7)), Action::Buy);
    }

    #[test]
    fn too_few_mentions_holds_even_when_very_bullish() {
        let rec = recommend(&agg(4, Some(0.95)), &SignalThresholds::default());
        assert_eq!(rec.action, Action::Hold);
        assert!(rec.rationale.contains("insufficient evidence"));
    }

    #[test]
    fn sell_at_exact_sell_threshold() {
        assert_eq!(action(10, Some(0.3)), Action::Sell);
    }

    #[test]
    fn neutral_zone_holds() {
        let rec = recommend(&agg(10, Some(0.5)), &SignalThresholds::default());
        assert_eq!(rec.action, Action::Hold);
        assert!(rec.rationale.contains("neutral zone"));
    }

    #[test]
    fn empty_window_holds_with_no_data() {
        let rec = recommend(&agg(0, None), &SignalThresholds::default());
        assert_eq!(rec.action, Action::Hold);
        assert_eq!(rec.score, None);
        assert!(rec.rationale.starts_with("no data"));
    }

    #[test]
    fn unscoreable_window_holds() {
        let rec = recommend(&agg(8, None), &SignalThresholds::default());
        assert_eq!(rec.action, Action::Hold);
        assert!(rec.rationale.contains("no scoreable mentions"));
    }

    #[test]
    fn custom_thresholds_are_respected() {
        let thresholds = SignalThresholds {
            min_mentions: 1,
            buy: 0.2,
            sell: -0.2,
        };
        let rec = recommend(&agg(1, Some(0.25)), &thresholds);
        assert_eq!(rec.action, Action::Buy);
        let rec = recommend(&agg(1, Some(-0.5)), &thresholds);
        assert_eq!(rec.action, Action::Sell);
        let rec = recommend(&agg(1, Some(0.0)), &thresholds);
        assert_eq!(rec.action, Action::Hold);
    }

    #[test]
    fn action_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Action::Buy).unwrap(), "\"BUY\"");
        assert_eq!(Action::Sell.to_string(), "SELL");
    }
}
