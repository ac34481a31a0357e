//! Per-symbol sentiment aggregation over stored mentions.

use std::time::Duration;

use advisor_core::{normalize_symbol, AppConfig};
use advisor_db::{get_stock_by_symbol, query_mentions, record_score, MentionFilter, MentionRow};
use advisor_sentiment::{ScoringError, SentimentScorer};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::AnalysisError;

const DEFAULT_SCORE_TIMEOUT_SECS: u64 = 20;
const DEFAULT_CONCURRENCY: usize = 4;

/// Which stored mentions an aggregation covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Window {
    /// Inclusive lower bound on `collected_at`.
    pub since: Option<DateTime<Utc>>,
    pub source: Option<String>,
    /// Only the newest `limit` mentions are aggregated.
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Bound on each individual scoring call.
    pub score_timeout: Duration,
    /// Scoring calls in flight at once.
    pub concurrency: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            score_timeout: Duration::from_secs(DEFAULT_SCORE_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl AggregateOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            score_timeout: Duration::from_secs(config.score_timeout_secs),
            concurrency: config.score_concurrency,
        }
    }
}

/// Derived per-symbol sentiment. Never persisted.
///
/// `weighted_score` is `None` when nothing in the window could be scored,
/// including the empty window. It is never a stand-in `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate {
    pub symbol: String,
    pub mention_count: usize,
    pub scored_count: usize,
    pub failed_count: usize,
    pub weighted_score: Option<f64>,
}

impl Aggregate {
    #[must_use]
    pub fn empty(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            mention_count: 0,
            scored_count: 0,
            failed_count: 0,
            weighted_score: None,
        }
    }
}

/// Aggregate the sentiment of `symbol`'s stored mentions within `window`.
///
/// A mention already scored under the scorer's [`cache_key`] reuses the stored
/// score. Every other mention is scored independently under
/// `options.score_timeout`, and valid new scores are written back. A failed,
/// timed out, or out-of-range score is logged, never cached, and excluded from
/// the mean but still counted in `mention_count`. An unknown symbol yields an
/// empty aggregate; no stock row is created.
///
/// [`cache_key`]: SentimentScorer::cache_key
///
/// # Errors
///
/// Returns [`AnalysisError::Store`] if the mention store cannot be read or a
/// score cannot be written back.
pub async fn aggregate(
    pool: &SqlitePool,
    scorer: &dyn SentimentScorer,
    symbol: &str,
    window: &Window,
    options: AggregateOptions,
) -> Result<Aggregate, AnalysisError> {
    let display_symbol = normalize_symbol(symbol).unwrap_or_else(|| symbol.trim().to_uppercase());

    let Some(stock) = get_stock_by_symbol(pool, symbol).await? else {
        tracing::debug!(symbol = %display_symbol, "symbol has never been mentioned");
        return Ok(Aggregate::empty(&display_symbol));
    };

    let filter = MentionFilter {
        stock_id: Some(stock.id),
        source: window.source.clone(),
        since: window.since,
        limit: window.limit,
    };
    let mentions = query_mentions(pool, &filter).await?;

    let cache_key = scorer.cache_key();
    let scored: Vec<Scored> = stream::iter(&mentions)
        .map(|mention| score_mention(pool, scorer, &cache_key, mention, options.score_timeout))
        .buffer_unordered(options.concurrency.max(1))
        .try_collect()
        .await?;

    let reused = scored.iter().filter(|s| s.reused).count();
    let results: Vec<Result<f64, ScoringError>> = scored.into_iter().map(|s| s.result).collect();

    let aggregate = fold_scores(&stock.symbol, &results);
    tracing::info!(
        symbol = %aggregate.symbol,
        mentions = aggregate.mention_count,
        scored = aggregate.scored_count,
        reused,
        failed = aggregate.failed_count,
        scorer = %cache_key,
        "aggregated sentiment"
    );

    Ok(aggregate)
}

struct Scored {
    result: Result<f64, ScoringError>,
    reused: bool,
}

async fn score_mention(
    pool: &SqlitePool,
    scorer: &dyn SentimentScorer,
    cache_key: &str,
    mention: &MentionRow,
    timeout: Duration,
) -> Result<Scored, AnalysisError> {
    if let Some(score) = mention
        .cached_score(cache_key)
        .filter(|s| check_range(*s).is_ok())
    {
        return Ok(Scored {
            result: Ok(score),
            reused: true,
        });
    }

    let result = match tokio::time::timeout(timeout, scorer.score(&mention.content)).await {
        Ok(scored) => scored.and_then(check_range),
        Err(_) => Err(ScoringError::Timeout(timeout)),
    };

    match &result {
        Ok(score) => match record_score(pool, mention.id, *score, cache_key).await {
            Ok(_) => {}
            Err(e) if e.is_rejection() => {
                tracing::warn!(mention_id = mention.id, error = %e, "score not cached");
            }
            Err(e) => return Err(e.into()),
        },
        Err(e) => {
            tracing::warn!(mention_id = mention.id, error = %e, "mention could not be scored");
        }
    }

    Ok(Scored {
        result,
        reused: false,
    })
}

fn check_range(score: f64) -> Result<f64, ScoringError> {
    if score.is_finite() && (-1.0..=1.0).contains(&score) {
        Ok(score)
    } else {
        Err(ScoringError::OutOfRange(score))
    }
}

/// Fold per-mention scoring results into an [`Aggregate`].
///
/// `mention_count` is the number of results; the mean covers only the
/// successful ones. Results are range-checked again here.
#[must_use]
pub fn fold_scores(symbol: &str, results: &[Result<f64, ScoringError>]) -> Aggregate {
    let scores: Vec<f64> = results
        .iter()
        .filter_map(|r| r.as_ref().ok().copied())
        .filter(|s| check_range(*s).is_ok())
        .collect();

    let weighted_score = if scores.is_empty() {
        None
    } else {
        #[allow(clippy::cast_precision_loss)]
        let denom = scores.len() as f64;
        Some(scores.iter().sum::<f64>() / denom)
    };

    Aggregate {
        symbol: symbol.to_string(),
        mention_count: results.len(),
        scored_count: scores.len(),
        failed_count: results.len() - scores.len(),
        weighted_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("expected a score");
        assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
    }

    #[test]
    fn empty_results_have_no_score() {
        let agg = fold_scores("AAPL", &[]);
        assert_eq!(agg.mention_count, 0);
        assert_eq!(agg.weighted_score, None);
    }

    #[test]
    fn failures_are_counted_but_excluded_from_mean() {
        let results = vec![
            Ok(0.9),
            Err(ScoringError::Unscoreable),
            Ok(0.5),
            Ok(0.1),
            Err(ScoringError::Timeout(Duration::from_secs(1))),
            Ok(0.5),
        ];
        let agg = fold_scores("AAPL", &results);

        assert_eq!(agg.mention_count, 6);
        assert_eq!(agg.scored_count, 4);
        assert_eq!(agg.failed_count, 2);
        assert_close(agg.weighted_score, 0.5);
    }

    #[test]
    fn all_failures_leave_score_undefined() {
        let results = vec![Err(ScoringError::Unscoreable), Err(ScoringError::Unscoreable)];
        let agg = fold_scores("TSLA", &results);

        assert_eq!(agg.mention_count, 2);
        assert_eq!(agg.failed_count, 2);
        assert_eq!(agg.weighted_score, None);
    }

    #[test]
    fn out_of_range_values_are_not_clamped() {
        let results = vec![Ok(1.5), Ok(f64::NAN), Ok(-0.5)];
        let agg = fold_scores("GOOG", &results);

        assert_eq!(agg.scored_count, 1);
        assert_eq!(agg.failed_count, 2);
        assert_close(agg.weighted_score, -0.5);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert!(check_range(1.0).is_ok());
        assert!(check_range(-1.0).is_ok());
        assert!(matches!(check_range(1.000_1), Err(ScoringError::OutOfRange(_))));
        assert!(check_range(f64::INFINITY).is_err());
    }
}
