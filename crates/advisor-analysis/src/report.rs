//! Per-symbol analysis runs and their report records.

use advisor_core::SignalThresholds;
use advisor_sentiment::SentimentScorer;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::aggregate::{aggregate, AggregateOptions, Window};
use crate::error::AnalysisError;
use crate::recommend::{recommend, Action, Recommendation};

/// Symbols analyzed concurrently by [`analyze_symbols`].
const SYMBOL_CONCURRENCY: usize = 2;

/// One output record per requested symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub symbol: String,
    pub action: Action,
    pub score: Option<f64>,
    pub mention_count: usize,
}

impl From<&Recommendation> for ReportRow {
    fn from(rec: &Recommendation) -> Self {
        Self {
            symbol: rec.symbol.clone(),
            action: rec.action,
            score: rec.score,
            mention_count: rec.mention_count,
        }
    }
}

/// Aggregate one symbol and apply the recommendation policy.
///
/// # Errors
///
/// Returns [`AnalysisError::Store`] if the mention store cannot be read.
pub async fn analyze_symbol(
    pool: &SqlitePool,
    scorer: &dyn SentimentScorer,
    symbol: &str,
    window: &Window,
    options: AggregateOptions,
    thresholds: &SignalThresholds,
) -> Result<Recommendation, AnalysisError> {
    let aggregate = aggregate(pool, scorer, symbol, window, options).await?;
    Ok(recommend(&aggregate, thresholds))
}

/// Analyze several symbols, returning recommendations in input order.
///
/// # Errors
///
/// Returns the first [`AnalysisError::Store`] encountered; no partial report
/// is produced.
pub async fn analyze_symbols(
    pool: &SqlitePool,
    scorer: &dyn SentimentScorer,
    symbols: &[String],
    window: &Window,
    options: AggregateOptions,
    thresholds: &SignalThresholds,
) -> Result<Vec<Recommendation>, AnalysisError> {
    let results: Vec<Result<Recommendation, AnalysisError>> = stream::iter(symbols)
        .map(|symbol| analyze_symbol(pool, scorer, symbol, window, options, thresholds))
        .buffered(SYMBOL_CONCURRENCY)
        .collect()
        .await;

    results.into_iter().collect()
}
