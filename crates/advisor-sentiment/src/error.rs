use std::time::Duration;

use thiserror::Error;

/// Failures while collecting mentions from an external source.
#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Reddit API error: {0}")]
    Reddit(String),

    #[error("invalid ticker pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("source configuration error: {0}")]
    Config(String),
}

/// A single mention could not be scored.
///
/// Never fatal for an aggregation: the mention is counted but excluded from
/// the mean.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("text contains no sentiment-bearing terms")]
    Unscoreable,

    #[error("scoring request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("scoring API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed scorer reply: {0}")]
    Malformed(String),

    #[error("score {0} is outside [-1.0, 1.0]")]
    OutOfRange(f64),

    #[error("scoring timed out after {0:?}")]
    Timeout(Duration),
}
