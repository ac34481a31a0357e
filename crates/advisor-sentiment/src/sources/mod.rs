//! Mention source abstractions.

mod news_rss;
mod reddit;
mod reddit_helpers;
mod rss_helpers;
mod tickers;

pub use news_rss::GoogleNewsAdapter;
pub use reddit::{RedditAdapter, RedditCredentials};
pub use tickers::TickerMatcher;

use advisor_core::{AppConfig, RawMention, Watchlist};
use async_trait::async_trait;

use crate::error::SentimentError;
use crate::http::HttpSettings;

/// Produces raw mention candidates from one external source.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Source tag stored with every mention this adapter emits.
    fn source(&self) -> &'static str;

    /// Fetch the current batch of mentions.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError`] when the source cannot be reached at all.
    async fn fetch(&self) -> Result<Vec<RawMention>, SentimentError>;
}

/// Which adapters a collection run should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceSelection {
    #[default]
    All,
    Reddit,
    News,
}

/// Result of [`collect_mentions`].
#[derive(Debug, Default)]
pub struct CollectOutcome {
    pub mentions: Vec<RawMention>,
    /// Source tags of adapters whose fetch failed.
    pub failed_sources: Vec<&'static str>,
}

/// Build the adapters enabled by the watchlist and credentials.
///
/// With [`SourceSelection::All`], a source that is not configured is skipped
/// with a log line. Naming a source explicitly turns a missing configuration
/// into an error.
///
/// # Errors
///
/// Returns [`SentimentError::Config`] when an explicitly selected source is not
/// configured or no source is available, or [`SentimentError::Http`] if an
/// HTTP client cannot be built.
pub fn build_adapters(
    config: &AppConfig,
    watchlist: &Watchlist,
    selection: SourceSelection,
) -> Result<Vec<Box<dyn SourceAdapter>>, SentimentError> {
    let http = HttpSettings::from_app_config(config);
    let explicit = selection != SourceSelection::All;
    let mut adapters: Vec<Box<dyn SourceAdapter>> = Vec::new();

    if matches!(selection, SourceSelection::All | SourceSelection::Reddit) {
        match (&watchlist.reddit, config.reddit_credentials()) {
            (Some(watch), Some((client_id, client_secret, user_agent))) => {
                let credentials = RedditCredentials {
                    client_id: client_id.to_string(),
                    client_secret: client_secret.to_string(),
                    user_agent: user_agent.to_string(),
                };
                let matcher = TickerMatcher::new(&watchlist.tickers)?;
                adapters.push(Box::new(RedditAdapter::new(
                    &http,
                    credentials,
                    watch.clone(),
                    matcher,
                )?));
            }
            (None, _) if explicit => {
                return Err(SentimentError::Config(
                    "watchlist has no reddit section".to_string(),
                ));
            }
            (Some(_), None) if explicit => {
                return Err(SentimentError::Config(
                    "REDDIT_CLIENT_ID, REDDIT_CLIENT_SECRET and REDDIT_USER_AGENT must be set"
                        .to_string(),
                ));
            }
            (None, _) => tracing::debug!("reddit not configured in watchlist, skipping"),
            (Some(_), None) => tracing::warn!("Reddit credentials not set, skipping reddit"),
        }
    }

    if matches!(selection, SourceSelection::All | SourceSelection::News) {
        let news = watchlist.news.clone().unwrap_or_default();
        if news.enabled {
            adapters.push(Box::new(GoogleNewsAdapter::new(
                &http,
                watchlist.tickers.clone(),
                &news,
            )?));
        } else if explicit {
            return Err(SentimentError::Config(
                "news is disabled in the watchlist".to_string(),
            ));
        } else {
            tracing::debug!("news disabled in watchlist, skipping");
        }
    }

    if adapters.is_empty() {
        return Err(SentimentError::Config(
            "no mention source is configured".to_string(),
        ));
    }

    Ok(adapters)
}

/// Run every adapter and gather their mentions.
///
/// Continues past individual adapter failures, logging warnings. Returns an
/// empty batch if every adapter fails.
pub async fn collect_mentions(adapters: &[Box<dyn SourceAdapter>]) -> CollectOutcome {
    let mut outcome = CollectOutcome::default();

    for adapter in adapters {
        let source = adapter.source();
        match adapter.fetch().await {
            Ok(mentions) => {
                tracing::info!(source, count = mentions.len(), "collected mentions");
                outcome.mentions.extend(mentions);
            }
            Err(e) => {
                tracing::warn!(source, error = %e, "source fetch failed");
                outcome.failed_sources.push(source);
            }
        }
    }

    outcome
}
