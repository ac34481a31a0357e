//! Google News RSS adapter: one search per watched ticker.

use advisor_core::{NewsWatch, RawMention};
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::error::SentimentError;
use crate::http::HttpSettings;
use crate::retry::retry_with_backoff;

use super::rss_helpers::{parse_rss_items, FeedItem};
use super::SourceAdapter;

const SOURCE: &str = "google_news";
const DEFAULT_BASE_URL: &str = "https://news.google.com/rss/search";

pub struct GoogleNewsAdapter {
    client: reqwest::Client,
    tickers: Vec<String>,
    max_items: usize,
    max_retries: u32,
    retry_backoff_ms: u64,
    base_url: String,
}

impl GoogleNewsAdapter {
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the HTTP client cannot be built.
    pub fn new(
        http: &HttpSettings,
        tickers: Vec<String>,
        watch: &NewsWatch,
    ) -> Result<Self, SentimentError> {
        Ok(Self {
            client: http.build_client()?,
            tickers,
            max_items: watch.max_items,
            max_retries: http.max_retries,
            retry_backoff_ms: http.retry_backoff_ms,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    fn search_url(&self, symbol: &str) -> String {
        let query = format!("{symbol} stock");
        let encoded = utf8_percent_encode(&query, NON_ALPHANUMERIC);
        format!(
            "{}?q={encoded}&hl=en-US&gl=US&ceid=US:en",
            self.base_url
        )
    }

    async fn fetch_ticker(&self, symbol: &str) -> Result<Vec<RawMention>, SentimentError> {
        let url = self.search_url(symbol);
        let body = retry_with_backoff(self.max_retries, self.retry_backoff_ms, || {
            let request = self.client.get(&url);
            async move {
                let text = request.send().await?.error_for_status()?.text().await?;
                Ok(text)
            }
        })
        .await?;

        let items = parse_rss_items(&body, self.max_items)?;
        Ok(items
            .iter()
            .map(|item| to_mention(item, symbol))
            .collect())
    }
}

/// Stable per-ticker dedup key: the item guid, or the SHA-256 of its link.
fn external_id(item: &FeedItem, symbol: &str) -> String {
    let key = match &item.guid {
        Some(guid) => guid.clone(),
        None => format!("{:x}", Sha256::digest(item.link.as_bytes())),
    };
    format!("news_{key}_{symbol}")
}

fn to_mention(item: &FeedItem, symbol: &str) -> RawMention {
    RawMention {
        symbol: symbol.to_string(),
        source: SOURCE.to_string(),
        content: item.text(),
        url: Some(item.link.clone()),
        external_id: Some(external_id(item, symbol)),
        metadata: Some(json!({
            "title": item.title,
            "published": item.published,
        })),
    }
}

#[async_trait]
impl SourceAdapter for GoogleNewsAdapter {
    fn source(&self) -> &'static str {
        SOURCE
    }

    async fn fetch(&self) -> Result<Vec<RawMention>, SentimentError> {
        let mut mentions = Vec::new();
        let mut failed = 0usize;
        let mut last_error = None;

        for symbol in &self.tickers {
            match self.fetch_ticker(symbol).await {
                Ok(found) => {
                    tracing::debug!(symbol = %symbol, count = found.len(), "collected news items");
                    mentions.extend(found);
                }
                Err(e) => {
                    tracing::warn!(symbol = %symbol, error = %e, "Google News search failed");
                    failed += 1;
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if failed == self.tickers.len() => Err(e),
            _ => Ok(mentions),
        }
    }
}
