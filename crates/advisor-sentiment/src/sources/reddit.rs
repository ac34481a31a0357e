//! Reddit adapter (client-credentials OAuth) scanning subreddit listings.

use advisor_core::{RawMention, RedditWatch};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::USER_AGENT;
use serde::Deserialize;

use crate::error::SentimentError;
use crate::http::HttpSettings;
use crate::retry::retry_with_backoff;

use super::reddit_helpers::{age_in_days, to_mentions, ItemData, ItemKind, SOURCE};
use super::tickers::TickerMatcher;
use super::SourceAdapter;

const DEFAULT_AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";
const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";
const PAGE_LIMIT: u32 = 100;
/// Upper bound on pages per listing, in case `max_days` is never reached.
const MAX_PAGES: usize = 10;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Child>,
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: ItemData,
}

/// Reddit script-app credentials.
#[derive(Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl std::fmt::Debug for RedditCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Scans `/new` submissions and `/comments` of each configured subreddit.
///
/// Listings are newest first; paging stops at the first item older than
/// `max_days`, and items younger than `min_days` are skipped.
pub struct RedditAdapter {
    client: reqwest::Client,
    credentials: RedditCredentials,
    watch: RedditWatch,
    matcher: TickerMatcher,
    max_retries: u32,
    retry_backoff_ms: u64,
    auth_url: String,
    api_base: String,
}

impl RedditAdapter {
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the HTTP client cannot be built.
    pub fn new(
        http: &HttpSettings,
        credentials: RedditCredentials,
        watch: RedditWatch,
        matcher: TickerMatcher,
    ) -> Result<Self, SentimentError> {
        Ok(Self {
            client: http.build_client()?,
            credentials,
            watch,
            matcher,
            max_retries: http.max_retries,
            retry_backoff_ms: http.retry_backoff_ms,
            auth_url: DEFAULT_AUTH_URL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    /// Point the adapter at alternative token and API endpoints.
    #[must_use]
    pub fn with_base_urls(mut self, auth_url: &str, api_base: &str) -> Self {
        self.auth_url = auth_url.to_string();
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    async fn fetch_token(&self) -> Result<String, SentimentError> {
        let response = self
            .client
            .post(&self.auth_url)
            .header(USER_AGENT, &self.credentials.user_agent)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SentimentError::Reddit(format!(
                "token exchange failed with status {}",
                response.status()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SentimentError::Reddit(format!("token parse error: {e}")))?;

        Ok(token.access_token)
    }

    fn listing_request(
        &self,
        token: &str,
        url: &str,
        after: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .get(url)
            .bearer_auth(token)
            .header(USER_AGENT, &self.credentials.user_agent)
            .query(&[("limit", PAGE_LIMIT.to_string()), ("raw_json", "1".to_string())]);
        if let Some(cursor) = after {
            request = request.query(&[("after", cursor)]);
        }
        request
    }

    async fn fetch_page(
        &self,
        token: &str,
        url: &str,
        after: Option<&str>,
    ) -> Result<Listing, SentimentError> {
        retry_with_backoff(self.max_retries, self.retry_backoff_ms, || {
            let request = self.listing_request(token, url, after);
            async move {
                let listing = request
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<Listing>()
                    .await?;
                Ok(listing)
            }
        })
        .await
    }

    async fn scan_listing(
        &self,
        token: &str,
        subreddit: &str,
        kind: ItemKind,
        now: DateTime<Utc>,
    ) -> Result<Vec<RawMention>, SentimentError> {
        let url = format!("{}/r/{subreddit}/{}", self.api_base, kind.listing_path());
        let max_days = f64::from(self.watch.max_days);
        let min_days = f64::from(self.watch.min_days);

        let mut mentions = Vec::new();
        let mut after: Option<String> = None;

        'pages: for _ in 0..MAX_PAGES {
            let listing = self.fetch_page(token, &url, after.as_deref()).await?;

            for child in &listing.data.children {
                let age = age_in_days(child.data.created_utc, now);
                if age > max_days {
                    break 'pages;
                }
                if age < min_days {
                    continue;
                }
                mentions.extend(to_mentions(&child.data, kind, subreddit, age, &self.matcher));
            }

            after = listing.data.after;
            if after.is_none() {
                break;
            }
        }

        tracing::debug!(
            subreddit,
            kind = kind.as_str(),
            mentions = mentions.len(),
            "scanned Reddit listing"
        );

        Ok(mentions)
    }
}

#[async_trait]
impl SourceAdapter for RedditAdapter {
    fn source(&self) -> &'static str {
        SOURCE
    }

    /// Scan every configured subreddit.
    ///
    /// A failing listing is logged and skipped; the adapter fails only when
    /// the token exchange fails or every listing fails.
    async fn fetch(&self) -> Result<Vec<RawMention>, SentimentError> {
        let token = self.fetch_token().await?;
        let now = Utc::now();

        let mut mentions = Vec::new();
        let mut attempted = 0usize;
        let mut failed = 0usize;
        let mut last_error = None;

        let subreddits = self
            .watch
            .subreddits
            .iter()
            .map(String::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty());

        for subreddit in subreddits {
            for kind in [ItemKind::Submission, ItemKind::Comment] {
                attempted += 1;
                match self.scan_listing(&token, subreddit, kind, now).await {
                    Ok(found) => mentions.extend(found),
                    Err(e) => {
                        tracing::warn!(
                            subreddit,
                            kind = kind.as_str(),
                            error = %e,
                            "Reddit listing scan failed"
                        );
                        failed += 1;
                        last_error = Some(e);
                    }
                }
            }
        }

        match last_error {
            Some(e) if failed == attempted => Err(e),
            _ => Ok(mentions),
        }
    }
}
