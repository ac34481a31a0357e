//! Reddit listing item conversion: text extraction, age, and per-ticker mentions.

use advisor_core::RawMention;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::tickers::TickerMatcher;

pub(super) const SOURCE: &str = "reddit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ItemKind {
    Submission,
    Comment,
}

impl ItemKind {
    pub(super) fn as_str(self) -> &'static str {
        match self {
            Self::Submission => "submission",
            Self::Comment => "comment",
        }
    }

    /// Listing path under `/r/{subreddit}/`, newest first.
    pub(super) fn listing_path(self) -> &'static str {
        match self {
            Self::Submission => "new",
            Self::Comment => "comments",
        }
    }
}

/// The `data` object of a `t1` (comment) or `t3` (submission) listing child.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ItemData {
    pub(super) id: String,
    pub(super) title: Option<String>,
    pub(super) selftext: Option<String>,
    pub(super) body: Option<String>,
    pub(super) permalink: Option<String>,
    pub(super) author: Option<String>,
    #[serde(default)]
    pub(super) score: i64,
    pub(super) created_utc: f64,
}

fn is_removed(text: &str) -> bool {
    text == "[deleted]" || text == "[removed]"
}

/// Age of an item in fractional days relative to `now`.
pub(super) fn age_in_days(created_utc: f64, now: DateTime<Utc>) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let now_secs = now.timestamp_millis() as f64 / 1_000.0;
    (now_secs - created_utc) / 86_400.0
}

/// Mention text: title plus self-text for submissions, body for comments.
pub(super) fn item_text(kind: ItemKind, data: &ItemData) -> Option<String> {
    let clean = |s: Option<&str>| {
        s.map(str::trim)
            .filter(|t| !t.is_empty() && !is_removed(t))
            .map(str::to_string)
    };

    match kind {
        ItemKind::Comment => clean(data.body.as_deref()),
        ItemKind::Submission => {
            let title = clean(data.title.as_deref());
            let selftext = clean(data.selftext.as_deref());
            match (title, selftext) {
                (Some(title), Some(body)) => Some(format!("{title}\n{body}")),
                (Some(only), None) | (None, Some(only)) => Some(only),
                (None, None) => None,
            }
        }
    }
}

/// One [`RawMention`] per watched ticker found in the item.
///
/// The external id carries the ticker so a post naming several tickers is
/// stored once per ticker.
pub(super) fn to_mentions(
    data: &ItemData,
    kind: ItemKind,
    subreddit: &str,
    age_days: f64,
    matcher: &TickerMatcher,
) -> Vec<RawMention> {
    let Some(content) = item_text(kind, data) else {
        return Vec::new();
    };
    let tickers = matcher.find(&content);
    if tickers.is_empty() {
        return Vec::new();
    }

    let url = data
        .permalink
        .as_deref()
        .map(|p| format!("https://reddit.com{p}"));
    let metadata = json!({
        "type": kind.as_str(),
        "subreddit": subreddit,
        "author": data.author.as_deref().unwrap_or("[deleted]"),
        "upvotes": data.score,
        "age_days": age_days,
        "tickers": tickers,
    });

    tickers
        .iter()
        .map(|symbol| RawMention {
            symbol: symbol.clone(),
            source: SOURCE.to_string(),
            content: content.clone(),
            url: url.clone(),
            external_id: Some(format!("reddit_{}_{}_{symbol}", kind.as_str(), data.id)),
            metadata: Some(metadata.clone()),
        })
        .collect()
}
