use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::symbols::normalize_symbol;
use crate::ConfigError;

fn default_max_days() -> u32 {
    3
}

fn default_news_enabled() -> bool {
    true
}

fn default_news_max_items() -> usize {
    25
}

/// Reddit collection settings: which subreddits to scan and the accepted
/// content age window in days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedditWatch {
    pub subreddits: Vec<String>,
    #[serde(default)]
    pub min_days: u32,
    #[serde(default = "default_max_days")]
    pub max_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsWatch {
    #[serde(default = "default_news_enabled")]
    pub enabled: bool,
    #[serde(default = "default_news_max_items")]
    pub max_items: usize,
}

impl Default for NewsWatch {
    fn default() -> Self {
        Self {
            enabled: default_news_enabled(),
            max_items: default_news_max_items(),
        }
    }
}

/// The tracked tickers plus per-source collection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watchlist {
    pub tickers: Vec<String>,
    #[serde(default)]
    pub reddit: Option<RedditWatch>,
    #[serde(default)]
    pub news: Option<NewsWatch>,
}

/// Load and validate the watchlist from a YAML file.
///
/// Tickers are normalized (uppercased, cashtag stripped) in the returned value.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_watchlist(path: &Path) -> Result<Watchlist, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::WatchlistIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_watchlist(&content)
}

fn parse_watchlist(content: &str) -> Result<Watchlist, ConfigError> {
    let mut watchlist: Watchlist =
        serde_yaml::from_str(content).map_err(ConfigError::WatchlistParse)?;
    validate_watchlist(&mut watchlist)?;
    Ok(watchlist)
}

fn validate_watchlist(watchlist: &mut Watchlist) -> Result<(), ConfigError> {
    if watchlist.tickers.is_empty() {
        return Err(ConfigError::Validation(
            "watchlist must name at least one ticker".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut normalized = Vec::with_capacity(watchlist.tickers.len());
    for raw in &watchlist.tickers {
        let symbol = normalize_symbol(raw).ok_or_else(|| {
            ConfigError::Validation(format!("invalid ticker symbol: '{raw}'"))
        })?;
        if !seen.insert(symbol.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate ticker: '{symbol}'"
            )));
        }
        normalized.push(symbol);
    }
    watchlist.tickers = normalized;

    if let Some(reddit) = &watchlist.reddit {
        if reddit.subreddits.iter().all(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "reddit section must list at least one subreddit".to_string(),
            ));
        }
        if reddit.min_days > reddit.max_days {
            return Err(ConfigError::Validation(format!(
                "reddit min_days ({}) exceeds max_days ({})",
                reddit.min_days, reddit.max_days
            )));
        }
    }

    Ok(())
}
