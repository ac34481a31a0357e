//! Shared configuration and domain types for the stock chatter advisor.

mod app_config;
mod config;
mod mention;
mod symbols;
mod watchlist;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, ScorerKind, SignalThresholds};
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use mention::RawMention;
pub use symbols::normalize_symbol;
pub use watchlist::{load_watchlist, NewsWatch, RedditWatch, Watchlist};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read watchlist file {path}: {source}")]
    WatchlistIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse watchlist file: {0}")]
    WatchlistParse(#[source] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}
