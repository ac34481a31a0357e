use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which sentiment scorer the analysis phase should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerKind {
    Lexicon,
    Llm,
}

impl std::fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScorerKind::Lexicon => write!(f, "lexicon"),
            ScorerKind::Llm => write!(f, "llm"),
        }
    }
}

/// Decision thresholds for the recommendation engine.
///
/// `buy` and `sell` are compared against the mean sentiment score; `min_mentions`
/// gates both so that thin evidence always yields HOLD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalThresholds {
    pub min_mentions: usize,
    pub buy: f64,
    pub sell: f64,
}

impl SignalThresholds {
    pub const DEFAULT_MIN_MENTIONS: usize = 5;
    pub const DEFAULT_BUY: f64 = 0.7;
    pub const DEFAULT_SELL: f64 = 0.3;
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            min_mentions: Self::DEFAULT_MIN_MENTIONS,
            buy: Self::DEFAULT_BUY,
            sell: Self::DEFAULT_SELL,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub watchlist_path: PathBuf,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub http_timeout_secs: u64,
    pub http_user_agent: String,
    pub http_max_retries: u32,
    pub http_retry_backoff_ms: u64,
    pub scorer: ScorerKind,
    pub score_timeout_secs: u64,
    pub score_concurrency: usize,
    pub llm_api_url: String,
    pub llm_api_key: Option<String>,
    pub llm_model: String,
    pub thresholds: SignalThresholds,
    pub reddit_client_id: Option<String>,
    pub reddit_client_secret: Option<String>,
    pub reddit_user_agent: Option<String>,
}

impl AppConfig {
    /// Reddit credentials as `(client_id, client_secret, user_agent)`, if all
    /// three are configured.
    #[must_use]
    pub fn reddit_credentials(&self) -> Option<(&str, &str, &str)> {
        match (
            &self.reddit_client_id,
            &self.reddit_client_secret,
            &self.reddit_user_agent,
        ) {
            (Some(id), Some(secret), Some(agent)) => {
                Some((id.as_str(), secret.as_str(), agent.as_str()))
            }
            _ => None,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url)
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("watchlist_path", &self.watchlist_path)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("http_user_agent", &self.http_user_agent)
            .field("http_max_retries", &self.http_max_retries)
            .field("http_retry_backoff_ms", &self.http_retry_backoff_ms)
            .field("scorer", &self.scorer)
            .field("score_timeout_secs", &self.score_timeout_secs)
            .field("score_concurrency", &self.score_concurrency)
            .field("llm_api_url", &self.llm_api_url)
            .field(
                "llm_api_key",
                &self.llm_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("llm_model", &self.llm_model)
            .field("thresholds", &self.thresholds)
            .field("reddit_client_id", &self.reddit_client_id)
            .field(
                "reddit_client_secret",
                &self.reddit_client_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("reddit_user_agent", &self.reddit_user_agent)
            .finish()
    }
}
