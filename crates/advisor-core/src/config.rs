use crate::app_config::{AppConfig, Environment, ScorerKind, SignalThresholds};
use crate::ConfigError;

const DEFAULT_LLM_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
///
/// # Errors
///
/// Returns [`ConfigError`] if a value fails to parse or validate.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Empty strings count as unset so `.env` templates with blank values work.
    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_score = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
            return Err(invalid(var, format!("{value} is outside [-1.0, 1.0]")));
        }
        Ok(value)
    };

    let database_url = or_default("DATABASE_URL", "sqlite://advisor.db");
    let env = parse_environment(&or_default("ADVISOR_ENV", "development"));
    let log_level = or_default("ADVISOR_LOG_LEVEL", "info");
    let watchlist_path = PathBuf::from(or_default(
        "ADVISOR_WATCHLIST_PATH",
        "./config/watchlist.yaml",
    ));

    let db_max_connections = parse_u32("ADVISOR_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("ADVISOR_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("ADVISOR_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let http_timeout_secs = parse_u64("ADVISOR_HTTP_TIMEOUT_SECS", "30")?;
    let http_user_agent = or_default("ADVISOR_HTTP_USER_AGENT", "advisor/0.1 (stock-chatter)");
    let http_max_retries = parse_u32("ADVISOR_HTTP_MAX_RETRIES", "3")?;
    let http_retry_backoff_ms = parse_u64("ADVISOR_HTTP_RETRY_BACKOFF_MS", "1000")?;

    let scorer_raw = or_default("ADVISOR_SCORER", "lexicon");
    let scorer = parse_scorer(&scorer_raw)
        .ok_or_else(|| invalid("ADVISOR_SCORER", format!("unknown scorer '{scorer_raw}'")))?;
    let score_timeout_secs = parse_u64("ADVISOR_SCORE_TIMEOUT_SECS", "20")?;
    let score_concurrency = parse_usize("ADVISOR_SCORE_CONCURRENCY", "4")?;
    if score_concurrency == 0 {
        return Err(invalid(
            "ADVISOR_SCORE_CONCURRENCY",
            "must be at least 1".to_string(),
        ));
    }

    let llm_api_url = or_default("ADVISOR_LLM_API_URL", DEFAULT_LLM_API_URL);
    let llm_api_key = optional("ADVISOR_LLM_API_KEY");
    let llm_model = or_default("ADVISOR_LLM_MODEL", "gpt-4o-mini");

    let thresholds = SignalThresholds {
        min_mentions: parse_usize("ADVISOR_MIN_MENTIONS", "5")?,
        buy: parse_score("ADVISOR_BUY_THRESHOLD", "0.7")?,
        sell: parse_score("ADVISOR_SELL_THRESHOLD", "0.3")?,
    };
    if thresholds.sell > thresholds.buy {
        return Err(ConfigError::Validation(format!(
            "sell threshold {} is above buy threshold {}",
            thresholds.sell, thresholds.buy
        )));
    }

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        watchlist_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        http_timeout_secs,
        http_user_agent,
        http_max_retries,
        http_retry_backoff_ms,
        scorer,
        score_timeout_secs,
        score_concurrency,
        llm_api_url,
        llm_api_key,
        llm_model,
        thresholds,
        reddit_client_id: optional("REDDIT_CLIENT_ID"),
        reddit_client_secret: optional("REDDIT_CLIENT_SECRET"),
        reddit_user_agent: optional("REDDIT_USER_AGENT"),
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_scorer(s: &str) -> Option<ScorerKind> {
    match s.trim().to_ascii_lowercase().as_str() {
        "lexicon" => Some(ScorerKind::Lexicon),
        "llm" => Some(ScorerKind::Llm),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
