//! The [`SentimentScorer`] seam and scorer selection.

use advisor_core::{AppConfig, ScorerKind};
use async_trait::async_trait;

use crate::error::{ScoringError, SentimentError};
use crate::http::HttpSettings;
use crate::lexicon::LexiconScorer;
use crate::llm::LlmScorer;

/// Maps mention text to a sentiment value.
///
/// Implementations should return a value in `[-1.0, 1.0]`; callers treat
/// anything else (including non-finite values) as a scoring failure rather
/// than clamping it.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Key stored with cached scores; a cached score is reused only by a
    /// scorer with the same key.
    fn cache_key(&self) -> String {
        self.name().to_string()
    }

    /// Score one piece of text.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError`] when the text cannot be scored. A failure
    /// affects only this mention.
    async fn score(&self, text: &str) -> Result<f64, ScoringError>;
}

/// Build the scorer selected by `ADVISOR_SCORER`.
///
/// # Errors
///
/// Returns [`SentimentError::Config`] when the LLM scorer is selected without
/// an API key, or [`SentimentError::Http`] if its HTTP client cannot be built.
pub fn build_scorer(config: &AppConfig) -> Result<Box<dyn SentimentScorer>, SentimentError> {
    match config.scorer {
        ScorerKind::Lexicon => Ok(Box::new(LexiconScorer)),
        ScorerKind::Llm => {
            let api_key = config.llm_api_key.as_deref().ok_or_else(|| {
                SentimentError::Config("ADVISOR_LLM_API_KEY is required for the llm scorer".into())
            })?;
            let scorer = LlmScorer::new(
                &HttpSettings::from_app_config(config),
                &config.llm_api_url,
                api_key,
                &config.llm_model,
            )?;
            Ok(Box::new(scorer))
        }
    }
}
