//! OpenAI-compatible chat-completions scorer.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::http::HttpSettings;
use crate::scorer::SentimentScorer;

const SYSTEM_PROMPT: &str = "You rate the investor sentiment of social media posts and \
news headlines about stocks. Reply with a single number between -1 and 1, where -1 is \
very bearish, 0 is neutral and 1 is very bullish. Reply with the number only.";

/// Longest error body kept in [`ScoringError::Api`].
const MAX_ERROR_BODY_CHARS: usize = 200;

pub struct LlmScorer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

impl LlmScorer {
    /// Create a scorer posting to `api_url` (the full chat-completions URL).
    ///
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] if the HTTP client cannot be built.
    pub fn new(
        http: &HttpSettings,
        api_url: &str,
        api_key: &str,
        model: &str,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: http.build_client()?,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl SentimentScorer for LlmScorer {
    fn name(&self) -> &'static str {
        "llm"
    }

    fn cache_key(&self) -> String {
        format!("llm:{}", self.model)
    }

    async fn score(&self, text: &str) -> Result<f64, ScoringError> {
        let request = ChatRequest {
            model: &self.model,
            temperature: 0.0,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScoringError::Api {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| ScoringError::Malformed(format!("response parse error: {e}")))?;

        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ScoringError::Malformed("reply has no content".to_string()))?;

        parse_score(&content)
    }
}

/// Extract the score from a model reply.
///
/// Accepts a bare number or the first number embedded in prose. The value is
/// not range-checked here.
pub(crate) fn parse_score(reply: &str) -> Result<f64, ScoringError> {
    static NUMBER: OnceLock<Option<Regex>> = OnceLock::new();

    let trimmed = reply.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        return Ok(value);
    }

    NUMBER
        .get_or_init(|| Regex::new(r"[-+]?\d+(?:\.\d+)?").ok())
        .as_ref()
        .and_then(|re| re.find(trimmed))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .ok_or_else(|| ScoringError::Malformed(format!("no number in reply: '{trimmed}'")))
}
