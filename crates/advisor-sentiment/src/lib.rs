//! Sentiment scoring and mention collection for the stock advisor.
//!
//! Scorers map mention text to a value in `[-1.0, 1.0]` behind the
//! [`SentimentScorer`] trait (keyword lexicon or an LLM endpoint). Source
//! adapters pull chatter from Reddit and Google News RSS behind the
//! [`SourceAdapter`] trait and emit one [`advisor_core::RawMention`] per
//! watched ticker they find.

pub mod error;
pub mod http;
pub mod lexicon;
pub mod llm;
pub mod scorer;
pub mod sources;

mod retry;

pub use error::{ScoringError, SentimentError};
pub use http::HttpSettings;
pub use lexicon::LexiconScorer;
pub use llm::LlmScorer;
pub use scorer::{build_scorer, SentimentScorer};
pub use sources::{
    build_adapters, collect_mentions, CollectOutcome, GoogleNewsAdapter, RedditAdapter,
    RedditCredentials, SourceAdapter, SourceSelection, TickerMatcher,
};
