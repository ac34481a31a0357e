//! Ingestion, sentiment aggregation, and BUY/SELL/HOLD recommendations.
//!
//! Collection feeds [`ingest_mentions`], which writes candidates through the
//! mention store. Analysis runs [`aggregate`] over a symbol's stored mentions
//! and hands the result to the pure [`recommend`] policy.

pub mod aggregate;
pub mod error;
pub mod ingest;
pub mod recommend;
pub mod report;

pub use aggregate::{aggregate, fold_scores, Aggregate, AggregateOptions, Window};
pub use error::AnalysisError;
pub use ingest::{ingest_mentions, IngestStats};
pub use recommend::{recommend, Action, Recommendation};
pub use report::{analyze_symbol, analyze_symbols, ReportRow};
