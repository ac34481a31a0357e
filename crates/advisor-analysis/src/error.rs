use advisor_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The mention store failed; the whole operation is aborted.
    #[error("mention store unavailable: {0}")]
    Store(#[from] DbError),
}
