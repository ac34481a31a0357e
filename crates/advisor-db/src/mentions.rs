//! Database operations for the `mentions` table.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row and input types
// ---------------------------------------------------------------------------

/// A row from the `mentions` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MentionRow {
    pub id: i64,
    pub stock_id: i64,
    pub source: String,
    pub content: String,
    pub url: Option<String>,
    pub collected_at: DateTime<Utc>,
    pub external_id: Option<String>,
    pub metadata: Option<Json<Value>>,
    /// Cached sentiment, if a scorer has stored one.
    pub sentiment_score: Option<f64>,
    pub scored_by: Option<String>,
}

impl MentionRow {
    /// The stored score, if it was produced by the scorer keyed `scorer`.
    #[must_use]
    pub fn cached_score(&self, scorer: &str) -> Option<f64> {
        match (self.sentiment_score, self.scored_by.as_deref()) {
            (Some(score), Some(by)) if by == scorer => Some(score),
            _ => None,
        }
    }
}

/// A mention to be recorded.
///
/// `collected_at` is the ingestion time, not the content's own timestamp;
/// [`NewMention::new`] stamps it with the current time.
#[derive(Debug, Clone)]
pub struct NewMention<'a> {
    pub stock_id: i64,
    pub source: &'a str,
    pub content: &'a str,
    pub url: Option<&'a str>,
    pub external_id: Option<&'a str>,
    pub metadata: Option<&'a Value>,
    pub collected_at: DateTime<Utc>,
}

impl<'a> NewMention<'a> {
    #[must_use]
    pub fn new(stock_id: i64, source: &'a str, content: &'a str) -> Self {
        Self {
            stock_id,
            source,
            content,
            url: None,
            external_id: None,
            metadata: None,
            collected_at: Utc::now(),
        }
    }
}

/// Result of [`record_mention`]: the row id and whether this call created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOutcome {
    pub id: i64,
    pub inserted: bool,
}

/// Filter for [`query_mentions`]. All fields are optional and combine with AND.
#[derive(Debug, Clone, Default)]
pub struct MentionFilter {
    pub stock_id: Option<i64>,
    pub source: Option<String>,
    /// Inclusive lower bound on `collected_at`.
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Record a mention, deduplicating on `(source, external_id)`.
///
/// When `external_id` is present and a row with the same key already exists,
/// nothing is written and the existing id is returned with `inserted = false`.
/// This holds under concurrent collectors as well: the unique constraint picks
/// one winner and every other caller observes `inserted = false`.
///
/// A blank `external_id` is treated as absent. Mentions without one cannot be
/// deduplicated and are always inserted.
///
/// # Errors
///
/// Returns [`DbError::InvalidMention`] when `content` or `source` is blank, or
/// [`DbError::Sqlx`] if the write fails (including an unknown `stock_id`).
pub async fn record_mention(
    pool: &SqlitePool,
    mention: &NewMention<'_>,
) -> Result<RecordOutcome, DbError> {
    if mention.content.trim().is_empty() {
        return Err(DbError::InvalidMention(
            "mention content must be non-empty".to_string(),
        ));
    }
    if mention.source.trim().is_empty() {
        return Err(DbError::InvalidMention(
            "mention source must be non-empty".to_string(),
        ));
    }

    let external_id = mention
        .external_id
        .map(str::trim)
        .filter(|id| !id.is_empty());

    let inserted_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO mentions \
             (stock_id, source, content, url, collected_at, external_id, metadata) \
         VALUES (?, ?, ?, ?, ?, ?, ?) \
         ON CONFLICT (source, external_id) DO NOTHING \
         RETURNING id",
    )
    .bind(mention.stock_id)
    .bind(mention.source)
    .bind(mention.content)
    .bind(mention.url)
    .bind(mention.collected_at)
    .bind(external_id)
    .bind(mention.metadata.map(Json))
    .fetch_optional(pool)
    .await?;

    if let Some(id) = inserted_id {
        return Ok(RecordOutcome { id, inserted: true });
    }

    // Conflict: only reachable with a present external_id.
    let existing_id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM mentions WHERE source = ? AND external_id = ?",
    )
    .bind(mention.source)
    .bind(external_id)
    .fetch_one(pool)
    .await?;

    tracing::debug!(
        source = mention.source,
        external_id = external_id.unwrap_or_default(),
        id = existing_id,
        "mention already recorded"
    );

    Ok(RecordOutcome {
        id: existing_id,
        inserted: false,
    })
}

/// Returns `true` if a mention with this `(source, external_id)` is stored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn mention_exists(
    pool: &SqlitePool,
    source: &str,
    external_id: &str,
) -> Result<bool, DbError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM mentions WHERE source = ? AND external_id = ?)",
    )
    .bind(source)
    .bind(external_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// List mentions matching `filter`, newest first.
///
/// Results are ordered by `collected_at DESC` then `id DESC`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn query_mentions(
    pool: &SqlitePool,
    filter: &MentionFilter,
) -> Result<Vec<MentionRow>, DbError> {
    let rows = sqlx::query_as::<_, MentionRow>(
        "SELECT id, stock_id, source, content, url, collected_at, external_id, metadata, \
                sentiment_score, scored_by \
         FROM mentions \
         WHERE (?1 IS NULL OR stock_id = ?1) \
           AND (?2 IS NULL OR source = ?2) \
           AND (?3 IS NULL OR collected_at >= ?3) \
         ORDER BY collected_at DESC, id DESC \
         LIMIT COALESCE(?4, -1)",
    )
    .bind(filter.stock_id)
    .bind(filter.source.as_deref())
    .bind(filter.since)
    .bind(filter.limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Store `score` as the cached sentiment of mention `id`, produced by `scorer`.
///
/// Overwrites any score a different scorer stored earlier. Returns `false`
/// when no mention has this id.
///
/// # Errors
///
/// Returns [`DbError::InvalidMention`] when `score` is not a finite value in
/// `[-1, 1]` or `scorer` is blank, or [`DbError::Sqlx`] if the write fails.
pub async fn record_score(
    pool: &SqlitePool,
    id: i64,
    score: f64,
    scorer: &str,
) -> Result<bool, DbError> {
    if !score.is_finite() || !(-1.0..=1.0).contains(&score) {
        return Err(DbError::InvalidMention(format!(
            "sentiment score {score} is outside [-1, 1]"
        )));
    }
    if scorer.trim().is_empty() {
        return Err(DbError::InvalidMention(
            "scorer key must be non-empty".to_string(),
        ));
    }

    let result = sqlx::query(
        "UPDATE mentions SET sentiment_score = ?, scored_by = ?, scored_at = ? WHERE id = ?",
    )
    .bind(score)
    .bind(scorer)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
