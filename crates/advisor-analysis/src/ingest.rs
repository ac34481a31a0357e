//! Writes collected mention candidates through the mention store.

use std::collections::HashMap;

use advisor_core::RawMention;
use advisor_db::{ensure_stock, mention_exists, record_mention, DbError, NewMention};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::AnalysisError;

/// Per-run tallies from [`ingest_mentions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub inserted: usize,
    pub duplicates: usize,
    pub invalid: usize,
}

impl IngestStats {
    #[must_use]
    pub fn total(&self) -> usize {
        self.inserted + self.duplicates + self.invalid
    }
}

/// Store each candidate, creating its stock on first reference.
///
/// Candidates whose `(source, external_id)` is already stored are counted as
/// duplicates. Candidates with an invalid symbol or blank content are logged,
/// counted, and skipped.
///
/// # Errors
///
/// Returns [`AnalysisError::Store`] on the first store failure; candidates
/// before it stay written.
pub async fn ingest_mentions(
    pool: &SqlitePool,
    mentions: &[RawMention],
) -> Result<IngestStats, AnalysisError> {
    let mut stats = IngestStats::default();
    let mut stock_ids: HashMap<&str, i64> = HashMap::new();

    for raw in mentions {
        let stock_id = if let Some(&id) = stock_ids.get(raw.symbol.as_str()) {
            id
        } else {
            match ensure_stock(pool, &raw.symbol).await {
                Ok(id) => {
                    stock_ids.insert(raw.symbol.as_str(), id);
                    id
                }
                Err(e) if e.is_rejection() => {
                    reject(&mut stats, raw, &e);
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        };

        let external_id = raw
            .external_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty());

        if let Some(id) = external_id {
            if mention_exists(pool, &raw.source, id).await? {
                stats.duplicates += 1;
                continue;
            }
        }

        let mention = NewMention {
            url: raw.url.as_deref(),
            external_id,
            metadata: raw.metadata.as_ref(),
            ..NewMention::new(stock_id, &raw.source, &raw.content)
        };

        match record_mention(pool, &mention).await {
            Ok(outcome) if outcome.inserted => stats.inserted += 1,
            Ok(_) => stats.duplicates += 1,
            Err(e) if e.is_rejection() => reject(&mut stats, raw, &e),
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(
        inserted = stats.inserted,
        duplicates = stats.duplicates,
        invalid = stats.invalid,
        "ingested mentions"
    );

    Ok(stats)
}

fn reject(stats: &mut IngestStats, raw: &RawMention, error: &DbError) {
    tracing::warn!(
        symbol = %raw.symbol,
        source = %raw.source,
        error = %error,
        "skipping invalid mention"
    );
    stats.invalid += 1;
}
