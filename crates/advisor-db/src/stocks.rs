//! Database operations for the `stocks` table.

use advisor_core::normalize_symbol;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `stocks` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StockRow {
    pub id: i64,
    pub symbol: String,
    pub created_at: DateTime<Utc>,
}

/// A stock with the number of mentions stored for it.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StockMentionCount {
    pub id: i64,
    pub symbol: String,
    pub mention_count: i64,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Return the id of the stock for `symbol`, creating the row if absent.
///
/// The symbol is normalized first, so `"aapl"` and `"AAPL"` resolve to the same
/// row. Implemented as insert-or-ignore followed by a lookup: concurrent callers
/// racing on a new symbol all observe the single winning row.
///
/// # Errors
///
/// Returns [`DbError::InvalidSymbol`] if the symbol does not normalize, or
/// [`DbError::Sqlx`] if a query fails.
pub async fn ensure_stock(pool: &SqlitePool, symbol: &str) -> Result<i64, DbError> {
    let symbol =
        normalize_symbol(symbol).ok_or_else(|| DbError::InvalidSymbol(symbol.to_string()))?;

    sqlx::query(
        "INSERT INTO stocks (symbol, created_at) VALUES (?, ?) \
         ON CONFLICT (symbol) DO NOTHING",
    )
    .bind(&symbol)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM stocks WHERE symbol = ?")
        .bind(&symbol)
        .fetch_one(pool)
        .await?;

    Ok(id)
}

/// Look up a stock by symbol (normalized before the lookup).
///
/// Returns `None` when the symbol has never been mentioned or does not
/// normalize to a valid ticker.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_stock_by_symbol(
    pool: &SqlitePool,
    symbol: &str,
) -> Result<Option<StockRow>, DbError> {
    let Some(symbol) = normalize_symbol(symbol) else {
        return Ok(None);
    };

    let row = sqlx::query_as::<_, StockRow>(
        "SELECT id, symbol, created_at FROM stocks WHERE symbol = ?",
    )
    .bind(symbol)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns all stocks, ordered by symbol.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_stocks(pool: &SqlitePool) -> Result<Vec<StockRow>, DbError> {
    let rows = sqlx::query_as::<_, StockRow>(
        "SELECT id, symbol, created_at FROM stocks ORDER BY symbol",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns every stock with its stored mention count, ordered by symbol.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_stock_mention_counts(
    pool: &SqlitePool,
) -> Result<Vec<StockMentionCount>, DbError> {
    let rows = sqlx::query_as::<_, StockMentionCount>(
        "SELECT s.id, s.symbol, COUNT(m.id) AS mention_count \
         FROM stocks s \
         LEFT JOIN mentions m ON m.stock_id = s.id \
         GROUP BY s.id, s.symbol \
         ORDER BY s.symbol",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
