//! Live integration tests for advisor-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated SQLite database from the sqlx test
//! harness. The `migrations` path is relative to the crate root
//! (`crates/advisor-db/`).

use advisor_db::{
    ensure_stock, get_stock_by_symbol, list_stock_mention_counts, list_stocks, mention_exists,
    query_mentions, record_mention, record_score, DbError, MentionFilter, NewMention,
};
use chrono::{Duration, Utc};
use serde_json::json;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn reddit_mention<'a>(stock_id: i64, content: &'a str, external_id: &'a str) -> NewMention<'a> {
    NewMention {
        external_id: Some(external_id),
        ..NewMention::new(stock_id, "reddit", content)
    }
}

// ---------------------------------------------------------------------------
// stocks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn ensure_stock_is_case_insensitive(pool: sqlx::SqlitePool) {
    let lower = ensure_stock(&pool, "aapl").await.unwrap();
    let upper = ensure_stock(&pool, "AAPL").await.unwrap();
    let cashtag = ensure_stock(&pool, "$AAPL").await.unwrap();

    assert_eq!(lower, upper);
    assert_eq!(lower, cashtag);

    let stocks = list_stocks(&pool).await.unwrap();
    assert_eq!(stocks.len(), 1);
    assert_eq!(stocks[0].symbol, "AAPL");
}

#[sqlx::test(migrations = "../../migrations")]
async fn ensure_stock_rejects_invalid_symbol(pool: sqlx::SqlitePool) {
    let err = ensure_stock(&pool, "  ").await.unwrap_err();
    assert!(matches!(err, DbError::InvalidSymbol(_)), "got: {err:?}");
    assert!(list_stocks(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_stock_by_symbol_does_not_create(pool: sqlx::SqlitePool) {
    assert!(get_stock_by_symbol(&pool, "MSFT").await.unwrap().is_none());
    assert!(list_stocks(&pool).await.unwrap().is_empty());

    let id = ensure_stock(&pool, "MSFT").await.unwrap();
    let row = get_stock_by_symbol(&pool, "msft").await.unwrap().unwrap();
    assert_eq!(row.id, id);
    assert_eq!(row.symbol, "MSFT");
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_stocks_is_ordered_by_symbol(pool: sqlx::SqlitePool) {
    for symbol in ["TSLA", "AAPL", "GOOG"] {
        ensure_stock(&pool, symbol).await.unwrap();
    }

    let symbols: Vec<String> = list_stocks(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.symbol)
        .collect();
    assert_eq!(symbols, vec!["AAPL", "GOOG", "TSLA"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn mention_counts_include_stocks_without_mentions(pool: sqlx::SqlitePool) {
    let aapl = ensure_stock(&pool, "AAPL").await.unwrap();
    ensure_stock(&pool, "TSLA").await.unwrap();

    record_mention(&pool, &reddit_mention(aapl, "AAPL to the moon", "r1"))
        .await
        .unwrap();
    record_mention(&pool, &reddit_mention(aapl, "AAPL looks weak", "r2"))
        .await
        .unwrap();

    let counts = list_stock_mention_counts(&pool).await.unwrap();
    assert_eq!(counts.len(), 2);
    assert_eq!(counts[0].symbol, "AAPL");
    assert_eq!(counts[0].mention_count, 2);
    assert_eq!(counts[1].symbol, "TSLA");
    assert_eq!(counts[1].mention_count, 0);
}

// ---------------------------------------------------------------------------
// mentions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn record_mention_is_idempotent_on_external_id(pool: sqlx::SqlitePool) {
    let stock_id = ensure_stock(&pool, "AAPL").await.unwrap();
    let mention = reddit_mention(stock_id, "Bullish on AAPL", "abc123");

    let first = record_mention(&pool, &mention).await.unwrap();
    let second = record_mention(&pool, &mention).await.unwrap();

    assert!(first.inserted);
    assert!(!second.inserted);
    assert_eq!(first.id, second.id);

    let rows = query_mentions(&pool, &MentionFilter::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(mention_exists(&pool, "reddit", "abc123").await.unwrap());
}

#[sqlx::test(migrations = "../../migrations")]
async fn same_external_id_from_another_source_is_distinct(pool: sqlx::SqlitePool) {
    let stock_id = ensure_stock(&pool, "AAPL").await.unwrap();

    let reddit = record_mention(&pool, &reddit_mention(stock_id, "AAPL up", "shared"))
        .await
        .unwrap();
    let news = record_mention(
        &pool,
        &NewMention {
            external_id: Some("shared"),
            ..NewMention::new(stock_id, "google_news", "AAPL beats estimates")
        },
    )
    .await
    .unwrap();

    assert!(reddit.inserted);
    assert!(news.inserted);
    assert_ne!(reddit.id, news.id);
    assert!(!mention_exists(&pool, "twitter", "shared").await.unwrap());
}

#[sqlx::test(migrations = "../../migrations")]
async fn mentions_without_external_id_always_insert(pool: sqlx::SqlitePool) {
    let stock_id = ensure_stock(&pool, "TSLA").await.unwrap();
    let mention = NewMention::new(stock_id, "manual", "TSLA earnings call tonight");

    let first = record_mention(&pool, &mention).await.unwrap();
    let second = record_mention(&pool, &mention).await.unwrap();
    let blank = record_mention(
        &pool,
        &NewMention {
            external_id: Some("   "),
            ..mention.clone()
        },
    )
    .await
    .unwrap();

    assert!(first.inserted && second.inserted && blank.inserted);
    assert_ne!(first.id, second.id);

    let stored = query_mentions(&pool, &MentionFilter::default())
        .await
        .unwrap();
    assert_eq!(stored.len(), 3);
    assert!(stored.iter().all(|m| m.external_id.is_none()));
}

#[sqlx::test(migrations = "../../migrations")]
async fn blank_content_is_rejected_without_writing(pool: sqlx::SqlitePool) {
    let stock_id = ensure_stock(&pool, "AAPL").await.unwrap();

    let err = record_mention(&pool, &reddit_mention(stock_id, " \n\t", "blank"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::InvalidMention(_)), "got: {err:?}");
    assert!(err.is_rejection());

    let err = record_mention(&pool, &NewMention::new(stock_id, "", "AAPL"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::InvalidMention(_)), "got: {err:?}");

    assert!(!mention_exists(&pool, "reddit", "blank").await.unwrap());
}

#[sqlx::test(migrations = "../../migrations")]
async fn unknown_stock_id_is_a_store_error(pool: sqlx::SqlitePool) {
    let err = record_mention(&pool, &reddit_mention(9_999, "orphan", "orphan-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Sqlx(_)), "got: {err:?}");
    assert!(!err.is_rejection());
}

#[sqlx::test(migrations = "../../migrations")]
async fn metadata_and_url_round_trip(pool: sqlx::SqlitePool) {
    let stock_id = ensure_stock(&pool, "GOOG").await.unwrap();
    let metadata = json!({"type": "post", "subreddit": "stocks", "upvotes": 42});

    record_mention(
        &pool,
        &NewMention {
            url: Some("https://reddit.com/r/stocks/abc"),
            metadata: Some(&metadata),
            ..reddit_mention(stock_id, "GOOG is cheap", "meta-1")
        },
    )
    .await
    .unwrap();

    let rows = query_mentions(&pool, &MentionFilter::default())
        .await
        .unwrap();
    let row = &rows[0];
    assert_eq!(row.url.as_deref(), Some("https://reddit.com/r/stocks/abc"));
    assert_eq!(row.metadata.as_ref().map(|m| &m.0), Some(&metadata));
}

#[sqlx::test(migrations = "../../migrations")]
async fn query_filters_combine_and_order_newest_first(pool: sqlx::SqlitePool) {
    let aapl = ensure_stock(&pool, "AAPL").await.unwrap();
    let tsla = ensure_stock(&pool, "TSLA").await.unwrap();
    let now = Utc::now();

    let fixtures = [
        (aapl, "reddit", "old aapl", "a-old", now - Duration::hours(48)),
        (aapl, "reddit", "new aapl", "a-new", now - Duration::hours(1)),
        (aapl, "google_news", "aapl news", "a-news", now - Duration::hours(2)),
        (tsla, "reddit", "tsla post", "t-new", now - Duration::minutes(30)),
    ];
    for (stock_id, source, content, external_id, collected_at) in fixtures {
        record_mention(
            &pool,
            &NewMention {
                external_id: Some(external_id),
                collected_at,
                ..NewMention::new(stock_id, source, content)
            },
        )
        .await
        .unwrap();
    }

    let all_aapl = query_mentions(
        &pool,
        &MentionFilter {
            stock_id: Some(aapl),
            ..MentionFilter::default()
        },
    )
    .await
    .unwrap();
    let contents: Vec<&str> = all_aapl.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["new aapl", "aapl news", "old aapl"]);

    let recent_reddit_aapl = query_mentions(
        &pool,
        &MentionFilter {
            stock_id: Some(aapl),
            source: Some("reddit".to_string()),
            since: Some(now - Duration::hours(24)),
            limit: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(recent_reddit_aapl.len(), 1);
    assert_eq!(recent_reddit_aapl[0].content, "new aapl");

    let newest_overall = query_mentions(
        &pool,
        &MentionFilter {
            limit: Some(2),
            ..MentionFilter::default()
        },
    )
    .await
    .unwrap();
    let contents: Vec<&str> = newest_overall.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["tsla post", "new aapl"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn concurrent_duplicate_inserts_store_one_row(pool: sqlx::SqlitePool) {
    let stock_id = ensure_stock(&pool, "AAPL").await.unwrap();

    let attempts = (0..8).map(|_| {
        let pool = pool.clone();
        async move {
            record_mention(&pool, &reddit_mention(stock_id, "race", "race-1"))
                .await
                .unwrap()
        }
    });
    let outcomes = futures::future::join_all(attempts).await;

    let winners = outcomes.iter().filter(|o| o.inserted).count();
    assert_eq!(winners, 1);
    assert!(outcomes.iter().all(|o| o.id == outcomes[0].id));

    let rows = query_mentions(&pool, &MentionFilter::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

// ---------------------------------------------------------------------------
// cached scores
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn new_mentions_have_no_cached_score(pool: sqlx::SqlitePool) {
    let stock_id = ensure_stock(&pool, "AAPL").await.unwrap();
    record_mention(&pool, &reddit_mention(stock_id, "AAPL calls", "c1"))
        .await
        .unwrap();

    let rows = query_mentions(&pool, &MentionFilter::default()).await.unwrap();
    assert_eq!(rows[0].sentiment_score, None);
    assert_eq!(rows[0].scored_by, None);
    assert_eq!(rows[0].cached_score("lexicon"), None);
}

#[sqlx::test(migrations = "../../migrations")]
async fn recorded_score_is_keyed_by_scorer(pool: sqlx::SqlitePool) {
    let stock_id = ensure_stock(&pool, "AAPL").await.unwrap();
    let id = record_mention(&pool, &reddit_mention(stock_id, "AAPL calls", "c1"))
        .await
        .unwrap()
        .id;

    assert!(record_score(&pool, id, 0.6, "lexicon").await.unwrap());
    let row = &query_mentions(&pool, &MentionFilter::default()).await.unwrap()[0];
    assert_eq!(row.cached_score("lexicon"), Some(0.6));
    assert_eq!(row.cached_score("llm:gpt-4o-mini"), None);

    // A later scorer overwrites the cache.
    assert!(record_score(&pool, id, -0.2, "llm:gpt-4o-mini").await.unwrap());
    let row = &query_mentions(&pool, &MentionFilter::default()).await.unwrap()[0];
    assert_eq!(row.cached_score("lexicon"), None);
    assert_eq!(row.cached_score("llm:gpt-4o-mini"), Some(-0.2));
}

#[sqlx::test(migrations = "../../migrations")]
async fn record_score_rejects_out_of_range_values(pool: sqlx::SqlitePool) {
    let stock_id = ensure_stock(&pool, "TSLA").await.unwrap();
    let id = record_mention(&pool, &reddit_mention(stock_id, "TSLA puts", "c2"))
        .await
        .unwrap()
        .id;

    for bad in [1.5, -1.01, f64::NAN] {
        let err = record_score(&pool, id, bad, "lexicon").await.unwrap_err();
        assert!(err.is_rejection(), "expected rejection for {bad}, got {err:?}");
    }
    let row = &query_mentions(&pool, &MentionFilter::default()).await.unwrap()[0];
    assert_eq!(row.sentiment_score, None);
}

#[sqlx::test(migrations = "../../migrations")]
async fn record_score_for_unknown_mention_reports_false(pool: sqlx::SqlitePool) {
    assert!(!record_score(&pool, 9_999, 0.1, "lexicon").await.unwrap());
}
