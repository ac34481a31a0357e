//! `advisor summary`: tracked stocks, mention counts, and the latest mentions.

use std::collections::HashMap;

use advisor_db::{list_stock_mention_counts, query_mentions, MentionFilter};
use sqlx::SqlitePool;

const SNIPPET_CHARS: usize = 72;

pub(crate) async fn run_summary(pool: &SqlitePool, recent: u32) -> anyhow::Result<()> {
    let counts = list_stock_mention_counts(pool).await?;
    if counts.is_empty() {
        println!("no stocks tracked yet; run `advisor collect` first");
        return Ok(());
    }

    println!("{:<8} {:>9}", "SYMBOL", "MENTIONS");
    for row in &counts {
        println!("{:<8} {:>9}", row.symbol, row.mention_count);
    }
    let total: i64 = counts.iter().map(|r| r.mention_count).sum();
    println!("{} stock(s), {total} mention(s)", counts.len());

    if recent == 0 {
        return Ok(());
    }

    let symbols: HashMap<i64, &str> = counts
        .iter()
        .map(|r| (r.id, r.symbol.as_str()))
        .collect();
    let latest = query_mentions(
        pool,
        &MentionFilter {
            limit: Some(i64::from(recent)),
            ..MentionFilter::default()
        },
    )
    .await?;

    println!();
    println!("latest mentions:");
    for m in &latest {
        println!(
            "  {}  {:<6} {:<12} {}",
            m.collected_at.format("%Y-%m-%d %H:%M"),
            symbols.get(&m.stock_id).copied().unwrap_or("?"),
            m.source,
            snippet(&m.content, SNIPPET_CHARS)
        );
    }

    Ok(())
}

/// First line of `content`, cut to `max` characters.
fn snippet(content: &str, max: usize) -> String {
    let line = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let line = line.trim();
    if line.chars().count() <= max {
        line.to_string()
    } else {
        let cut: String = line.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
