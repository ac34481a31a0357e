//! `advisor collect`: fetch mentions from every configured source and store them.

use std::collections::BTreeMap;

use advisor_core::{load_watchlist, AppConfig, RawMention};
use advisor_sentiment::{build_adapters, collect_mentions, SourceSelection};

use crate::SourceArg;

pub(crate) async fn run_collect(
    config: &AppConfig,
    source: Option<SourceArg>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let watchlist = load_watchlist(&config.watchlist_path)?;
    let selection = match source {
        None => SourceSelection::All,
        Some(SourceArg::Reddit) => SourceSelection::Reddit,
        Some(SourceArg::News) => SourceSelection::News,
    };
    let adapters = build_adapters(config, &watchlist, selection)?;

    let outcome = collect_mentions(&adapters).await;
    for source in &outcome.failed_sources {
        tracing::warn!(source = *source, "source failed; its mentions are missing from this run");
    }
    if outcome.failed_sources.len() == adapters.len() {
        anyhow::bail!(
            "every selected source failed: {}",
            outcome.failed_sources.join(", ")
        );
    }

    if dry_run {
        println!(
            "dry-run: would ingest {} mention(s) from {} source(s)",
            outcome.mentions.len(),
            adapters.len() - outcome.failed_sources.len()
        );
        for ((source, symbol), count) in tally(&outcome.mentions) {
            println!("  {source:<14} {symbol:<8} {count}");
        }
        return Ok(());
    }

    let pool = crate::connect_migrated(config).await?;
    let stats = advisor_analysis::ingest_mentions(&pool, &outcome.mentions).await?;

    println!(
        "collected {} mention(s): {} new, {} duplicate, {} invalid",
        stats.total(),
        stats.inserted,
        stats.duplicates,
        stats.invalid
    );
    if !outcome.failed_sources.is_empty() {
        println!("failed sources: {}", outcome.failed_sources.join(", "));
    }

    Ok(())
}

/// Mention counts keyed by `(source, symbol)`, sorted.
fn tally(mentions: &[RawMention]) -> BTreeMap<(&str, &str), usize> {
    let mut counts = BTreeMap::new();
    for m in mentions {
        *counts
            .entry((m.source.as_str(), m.symbol.as_str()))
            .or_insert(0) += 1;
    }
    counts
}
