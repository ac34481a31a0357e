//! `advisor analyze`: score stored mentions and print one signal per symbol.

use advisor_analysis::{analyze_symbols, AggregateOptions, Recommendation, ReportRow, Window};
use advisor_core::AppConfig;
use advisor_sentiment::build_scorer;
use chrono::{Duration, Utc};
use sqlx::SqlitePool;

pub(crate) struct AnalyzeArgs {
    pub symbol: Option<String>,
    pub since_hours: Option<u32>,
    pub source: Option<String>,
    pub limit: Option<u32>,
    pub json: bool,
}

pub(crate) async fn run_analyze(
    pool: &SqlitePool,
    config: &AppConfig,
    args: &AnalyzeArgs,
) -> anyhow::Result<()> {
    let symbols = match &args.symbol {
        Some(symbol) => vec![symbol.clone()],
        None => advisor_db::list_stocks(pool)
            .await?
            .into_iter()
            .map(|s| s.symbol)
            .collect(),
    };
    if symbols.is_empty() {
        println!("no tracked stocks; run `advisor collect` first");
        return Ok(());
    }

    let window = Window {
        since: args
            .since_hours
            .map(|hours| Utc::now() - Duration::hours(i64::from(hours))),
        source: args.source.clone(),
        limit: args.limit.map(i64::from),
    };
    let scorer = build_scorer(config)?;
    tracing::info!(
        symbols = symbols.len(),
        scorer = scorer.name(),
        "analyzing symbols"
    );

    let recommendations = analyze_symbols(
        pool,
        scorer.as_ref(),
        &symbols,
        &window,
        AggregateOptions::from_app_config(config),
        &config.thresholds,
    )
    .await?;

    if args.json {
        let rows: Vec<ReportRow> = recommendations.iter().map(ReportRow::from).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!(
            "{:<8} {:<6} {:>8} {:>9}  RATIONALE",
            "SYMBOL", "ACTION", "SCORE", "MENTIONS"
        );
        for rec in &recommendations {
            println!("{}", format_row(rec));
        }
    }

    Ok(())
}

fn format_score(score: Option<f64>) -> String {
    score.map_or_else(|| "n/a".to_string(), |s| format!("{s:+.3}"))
}

fn format_row(rec: &Recommendation) -> String {
    format!(
        "{:<8} {:<6} {:>8} {:>9}  {}",
        rec.symbol,
        rec.action.to_string(),
        format_score(rec.score),
        rec.mention_count,
        rec.rationale
    )
}
