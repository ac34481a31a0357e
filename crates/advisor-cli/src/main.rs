mod analyze;
mod collect;
mod summary;

use advisor_core::AppConfig;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "advisor")]
#[command(about = "Stock chatter sentiment advisor")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Collect mentions from the configured sources and store them
    Collect {
        /// Restrict collection to one source
        #[arg(long, value_enum)]
        source: Option<SourceArg>,

        /// Fetch and summarize mentions without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Score stored mentions and print a BUY/SELL/HOLD signal per symbol
    Analyze {
        /// Analyze a single symbol (default: every tracked stock)
        #[arg(long)]
        symbol: Option<String>,

        /// Only consider mentions collected in the last N hours
        #[arg(long)]
        since_hours: Option<u32>,

        /// Only consider mentions from this source tag (e.g. reddit, google_news)
        #[arg(long)]
        source: Option<String>,

        /// Only consider the newest N mentions per symbol
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        limit: Option<u32>,

        /// Print report records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show tracked stocks, mention counts and the latest mentions
    Summary {
        /// Number of recent mentions to list
        #[arg(long, default_value_t = 5)]
        recent: u32,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Apply pending migrations
    Migrate,
    /// Check database connectivity
    Ping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SourceArg {
    Reddit,
    News,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = advisor_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Db { command } => {
            let pool = connect(&config).await?;
            match command {
                DbCommands::Migrate => {
                    let applied = advisor_db::run_migrations(&pool).await?;
                    println!("applied {applied} migration(s)");
                }
                DbCommands::Ping => {
                    advisor_db::ping(&pool).await?;
                    println!("database ok ({})", config.database_url);
                }
            }
        }
        Commands::Collect { source, dry_run } => {
            collect::run_collect(&config, source, dry_run).await?;
        }
        Commands::Analyze {
            symbol,
            since_hours,
            source,
            limit,
            json,
        } => {
            let pool = connect_migrated(&config).await?;
            let args = analyze::AnalyzeArgs {
                symbol,
                since_hours,
                source,
                limit,
                json,
            };
            analyze::run_analyze(&pool, &config, &args).await?;
        }
        Commands::Summary { recent } => {
            let pool = connect_migrated(&config).await?;
            summary::run_summary(&pool, recent).await?;
        }
    }

    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::SqlitePool> {
    let pool_config = advisor_db::PoolConfig::from_app_config(config);
    let pool = advisor_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}

/// Connect and bring the schema up to date.
pub(crate) async fn connect_migrated(config: &AppConfig) -> anyhow::Result<sqlx::SqlitePool> {
    let pool = connect(config).await?;
    let applied = advisor_db::run_migrations(&pool).await?;
    if applied > 0 {
        tracing::info!(applied, "applied pending migrations");
    }
    Ok(pool)
}

#[cfg(test)]
mod tests;
