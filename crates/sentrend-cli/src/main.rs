mod partition;
mod report;
mod trend;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::partition::PartitionCommands;
use crate::report::SummaryCommands;
use crate::trend::TrendCommands;

#[derive(Debug, Parser)]
#[command(name = "sentrend-cli")]
#[command(about = "Stakeholder sentiment trend command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database connectivity and schema
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Daily sentiment trends and the trend bucket store
    Trend {
        #[command(subcommand)]
        command: TrendCommands,
    },
    /// Most mentioned keywords for a company
    Keywords {
        /// Company id
        #[arg(long)]
        company: i64,
        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        start: chrono::NaiveDate,
        /// Last day of the range, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end: chrono::NaiveDate,
        /// Maximum number of keywords; defaults to `SENTREND_KEYWORD_LIMIT`
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Rolling sentiment summaries
    Summary {
        #[command(subcommand)]
        command: SummaryCommands,
    },
    /// Label and stakeholder distribution of recent articles
    Distribution {
        /// Restrict to one company id
        #[arg(long)]
        company: Option<i64>,
        /// Look-back window in days, counted back from today
        #[arg(long, default_value = "30")]
        days: u32,
    },
    /// Monthly partitions of archive tables
    Partition {
        #[command(subcommand)]
        command: PartitionCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("sentrend-cli: no command given; run with --help for usage");
        return Ok(());
    };

    let config = sentrend_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = sentrend_db::PoolConfig::from_app_config(&config);
    let pool = sentrend_db::connect_pool(&config.database_url, pool_config).await?;
    tracing::debug!(env = %config.env, "connected to database");

    match command {
        Commands::Db { command } => match command {
            DbCommands::Ping => {
                sentrend_db::ping(&pool).await?;
                println!("database reachable");
            }
            DbCommands::Migrate => {
                let applied = sentrend_db::run_migrations(&pool).await?;
                println!("applied {applied} migration(s)");
            }
        },
        Commands::Trend { command } => trend::run(&pool, &config, command).await?,
        Commands::Keywords {
            company,
            start,
            end,
            limit,
        } => {
            report::run_keywords(
                &pool,
                company,
                start,
                end,
                limit.unwrap_or(config.keyword_limit),
            )
            .await?;
        }
        Commands::Summary { command } => report::run_summary(&pool, command).await?,
        Commands::Distribution { company, days } => {
            report::run_distribution(&pool, company, days).await?;
        }
        Commands::Partition { command } => partition::run(&pool, command).await?,
    }

    Ok(())
}

/// Format an optional date for display, returning `"-"` when `None`.
fn fmt_date(date: Option<chrono::NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string())
}

/// Resolve an optional `--as-of` argument to today's UTC date.
fn as_of_or_today(as_of: Option<chrono::NaiveDate>) -> chrono::NaiveDate {
    as_of.unwrap_or_else(|| chrono::Utc::now().date_naive())
}

#[cfg(test)]
mod tests;
