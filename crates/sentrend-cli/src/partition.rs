//! Partition command handlers.

use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use sentrend_db::{PartitionOutcome, PartitionedTable};

/// Sub-commands available under `partition`.
#[derive(Debug, Subcommand)]
pub enum PartitionCommands {
    /// Create monthly partitions that do not exist yet
    Ensure {
        /// Partitioned parent table
        #[arg(long, default_value = "news_article_archive")]
        table: PartitionedTable,
        /// Any day in the first month to ensure; defaults to today (UTC)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Number of consecutive months to ensure
        #[arg(long, default_value = "3")]
        months: u32,
    },
    /// List existing partitions
    List {
        /// Partitioned parent table
        #[arg(long, default_value = "news_article_archive")]
        table: PartitionedTable,
    },
}

pub(crate) async fn run(pool: &sqlx::PgPool, command: PartitionCommands) -> anyhow::Result<()> {
    match command {
        PartitionCommands::Ensure {
            table,
            from,
            months,
        } => {
            let from = from.unwrap_or_else(|| Utc::now().date_naive());
            let results = sentrend_db::ensure_partitions_ahead(pool, table, from, months).await?;
            for (partition, outcome) in &results {
                let status = match outcome {
                    PartitionOutcome::Created => "created",
                    PartitionOutcome::AlreadyExists => "exists",
                };
                println!("{:<40}{}", partition.name(), status);
            }
            Ok(())
        }
        PartitionCommands::List { table } => {
            let partitions = sentrend_db::list_partitions(pool, table).await?;
            if partitions.is_empty() {
                println!("no partitions of {table}; run `partition ensure` first");
                return Ok(());
            }
            println!("{:<40}BOUNDS", "PARTITION");
            for p in &partitions {
                println!("{:<40}{}", p.name, p.bounds);
            }
            Ok(())
        }
    }
}
