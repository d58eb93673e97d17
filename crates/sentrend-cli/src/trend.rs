//! Trend command handlers: the two daily trend read paths and bucket
//! maintenance.

use chrono::NaiveDate;
use clap::Subcommand;
use sentrend_core::{AppConfig, Stakeholder};
use sentrend_db::{TrendBucketFilters, TrendMaintainer, TrendPointRow};

/// Sub-commands available under `trend`.
#[derive(Debug, Subcommand)]
pub enum TrendCommands {
    /// Per-day sentiment for one company
    Show {
        /// Company id
        #[arg(long)]
        company: i64,
        /// Restrict to one stakeholder (e.g. customer)
        #[arg(long)]
        stakeholder: Option<Stakeholder>,
        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// Last day of the range, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
        /// Read from stored trend buckets instead of recomputing from articles
        #[arg(long)]
        from_buckets: bool,
    },
    /// List stored trend buckets
    Buckets {
        /// Restrict to one company id
        #[arg(long)]
        company: Option<i64>,
        /// Restrict to one stakeholder
        #[arg(long)]
        stakeholder: Option<Stakeholder>,
        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// Last day of the range, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
    },
    /// Recompute stored buckets from articles and drop orphaned ones
    Rebuild {
        /// Restrict to one company id
        #[arg(long)]
        company: Option<i64>,
    },
}

pub(crate) async fn run(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    command: TrendCommands,
) -> anyhow::Result<()> {
    match command {
        TrendCommands::Show {
            company,
            stakeholder,
            start,
            end,
            from_buckets,
        } => run_trend_show(pool, company, stakeholder, start, end, from_buckets).await,
        TrendCommands::Buckets {
            company,
            stakeholder,
            start,
            end,
        } => {
            run_trend_buckets(
                pool,
                TrendBucketFilters {
                    company_id: company,
                    stakeholder,
                    start,
                    end,
                },
            )
            .await
        }
        TrendCommands::Rebuild { company } => {
            let summary = TrendMaintainer::new(config.bucket_lock)
                .rebuild(pool, company)
                .await?;
            println!(
                "recomputed {} bucket(s), removed {} orphaned bucket(s)",
                summary.recomputed, summary.removed
            );
            Ok(())
        }
    }
}

async fn run_trend_show(
    pool: &sqlx::PgPool,
    company: i64,
    stakeholder: Option<Stakeholder>,
    start: NaiveDate,
    end: NaiveDate,
    from_buckets: bool,
) -> anyhow::Result<()> {
    if start > end {
        anyhow::bail!("--start {start} is after --end {end}");
    }

    let points = if from_buckets {
        sentrend_db::aggregate_trend_buckets(pool, company, stakeholder, start, end).await?
    } else {
        sentrend_db::sentiment_trend(pool, company, stakeholder, start, end).await?
    };

    if points.is_empty() {
        println!("no classified articles for company {company} between {start} and {end}");
        return Ok(());
    }

    print_trend(&points);
    Ok(())
}

fn print_trend(points: &[TrendPointRow]) {
    println!("{:<12}{:>10}{:>10}{:>12}", "DATE", "ARTICLES", "AVG", "POSITIVE%");
    for point in points {
        println!(
            "{:<12}{:>10}{:>10}{:>12}",
            point.date.to_string(),
            point.article_count,
            point.avg_sentiment,
            point.positive_ratio
        );
    }
}

async fn run_trend_buckets(
    pool: &sqlx::PgPool,
    filters: TrendBucketFilters,
) -> anyhow::Result<()> {
    let buckets = sentrend_db::list_trend_buckets(pool, filters).await?;

    if buckets.is_empty() {
        println!("no trend buckets found; run `trend rebuild` if articles exist");
        return Ok(());
    }

    println!(
        "{:<12}{:<9}{:<12}{:>7}{:>6}{:>6}{:>6}{:>9}{:>9}",
        "DATE", "COMPANY", "STAKEHOLDER", "TOTAL", "POS", "NEG", "NEU", "AVG", "STDDEV"
    );
    for b in &buckets {
        println!(
            "{:<12}{:<9}{:<12}{:>7}{:>6}{:>6}{:>6}{:>9.2}{:>9.2}",
            b.date.to_string(),
            b.company_id,
            b.stakeholder_type,
            b.total_articles,
            b.positive_count,
            b.negative_count,
            b.neutral_count,
            b.avg_sentiment_score,
            b.sentiment_volatility
        );
    }

    Ok(())
}
