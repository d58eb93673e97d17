//! Read-only report handlers: keywords, rolling summaries and distribution.

use chrono::{Duration, NaiveDate, Utc};
use clap::Subcommand;
use rust_decimal::Decimal;

use crate::{as_of_or_today, fmt_date};

/// Sub-commands available under `summary`.
#[derive(Debug, Subcommand)]
pub enum SummaryCommands {
    /// 7-day and 30-day sentiment per active company
    Companies {
        /// Anchor date of the rolling windows; defaults to today (UTC)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// 90-day five-class breakdown per company and stakeholder
    Stakeholders {
        /// Anchor date of the rolling window; defaults to today (UTC)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
}

/// Format an optional mean for display, returning `"-"` when `None`.
fn fmt_avg(avg: Option<Decimal>) -> String {
    avg.map_or_else(|| "-".to_string(), |a| a.to_string())
}

/// Truncate a display name to `width` characters.
fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() > width {
        format!(
            "{}...",
            name.chars().take(width.saturating_sub(3)).collect::<String>()
        )
    } else {
        name.to_string()
    }
}

/// Print the most mentioned keywords for a company.
///
/// # Errors
///
/// Returns an error if the range is inverted or the database query fails.
pub(crate) async fn run_keywords(
    pool: &sqlx::PgPool,
    company: i64,
    start: NaiveDate,
    end: NaiveDate,
    limit: i64,
) -> anyhow::Result<()> {
    if start > end {
        anyhow::bail!("--start {start} is after --end {end}");
    }

    let keywords = sentrend_db::keyword_frequency(pool, company, start, end, Some(limit)).await?;

    if keywords.is_empty() {
        println!(
            "no keyword mentioned at least twice for company {company} \
             between {start} and {end}"
        );
        return Ok(());
    }

    println!("{:<30}{:>10}{:>10}", "KEYWORD", "MENTIONS", "AVG");
    for k in &keywords {
        println!(
            "{:<30}{:>10}{:>10}",
            truncate(&k.keyword, 30),
            k.frequency,
            k.avg_sentiment
        );
    }

    Ok(())
}

pub(crate) async fn run_summary(
    pool: &sqlx::PgPool,
    command: SummaryCommands,
) -> anyhow::Result<()> {
    match command {
        SummaryCommands::Companies { as_of } => {
            run_company_summary(pool, as_of_or_today(as_of)).await
        }
        SummaryCommands::Stakeholders { as_of } => {
            run_stakeholder_summary(pool, as_of_or_today(as_of)).await
        }
    }
}

async fn run_company_summary(pool: &sqlx::PgPool, as_of: NaiveDate) -> anyhow::Result<()> {
    let rows = sentrend_db::company_sentiment_summary(pool, as_of).await?;

    if rows.is_empty() {
        println!("no active companies");
        return Ok(());
    }

    println!("as of {as_of}");
    println!(
        "{:<25}{:>8}{:>8}{:>8}{:>8}{:>8}  LATEST",
        "COMPANY", "TOTAL", "7D", "AVG 7D", "30D", "AVG 30D"
    );
    for row in &rows {
        println!(
            "{:<25}{:>8}{:>8}{:>8}{:>8}{:>8}  {}",
            truncate(&row.company_name, 25),
            row.total_articles,
            row.articles_7d,
            fmt_avg(row.avg_sentiment_7d),
            row.articles_30d,
            fmt_avg(row.avg_sentiment_30d),
            fmt_date(row.latest_published_date)
        );
    }

    Ok(())
}

async fn run_stakeholder_summary(pool: &sqlx::PgPool, as_of: NaiveDate) -> anyhow::Result<()> {
    let rows = sentrend_db::stakeholder_sentiment_summary(pool, as_of).await?;

    if rows.is_empty() {
        println!("no classified articles in the 90 days up to {as_of}");
        return Ok(());
    }

    println!(
        "{:<25}{:<12}{:>7}{:>6}{:>6}{:>6}{:>6}{:>6}{:>8}",
        "COMPANY", "STAKEHOLDER", "TOTAL", "++", "+", "0", "-", "--", "AVG"
    );
    for row in &rows {
        println!(
            "{:<25}{:<12}{:>7}{:>6}{:>6}{:>6}{:>6}{:>6}{:>8}",
            truncate(&row.company_name, 25),
            row.stakeholder_type,
            row.total_articles,
            row.very_positive_count,
            row.positive_count,
            row.neutral_count,
            row.negative_count,
            row.very_negative_count,
            row.avg_sentiment
        );
    }

    Ok(())
}

/// Print label and stakeholder counts for the last `days` days.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_distribution(
    pool: &sqlx::PgPool,
    company: Option<i64>,
    days: u32,
) -> anyhow::Result<()> {
    let since = Utc::now().date_naive() - Duration::days(i64::from(days));
    let dist = sentrend_db::sentiment_distribution(pool, company, since).await?;

    println!(
        "{} classified article(s) since {since}, mean confidence {}",
        dist.total_articles, dist.avg_confidence
    );
    if dist.total_articles == 0 {
        return Ok(());
    }

    println!();
    println!("{:<16}{:>8}", "LABEL", "COUNT");
    for c in &dist.by_label {
        println!("{:<16}{:>8}", truncate(&c.category, 16), c.count);
    }

    println!();
    println!("{:<16}{:>8}", "STAKEHOLDER", "COUNT");
    for c in &dist.by_stakeholder {
        println!("{:<16}{:>8}", c.category, c.count);
    }

    Ok(())
}
