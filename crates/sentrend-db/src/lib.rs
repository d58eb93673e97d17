//! Postgres persistence for stakeholder sentiment trends.
//!
//! The write side is [`ArticleWriter`], which runs the trend maintenance hook
//! inside the caller's transaction. The read side is a set of stateless query
//! functions over either the `sentiment_trends` aggregate store or the raw
//! `news_articles` table.

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

// Path relative to crates/sentrend-db/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &sentrend_core::AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("record not found")]
    NotFound,
    #[error("invalid partition period {year}-{month:02}")]
    InvalidPartitionPeriod { year: i32, month: u32 },
    #[error("unknown partitioned table: {0}")]
    UnknownPartitionedTable(String),
    #[error(transparent)]
    Core(#[from] sentrend_core::CoreError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Connect to a Postgres pool using explicit URL and config.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the connection cannot be established.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(database_url)
        .await
}

/// Run all pending migrations against the pool.
///
/// Returns the number of migrations that were applied.
///
/// # Errors
///
/// Returns [`sqlx::migrate::MigrateError`] if any migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, sqlx::migrate::MigrateError> {
    // The _sqlx_migrations table does not exist on a fresh database; treat
    // absence as zero applied.
    let applied_before: i64 =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = true")
            .fetch_one(pool)
            .await
            .unwrap_or(0);

    MIGRATOR.run(pool).await?;

    let applied_after: i64 =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = true")
            .fetch_one(pool)
            .await
            .unwrap_or(0);

    let delta = (applied_after - applied_before).max(0);
    Ok(usize::try_from(delta).unwrap_or(0))
}

/// Send a `SELECT 1` to verify the pool has a live connection.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}


pub mod articles;
pub mod companies;
pub mod distribution;
pub mod keywords;
pub mod partitions;
pub mod summaries;
pub mod trend_buckets;
pub mod trend_maintenance;
pub mod trend_query;

pub use articles::{get_article, ArticleRow, ArticleWriter, Classification, NewArticle};
pub use companies::{
    get_company, insert_company, list_active_companies, set_company_active, CompanyRow,
};
pub use distribution::{sentiment_distribution, CategoryCount, SentimentDistribution};
pub use keywords::{keyword_frequency, KeywordFrequencyRow, DEFAULT_KEYWORD_LIMIT};
pub use partitions::{
    ensure_monthly_partition, ensure_partitions_ahead, list_partitions, MonthlyPartition,
    PartitionOutcome, PartitionRow, PartitionedTable,
};
pub use summaries::{
    company_sentiment_summary, stakeholder_sentiment_summary, CompanySummaryRow,
    StakeholderSummaryRow,
};
pub use trend_buckets::{
    aggregate_trend_buckets, get_trend_bucket, list_trend_buckets, TrendBucketFilters,
    TrendBucketRow,
};
pub use trend_maintenance::{BucketKey, RebuildSummary, TrendMaintainer};
pub use trend_query::{sentiment_trend, TrendPointRow};
