//! Reads against the `sentiment_trends` aggregate store.
//!
//! Rows are written only by [`crate::TrendMaintainer`]. The functions here
//! never recompute from articles; [`aggregate_trend_buckets`] rolls stored
//! bucket rows up per day so the result can be compared against the
//! article-level trend query.

use chrono::{DateTime, NaiveDate, Utc};
use sentrend_core::Stakeholder;
use serde_json::Value;
use sqlx::PgPool;

use crate::trend_query::TrendPointRow;
use crate::DbError;

pub(crate) const TREND_BUCKET_COLUMNS: &str = "id, company_id, stakeholder_type, date, \
     total_articles, positive_count, negative_count, neutral_count, avg_sentiment_score, \
     sentiment_volatility, top_keywords, updated_at";

/// A row from the `sentiment_trends` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrendBucketRow {
    pub id: i64,
    pub company_id: i64,
    pub stakeholder_type: String,
    pub date: NaiveDate,
    pub total_articles: i32,
    pub positive_count: i32,
    pub negative_count: i32,
    pub neutral_count: i32,
    pub avg_sentiment_score: f64,
    pub sentiment_volatility: f64,
    /// JSON array of `{ "keyword": .., "count": .. }` objects, most frequent first.
    pub top_keywords: Value,
    pub updated_at: DateTime<Utc>,
}

/// Filters for [`list_trend_buckets`]. Dates are inclusive.
#[derive(Debug, Clone, Copy)]
pub struct TrendBucketFilters {
    pub company_id: Option<i64>,
    pub stakeholder: Option<Stakeholder>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Returns the bucket for one key, or `None` if it was never written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_trend_bucket(
    pool: &PgPool,
    company_id: i64,
    stakeholder: Stakeholder,
    date: NaiveDate,
) -> Result<Option<TrendBucketRow>, DbError> {
    let sql = format!(
        "SELECT {TREND_BUCKET_COLUMNS} \
         FROM sentiment_trends \
         WHERE company_id = $1 AND stakeholder_type = $2 AND date = $3"
    );
    let row = sqlx::query_as::<_, TrendBucketRow>(&sql)
        .bind(company_id)
        .bind(stakeholder.as_str())
        .bind(date)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Lists bucket rows in a date range.
///
/// Results are ordered by `date DESC`, then company and stakeholder.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_trend_buckets(
    pool: &PgPool,
    filters: TrendBucketFilters,
) -> Result<Vec<TrendBucketRow>, DbError> {
    let sql = format!(
        "SELECT {TREND_BUCKET_COLUMNS} \
         FROM sentiment_trends \
         WHERE ($1::BIGINT IS NULL OR company_id = $1) \
           AND ($2::TEXT IS NULL OR stakeholder_type = $2) \
           AND date BETWEEN $3 AND $4 \
         ORDER BY date DESC, company_id, stakeholder_type"
    );
    let rows = sqlx::query_as::<_, TrendBucketRow>(&sql)
        .bind(filters.company_id)
        .bind(filters.stakeholder.map(Stakeholder::as_str))
        .bind(filters.start)
        .bind(filters.end)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Rolls stored buckets up to one point per day, in the same shape and with
/// the same rounding as [`crate::sentiment_trend`].
///
/// The daily mean is count-weighted across stakeholders. Each bucket mean
/// times its count is an integer sum of mapped values, so it is rounded back
/// to that integer before dividing to keep the result exact.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn aggregate_trend_buckets(
    pool: &PgPool,
    company_id: i64,
    stakeholder: Option<Stakeholder>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<TrendPointRow>, DbError> {
    let rows = sqlx::query_as::<_, TrendPointRow>(
        "SELECT \
             date, \
             ROUND(ROUND(SUM(avg_sentiment_score * total_articles))::NUMERIC \
                   / SUM(total_articles), 2) AS avg_sentiment, \
             SUM(total_articles)::BIGINT AS article_count, \
             ROUND(SUM(positive_count)::NUMERIC * 100 / SUM(total_articles), 2) \
                 AS positive_ratio \
         FROM sentiment_trends \
         WHERE company_id = $1 \
           AND ($2::TEXT IS NULL OR stakeholder_type = $2) \
           AND date BETWEEN $3 AND $4 \
           AND total_articles > 0 \
         GROUP BY date \
         ORDER BY date",
    )
    .bind(company_id)
    .bind(stakeholder.map(Stakeholder::as_str))
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
