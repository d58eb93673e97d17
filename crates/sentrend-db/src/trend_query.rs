//! Daily sentiment trend computed directly from `news_articles`.
//!
//! This path ignores `sentiment_trends` entirely. For any company,
//! stakeholder and range it must agree with
//! [`crate::aggregate_trend_buckets`], which reads only the stored buckets.

use std::sync::LazyLock;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sentrend_core::{label_value_sql, Stakeholder};
use sqlx::PgPool;

use crate::DbError;

static SENTIMENT_TREND_SQL: LazyLock<String> = LazyLock::new(|| {
    let value = label_value_sql("sentiment_label");
    format!(
        "SELECT \
             published_date AS date, \
             ROUND(AVG({value}), 2) AS avg_sentiment, \
             COUNT(*) AS article_count, \
             ROUND(COUNT(*) FILTER (WHERE {value} > 0) * 100.0 / COUNT(*), 2) \
                 AS positive_ratio \
         FROM news_articles \
         WHERE company_id = $1 \
           AND ($2::TEXT IS NULL OR stakeholder_type = $2) \
           AND published_date BETWEEN $3 AND $4 \
           AND sentiment_label IS NOT NULL \
         GROUP BY published_date \
         ORDER BY published_date"
    )
});

/// One day of a sentiment trend.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TrendPointRow {
    pub date: NaiveDate,
    /// Mean mapped sentiment, rounded to 2 decimals.
    pub avg_sentiment: Decimal,
    pub article_count: i64,
    /// Percentage of articles with a positive mapped value, rounded to 2 decimals.
    pub positive_ratio: Decimal,
}

/// Per-day sentiment for a company over an inclusive date range.
///
/// `stakeholder = None` applies no stakeholder filter, so labeled articles
/// still waiting for a stakeholder are included. Days without labeled
/// articles are omitted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn sentiment_trend(
    pool: &PgPool,
    company_id: i64,
    stakeholder: Option<Stakeholder>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<TrendPointRow>, DbError> {
    let rows = sqlx::query_as::<_, TrendPointRow>(SENTIMENT_TREND_SQL.as_str())
        .bind(company_id)
        .bind(stakeholder.map(Stakeholder::as_str))
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}
