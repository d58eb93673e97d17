//! Rolling-window summaries computed on every read.
//!
//! Windows are anchored at an explicit `as_of` date and include it: the
//! N-day window covers `as_of - N ..= as_of`. Articles dated after `as_of`
//! only count toward all-time totals.

use std::sync::LazyLock;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sentrend_core::label_value_sql;
use sqlx::PgPool;

use crate::DbError;

const SHORT_WINDOW_DAYS: i32 = 7;
const LONG_WINDOW_DAYS: i32 = 30;
const STAKEHOLDER_WINDOW_DAYS: i32 = 90;

static COMPANY_SUMMARY_SQL: LazyLock<String> = LazyLock::new(|| {
    let value = label_value_sql("a.sentiment_label");
    let short = format!(
        "a.published_date BETWEEN $1::DATE - {SHORT_WINDOW_DAYS} AND $1::DATE"
    );
    let long = format!(
        "a.published_date BETWEEN $1::DATE - {LONG_WINDOW_DAYS} AND $1::DATE"
    );
    format!(
        "SELECT \
             c.id AS company_id, \
             c.name AS company_name, \
             COUNT(a.id) AS total_articles, \
             COUNT(a.id) FILTER (WHERE {short}) AS articles_7d, \
             ROUND(AVG({value}) FILTER ( \
                 WHERE {short} AND a.sentiment_label IS NOT NULL), 2) AS avg_sentiment_7d, \
             COUNT(a.id) FILTER (WHERE {long}) AS articles_30d, \
             ROUND(AVG({value}) FILTER ( \
                 WHERE {long} AND a.sentiment_label IS NOT NULL), 2) AS avg_sentiment_30d, \
             MAX(a.published_date) AS latest_published_date \
         FROM companies c \
         LEFT JOIN news_articles a ON a.company_id = c.id \
         WHERE c.is_active = true \
         GROUP BY c.id, c.name \
         ORDER BY c.name"
    )
});

static STAKEHOLDER_SUMMARY_SQL: LazyLock<String> = LazyLock::new(|| {
    let value = label_value_sql("a.sentiment_label");
    format!(
        "SELECT \
             a.company_id, \
             c.name AS company_name, \
             a.stakeholder_type, \
             COUNT(*) AS total_articles, \
             COUNT(*) FILTER (WHERE {value} = 2) AS very_positive_count, \
             COUNT(*) FILTER (WHERE {value} = 1) AS positive_count, \
             COUNT(*) FILTER (WHERE {value} = 0) AS neutral_count, \
             COUNT(*) FILTER (WHERE {value} = -1) AS negative_count, \
             COUNT(*) FILTER (WHERE {value} = -2) AS very_negative_count, \
             ROUND(AVG({value}), 2) AS avg_sentiment \
         FROM news_articles a \
         JOIN companies c ON c.id = a.company_id \
         WHERE a.sentiment_label IS NOT NULL \
           AND a.stakeholder_type IS NOT NULL \
           AND a.published_date BETWEEN $1::DATE - {STAKEHOLDER_WINDOW_DAYS} AND $1::DATE \
         GROUP BY a.company_id, c.name, a.stakeholder_type \
         ORDER BY c.name, a.stakeholder_type"
    )
});

/// Per-company rolling summary.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CompanySummaryRow {
    pub company_id: i64,
    pub company_name: String,
    /// All articles ever recorded, classified or not.
    pub total_articles: i64,
    pub articles_7d: i64,
    /// `None` when the window has no labeled article.
    pub avg_sentiment_7d: Option<Decimal>,
    pub articles_30d: i64,
    pub avg_sentiment_30d: Option<Decimal>,
    pub latest_published_date: Option<NaiveDate>,
}

/// Five-class breakdown for one `(company, stakeholder)` pair.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StakeholderSummaryRow {
    pub company_id: i64,
    pub company_name: String,
    pub stakeholder_type: String,
    pub total_articles: i64,
    pub very_positive_count: i64,
    pub positive_count: i64,
    /// Includes labels outside the five-value scale, which map to neutral.
    pub neutral_count: i64,
    pub negative_count: i64,
    pub very_negative_count: i64,
    pub avg_sentiment: Decimal,
}

/// Rolling 7-day and 30-day summary for every active company.
///
/// Companies without articles are included with zero counts and `None`
/// means.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn company_sentiment_summary(
    pool: &PgPool,
    as_of: NaiveDate,
) -> Result<Vec<CompanySummaryRow>, DbError> {
    let rows = sqlx::query_as::<_, CompanySummaryRow>(COMPANY_SUMMARY_SQL.as_str())
        .bind(as_of)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Sentiment breakdown per `(company, stakeholder)` over the trailing 90 days.
///
/// Only pairs with at least one fully classified article in the window
/// appear.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn stakeholder_sentiment_summary(
    pool: &PgPool,
    as_of: NaiveDate,
) -> Result<Vec<StakeholderSummaryRow>, DbError> {
    let rows = sqlx::query_as::<_, StakeholderSummaryRow>(STAKEHOLDER_SUMMARY_SQL.as_str())
        .bind(as_of)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}
