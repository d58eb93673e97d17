//! Keyword frequency ranking over a company's articles.

use std::sync::LazyLock;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sentrend_core::{label_value_sql, normalize_keyword_sql};
use sqlx::PgPool;

use crate::DbError;

/// Result limit used when the caller does not supply one.
pub const DEFAULT_KEYWORD_LIMIT: i64 = 20;

/// Keywords mentioned fewer times than this in the range are dropped.
const MIN_KEYWORD_FREQUENCY: i64 = 2;

static KEYWORD_FREQUENCY_SQL: LazyLock<String> = LazyLock::new(|| {
    let value = label_value_sql("a.sentiment_label");
    let keyword = normalize_keyword_sql("raw.keyword");
    format!(
        "SELECT \
             k.keyword, \
             COUNT(*) AS frequency, \
             ROUND(AVG({value}), 2) AS avg_sentiment \
         FROM news_articles a \
         CROSS JOIN LATERAL unnest(a.keywords) AS raw(keyword) \
         CROSS JOIN LATERAL (SELECT {keyword} AS keyword) k \
         WHERE a.company_id = $1 \
           AND a.published_date BETWEEN $2 AND $3 \
           AND a.keywords IS NOT NULL \
           AND a.sentiment_label IS NOT NULL \
           AND k.keyword <> '' \
         GROUP BY k.keyword \
         HAVING COUNT(*) >= {MIN_KEYWORD_FREQUENCY} \
         ORDER BY frequency DESC, AVG({value}) DESC, k.keyword \
         LIMIT $4"
    )
});

/// One ranked keyword.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct KeywordFrequencyRow {
    pub keyword: String,
    /// Number of mentions across labeled articles in the range.
    pub frequency: i64,
    /// Mean mapped sentiment of the mentioning articles, rounded to 2 decimals.
    pub avg_sentiment: Decimal,
}

/// Rank keywords by mention count, then mean sentiment, over an inclusive
/// date range.
///
/// Each element of an article's keyword list counts as one mention of its
/// [`normalize_keyword`](sentrend_core::normalize_keyword) form, so stored
/// buckets and this ranking agree; blank elements are skipped. Keywords with
/// a single mention are dropped. `limit = None` uses
/// [`DEFAULT_KEYWORD_LIMIT`]; negative limits are treated as zero.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn keyword_frequency(
    pool: &PgPool,
    company_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    limit: Option<i64>,
) -> Result<Vec<KeywordFrequencyRow>, DbError> {
    let limit = limit.unwrap_or(DEFAULT_KEYWORD_LIMIT).max(0);
    let rows = sqlx::query_as::<_, KeywordFrequencyRow>(KEYWORD_FREQUENCY_SQL.as_str())
        .bind(company_id)
        .bind(start)
        .bind(end)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}
