//! Label and stakeholder distribution of analyzed articles.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sentrend_core::{SentimentLabel, Stakeholder};
use sqlx::PgPool;

use crate::DbError;

/// Number of articles in one category.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentimentDistribution {
    /// Labeled articles in the period.
    pub total_articles: i64,
    /// Mean classifier confidence, rounded to 3 decimals; zero when none is recorded.
    pub avg_confidence: Decimal,
    /// Every known label in scale order, then any unrecognized stored labels
    /// alphabetically.
    pub by_label: Vec<CategoryCount>,
    /// Every stakeholder in enumeration order. Labeled articles without a
    /// stakeholder are not counted here.
    pub by_stakeholder: Vec<CategoryCount>,
}

/// Distribution of labeled articles published on or after `since`,
/// optionally for one company.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any query fails.
pub async fn sentiment_distribution(
    pool: &PgPool,
    company_id: Option<i64>,
    since: NaiveDate,
) -> Result<SentimentDistribution, DbError> {
    let label_counts = sqlx::query_as::<_, CategoryCount>(
        "SELECT sentiment_label AS category, COUNT(*) AS count \
         FROM news_articles \
         WHERE sentiment_label IS NOT NULL \
           AND published_date >= $1 \
           AND ($2::BIGINT IS NULL OR company_id = $2) \
         GROUP BY sentiment_label \
         ORDER BY sentiment_label",
    )
    .bind(since)
    .bind(company_id)
    .fetch_all(pool)
    .await?;

    let stakeholder_counts = sqlx::query_as::<_, CategoryCount>(
        "SELECT stakeholder_type AS category, COUNT(*) AS count \
         FROM news_articles \
         WHERE sentiment_label IS NOT NULL \
           AND stakeholder_type IS NOT NULL \
           AND published_date >= $1 \
           AND ($2::BIGINT IS NULL OR company_id = $2) \
         GROUP BY stakeholder_type",
    )
    .bind(since)
    .bind(company_id)
    .fetch_all(pool)
    .await?;

    let avg_confidence: Decimal = sqlx::query_scalar(
        "SELECT ROUND(COALESCE(AVG(sentiment_confidence), 0)::NUMERIC, 3) \
         FROM news_articles \
         WHERE sentiment_confidence IS NOT NULL \
           AND sentiment_label IS NOT NULL \
           AND published_date >= $1 \
           AND ($2::BIGINT IS NULL OR company_id = $2)",
    )
    .bind(since)
    .bind(company_id)
    .fetch_one(pool)
    .await?;

    let total_articles = label_counts.iter().map(|c| c.count).sum();

    Ok(SentimentDistribution {
        total_articles,
        avg_confidence,
        by_label: fill_labels(label_counts),
        by_stakeholder: fill_stakeholders(&stakeholder_counts),
    })
}

fn count_of(counts: &[CategoryCount], category: &str) -> i64 {
    counts
        .iter()
        .find(|c| c.category == category)
        .map_or(0, |c| c.count)
}

fn fill_labels(counts: Vec<CategoryCount>) -> Vec<CategoryCount> {
    let mut filled: Vec<CategoryCount> = SentimentLabel::ALL
        .into_iter()
        .map(|label| CategoryCount {
            category: label.as_str().to_string(),
            count: count_of(&counts, label.as_str()),
        })
        .collect();
    // `counts` arrives sorted by label text.
    filled.extend(
        counts
            .into_iter()
            .filter(|c| SentimentLabel::parse(&c.category).is_none()),
    );
    filled
}

fn fill_stakeholders(counts: &[CategoryCount]) -> Vec<CategoryCount> {
    Stakeholder::ALL
        .into_iter()
        .map(|st| CategoryCount {
            category: st.as_str().to_string(),
            count: count_of(counts, st.as_str()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cc(category: &str, count: i64) -> CategoryCount {
        CategoryCount {
            category: category.to_string(),
            count,
        }
    }

    #[test]
    fn fill_labels_lists_known_labels_in_scale_order_with_zeros() {
        let filled = fill_labels(vec![cc("positive", 3), cc("very_negative", 1)]);
        let pairs: Vec<(&str, i64)> = filled
            .iter()
            .map(|c| (c.category.as_str(), c.count))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("very_negative", 1),
                ("negative", 0),
                ("neutral", 0),
                ("positive", 3),
                ("very_positive", 0),
            ]
        );
    }

    #[test]
    fn fill_labels_appends_unrecognized_labels() {
        let filled = fill_labels(vec![cc("mixed", 2), cc("neutral", 1)]);
        assert_eq!(filled.len(), 6);
        assert_eq!(filled[5], cc("mixed", 2));
    }

    #[test]
    fn fill_stakeholders_covers_every_stakeholder() {
        let filled = fill_stakeholders(&[cc("media", 4)]);
        assert_eq!(filled.len(), Stakeholder::ALL.len());
        assert_eq!(count_of(&filled, "media"), 4);
        assert_eq!(count_of(&filled, "customer"), 0);
    }
}
