//! Write-time maintenance of the `sentiment_trends` aggregate store.
//!
//! [`TrendMaintainer`] is the post-write hook invoked by the article
//! repository. For a fully classified article it recomputes that article's
//! bucket from every labeled article sharing the key and replaces the stored
//! row wholesale; nothing is ever merged incrementally.

use chrono::NaiveDate;
use sentrend_core::{
    rank_keywords, BucketLockMode, BucketStats, Stakeholder, TOP_KEYWORDS_PER_BUCKET,
};
use sqlx::{PgConnection, PgPool};

use crate::articles::ArticleRow;
use crate::trend_buckets::{TrendBucketRow, TREND_BUCKET_COLUMNS};
use crate::DbError;

/// Identity of one trend bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketKey {
    pub company_id: i64,
    pub stakeholder: Stakeholder,
    pub date: NaiveDate,
}

impl BucketKey {
    /// Name hashed into the advisory lock id for this key.
    #[must_use]
    pub fn lock_name(&self) -> String {
        format!(
            "sentiment_trends:{}:{}:{}",
            self.company_id, self.stakeholder, self.date
        )
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BucketKeyRow {
    company_id: i64,
    stakeholder_type: String,
    date: NaiveDate,
}

impl TryFrom<BucketKeyRow> for BucketKey {
    type Error = DbError;

    fn try_from(row: BucketKeyRow) -> Result<Self, Self::Error> {
        Ok(Self {
            company_id: row.company_id,
            stakeholder: row.stakeholder_type.parse()?,
            date: row.date,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BucketMemberRow {
    sentiment_label: String,
    keywords: Option<Vec<String>>,
}

/// Outcome of [`TrendMaintainer::rebuild`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RebuildSummary {
    pub recomputed: usize,
    pub removed: u64,
}

/// Recomputes trend buckets after classification writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendMaintainer {
    lock_mode: BucketLockMode,
}

impl TrendMaintainer {
    #[must_use]
    pub fn new(lock_mode: BucketLockMode) -> Self {
        Self { lock_mode }
    }

    #[must_use]
    pub fn lock_mode(&self) -> BucketLockMode {
        self.lock_mode
    }

    /// Hook called after an article row was inserted or its classification
    /// fields were updated.
    ///
    /// Returns the replaced bucket, or `None` when the article is still
    /// pending classification and no bucket was touched.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the recompute fails; the caller's transaction
    /// must then be rolled back together with the article write.
    pub async fn on_article_written(
        &self,
        conn: &mut PgConnection,
        article: &ArticleRow,
    ) -> Result<Option<TrendBucketRow>, DbError> {
        let Some(key) = article.bucket_key()? else {
            tracing::trace!(
                article_id = article.id,
                "article pending classification; trend bucket unchanged"
            );
            return Ok(None);
        };
        self.recompute(conn, &key).await
    }

    /// Recompute one bucket from all labeled articles sharing its key and
    /// upsert the result.
    ///
    /// Returns `None` if no labeled article has this key; the stored row, if
    /// any, is left as it is.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if any statement fails.
    pub async fn recompute(
        &self,
        conn: &mut PgConnection,
        key: &BucketKey,
    ) -> Result<Option<TrendBucketRow>, DbError> {
        if self.lock_mode == BucketLockMode::Advisory {
            // Held until the enclosing transaction ends.
            sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
                .bind(key.lock_name())
                .execute(&mut *conn)
                .await?;
        }

        let members = sqlx::query_as::<_, BucketMemberRow>(
            "SELECT sentiment_label, keywords \
             FROM news_articles \
             WHERE company_id = $1 \
               AND stakeholder_type = $2 \
               AND published_date = $3 \
               AND sentiment_label IS NOT NULL",
        )
        .bind(key.company_id)
        .bind(key.stakeholder.as_str())
        .bind(key.date)
        .fetch_all(&mut *conn)
        .await?;

        let labels = members.iter().map(|m| m.sentiment_label.as_str());
        let Some(stats) = BucketStats::from_labels(labels) else {
            return Ok(None);
        };
        let top_keywords = rank_keywords(
            members
                .iter()
                .flat_map(|m| m.keywords.iter().flatten())
                .map(String::as_str),
            TOP_KEYWORDS_PER_BUCKET,
        );

        let sql = format!(
            "INSERT INTO sentiment_trends \
                 (company_id, stakeholder_type, date, total_articles, positive_count, \
                  negative_count, neutral_count, avg_sentiment_score, sentiment_volatility, \
                  top_keywords) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (company_id, stakeholder_type, date) DO UPDATE SET \
                 total_articles       = EXCLUDED.total_articles, \
                 positive_count       = EXCLUDED.positive_count, \
                 negative_count       = EXCLUDED.negative_count, \
                 neutral_count        = EXCLUDED.neutral_count, \
                 avg_sentiment_score  = EXCLUDED.avg_sentiment_score, \
                 sentiment_volatility = EXCLUDED.sentiment_volatility, \
                 top_keywords         = EXCLUDED.top_keywords, \
                 updated_at           = NOW() \
             RETURNING {TREND_BUCKET_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TrendBucketRow>(&sql)
            .bind(key.company_id)
            .bind(key.stakeholder.as_str())
            .bind(key.date)
            .bind(stats.total_articles)
            .bind(stats.positive_count)
            .bind(stats.negative_count)
            .bind(stats.neutral_count)
            .bind(stats.avg_sentiment_score)
            .bind(stats.sentiment_volatility)
            .bind(serde_json::to_value(&top_keywords)?)
            .fetch_one(&mut *conn)
            .await?;

        tracing::debug!(
            company_id = key.company_id,
            stakeholder = %key.stakeholder,
            date = %key.date,
            total = stats.total_articles,
            avg = stats.avg_sentiment_score,
            "trend bucket recomputed"
        );

        Ok(Some(row))
    }

    /// Recompute every bucket that has labeled articles and delete buckets
    /// whose key no longer has any, optionally for one company only.
    ///
    /// This is the only path that removes bucket rows. Article deletes and
    /// reclassifications away from a key leave the old bucket stale until it
    /// runs.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if any statement fails; nothing is committed then.
    pub async fn rebuild(
        &self,
        pool: &PgPool,
        company_id: Option<i64>,
    ) -> Result<RebuildSummary, DbError> {
        let mut tx = pool.begin().await?;

        let keys = sqlx::query_as::<_, BucketKeyRow>(
            "SELECT DISTINCT company_id, stakeholder_type, published_date AS date \
             FROM news_articles \
             WHERE sentiment_label IS NOT NULL \
               AND stakeholder_type IS NOT NULL \
               AND ($1::BIGINT IS NULL OR company_id = $1) \
             ORDER BY company_id, stakeholder_type, date",
        )
        .bind(company_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut summary = RebuildSummary::default();
        for key_row in keys {
            let key = BucketKey::try_from(key_row)?;
            if self.recompute(&mut *tx, &key).await?.is_some() {
                summary.recomputed += 1;
            }
        }

        let removed = sqlx::query(
            "DELETE FROM sentiment_trends t \
             WHERE ($1::BIGINT IS NULL OR t.company_id = $1) \
               AND NOT EXISTS ( \
                   SELECT 1 FROM news_articles a \
                   WHERE a.company_id = t.company_id \
                     AND a.stakeholder_type = t.stakeholder_type \
                     AND a.published_date = t.date \
                     AND a.sentiment_label IS NOT NULL \
               )",
        )
        .bind(company_id)
        .execute(&mut *tx)
        .await?;
        summary.removed = removed.rows_affected();

        tx.commit().await?;

        tracing::info!(
            company_id = ?company_id,
            recomputed = summary.recomputed,
            removed = summary.removed,
            "trend buckets rebuilt"
        );
        Ok(summary)
    }
}
