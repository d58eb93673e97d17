//! Write and read operations for the `news_articles` table.
//!
//! Every write that can touch the classification fields goes through
//! [`ArticleWriter`], which hands the written row to its
//! [`TrendMaintainer`] on the same connection. Callers pass their own
//! transaction, so the article write and the bucket recompute commit or roll
//! back together.

use chrono::{DateTime, NaiveDate, Utc};
use sentrend_core::Stakeholder;
use sqlx::{PgConnection, PgPool};

use crate::trend_buckets::TrendBucketRow;
use crate::trend_maintenance::{BucketKey, TrendMaintainer};
use crate::DbError;

const ARTICLE_COLUMNS: &str = "id, company_id, title, content, url, published_date, \
     stakeholder_type, sentiment_label, sentiment_confidence, keywords, collected_at";

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `news_articles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArticleRow {
    pub id: i64,
    pub company_id: i64,
    pub title: String,
    pub content: String,
    pub url: Option<String>,
    pub published_date: NaiveDate,
    /// `NULL` until the classifier has assigned a stakeholder.
    pub stakeholder_type: Option<String>,
    /// `NULL` until the classifier has produced a label. Free text; labels
    /// outside the five-value scale are kept and count as neutral.
    pub sentiment_label: Option<String>,
    pub sentiment_confidence: Option<f64>,
    pub keywords: Option<Vec<String>>,
    pub collected_at: DateTime<Utc>,
}

impl ArticleRow {
    /// The trend bucket this article belongs to, or `None` while it is
    /// pending classification (label or stakeholder still `NULL`).
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Core`] if the stored stakeholder is not a known value.
    pub fn bucket_key(&self) -> Result<Option<BucketKey>, DbError> {
        let (Some(_), Some(stakeholder)) = (&self.sentiment_label, &self.stakeholder_type) else {
            return Ok(None);
        };
        Ok(Some(BucketKey {
            company_id: self.company_id,
            stakeholder: stakeholder.parse::<Stakeholder>()?,
            date: self.published_date,
        }))
    }
}

/// An article to insert. Classification fields may be left empty and set
/// later with the [`ArticleWriter`] update methods.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub company_id: i64,
    pub title: String,
    pub content: String,
    pub url: Option<String>,
    pub published_date: NaiveDate,
    pub stakeholder: Option<Stakeholder>,
    pub sentiment_label: Option<String>,
    pub sentiment_confidence: Option<f64>,
    pub keywords: Option<Vec<String>>,
}

impl NewArticle {
    #[must_use]
    pub fn new(company_id: i64, title: impl Into<String>, published_date: NaiveDate) -> Self {
        Self {
            company_id,
            title: title.into(),
            content: String::new(),
            url: None,
            published_date,
            stakeholder: None,
            sentiment_label: None,
            sentiment_confidence: None,
            keywords: None,
        }
    }

    #[must_use]
    pub fn with_stakeholder(mut self, stakeholder: Stakeholder) -> Self {
        self.stakeholder = Some(stakeholder);
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.sentiment_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }
}

/// A complete classifier result for one article.
#[derive(Debug, Clone)]
pub struct Classification {
    pub sentiment_label: String,
    pub sentiment_confidence: Option<f64>,
    pub stakeholder: Stakeholder,
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Article repository that runs trend maintenance after each classification write.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArticleWriter {
    trends: TrendMaintainer,
}

impl ArticleWriter {
    #[must_use]
    pub fn new(trends: TrendMaintainer) -> Self {
        Self { trends }
    }

    #[must_use]
    pub fn trends(&self) -> &TrendMaintainer {
        &self.trends
    }

    /// Inserts an article. If it arrives fully classified, its bucket is
    /// recomputed on the same connection.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the insert or the bucket recompute fails.
    /// The caller must drop its transaction without committing in that case.
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        article: &NewArticle,
    ) -> Result<(ArticleRow, Option<TrendBucketRow>), DbError> {
        let sql = format!(
            "INSERT INTO news_articles \
                 (company_id, title, content, url, published_date, stakeholder_type, \
                  sentiment_label, sentiment_confidence, keywords) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {ARTICLE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(article.company_id)
            .bind(&article.title)
            .bind(&article.content)
            .bind(&article.url)
            .bind(article.published_date)
            .bind(article.stakeholder.map(Stakeholder::as_str))
            .bind(&article.sentiment_label)
            .bind(article.sentiment_confidence)
            .bind(&article.keywords)
            .fetch_one(&mut *conn)
            .await?;

        let bucket = self.trends.on_article_written(conn, &row).await?;
        Ok((row, bucket))
    }

    /// Writes label, confidence and stakeholder in one update.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if the article does not exist, or
    /// [`DbError::Sqlx`] if the update or the bucket recompute fails.
    pub async fn classify(
        &self,
        conn: &mut PgConnection,
        article_id: i64,
        classification: &Classification,
    ) -> Result<(ArticleRow, Option<TrendBucketRow>), DbError> {
        let sql = format!(
            "UPDATE news_articles \
             SET sentiment_label = $1, sentiment_confidence = $2, stakeholder_type = $3 \
             WHERE id = $4 \
             RETURNING {ARTICLE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(&classification.sentiment_label)
            .bind(classification.sentiment_confidence)
            .bind(classification.stakeholder.as_str())
            .bind(article_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(DbError::NotFound)?;

        let bucket = self.trends.on_article_written(conn, &row).await?;
        Ok((row, bucket))
    }

    /// Writes only the sentiment label and confidence.
    ///
    /// The bucket is recomputed only if the article already has a stakeholder.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if the article does not exist, or
    /// [`DbError::Sqlx`] if the update or the bucket recompute fails.
    pub async fn set_sentiment(
        &self,
        conn: &mut PgConnection,
        article_id: i64,
        label: &str,
        confidence: Option<f64>,
    ) -> Result<(ArticleRow, Option<TrendBucketRow>), DbError> {
        let sql = format!(
            "UPDATE news_articles \
             SET sentiment_label = $1, sentiment_confidence = $2 \
             WHERE id = $3 \
             RETURNING {ARTICLE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(label)
            .bind(confidence)
            .bind(article_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(DbError::NotFound)?;

        let bucket = self.trends.on_article_written(conn, &row).await?;
        Ok((row, bucket))
    }

    /// Writes only the stakeholder classification.
    ///
    /// The bucket is recomputed only if the article already has a label.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if the article does not exist, or
    /// [`DbError::Sqlx`] if the update or the bucket recompute fails.
    pub async fn set_stakeholder(
        &self,
        conn: &mut PgConnection,
        article_id: i64,
        stakeholder: Stakeholder,
    ) -> Result<(ArticleRow, Option<TrendBucketRow>), DbError> {
        let sql = format!(
            "UPDATE news_articles \
             SET stakeholder_type = $1 \
             WHERE id = $2 \
             RETURNING {ARTICLE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(stakeholder.as_str())
            .bind(article_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(DbError::NotFound)?;

        let bucket = self.trends.on_article_written(conn, &row).await?;
        Ok((row, bucket))
    }

    /// Deletes an article.
    ///
    /// Trend maintenance runs on insert and update only, so the article's
    /// bucket keeps counting it until `TrendMaintainer::rebuild` is run.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if the article does not exist, or
    /// [`DbError::Sqlx`] if the delete fails.
    pub async fn delete(&self, conn: &mut PgConnection, article_id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM news_articles WHERE id = $1")
            .bind(article_id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        tracing::debug!(
            article_id,
            "article deleted; its trend bucket is left unchanged"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Returns an article by id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_article(pool: &PgPool, id: i64) -> Result<Option<ArticleRow>, DbError> {
    let sql = format!("SELECT {ARTICLE_COLUMNS} FROM news_articles WHERE id = $1");
    let row = sqlx::query_as::<_, ArticleRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}
