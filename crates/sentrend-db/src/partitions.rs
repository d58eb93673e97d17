//! Monthly range partitions for large tables.
//!
//! Partition identifiers are never built from caller strings: the parent comes
//! from the [`PartitionedTable`] enumeration and the child name and bounds are
//! derived from a validated `(year, month)` in [`MonthlyPartition`].

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use sqlx::PgPool;

use crate::DbError;

/// Tables created with `PARTITION BY RANGE` on a date column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartitionedTable {
    NewsArticleArchive,
}

impl PartitionedTable {
    pub const ALL: [PartitionedTable; 1] = [PartitionedTable::NewsArticleArchive];

    #[must_use]
    pub const fn table_name(self) -> &'static str {
        match self {
            PartitionedTable::NewsArticleArchive => "news_article_archive",
        }
    }
}

impl fmt::Display for PartitionedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for PartitionedTable {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.table_name() == s)
            .ok_or_else(|| DbError::UnknownPartitionedTable(s.to_string()))
    }
}

/// One calendar month of a partitioned table, covering `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyPartition {
    table: PartitionedTable,
    start: NaiveDate,
    end: NaiveDate,
}

impl MonthlyPartition {
    /// # Errors
    ///
    /// Returns [`DbError::InvalidPartitionPeriod`] unless `month` is `1..=12`
    /// and `year` is a four-digit year.
    pub fn new(table: PartitionedTable, year: i32, month: u32) -> Result<Self, DbError> {
        let invalid = || DbError::InvalidPartitionPeriod { year, month };
        if !(1000..=9998).contains(&year) {
            return Err(invalid());
        }
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or_else(invalid)?;
        Ok(Self { table, start, end })
    }

    /// The partition whose month contains `date`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidPartitionPeriod`] for dates outside the
    /// supported years.
    pub fn containing(table: PartitionedTable, date: NaiveDate) -> Result<Self, DbError> {
        Self::new(table, date.year(), date.month())
    }

    /// The partition for the following month.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidPartitionPeriod`] past the last supported year.
    pub fn next(&self) -> Result<Self, DbError> {
        Self::containing(self.table, self.end)
    }

    #[must_use]
    pub fn table(&self) -> PartitionedTable {
        self.table
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.start.year()
    }

    #[must_use]
    pub fn month(&self) -> u32 {
        self.start.month()
    }

    /// Inclusive lower bound.
    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive upper bound: the first day of the next month.
    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Child table name, e.g. `news_article_archive_y2024m01`.
    #[must_use]
    pub fn name(&self) -> String {
        format!(
            "{}_y{:04}m{:02}",
            self.table.table_name(),
            self.year(),
            self.month()
        )
    }

    fn create_sql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} PARTITION OF {} \
             FOR VALUES FROM ('{}') TO ('{}')",
            self.name(),
            self.table.table_name(),
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d"),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionOutcome {
    Created,
    AlreadyExists,
}

/// A child partition as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PartitionRow {
    pub name: String,
    /// Postgres' rendering of the bound, e.g.
    /// `FOR VALUES FROM ('2024-01-01') TO ('2024-02-01')`.
    pub bounds: String,
}

/// Create the partition if it does not exist yet.
///
/// Calling this again with the same partition, including concurrently from
/// another session, returns [`PartitionOutcome::AlreadyExists`].
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the catalog lookup or the `CREATE` fails,
/// e.g. when another partition already covers an overlapping range.
pub async fn ensure_monthly_partition(
    pool: &PgPool,
    partition: &MonthlyPartition,
) -> Result<PartitionOutcome, DbError> {
    let name = partition.name();
    let mut tx = pool.begin().await?;

    // Creators of the same partition run the lookup and CREATE one at a time.
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(&name)
        .execute(&mut *tx)
        .await?;

    let exists: bool = sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
        .bind(&name)
        .fetch_one(&mut *tx)
        .await?;

    if exists {
        tx.commit().await?;
        tracing::debug!(partition = %name, "partition already exists");
        return Ok(PartitionOutcome::AlreadyExists);
    }

    sqlx::query(&partition.create_sql()).execute(&mut *tx).await?;
    tx.commit().await?;

    tracing::info!(
        partition = %name,
        parent = %partition.table(),
        start = %partition.start(),
        end = %partition.end(),
        "partition created"
    );
    Ok(PartitionOutcome::Created)
}

/// Ensure `months` consecutive monthly partitions starting with the month
/// containing `from`.
///
/// # Errors
///
/// Returns [`DbError`] on the first partition that cannot be ensured.
pub async fn ensure_partitions_ahead(
    pool: &PgPool,
    table: PartitionedTable,
    from: NaiveDate,
    months: u32,
) -> Result<Vec<(MonthlyPartition, PartitionOutcome)>, DbError> {
    let mut results = Vec::new();
    let mut partition = MonthlyPartition::containing(table, from)?;
    for i in 0..months {
        if i > 0 {
            partition = partition.next()?;
        }
        let outcome = ensure_monthly_partition(pool, &partition).await?;
        results.push((partition, outcome));
    }
    Ok(results)
}

/// List the child partitions of `table`, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the catalog query fails.
pub async fn list_partitions(
    pool: &PgPool,
    table: PartitionedTable,
) -> Result<Vec<PartitionRow>, DbError> {
    let rows = sqlx::query_as::<_, PartitionRow>(
        "SELECT \
             c.relname::TEXT AS name, \
             pg_get_expr(c.relpartbound, c.oid) AS bounds \
         FROM pg_inherits i \
         JOIN pg_class c ON c.oid = i.inhrelid \
         WHERE i.inhparent = $1::TEXT::REGCLASS \
         ORDER BY c.relname",
    )
    .bind(table.table_name())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
