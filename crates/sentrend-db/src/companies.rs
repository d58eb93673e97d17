//! Database operations for the `companies` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `companies` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompanyRow {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Inserts a company and returns the new row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, including a duplicate name.
pub async fn insert_company(pool: &PgPool, name: &str) -> Result<CompanyRow, DbError> {
    let row = sqlx::query_as::<_, CompanyRow>(
        "INSERT INTO companies (name) \
         VALUES ($1) \
         RETURNING id, name, is_active, created_at",
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns a company by id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_company(pool: &PgPool, id: i64) -> Result<Option<CompanyRow>, DbError> {
    let row = sqlx::query_as::<_, CompanyRow>(
        "SELECT id, name, is_active, created_at \
         FROM companies \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns all active companies, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_companies(pool: &PgPool) -> Result<Vec<CompanyRow>, DbError> {
    let rows = sqlx::query_as::<_, CompanyRow>(
        "SELECT id, name, is_active, created_at \
         FROM companies \
         WHERE is_active = true \
         ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Sets `companies.is_active`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no company has this id, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn set_company_active(pool: &PgPool, id: i64, is_active: bool) -> Result<(), DbError> {
    let result = sqlx::query("UPDATE companies SET is_active = $1 WHERE id = $2")
        .bind(is_active)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}
