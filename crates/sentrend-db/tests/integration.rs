//! Offline tests for sentrend-db pool configuration, partition handles and
//! row types. These tests do not require a live database connection.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sentrend_core::{AppConfig, BucketLockMode, Environment, Stakeholder};
use sentrend_db::{
    ArticleWriter, DbError, MonthlyPartition, PartitionedTable, PoolConfig, TrendBucketFilters,
    TrendBucketRow, TrendMaintainer, TrendPointRow,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        bucket_lock: BucketLockMode::None,
        keyword_limit: 20,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn writer_carries_configured_lock_mode() {
    let writer = ArticleWriter::new(TrendMaintainer::new(BucketLockMode::None));
    assert_eq!(writer.trends().lock_mode(), BucketLockMode::None);
    assert_eq!(
        ArticleWriter::default().trends().lock_mode(),
        BucketLockMode::Advisory
    );
}

#[test]
fn partition_walks_consecutive_months() {
    let first = MonthlyPartition::containing(PartitionedTable::NewsArticleArchive, date(2024, 11, 5))
        .unwrap();
    let second = first.next().unwrap();
    let third = second.next().unwrap();

    assert_eq!(first.name(), "news_article_archive_y2024m11");
    assert_eq!(second.name(), "news_article_archive_y2024m12");
    assert_eq!(third.name(), "news_article_archive_y2025m01");
    // Adjacent partitions share a boundary and never overlap.
    assert_eq!(first.end(), second.start());
    assert_eq!(second.end(), third.start());
}

#[test]
fn invalid_partition_period_reports_year_and_month() {
    let err = MonthlyPartition::new(PartitionedTable::NewsArticleArchive, 2024, 13).unwrap_err();
    assert!(matches!(
        err,
        DbError::InvalidPartitionPeriod {
            year: 2024,
            month: 13
        }
    ));
    assert_eq!(err.to_string(), "invalid partition period 2024-13");
}

#[test]
fn unknown_partitioned_table_is_rejected() {
    let err = "news_articles".parse::<PartitionedTable>().unwrap_err();
    assert!(matches!(err, DbError::UnknownPartitionedTable(ref t) if t == "news_articles"));
}

/// Compile-time smoke test: confirm that [`TrendBucketRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn trend_bucket_row_has_expected_fields() {
    let row = TrendBucketRow {
        id: 1_i64,
        company_id: 2_i64,
        stakeholder_type: "customer".to_string(),
        date: date(2024, 1, 1),
        total_articles: 2_i32,
        positive_count: 1_i32,
        negative_count: 1_i32,
        neutral_count: 0_i32,
        avg_sentiment_score: -0.5_f64,
        sentiment_volatility: 1.5_f64,
        top_keywords: serde_json::json!([{ "keyword": "recall", "count": 2 }]),
        updated_at: Utc::now(),
    };

    assert_eq!(
        row.positive_count + row.negative_count + row.neutral_count,
        row.total_articles
    );
    assert_eq!(row.top_keywords[0]["keyword"], "recall");
}

#[test]
fn trend_points_compare_by_value() {
    let a = TrendPointRow {
        date: date(2024, 1, 1),
        avg_sentiment: Decimal::new(-50, 2),
        article_count: 2,
        positive_ratio: Decimal::new(5000, 2),
    };
    let b = TrendPointRow {
        avg_sentiment: Decimal::new(-5, 1),
        positive_ratio: Decimal::new(50, 0),
        ..a.clone()
    };
    assert_eq!(a, b);
}

#[test]
fn trend_bucket_filters_are_copy() {
    let filters = TrendBucketFilters {
        company_id: Some(1),
        stakeholder: Some(Stakeholder::Media),
        start: date(2024, 1, 1),
        end: date(2024, 1, 31),
    };
    let copy = filters;
    assert_eq!(copy.stakeholder, filters.stakeholder);
}
