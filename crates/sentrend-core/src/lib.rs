//! Domain types for stakeholder sentiment trend aggregation.
//!
//! Everything here is pure: label mapping, the stakeholder enumeration, the
//! per-bucket aggregation used by the trend maintenance hook, and application
//! configuration. Persistence lives in `sentrend-db`.

pub mod aggregate;
pub mod app_config;
pub mod config;
pub mod labels;
pub mod stakeholders;

use thiserror::Error;

pub use aggregate::{
    normalize_keyword, normalize_keyword_sql, rank_keywords, BucketStats, KeywordCount,
    TOP_KEYWORDS_PER_BUCKET,
};
pub use app_config::{AppConfig, BucketLockMode, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use labels::{label_value, label_value_sql, SentimentClass, SentimentLabel};
pub use stakeholders::Stakeholder;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid stakeholder type: {0}")]
    InvalidStakeholder(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
