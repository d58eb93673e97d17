use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How the trend maintenance hook serializes recomputes of the same bucket key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BucketLockMode {
    /// Take a transaction-scoped advisory lock on the bucket key before reading
    /// its article set, so concurrent writers to one key recompute in turn.
    #[default]
    Advisory,
    /// No locking. Concurrent writers to one key may overwrite each other's
    /// contribution under read-committed isolation.
    None,
}

impl fmt::Display for BucketLockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketLockMode::Advisory => write!(f, "advisory"),
            BucketLockMode::None => write!(f, "none"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub bucket_lock: BucketLockMode,
    pub keyword_limit: i64,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("bucket_lock", &self.bucket_lock)
            .field("keyword_limit", &self.keyword_limit)
            .finish()
    }
}
