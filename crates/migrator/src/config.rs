//! Typed configuration (§4.10), read from environment variables with CLI
//! flags as a secondary path, following the teacher's `agent`/`migrate`
//! binaries (`clap::Parser` with `env = "..."` on every field).

use clap::Parser;

use crate::error::ConfigError;

/// Top-level migrator configuration. Every field is settable via the
/// environment variable named in its `env` attribute, or the matching
/// `--flag`.
#[derive(Parser)]
#[clap(author, version, about = "Parallel schema-preserving bulk migrator", long_about = None)]
pub struct Config {
    /// Hostname of the source SQL Server instance.
    #[clap(long = "source-host", env = "SOURCE_HOST")]
    pub source_host: Option<String>,
    /// Port of the source SQL Server instance.
    #[clap(long = "source-port", env = "SOURCE_PORT", default_value_t = 1433)]
    pub source_port: u16,
    /// Source SQL Server login user.
    #[clap(long = "source-user", env = "SOURCE_USER")]
    pub source_user: Option<String>,
    /// Source SQL Server login password.
    #[clap(long = "source-password", env = "SOURCE_PASSWORD")]
    pub source_password: Option<String>,
    /// Comma-separated list of source database names, migrated in the
    /// order given.
    #[clap(long = "source-databases", env = "SOURCE_DATABASES", value_delimiter = ',')]
    pub source_databases: Vec<String>,

    /// Hostname of the target PostgreSQL instance.
    #[clap(long = "target-host", env = "TARGET_HOST")]
    pub target_host: Option<String>,
    /// Port of the target PostgreSQL instance.
    #[clap(long = "target-port", env = "TARGET_PORT", default_value_t = 5432)]
    pub target_port: u16,
    /// Target PostgreSQL login user.
    #[clap(long = "target-user", env = "TARGET_USER")]
    pub target_user: Option<String>,
    /// Target PostgreSQL login password.
    #[clap(long = "target-password", env = "TARGET_PASSWORD")]
    pub target_password: Option<String>,
    /// Target PostgreSQL database name.
    #[clap(long = "target-database", env = "TARGET_DATABASE")]
    pub target_database: Option<String>,

    /// Number of tables copied in parallel per source database.
    #[clap(long = "max-workers", env = "MAX_WORKERS", default_value_t = 30)]
    pub max_workers: usize,
    /// Rows committed per batch transaction.
    #[clap(long = "batch-size", env = "BATCH_SIZE", default_value_t = 25_000)]
    pub batch_size: usize,
    /// Attempts made to open a source table cursor before abandoning it.
    #[clap(long = "max-retries", env = "MAX_RETRIES", default_value_t = 10)]
    pub max_retries: u32,
}

impl Config {
    /// Validates the three mandatory, sensitive fields called out in
    /// spec §6: source host, target host, and source password. Everything
    /// else either has a workable default or is only needed once a given
    /// source database is reached.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_host.as_deref().unwrap_or("").is_empty() {
            return Err(ConfigError::Missing("SOURCE_HOST"));
        }
        if self.target_host.as_deref().unwrap_or("").is_empty() {
            return Err(ConfigError::Missing("TARGET_HOST"));
        }
        if self.source_password.as_deref().unwrap_or("").is_empty() {
            return Err(ConfigError::Missing("SOURCE_PASSWORD"));
        }
        Ok(())
    }
}

// Hand-written `Debug` impl rather than pulling in `derivative` for a
// single `#[derivative(Debug = "ignore")]`: redacts both passwords so
// `tracing::info!(?config, ...)` never leaks a credential into logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("source_host", &self.source_host)
            .field("source_port", &self.source_port)
            .field("source_user", &self.source_user)
            .field("source_password", &self.source_password.as_ref().map(|_| "<redacted>"))
            .field("source_databases", &self.source_databases)
            .field("target_host", &self.target_host)
            .field("target_port", &self.target_port)
            .field("target_user", &self.target_user)
            .field("target_password", &self.target_password.as_ref().map(|_| "<redacted>"))
            .field("target_database", &self.target_database)
            .field("max_workers", &self.max_workers)
            .field("batch_size", &self.batch_size)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}
