//! Typed error taxonomy (§4.12 / §7). Only the failure classes that change
//! control flow at the driver/runner boundary are typed with `thiserror`;
//! everything recovered locally inside a table copy is folded into
//! [`crate::telemetry::RunReport`] counters instead of propagated as an
//! error.

/// A fatal configuration error. The process must exit before any I/O.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    Missing(&'static str),
}

/// Failure to establish the target connection pool for a run. Fatal: the
/// whole process exits non-zero.
#[derive(Debug, thiserror::Error)]
#[error("failed to connect to target database: {0}")]
pub struct TargetConnectError(#[from] pub sqlx::Error);

/// Failure to establish or draw from the source connection pool for one
/// source database. Recoverable: the driver skips this source database and
/// moves to the next.
#[derive(Debug, thiserror::Error)]
pub enum SourceConnectError {
    #[error("failed to build source connection pool: {0}")]
    Pool(#[from] bb8_tiberius::Error),
    #[error("failed to acquire a source connection: {0}")]
    Acquire(#[from] bb8::RunError<bb8_tiberius::Error>),
}

/// Failure to introspect the source catalog. Recoverable: the driver skips
/// this source database.
#[derive(Debug, thiserror::Error)]
#[error("failed to introspect source catalog: {0}")]
pub struct CatalogQueryError(#[from] pub tiberius::error::Error);
