//! The target half of the migrator: a pooled PostgreSQL connection, lazy
//! namespace creation, and the session tuning §5 calls for (unbounded
//! statement/lock timeouts, synchronous commit disabled). Grounded on the
//! `agent` binary's `sqlx::postgres::PgPoolOptions` block in
//! `crates/agent/src/main.rs`.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;

use crate::config::Config;
use crate::error::TargetConnectError;

/// Opens the target connection pool, capped per §4.8 at
/// `max_workers + 10` connections for both the open and the idle pool
/// (`max_connections` and `min_connections` set to the same value, mirroring
/// the same-cap requirement on the source pool in `source::SourcePool`), with
/// TLS disabled (`sslmode=disable`) per §6.
pub async fn connect(config: &Config) -> Result<PgPool, TargetConnectError> {
    let options = PgConnectOptions::new()
        .host(config.target_host.as_deref().unwrap_or_default())
        .port(config.target_port)
        .username(config.target_user.as_deref().unwrap_or_default())
        .password(config.target_password.as_deref().unwrap_or_default())
        .database(config.target_database.as_deref().unwrap_or_default())
        .ssl_mode(PgSslMode::Disable)
        .application_name("migrator");

    let pool_cap = (config.max_workers + 10) as u32;
    let pool = PgPoolOptions::new()
        .max_connections(pool_cap)
        .min_connections(pool_cap)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect_with(options)
        .await
        .map_err(TargetConnectError)?;

    Ok(pool)
}

/// Disables synchronous commit and removes statement/lock timeouts on the
/// session, per §5: bulk loads legitimately hold write locks for extended
/// periods, and a bounded durability window is an accepted trade for
/// throughput since every table is drop-and-recreated on rerun anyway.
///
/// Failures here are non-fatal (§6, WARN-level): a restricted role may
/// reject `SET` on these parameters, and the migration can still proceed
/// correctly, just with the engine's defaults.
pub async fn tune_session(pool: &PgPool) {
    for statement in [
        "SET synchronous_commit = off",
        "SET statement_timeout = 0",
        "SET lock_timeout = 0",
    ] {
        if let Err(err) = sqlx::query(statement).execute(pool).await {
            tracing::warn!(statement, error = %err, "failed to tune target session");
        }
    }
}

/// Creates the target namespace (schema) for `namespace` if it doesn't
/// already exist. Must happen before any table belonging to this source
/// database is created (data model invariant, §3).
pub async fn ensure_namespace(pool: &PgPool, namespace: &str) -> Result<(), sqlx::Error> {
    let statement = format!("CREATE SCHEMA IF NOT EXISTS \"{namespace}\"");
    sqlx::query(&statement).execute(pool).await?;
    Ok(())
}
