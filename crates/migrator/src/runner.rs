//! Component I, §4.8: the database runner. Connects both engines for one
//! source database, tunes the target session, introspects the source
//! catalog (filtering ignored tables), fans out to the worker pool, then
//! installs foreign keys. The top-level driver ([`crate::main`]) invokes
//! this once per source database, strictly in sequence.

use std::sync::Arc;

use migrator_types::is_ignored;

use crate::config::Config;
use crate::error::CatalogQueryError;
use crate::source::{introspect, SourcePool};
use crate::telemetry::RunReport;
use crate::{fk, pool, target};

/// Runs one source database end to end. Target-connect failure is fatal
/// for the whole process (§4.12) and propagates as a [`crate::error::TargetConnectError`]
/// wrapped in the returned `anyhow::Error`; every other failure here is
/// recoverable and is handled locally by skipping this source database.
pub async fn run_one(config: Arc<Config>, database: &str, report: Arc<RunReport>) -> anyhow::Result<()> {
    tracing::info!(database, "starting source database");

    let target_pool = target::connect(&config).await?;
    target::tune_session(&target_pool).await;

    if let Err(err) = target::ensure_namespace(&target_pool, database).await {
        tracing::error!(database, error = %err, "failed to create target namespace; skipping database");
        return Ok(());
    }

    let source_pool = match SourcePool::connect(&config, database).await {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!(database, error = %err, "failed to connect to source database; skipping");
            return Ok(());
        }
    };

    let tables = match list_tables(&source_pool).await {
        Ok(tables) => tables,
        Err(err) => {
            tracing::error!(database, error = %err, "failed to introspect source catalog; skipping");
            return Ok(());
        }
    };

    tracing::info!(database, tables = tables.len(), "copying tables");
    let foreign_keys = pool::run(
        &source_pool,
        &target_pool,
        Arc::clone(&config),
        database,
        tables,
        Arc::clone(&report),
    )
    .await;

    tracing::info!(database, foreign_keys = foreign_keys.len(), "installing foreign keys");
    fk::install_all(&target_pool, database, foreign_keys, &report).await;

    report.log_summary(database);
    tracing::info!(database, "finished source database");
    Ok(())
}

/// Lists every base table in the source catalog, dropping anything the
/// table ignore policy excludes (§4.3). Filtering happens here, one layer
/// above the pure introspection query, so [`introspect::list_base_tables`]
/// stays an unfiltered reflection of the catalog.
async fn list_tables(source: &SourcePool) -> anyhow::Result<Vec<String>> {
    let mut conn = source.get().await?;
    let tables = introspect::list_base_tables(&mut conn)
        .await
        .map_err(CatalogQueryError)?;

    Ok(tables.into_iter().filter(|name| !is_ignored(name)).collect())
}
