//! Component J, §4.9: the top-level driver. Parses configuration, validates
//! it fail-fast, and iterates configured source databases sequentially,
//! handing each to the database runner. Grounded on the `agent` binary's
//! `main`/`async_main` split (`crates/agent/src/main.rs`): a synchronous
//! `main` that builds its own multi-threaded runtime and propagates the
//! async result as the process exit code.

mod config;
mod copier;
mod error;
mod fk;
mod pool;
mod runner;
mod source;
mod target;
mod telemetry;

use std::sync::Arc;

use clap::Parser;

use config::Config;
use error::TargetConnectError;
use telemetry::RunReport;

fn main() -> Result<(), anyhow::Error> {
    telemetry::init();

    let config = Config::parse();
    tracing::info!(?config, "started");

    if let Err(err) = config.validate() {
        tracing::error!(error = %err, "invalid configuration");
        std::process::exit(1);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let result = runtime.block_on(async_main(config));
    runtime.shutdown_timeout(std::time::Duration::from_secs(5));

    match result {
        Ok(()) => Ok(()),
        Err(err) => {
            tracing::error!(error = %err, "migration run failed");
            std::process::exit(1);
        }
    }
}

/// Iterates the configured source databases in declared order (§4.9),
/// sequentially. A [`TargetConnectError`] is fatal for the whole run and
/// propagates up to `main`; every other per-database failure is logged and
/// the driver moves on to the next source database.
async fn async_main(config: Config) -> anyhow::Result<()> {
    let config = Arc::new(config);
    let report = Arc::new(RunReport::new());

    for database in &config.source_databases {
        match runner::run_one(Arc::clone(&config), database, Arc::clone(&report)).await {
            Ok(()) => {}
            Err(err) => {
                if err.downcast_ref::<TargetConnectError>().is_some() {
                    return Err(err);
                }
                tracing::error!(database, error = %err, "source database run failed; continuing to next");
            }
        }
    }

    report.log_summary("run");
    Ok(())
}
