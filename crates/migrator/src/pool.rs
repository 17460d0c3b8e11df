//! Component G, §4.6: the worker pool. A fixed number of workers drain a
//! shared queue of table names, each invoking the Table Copier and
//! forwarding its foreign keys onto a single collector channel. The driver
//! (`runner`) enqueues every table up front and waits for every worker to
//! drain before installing foreign keys.

use std::sync::Arc;

use migrator_types::ForeignKey;
use sqlx::PgPool;
use tokio::sync::{mpsc, Mutex};

use crate::config::Config;
use crate::copier;
use crate::source::SourcePool;
use crate::telemetry::RunReport;

/// Copies every table in `tables`, `config.max_workers` at a time, and
/// returns every foreign key any of them declared. Ordering between
/// tables is unspecified (§4.6); the only contract upheld at this layer
/// is that every copy has finished before this function returns, so that
/// the caller can safely install foreign keys against a fully-copied
/// source database.
pub async fn run(
    source: &SourcePool,
    target: &PgPool,
    config: Arc<Config>,
    namespace: &str,
    tables: Vec<String>,
    report: Arc<RunReport>,
) -> Vec<ForeignKey> {
    let table_count = tables.len();
    if table_count == 0 {
        return Vec::new();
    }

    let queue = Arc::new(Mutex::new(tables.into_iter()));
    let (fk_tx, mut fk_rx) = mpsc::channel::<Vec<ForeignKey>>(table_count);
    let worker_count = config.max_workers.min(table_count).max(1);

    let mut workers = Vec::with_capacity(worker_count);
    for _ in 0..worker_count {
        let queue = Arc::clone(&queue);
        let fk_tx = fk_tx.clone();
        let source = source.clone();
        let target = target.clone();
        let config = Arc::clone(&config);
        let report = Arc::clone(&report);
        let namespace = namespace.to_string();

        workers.push(tokio::spawn(async move {
            loop {
                let next = queue.lock().await.next();
                let Some(table_name) = next else { break };
                let fks = copier::copy_table(&source, &target, &config, &namespace, &table_name, &report).await;
                let _ = fk_tx.send(fks).await;
            }
        }));
    }
    // Drop the pool's own sender so the channel closes once every worker's
    // clone has been dropped, letting the drain loop below terminate.
    drop(fk_tx);

    for worker in workers {
        if let Err(err) = worker.await {
            tracing::error!(error = %err, "copy worker panicked");
        }
    }

    let mut collected = Vec::new();
    while let Some(fks) = fk_rx.recv().await {
        collected.extend(fks);
    }
    collected
}
