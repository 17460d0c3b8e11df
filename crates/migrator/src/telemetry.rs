//! Structured logging setup and the per-run summary counters (§4.11),
//! grounded on the `agent` binary's `tracing_subscriber::FmtSubscriber`
//! block.

use std::sync::atomic::{AtomicU64, Ordering};

/// Installs a `tracing` subscriber that prints structured logs to stderr,
/// filtered by `RUST_LOG` (defaulting to `info`).
pub fn init() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        ))
        .with_ansi(!matches!(std::env::var("NO_COLOR"), Ok(v) if v == "1"))
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting tracing default failed");
}

/// Accumulates the counters an operator needs to detect a partial run
/// without combing through logs: tables copied vs. abandoned, rows
/// inserted vs. dropped, FKs installed vs. failed. Shared across workers
/// via `Arc`, so every field is a plain atomic rather than behind a mutex.
#[derive(Default)]
pub struct RunReport {
    pub tables_copied: AtomicU64,
    pub tables_abandoned: AtomicU64,
    pub rows_inserted: AtomicU64,
    pub rows_dropped: AtomicU64,
    pub fks_installed: AtomicU64,
    pub fks_failed: AtomicU64,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table_copied(&self) {
        self.tables_copied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn table_abandoned(&self) {
        self.tables_abandoned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rows_inserted(&self, n: u64) {
        self.rows_inserted.fetch_add(n, Ordering::Relaxed);
    }

    pub fn row_dropped(&self) {
        self.rows_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fk_installed(&self) {
        self.fks_installed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fk_failed(&self) {
        self.fks_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Logs the accumulated counters at `INFO`. Called once per source
    /// database and once more for the whole run.
    pub fn log_summary(&self, scope: &str) {
        tracing::info!(
            scope,
            tables_copied = self.tables_copied.load(Ordering::Relaxed),
            tables_abandoned = self.tables_abandoned.load(Ordering::Relaxed),
            rows_inserted = self.rows_inserted.load(Ordering::Relaxed),
            rows_dropped = self.rows_dropped.load(Ordering::Relaxed),
            fks_installed = self.fks_installed.load(Ordering::Relaxed),
            fks_failed = self.fks_failed.load(Ordering::Relaxed),
            "run summary"
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_counters_accumulate() {
        let report = RunReport::new();
        report.table_copied();
        report.table_copied();
        report.table_abandoned();
        report.rows_inserted(100);
        report.rows_inserted(50);
        report.row_dropped();
        report.fk_installed();
        report.fk_failed();

        assert_eq!(report.tables_copied.load(Ordering::Relaxed), 2);
        assert_eq!(report.tables_abandoned.load(Ordering::Relaxed), 1);
        assert_eq!(report.rows_inserted.load(Ordering::Relaxed), 150);
        assert_eq!(report.rows_dropped.load(Ordering::Relaxed), 1);
        assert_eq!(report.fks_installed.load(Ordering::Relaxed), 1);
        assert_eq!(report.fks_failed.load(Ordering::Relaxed), 1);
    }
}
