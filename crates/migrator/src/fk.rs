//! Component H, §4.7: the FK installer. Drains the foreign keys collected
//! across a source database's worker pool and applies each as a single
//! `ALTER TABLE ... ADD CONSTRAINT` statement, once all copies for that
//! database have finished. No topological sort is attempted; individual
//! failures are tolerated and logged.

use migrator_types::ForeignKey;
use sqlx::PgPool;

use crate::telemetry::RunReport;

pub async fn install_all(target: &PgPool, namespace: &str, foreign_keys: Vec<ForeignKey>, report: &RunReport) {
    for fk in foreign_keys {
        match install_one(target, namespace, &fk).await {
            Ok(()) => report.fk_installed(),
            Err(err) => {
                tracing::error!(
                    origin_table = fk.origin_table,
                    origin_column = fk.origin_column,
                    referenced_table = fk.referenced_table,
                    error = %err,
                    "failed to install foreign key"
                );
                report.fk_failed();
            }
        }
    }
}

async fn install_one(target: &PgPool, namespace: &str, fk: &ForeignKey) -> Result<(), sqlx::Error> {
    let constraint = migrator_types::foreign_key_name(&fk.origin_table, &fk.origin_column, &fk.referenced_table);
    let stmt = format!(
        "ALTER TABLE \"{namespace}\".\"{}\" ADD CONSTRAINT \"{constraint}\" FOREIGN KEY (\"{}\") REFERENCES \"{namespace}\".\"{}\" (\"{}\")",
        fk.origin_table, fk.origin_column, fk.referenced_table, fk.referenced_column
    );
    sqlx::query(&stmt).execute(target).await?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_constraint_name_matches_the_deterministic_scheme() {
        let fk = ForeignKey {
            origin_table: "orders".into(),
            origin_column: "customer_id".into(),
            referenced_table: "customers".into(),
            referenced_column: "id".into(),
        };
        let name = migrator_types::foreign_key_name(&fk.origin_table, &fk.origin_column, &fk.referenced_table);
        assert_eq!(name, "fk_orders_customer_id_customers");
    }
}
