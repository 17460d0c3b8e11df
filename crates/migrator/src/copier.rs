//! Component F, §4.5: the table copier. The source-side streaming loop is
//! grounded on the `bitalizer` migrator's `fetch_tables`/row-walking shape
//! in `database_extractor.rs`; the target-side batched-transaction pattern
//! follows the teacher's transaction-scoped query style in `agent-sql`.

use std::time::Duration;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use futures::TryStreamExt;
use migrator_types::{CellValue, Column, ForeignKey, Table};
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{PgPool, Postgres};

use crate::config::Config;
use crate::source::row::row_to_raw_cells;
use crate::source::{introspect, SourcePool};
use crate::telemetry::RunReport;

/// Copies one source table into `namespace`, returning the foreign keys it
/// declares. A table abandoned at any guaranteed-effect boundary (§4.5)
/// contributes no rows and no foreign keys.
pub async fn copy_table(
    source: &SourcePool,
    target: &PgPool,
    config: &Config,
    namespace: &str,
    table_name: &str,
    report: &RunReport,
) -> Vec<ForeignKey> {
    let table = match open_source_cursor(source, table_name, config).await {
        Some(table) => table,
        None => {
            tracing::error!(table = table_name, "abandoning table: source cursor retries exhausted");
            report.table_abandoned();
            return Vec::new();
        }
    };

    if let Err(err) = recreate_target_table(target, namespace, &table).await {
        tracing::error!(table = table_name, error = %err, "abandoning table: DDL failure");
        report.table_abandoned();
        return Vec::new();
    }

    match stream_rows(source, target, config, namespace, &table, report).await {
        Ok(rows) => {
            report.rows_inserted(rows);
            tracing::info!(table = table_name, rows, "table copy complete");
        }
        Err(err) => {
            tracing::error!(table = table_name, error = %err, "table copy aborted mid-stream");
        }
    }

    if !table.primary_key.is_empty() {
        if let Err(err) = install_primary_key(target, namespace, &table).await {
            tracing::error!(table = table_name, error = %err, "failed to install primary key; table kept without one");
        }
    }

    report.table_copied();
    foreign_keys_for(source, table_name).await
}

/// Step 1: opens the source cursor, retrying up to `config.max_retries`
/// times with linear backoff. A successful attempt also carries back the
/// catalog-reported column descriptors the rest of the copy needs.
async fn open_source_cursor(source: &SourcePool, table_name: &str, config: &Config) -> Option<Table> {
    for attempt in 1..=config.max_retries {
        let outcome = match source.get().await {
            Ok(mut conn) => introspect::describe_table(&mut conn, table_name).await.map_err(|e| e.to_string()),
            Err(err) => Err(err.to_string()),
        };

        match outcome {
            Ok(table) => return Some(table),
            Err(err) => {
                tracing::warn!(table = table_name, attempt, error = %err, "source cursor attempt failed");
                tokio::time::sleep(Duration::from_millis(500 * attempt as u64)).await;
            }
        }
    }
    None
}

/// Steps 2-3: derives the target column list via the Type Mapper, drops
/// the target table with cascade, and recreates it.
async fn recreate_target_table(target: &PgPool, namespace: &str, table: &Table) -> Result<(), sqlx::Error> {
    let qualified = qualified_name(namespace, &table.name);

    sqlx::query(&format!("DROP TABLE IF EXISTS {qualified} CASCADE"))
        .execute(target)
        .await?;

    let columns_sql = table
        .columns
        .iter()
        .map(|col| format!("\"{}\" {}", col.name, target_type_for(col)))
        .collect::<Vec<_>>()
        .join(", ");

    sqlx::query(&format!("CREATE TABLE {qualified} ({columns_sql})"))
        .execute(target)
        .await?;

    Ok(())
}

/// Steps 4-6: streams rows from the source cursor, coercing each cell and
/// inserting it inside a transaction that recommits every `batch_size`
/// rows. Individual row-insert failures are swallowed and counted (§7);
/// a mid-stream network failure aborts the copy and propagates, per the
/// design notes' distinction between cursor-open retries and mid-stream
/// recovery (none).
async fn stream_rows(
    source: &SourcePool,
    target: &PgPool,
    config: &Config,
    namespace: &str,
    table: &Table,
    report: &RunReport,
) -> anyhow::Result<u64> {
    let mut conn = source.get().await?;
    let select_stmt = format!("SELECT * FROM [{}]", table.name);
    let stream = conn.simple_query(select_stmt).await?.into_row_stream();
    futures::pin_mut!(stream);

    let target_types: Vec<String> = table.columns.iter().map(|c| target_type_for(c).0).collect();
    let insert_stmt = build_insert_statement(namespace, table);

    let mut txn = target.begin().await?;
    disable_sync_commit(&mut txn).await?;

    let mut total_inserted: u64 = 0;
    let mut in_batch: usize = 0;

    while let Some(row) = stream.try_next().await? {
        let values: Vec<CellValue> = row_to_raw_cells(row)
            .into_iter()
            .zip(table.columns.iter())
            .map(|(cell, col)| migrator_types::coerce(cell, &col.source_type))
            .collect();

        let mut query = sqlx::query(&insert_stmt);
        for (value, target_type) in values.iter().zip(target_types.iter()) {
            query = bind_cell(query, target_type, value);
        }

        match query.execute(&mut *txn).await {
            Ok(_) => total_inserted += 1,
            Err(err) => {
                tracing::warn!(table = table.name, error = %err, "row insert failed, skipping");
                report.row_dropped();
            }
        }

        in_batch += 1;
        if in_batch >= config.batch_size {
            txn.commit().await?;
            txn = target.begin().await?;
            disable_sync_commit(&mut txn).await?;
            in_batch = 0;
        }
    }

    txn.commit().await?;
    Ok(total_inserted)
}

async fn disable_sync_commit(txn: &mut sqlx::Transaction<'_, Postgres>) -> Result<(), sqlx::Error> {
    sqlx::query("SET LOCAL synchronous_commit = off").execute(&mut **txn).await?;
    Ok(())
}

/// Step 7: installs the primary key under its deterministic name, if the
/// table has one.
async fn install_primary_key(target: &PgPool, namespace: &str, table: &Table) -> Result<(), sqlx::Error> {
    let constraint = migrator_types::primary_key_name(namespace, &table.name);
    let columns = table
        .primary_key
        .columns
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ");

    let stmt = format!(
        "ALTER TABLE {} ADD CONSTRAINT \"{constraint}\" PRIMARY KEY ({columns})",
        qualified_name(namespace, &table.name)
    );
    sqlx::query(&stmt).execute(target).await?;
    Ok(())
}

/// Step 8: collects the table's declared foreign keys for the pool's
/// collector channel. Best-effort: a failure here loses only this table's
/// foreign keys, not its data.
async fn foreign_keys_for(source: &SourcePool, table_name: &str) -> Vec<ForeignKey> {
    let mut conn = match source.get().await {
        Ok(conn) => conn,
        Err(err) => {
            tracing::warn!(table = table_name, error = %err, "failed to acquire connection for foreign key collection");
            return Vec::new();
        }
    };

    match introspect::foreign_keys(&mut conn, table_name).await {
        Ok(fks) => fks,
        Err(err) => {
            tracing::warn!(table = table_name, error = %err, "failed to collect foreign keys");
            Vec::new()
        }
    }
}

fn target_type_for(col: &Column) -> migrator_types::TargetType {
    migrator_types::map_type(&col.source_type, col.precision, col.scale)
}

fn qualified_name(namespace: &str, table: &str) -> String {
    format!("\"{namespace}\".\"{table}\"")
}

fn build_insert_statement(namespace: &str, table: &Table) -> String {
    let columns = table
        .columns
        .iter()
        .map(|c| format!("\"{}\"", c.name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=table.columns.len())
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {} ({columns}) VALUES ({placeholders})",
        qualified_name(namespace, &table.name)
    )
}

/// Binds one coerced cell against its target column's declared type.
/// Dispatching on the target type (rather than the `CellValue` variant
/// alone) is what lets a `Null` cell bind as a correctly-typed SQL null:
/// Postgres infers each unadorned `$n` placeholder's type from the
/// `INSERT`'s target column, so the bound Rust value must already match it.
fn bind_cell<'q>(
    query: Query<'q, Postgres, PgArguments>,
    target_type: &str,
    cell: &CellValue,
) -> Query<'q, Postgres, PgArguments> {
    match target_type {
        "BOOLEAN" => query.bind(as_bool(cell)),
        "SMALLINT" => query.bind(as_i16(cell)),
        "INTEGER" => query.bind(as_i32(cell)),
        "BIGINT" => query.bind(as_i64(cell)),
        "REAL" => query.bind(as_f32(cell)),
        "DOUBLE PRECISION" => query.bind(as_f64(cell)),
        "DATE" => query.bind(as_date(cell)),
        "TIMESTAMP" => query.bind(as_datetime(cell)),
        "TIME" => query.bind(as_time(cell)),
        "BYTEA" => query.bind(as_bytes(cell)),
        "UUID" => query.bind(as_uuid(cell)),
        t if t.starts_with("NUMERIC") => query.bind(as_decimal(cell)),
        _ => query.bind(as_text(cell)),
    }
}

fn as_bool(cell: &CellValue) -> Option<bool> {
    match cell {
        CellValue::Bool(b) => Some(*b),
        _ => None,
    }
}

fn as_i16(cell: &CellValue) -> Option<i16> {
    match cell {
        CellValue::Int(n) => Some(*n as i16),
        _ => None,
    }
}

fn as_i32(cell: &CellValue) -> Option<i32> {
    match cell {
        CellValue::Int(n) => Some(*n as i32),
        _ => None,
    }
}

fn as_i64(cell: &CellValue) -> Option<i64> {
    match cell {
        CellValue::Int(n) => Some(*n),
        _ => None,
    }
}

fn as_f32(cell: &CellValue) -> Option<f32> {
    match cell {
        CellValue::Float(f) => Some(*f as f32),
        _ => None,
    }
}

fn as_f64(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Float(f) => Some(*f),
        _ => None,
    }
}

fn as_decimal(cell: &CellValue) -> Option<BigDecimal> {
    match cell {
        CellValue::Decimal(d) => Some(d.clone()),
        _ => None,
    }
}

fn as_text(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Text(s) => Some(s.clone()),
        _ => None,
    }
}

fn as_bytes(cell: &CellValue) -> Option<Vec<u8>> {
    match cell {
        CellValue::Bytes(b) => Some(b.clone()),
        _ => None,
    }
}

fn as_uuid(cell: &CellValue) -> Option<uuid::Uuid> {
    match cell {
        CellValue::Uuid(s) => uuid::Uuid::parse_str(s).ok(),
        _ => None,
    }
}

fn as_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(d) => Some(*d),
        _ => None,
    }
}

fn as_time(cell: &CellValue) -> Option<NaiveTime> {
    match cell {
        CellValue::Time(t) => Some(*t),
        _ => None,
    }
}

fn as_datetime(cell: &CellValue) -> Option<NaiveDateTime> {
    match cell {
        CellValue::DateTime(dt) => Some(*dt),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_qualified_name_quotes_both_parts() {
        assert_eq!(qualified_name("tenant_a", "orders"), "\"tenant_a\".\"orders\"");
    }

    #[test]
    fn test_build_insert_statement_numbers_placeholders_in_order() {
        let mut table = Table::new("orders");
        table.columns = vec![Column::new(1, "id", "INT"), Column::new(2, "name", "VARCHAR")];
        let stmt = build_insert_statement("tenant_a", &table);
        assert_eq!(
            stmt,
            "INSERT INTO \"tenant_a\".\"orders\" (\"id\", \"name\") VALUES ($1, $2)"
        );
    }

    #[test]
    fn test_null_binds_as_the_typed_none_for_its_target_type() {
        assert_eq!(as_i32(&CellValue::Null), None);
        assert_eq!(as_i32(&CellValue::Int(7)), Some(7));
        assert_eq!(as_text(&CellValue::Null), None);
    }

    #[test]
    fn test_uuid_cell_parses_into_a_real_uuid_type() {
        let cell = CellValue::Uuid("11223344-5566-7788-99aa-bbccddeeff00".to_string());
        assert!(as_uuid(&cell).is_some());
        assert_eq!(as_uuid(&CellValue::Text("not-a-uuid".into())), None);
    }

    #[test]
    fn test_decimal_cell_clones_through() {
        let decimal = BigDecimal::from(42);
        let cell = CellValue::Decimal(decimal.clone());
        assert_eq!(as_decimal(&cell), Some(decimal));
    }
}
