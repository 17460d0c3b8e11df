//! Component E, §4.4: the schema introspector. Three parameterized catalog
//! queries, one per metadata shape the copier needs. Table identifiers are
//! never interpolated into SQL text — they flow in as bind parameters; the
//! one place a caller-supplied name is embedded directly is `SELECT *
//! FROM [table]` during row streaming (§4.4's carve-out), which lives in
//! [`crate::copier`], not here.

use migrator_types::{ForeignKey, Table};

use super::SourceConnection;

/// Lists every base table in the source catalog, in catalog order.
/// Table-ignore filtering happens one layer up, in the runner, so this
/// function stays a pure reflection of what the catalog reports.
pub async fn list_base_tables(conn: &mut SourceConnection) -> Result<Vec<String>, tiberius::error::Error> {
    let rows = conn
        .simple_query(
            "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_TYPE = 'BASE TABLE'",
        )
        .await?
        .into_first_result()
        .await?;

    Ok(rows
        .iter()
        .filter_map(|row| row.get::<&str, _>("TABLE_NAME").map(str::to_owned))
        .collect())
}

/// Loads column descriptors for `table_name`, in ordinal position order.
pub async fn table_columns(
    conn: &mut SourceConnection,
    table_name: &str,
) -> Result<Vec<migrator_types::Column>, tiberius::error::Error> {
    let rows = conn
        .query(
            "SELECT ORDINAL_POSITION, COLUMN_NAME, DATA_TYPE, NUMERIC_PRECISION, NUMERIC_SCALE, IS_NULLABLE
             FROM INFORMATION_SCHEMA.COLUMNS
             WHERE TABLE_NAME = @P1
             ORDER BY ORDINAL_POSITION",
            &[&table_name],
        )
        .await?
        .into_first_result()
        .await?;

    Ok(rows
        .iter()
        .map(|row| {
            let position = row.get::<i32, _>("ORDINAL_POSITION").unwrap_or_default() as u32;
            let name = row.get::<&str, _>("COLUMN_NAME").unwrap_or_default();
            let data_type = catalog_type_to_source_type(row.get::<&str, _>("DATA_TYPE").unwrap_or_default());
            let precision = row.get::<u8, _>("NUMERIC_PRECISION").map(|p| p as u32);
            let scale = row.get::<i32, _>("NUMERIC_SCALE").map(|s| s as u32);
            let nullable = row.get::<&str, _>("IS_NULLABLE") == Some("YES");

            migrator_types::Column::new(position, name, data_type)
                .with_precision(precision, scale)
                .with_nullable(nullable)
        })
        .collect())
}

/// Rewrites a catalog-reported `DATA_TYPE` into the source type name the
/// Type Mapper expects. The source engine's rowversion type reports its
/// catalog name as `timestamp` (a historical synonym, not an actual
/// timestamp), which would otherwise collide with the real `TIMESTAMP`
/// column type after uppercasing; the mapper's `TIMESTAMP_SQL` sentinel
/// (§4.1) exists precisely to keep the two apart, so it has to be applied
/// here, at the only place the catalog's ambiguous spelling is seen.
fn catalog_type_to_source_type(data_type: &str) -> String {
    if data_type.eq_ignore_ascii_case("timestamp") {
        "TIMESTAMP_SQL".to_string()
    } else {
        data_type.to_string()
    }
}

/// Loads the primary key column list for `table_name`, in `key_ordinal`
/// order. Empty if the table has no primary key.
pub async fn primary_key_columns(
    conn: &mut SourceConnection,
    table_name: &str,
) -> Result<Vec<String>, tiberius::error::Error> {
    let rows = conn
        .query(
            "SELECT c.name AS column_name
             FROM sys.indexes i
             JOIN sys.index_columns ic ON ic.object_id = i.object_id AND ic.index_id = i.index_id
             JOIN sys.columns c ON c.object_id = ic.object_id AND c.column_id = ic.column_id
             JOIN sys.objects o ON o.object_id = i.object_id
             WHERE o.name = @P1 AND i.is_primary_key = 1
             ORDER BY ic.key_ordinal",
            &[&table_name],
        )
        .await?
        .into_first_result()
        .await?;

    Ok(rows
        .iter()
        .filter_map(|row| row.get::<&str, _>("column_name").map(str::to_owned))
        .collect())
}

/// Loads every foreign key declared on `table_name` as an origin.
pub async fn foreign_keys(
    conn: &mut SourceConnection,
    table_name: &str,
) -> Result<Vec<ForeignKey>, tiberius::error::Error> {
    let rows = conn
        .query(
            "SELECT
                origin_object.name AS origin_table,
                origin_column.name AS origin_column,
                referenced_object.name AS referenced_table,
                referenced_column.name AS referenced_column
             FROM sys.foreign_key_columns fkc
             JOIN sys.objects origin_object ON origin_object.object_id = fkc.parent_object_id
             JOIN sys.columns origin_column
                ON origin_column.object_id = fkc.parent_object_id
               AND origin_column.column_id = fkc.parent_column_id
             JOIN sys.objects referenced_object ON referenced_object.object_id = fkc.referenced_object_id
             JOIN sys.columns referenced_column
                ON referenced_column.object_id = fkc.referenced_object_id
               AND referenced_column.column_id = fkc.referenced_column_id
             WHERE origin_object.name = @P1",
            &[&table_name],
        )
        .await?
        .into_first_result()
        .await?;

    Ok(rows
        .iter()
        .map(|row| ForeignKey {
            origin_table: row.get::<&str, _>("origin_table").unwrap_or_default().to_string(),
            origin_column: row.get::<&str, _>("origin_column").unwrap_or_default().to_string(),
            referenced_table: row
                .get::<&str, _>("referenced_table")
                .unwrap_or_default()
                .to_string(),
            referenced_column: row
                .get::<&str, _>("referenced_column")
                .unwrap_or_default()
                .to_string(),
        })
        .collect())
}

/// Assembles a fully-described [`Table`] from the three queries above.
pub async fn describe_table(
    conn: &mut SourceConnection,
    table_name: &str,
) -> Result<Table, tiberius::error::Error> {
    let columns = table_columns(conn, table_name).await?;
    let pk_columns = primary_key_columns(conn, table_name).await?;

    let mut table = Table::new(table_name);
    table.columns = columns;
    table.primary_key = migrator_types::PrimaryKey { columns: pk_columns };
    Ok(table)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rowversion_catalog_spelling_is_rewritten_to_the_sentinel() {
        assert_eq!(catalog_type_to_source_type("timestamp"), "TIMESTAMP_SQL");
        assert_eq!(catalog_type_to_source_type("TIMESTAMP"), "TIMESTAMP_SQL");
    }

    #[test]
    fn test_other_catalog_types_pass_through_unchanged() {
        assert_eq!(catalog_type_to_source_type("varchar"), "varchar");
        assert_eq!(catalog_type_to_source_type("INT"), "INT");
    }
}
