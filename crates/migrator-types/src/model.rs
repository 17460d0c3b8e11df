use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Name of a source relational catalog, one-to-one with a target [`Namespace`].
pub type SourceDatabase = String;

/// Name of a logical grouping of tables inside the target database, one per
/// source database. Namespaces are created lazily by the runner before any
/// table belonging to them is created.
pub type Namespace = String;

/// One column of a source table, in catalog declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// 1-based ordinal position as reported by the source catalog.
    pub position: u32,
    /// Sanitized name: quotes stripped, whitespace trimmed.
    pub name: String,
    /// Source type name, e.g. `"varchar"`, `"DECIMAL"`. Case as reported by
    /// the driver; callers normalize before matching against it.
    pub source_type: String,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub nullable: bool,
}

impl Column {
    pub fn new(position: u32, name: impl Into<String>, source_type: impl Into<String>) -> Self {
        Column {
            position,
            name: sanitize_identifier(&name.into()),
            source_type: source_type.into(),
            precision: None,
            scale: None,
            nullable: true,
        }
    }

    pub fn with_precision(mut self, precision: Option<u32>, scale: Option<u32>) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

/// Strips double quotes and trims surrounding whitespace, per the data model
/// invariant that source catalogs sometimes return padded or quoted names.
pub fn sanitize_identifier(raw: &str) -> String {
    raw.trim().replace('"', "")
}

/// An ordered, possibly-empty primary key over one or more columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimaryKey {
    pub columns: Vec<String>,
}

impl PrimaryKey {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A single foreign key edge, collected during a table's copy and installed
/// globally once every table in the source database has been copied.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub origin_table: String,
    pub origin_column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

/// A source table and everything the copier needs to know about its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub primary_key: PrimaryKey,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Table {
            name: sanitize_identifier(&name.into()),
            columns: Vec::new(),
            primary_key: PrimaryKey::default(),
        }
    }
}

/// The exhaustive shape of a value as it comes off the source driver, before
/// coercion. Modeled as a tagged variant rather than relying on ambient
/// reflection over the driver's own type, per the design notes: the source
/// driver hands back cells as a sum of null/bytes/text/bool/numeric/time.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Null,
    Bytes(Vec<u8>),
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(BigDecimal),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

/// A value that has been coerced into a shape the target engine accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(BigDecimal),
    Text(String),
    Bytes(Vec<u8>),
    Uuid(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

/// An ordered tuple of cell values; arity always equals the owning table's
/// column count, in creation order.
pub type Row = Vec<CellValue>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sanitize_identifier_strips_quotes_and_whitespace() {
        assert_eq!(sanitize_identifier("  \"orders\"  "), "orders");
        assert_eq!(sanitize_identifier("plain"), "plain");
    }

    #[test]
    fn test_column_new_sanitizes_name() {
        let col = Column::new(1, " \"id\" ", "INT");
        assert_eq!(col.name, "id");
        assert_eq!(col.position, 1);
        assert!(col.nullable);
    }

    #[test]
    fn test_primary_key_is_empty() {
        assert!(PrimaryKey::default().is_empty());
        assert!(!PrimaryKey {
            columns: vec!["id".into()]
        }
        .is_empty());
    }
}
