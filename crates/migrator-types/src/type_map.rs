//! Pure mapping from a source column's type descriptor to a target column
//! declaration. See spec §4.1: width/length is deliberately dropped because
//! the target engine's variable-width text is free and avoids truncation
//! risk during coercion.

/// A target column type declaration, ready to be embedded into a
/// `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetType(pub String);

impl std::fmt::Display for TargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps a source type name (matched case-insensitively) plus optional
/// decimal precision/scale to a target type declaration.
///
/// `TIMESTAMP_SQL` distinguishes the source engine's row-version type
/// (binary) from an actual timestamp column named `TIMESTAMP`.
pub fn map_type(source_type: &str, precision: Option<u32>, scale: Option<u32>) -> TargetType {
    let upper = source_type.trim().to_uppercase();

    let mapped = match upper.as_str() {
        "TINYINT" | "SMALLINT" => "SMALLINT".to_string(),
        "INT" | "INTEGER" => "INTEGER".to_string(),
        "BIGINT" => "BIGINT".to_string(),
        "BIT" => "BOOLEAN".to_string(),
        "REAL" => "REAL".to_string(),
        "FLOAT" => "DOUBLE PRECISION".to_string(),
        "DECIMAL" | "NUMERIC" | "MONEY" | "SMALLMONEY" => match precision {
            Some(p) if p > 0 => format!("NUMERIC({p},{})", scale.unwrap_or(0)),
            _ => "NUMERIC".to_string(),
        },
        "DATE" => "DATE".to_string(),
        "DATETIME" | "DATETIME2" | "SMALLDATETIME" => "TIMESTAMP".to_string(),
        "TIME" => "TIME".to_string(),
        "CHAR" | "NCHAR" | "VARCHAR" | "NVARCHAR" | "TEXT" | "NTEXT" | "SYSNAME" => {
            "TEXT".to_string()
        }
        "BINARY" | "VARBINARY" | "IMAGE" | "TIMESTAMP_SQL" => "BYTEA".to_string(),
        "UNIQUEIDENTIFIER" => "UUID".to_string(),
        _ => "TEXT".to_string(),
    };

    TargetType(mapped)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_integer_family() {
        for (src, want) in [
            ("TINYINT", "SMALLINT"),
            ("smallint", "SMALLINT"),
            ("Int", "INTEGER"),
            ("INTEGER", "INTEGER"),
            ("BIGINT", "BIGINT"),
        ] {
            assert_eq!(map_type(src, None, None).0, want, "source type {src}");
        }
    }

    #[test]
    fn test_bit_maps_to_boolean() {
        assert_eq!(map_type("BIT", None, None).0, "BOOLEAN");
    }

    #[test]
    fn test_decimal_family_with_and_without_precision() {
        assert_eq!(map_type("DECIMAL", Some(18), Some(4)).0, "NUMERIC(18,4)");
        assert_eq!(map_type("NUMERIC", Some(0), None).0, "NUMERIC");
        assert_eq!(map_type("NUMERIC", None, None).0, "NUMERIC");
        assert_eq!(map_type("MONEY", Some(19), Some(4)).0, "NUMERIC(19,4)");
        assert_eq!(map_type("SMALLMONEY", None, None).0, "NUMERIC");
    }

    #[test]
    fn test_date_and_time_family() {
        assert_eq!(map_type("DATE", None, None).0, "DATE");
        assert_eq!(map_type("DATETIME", None, None).0, "TIMESTAMP");
        assert_eq!(map_type("DATETIME2", None, None).0, "TIMESTAMP");
        assert_eq!(map_type("SMALLDATETIME", None, None).0, "TIMESTAMP");
        assert_eq!(map_type("TIME", None, None).0, "TIME");
    }

    #[test]
    fn test_text_family_collapses_width() {
        for src in ["CHAR", "NCHAR", "VARCHAR", "NVARCHAR", "TEXT", "NTEXT", "SYSNAME"] {
            assert_eq!(map_type(src, Some(50), None).0, "TEXT", "source type {src}");
        }
    }

    #[test]
    fn test_binary_family_including_row_version() {
        for src in ["BINARY", "VARBINARY", "IMAGE", "TIMESTAMP_SQL"] {
            assert_eq!(map_type(src, None, None).0, "BYTEA", "source type {src}");
        }
    }

    #[test]
    fn test_uniqueidentifier_maps_to_uuid() {
        assert_eq!(map_type("UNIQUEIDENTIFIER", None, None).0, "UUID");
    }

    #[test]
    fn test_unknown_type_falls_back_to_text() {
        assert_eq!(map_type("XML", None, None).0, "TEXT");
        assert_eq!(map_type("GEOGRAPHY", None, None).0, "TEXT");
    }

    #[test]
    fn test_mapping_is_case_insensitive() {
        assert_eq!(map_type("bit", None, None), map_type("BIT", None, None));
        assert_eq!(
            map_type("uniqueidentifier", None, None),
            map_type("UNIQUEIDENTIFIER", None, None)
        );
    }
}
