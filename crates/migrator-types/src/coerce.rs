//! Component B: the value coercer. Inspects both the runtime shape of a
//! scanned cell and the owning column's source type name, and produces a
//! target-safe [`CellValue`]. Grounded on the source driver's own
//! byte-to-SQL-literal formatting (see `DatabaseExtractor::fetch_tables`'s
//! sibling `format_column_value` in the migrator that inspired this type
//! system), generalized from "format as SQL text" to "coerce into a typed
//! cell".

use crate::model::{CellValue, RawCell};

/// Coerces one scanned cell into its target-safe representation.
///
/// `source_type` is the column's source type name (matched
/// case-insensitively, substring match for the binary/image family per
/// spec §4.2).
pub fn coerce(cell: RawCell, source_type: &str) -> CellValue {
    let upper = source_type.trim().to_uppercase();

    match cell {
        RawCell::Null => CellValue::Null,
        RawCell::Bytes(bytes) => coerce_bytes(bytes, &upper),
        RawCell::Text(text) => CellValue::Text(strip_null_bytes(&text)),
        RawCell::Bool(b) => CellValue::Bool(b),
        RawCell::Int(i) => CellValue::Int(i),
        RawCell::Float(f) => CellValue::Float(f),
        RawCell::Decimal(d) => CellValue::Decimal(d),
        RawCell::Date(d) => CellValue::Date(d),
        RawCell::Time(t) => CellValue::Time(t),
        RawCell::DateTime(dt) => CellValue::DateTime(dt),
    }
}

fn coerce_bytes(bytes: Vec<u8>, upper_source_type: &str) -> CellValue {
    if upper_source_type == "BIT" || upper_source_type == "BOOLEAN" {
        return CellValue::Bool(bytes.first() == Some(&0x01));
    }

    if upper_source_type == "UNIQUEIDENTIFIER" {
        return match bytes.len() {
            16 => CellValue::Uuid(format_guid(&bytes)),
            _ => CellValue::Null,
        };
    }

    if upper_source_type.contains("BINARY") || upper_source_type.contains("IMAGE") {
        return CellValue::Bytes(bytes);
    }

    match String::from_utf8(bytes) {
        Ok(text) => CellValue::Text(strip_null_bytes(&text)),
        Err(err) => CellValue::Text(strip_null_bytes(&String::from_utf8_lossy(err.as_bytes()))),
    }
}

/// Formats 16 raw bytes as a canonical lowercase 8-4-4-4-12 hex UUID.
fn format_guid(bytes: &[u8]) -> String {
    let hex = hex::encode(bytes);
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

/// Removes every 0x00 byte from `text`. The target engine rejects embedded
/// nulls in its text type; the source engine commonly stores them as a
/// padding artifact.
fn strip_null_bytes(text: &str) -> String {
    if text.contains('\0') {
        text.chars().filter(|&c| c != '\0').collect()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_null_passes_through() {
        assert_eq!(coerce(RawCell::Null, "INT"), CellValue::Null);
    }

    #[test]
    fn test_bit_byte_one_is_true_anything_else_is_false() {
        assert_eq!(
            coerce(RawCell::Bytes(vec![0x01]), "BIT"),
            CellValue::Bool(true)
        );
        assert_eq!(
            coerce(RawCell::Bytes(vec![0x00]), "BIT"),
            CellValue::Bool(false)
        );
        assert_eq!(
            coerce(RawCell::Bytes(vec![0x07]), "bit"),
            CellValue::Bool(false)
        );
    }

    #[test]
    fn test_uniqueidentifier_16_bytes_formats_canonical_uuid() {
        let bytes = vec![
            0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE,
            0xFF, 0x00,
        ];
        assert_eq!(
            coerce(RawCell::Bytes(bytes), "UNIQUEIDENTIFIER"),
            CellValue::Uuid("11223344-5566-7788-99aa-bbccddeeff00".to_string())
        );
    }

    #[test]
    fn test_uniqueidentifier_wrong_length_is_null() {
        assert_eq!(
            coerce(RawCell::Bytes(vec![0x01, 0x02]), "UNIQUEIDENTIFIER"),
            CellValue::Null
        );
    }

    #[test]
    fn test_binary_and_image_pass_through_as_bytes() {
        let bytes = vec![0xDE, 0xAD, 0xBE, 0xEF];
        assert_eq!(
            coerce(RawCell::Bytes(bytes.clone()), "VARBINARY"),
            CellValue::Bytes(bytes.clone())
        );
        assert_eq!(
            coerce(RawCell::Bytes(bytes.clone()), "IMAGE"),
            CellValue::Bytes(bytes)
        );
    }

    #[test]
    fn test_other_byte_sequence_decoded_as_text_with_nulls_stripped() {
        let bytes = b"hola\x00mundo".to_vec();
        assert_eq!(
            coerce(RawCell::Bytes(bytes), "VARCHAR"),
            CellValue::Text("holamundo".to_string())
        );
    }

    #[test]
    fn test_text_value_strips_null_bytes() {
        assert_eq!(
            coerce(RawCell::Text("hola\x00mundo".to_string()), "NVARCHAR"),
            CellValue::Text("holamundo".to_string())
        );
        assert_eq!(
            coerce(RawCell::Text("clean".to_string()), "NVARCHAR"),
            CellValue::Text("clean".to_string())
        );
    }

    #[test]
    fn test_no_target_text_cell_contains_a_null_byte() {
        let inputs = vec![
            RawCell::Text("a\0b\0c".to_string()),
            RawCell::Bytes(b"x\0y\0z".to_vec()),
        ];
        for input in inputs {
            match coerce(input, "TEXT") {
                CellValue::Text(t) => assert!(!t.contains('\0')),
                other => panic!("expected Text, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_scalar_shapes_pass_through_unchanged() {
        assert_eq!(coerce(RawCell::Int(42), "BIGINT"), CellValue::Int(42));
        assert_eq!(coerce(RawCell::Float(1.5), "FLOAT"), CellValue::Float(1.5));
        assert_eq!(coerce(RawCell::Bool(true), "BIT"), CellValue::Bool(true));
    }
}
