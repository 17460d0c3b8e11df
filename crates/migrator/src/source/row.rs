//! Converts a `tiberius::Row` into the driver-agnostic [`RawCell`] sum type
//! the value coercer operates on. Adapted from `format_column_value` in the
//! `bitalizer` migrator's `database_extractor.rs`: that function formats
//! each `ColumnData` variant into a SQL literal string; this one formats it
//! into a typed cell instead, deferring the actual coercion decision to
//! `migrator_types::coerce`.
//!
//! BIT and UNIQUEIDENTIFIER are deliberately flattened to `RawCell::Bytes`
//! here even though `tiberius` hands back a typed `bool`/`Uuid` — the
//! coercer's contract (§4.2) is defined over raw byte sequences for these
//! two types, matching how a lower-level TDS reader would see them.

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use migrator_types::RawCell;
use std::str::FromStr;
use tiberius::{ColumnData, FromSql, Row};

pub fn row_to_raw_cells(row: Row) -> Vec<RawCell> {
    row.into_iter().map(column_data_to_raw_cell).collect()
}

fn column_data_to_raw_cell(data: ColumnData<'static>) -> RawCell {
    match data {
        ColumnData::Bit(Some(b)) => RawCell::Bytes(vec![if b { 0x01 } else { 0x00 }]),
        ColumnData::Bit(None) => RawCell::Null,

        ColumnData::Guid(Some(uuid)) => RawCell::Bytes(uuid.as_bytes().to_vec()),
        ColumnData::Guid(None) => RawCell::Null,

        ColumnData::Binary(Some(bytes)) => RawCell::Bytes(bytes.into_owned()),
        ColumnData::Binary(None) => RawCell::Null,

        ColumnData::String(Some(s)) => RawCell::Text(s.into_owned()),
        ColumnData::String(None) => RawCell::Null,

        ColumnData::U8(Some(n)) => RawCell::Int(n as i64),
        ColumnData::U8(None) => RawCell::Null,
        ColumnData::I16(Some(n)) => RawCell::Int(n as i64),
        ColumnData::I16(None) => RawCell::Null,
        ColumnData::I32(Some(n)) => RawCell::Int(n as i64),
        ColumnData::I32(None) => RawCell::Null,
        ColumnData::I64(Some(n)) => RawCell::Int(n),
        ColumnData::I64(None) => RawCell::Null,

        ColumnData::F32(Some(n)) => RawCell::Float(n as f64),
        ColumnData::F32(None) => RawCell::Null,
        ColumnData::F64(Some(n)) => RawCell::Float(n),
        ColumnData::F64(None) => RawCell::Null,

        ColumnData::Numeric(Some(n)) => BigDecimal::from_str(&n.to_string())
            .map(RawCell::Decimal)
            .unwrap_or(RawCell::Null),
        ColumnData::Numeric(None) => RawCell::Null,

        ColumnData::Date(Some(_)) => NaiveDate::from_sql(&data)
            .ok()
            .flatten()
            .map(RawCell::Date)
            .unwrap_or(RawCell::Null),
        ColumnData::Date(None) => RawCell::Null,
        ColumnData::Time(Some(_)) => NaiveTime::from_sql(&data)
            .ok()
            .flatten()
            .map(RawCell::Time)
            .unwrap_or(RawCell::Null),
        ColumnData::Time(None) => RawCell::Null,
        ColumnData::SmallDateTime(Some(_)) => NaiveDateTime::from_sql(&data)
            .ok()
            .flatten()
            .map(RawCell::DateTime)
            .unwrap_or(RawCell::Null),
        ColumnData::SmallDateTime(None) => RawCell::Null,
        ColumnData::DateTime(Some(_)) => NaiveDateTime::from_sql(&data)
            .ok()
            .flatten()
            .map(RawCell::DateTime)
            .unwrap_or(RawCell::Null),
        ColumnData::DateTime(None) => RawCell::Null,
        ColumnData::DateTime2(Some(_)) => NaiveDateTime::from_sql(&data)
            .ok()
            .flatten()
            .map(RawCell::DateTime)
            .unwrap_or(RawCell::Null),
        ColumnData::DateTime2(None) => RawCell::Null,
        ColumnData::DateTimeOffset(Some(_)) => chrono::DateTime::<Utc>::from_sql(&data)
            .ok()
            .flatten()
            .map(|dt| RawCell::DateTime(dt.naive_utc()))
            .unwrap_or(RawCell::Null),
        ColumnData::DateTimeOffset(None) => RawCell::Null,

        ColumnData::Xml(Some(xml)) => RawCell::Text(xml.to_string()),
        ColumnData::Xml(None) => RawCell::Null,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_bit_flattens_to_bytes() {
        assert_eq!(
            column_data_to_raw_cell(ColumnData::Bit(Some(true))),
            RawCell::Bytes(vec![0x01])
        );
        assert_eq!(
            column_data_to_raw_cell(ColumnData::Bit(Some(false))),
            RawCell::Bytes(vec![0x00])
        );
        assert_eq!(column_data_to_raw_cell(ColumnData::Bit(None)), RawCell::Null);
    }

    #[test]
    fn test_guid_flattens_to_16_raw_bytes() {
        let uuid = uuid::Uuid::from_bytes([
            0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE,
            0xFF, 0x00,
        ]);
        match column_data_to_raw_cell(ColumnData::Guid(Some(uuid))) {
            RawCell::Bytes(bytes) => assert_eq!(bytes.len(), 16),
            other => panic!("expected Bytes, got {other:?}"),
        }
    }

    #[test]
    fn test_string_and_numeric_pass_through() {
        assert_eq!(
            column_data_to_raw_cell(ColumnData::String(Some("hi".into()))),
            RawCell::Text("hi".to_string())
        );
        assert_eq!(column_data_to_raw_cell(ColumnData::I32(Some(7))), RawCell::Int(7));
    }
}
