//! Pure, side-effect-free logic shared between the migrator's source and
//! target halves: the data model, the type mapper, the value coercer, the
//! table ignore policy, and deterministic constraint naming. Nothing in
//! this crate opens a connection or performs I/O — it is exercised
//! directly by unit tests and driven by `migrator`'s runtime components.

pub mod coerce;
pub mod constraint;
pub mod ignore;
pub mod model;
pub mod type_map;

pub use coerce::coerce;
pub use constraint::{foreign_key_name, primary_key_name};
pub use ignore::is_ignored;
pub use model::{CellValue, Column, ForeignKey, Namespace, PrimaryKey, RawCell, Row, SourceDatabase, Table};
pub use type_map::{map_type, TargetType};
