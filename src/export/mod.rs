//! Export module for StayKeeper
//!
//! - CSV: bookings and expenses (spreadsheet-compatible)
//! - JSON: machine-readable full database export

pub mod csv;
pub mod json;

pub use self::csv::{export_bookings_csv, export_expenses_csv};
pub use json::{export_full_json, import_from_json, ExportMetadata, FullExport, EXPORT_SCHEMA_VERSION};
