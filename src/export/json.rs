//! JSON export
//!
//! Exports every collection to a single JSON document with schema versioning.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StayError, StayResult};
use crate::models::{
    Booking, Contact, FixedExpense, Guest, Inquiry, Property, Unit, VariableExpense,
};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full database export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub properties: Vec<Property>,
    pub units: Vec<Unit>,
    pub guests: Vec<Guest>,
    pub bookings: Vec<Booking>,
    pub fixed_expenses: Vec<FixedExpense>,
    pub variable_expenses: Vec<VariableExpense>,
    pub contacts: Vec<Contact>,
    pub inquiries: Vec<Inquiry>,

    pub metadata: ExportMetadata,
}

/// Counts and date span, for a quick look without parsing everything
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub property_count: usize,
    pub unit_count: usize,
    pub booking_count: usize,
    pub expense_count: usize,
    pub earliest_booking: Option<NaiveDate>,
    pub latest_booking: Option<NaiveDate>,
}

impl FullExport {
    pub fn from_storage(storage: &Storage) -> StayResult<Self> {
        let properties = storage.properties.get_all()?;
        let units = storage.units.get_all()?;
        let guests = storage.guests.get_all()?;
        let bookings = storage.bookings.get_all()?;
        let fixed_expenses = storage.fixed_expenses.get_all()?;
        let variable_expenses = storage.variable_expenses.get_all()?;
        let contacts = storage.contacts.get_all()?;
        let inquiries = storage.inquiries.get_all()?;

        let metadata = ExportMetadata {
            property_count: properties.len(),
            unit_count: units.len(),
            booking_count: bookings.len(),
            expense_count: fixed_expenses.len() + variable_expenses.len(),
            earliest_booking: bookings.iter().map(|b| b.start_date).min(),
            latest_booking: bookings.iter().map(|b| b.end_date).max(),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            properties,
            units,
            guests,
            bookings,
            fixed_expenses,
            variable_expenses,
            contacts,
            inquiries,
            metadata,
        })
    }

    /// Check the schema version and that every reference resolves
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let property_ids: HashSet<_> = self.properties.iter().map(|p| p.id).collect();
        let unit_ids: HashSet<_> = self.units.iter().map(|u| u.id).collect();
        let guest_ids: HashSet<_> = self.guests.iter().map(|g| g.id).collect();
        let contact_ids: HashSet<_> = self.contacts.iter().map(|c| c.id).collect();

        for unit in &self.units {
            if !property_ids.contains(&unit.property_id) {
                return Err(format!(
                    "Unit {} references unknown property {}",
                    unit.id, unit.property_id
                ));
            }
        }

        for booking in &self.bookings {
            if !unit_ids.contains(&booking.unit_id) {
                return Err(format!(
                    "Booking {} references unknown unit {}",
                    booking.id, booking.unit_id
                ));
            }
            if !guest_ids.contains(&booking.guest_id) {
                return Err(format!(
                    "Booking {} references unknown guest {}",
                    booking.id, booking.guest_id
                ));
            }
        }

        let expense_refs = self
            .fixed_expenses
            .iter()
            .map(|e| (e.id.to_string(), e.property_id))
            .chain(
                self.variable_expenses
                    .iter()
                    .map(|e| (e.id.to_string(), e.property_id)),
            );
        for (id, property_id) in expense_refs {
            if !property_ids.contains(&property_id) {
                return Err(format!(
                    "Expense {} references unknown property {}",
                    id, property_id
                ));
            }
        }

        for inquiry in &self.inquiries {
            if !contact_ids.contains(&inquiry.contact_id) {
                return Err(format!(
                    "Inquiry {} references unknown contact {}",
                    inquiry.id, inquiry.contact_id
                ));
            }
        }

        Ok(())
    }
}

/// Export the full database to JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: &mut W, pretty: bool) -> StayResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| StayError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a JSON export
pub fn import_from_json(json_str: &str) -> StayResult<FullExport> {
    let export: FullExport = serde_json::from_str(json_str)
        .map_err(|e| StayError::Export(format!("Invalid JSON export: {}", e)))?;
    export.validate().map_err(StayError::Export)?;
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::StayPaths;
    use crate::storage::seed_demo_data;
    use tempfile::TempDir;

    fn seeded_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::open(StayPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        seed_demo_data(&storage).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_full_export_counts() {
        let (_temp, storage) = seeded_storage();
        let export = FullExport::from_storage(&storage).unwrap();

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.metadata.property_count, 2);
        assert_eq!(export.metadata.unit_count, 6);
        assert_eq!(export.metadata.booking_count, 5);
        assert_eq!(export.metadata.expense_count, 9);
        assert!(export.validate().is_ok());
    }

    #[test]
    fn test_export_then_import() {
        let (_temp, storage) = seeded_storage();
        let mut buffer = Vec::new();
        export_full_json(&storage, &mut buffer, true).unwrap();

        let imported = import_from_json(&String::from_utf8(buffer).unwrap()).unwrap();
        assert_eq!(imported.bookings.len(), 5);
        assert_eq!(imported.inquiries.len(), 2);
    }

    #[test]
    fn test_validate_catches_dangling_unit() {
        let (_temp, storage) = seeded_storage();
        let mut export = FullExport::from_storage(&storage).unwrap();
        export.units.clear();

        let err = export.validate().unwrap_err();
        assert!(err.contains("unknown unit"));
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let (_temp, storage) = seeded_storage();
        let mut export = FullExport::from_storage(&storage).unwrap();
        export.schema_version = "0.1.0".into();
        assert!(export.validate().unwrap_err().contains("Schema version mismatch"));
    }
}
