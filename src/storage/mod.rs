//! Storage layer for StayKeeper
//!
//! Provides JSON file storage with atomic writes, one file per entity type,
//! and an append-only audit log of every mutation.

pub mod bookings;
pub mod file_io;
pub mod init;
pub mod memory;
pub mod repository;
pub mod store;

pub use bookings::BookingRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::{initialize_storage, seed_demo_data};
pub use memory::MemoryStore;
pub use repository::{JsonRepository, Record};
pub use store::{BookingStore, ExpenseStore};

use chrono::NaiveDate;
use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::StayPaths;
use crate::error::StayResult;
use crate::models::{
    Booking, BookingId, Contact, DateWindow, FixedExpense, Guest, Inquiry, Property, PropertyId,
    Unit, UnitId, VariableExpense,
};

use store::is_generated_match;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: StayPaths,
    audit: AuditLogger,
    pub properties: JsonRepository<Property>,
    pub units: JsonRepository<Unit>,
    pub guests: JsonRepository<Guest>,
    pub bookings: BookingRepository,
    pub fixed_expenses: JsonRepository<FixedExpense>,
    pub variable_expenses: JsonRepository<VariableExpense>,
    pub contacts: JsonRepository<Contact>,
    pub inquiries: JsonRepository<Inquiry>,
}

impl Storage {
    /// Create a new Storage instance; nothing is read until [`Storage::load_all`]
    pub fn new(paths: StayPaths) -> StayResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            properties: JsonRepository::new(paths.properties_file()),
            units: JsonRepository::new(paths.units_file()),
            guests: JsonRepository::new(paths.guests_file()),
            bookings: BookingRepository::new(paths.bookings_file()),
            fixed_expenses: JsonRepository::new(paths.fixed_expenses_file()),
            variable_expenses: JsonRepository::new(paths.variable_expenses_file()),
            contacts: JsonRepository::new(paths.contacts_file()),
            inquiries: JsonRepository::new(paths.inquiries_file()),
            paths,
        })
    }

    /// Create and load in one step
    pub fn open(paths: StayPaths) -> StayResult<Self> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &StayPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> StayResult<()> {
        self.properties.load()?;
        self.units.load()?;
        self.guests.load()?;
        self.bookings.load()?;
        self.fixed_expenses.load()?;
        self.variable_expenses.load()?;
        self.contacts.load()?;
        self.inquiries.load()?;
        tracing::debug!(base_dir = %self.paths.base_dir().display(), "storage loaded");
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> StayResult<()> {
        self.properties.save()?;
        self.units.save()?;
        self.guests.save()?;
        self.bookings.save()?;
        self.fixed_expenses.save()?;
        self.variable_expenses.save()?;
        self.contacts.save()?;
        self.inquiries.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> StayResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> StayResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> StayResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}

impl BookingStore for Storage {
    fn bookings_for_unit(
        &self,
        unit_id: UnitId,
        exclude: Option<BookingId>,
    ) -> StayResult<Vec<Booking>> {
        let mut bookings = self.bookings.get_by_unit(unit_id)?;
        if let Some(excluded) = exclude {
            bookings.retain(|b| b.id != excluded);
        }
        Ok(bookings)
    }
}

impl ExpenseStore for Storage {
    fn active_fixed_expenses(&self, as_of: NaiveDate) -> StayResult<Vec<FixedExpense>> {
        self.fixed_expenses.filter(|e| e.is_active(as_of))
    }

    fn find_generated_expense(
        &self,
        property_id: PropertyId,
        unit_id: Option<UnitId>,
        description: &str,
        window: DateWindow,
    ) -> StayResult<Option<VariableExpense>> {
        let found = self.variable_expenses.filter(|e| {
            is_generated_match(e, property_id, unit_id, description, window)
        })?;
        Ok(found.into_iter().next())
    }

    fn create_variable_expense(&self, expense: VariableExpense) -> StayResult<VariableExpense> {
        self.variable_expenses.upsert(expense.clone())?;
        self.variable_expenses.save()?;
        // already persisted, so an audit failure is not a creation failure
        if let Err(e) = self.log_create(
            EntityType::VariableExpense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        ) {
            tracing::warn!(
                expense_id = %expense.id,
                error = %e,
                "audit append failed for generated expense"
            );
        }
        Ok(expense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Recurrence};
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StayPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_create_variable_expense_persists_and_audits() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StayPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths.clone()).unwrap();

        let property = PropertyId::new();
        let expense = VariableExpense::new(
            property,
            date(2024, 8, 1),
            "[Auto] Affitto",
            Money::from_units(1500),
            "Monthly fixed",
        );
        storage.create_variable_expense(expense).unwrap();

        let reopened = Storage::open(paths).unwrap();
        let window = DateWindow::month_of(date(2024, 8, 20)).unwrap();
        assert!(reopened
            .find_generated_expense(property, None, "[Auto] Affitto", window)
            .unwrap()
            .is_some());
        assert_eq!(reopened.audit().read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_create_variable_expense_survives_audit_failure() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StayPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths.clone()).unwrap();
        // a directory where the log file should be makes every append fail
        std::fs::create_dir_all(paths.audit_log()).unwrap();

        let property = PropertyId::new();
        let expense = VariableExpense::new(
            property,
            date(2024, 8, 1),
            "[Auto] Affitto",
            Money::from_units(1500),
            "Monthly fixed",
        );
        let created = storage.create_variable_expense(expense).unwrap();

        let reopened = Storage::open(paths).unwrap();
        let window = DateWindow::month_of(date(2024, 8, 20)).unwrap();
        let found = reopened
            .find_generated_expense(property, None, "[Auto] Affitto", window)
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);
    }

    #[test]
    fn test_active_fixed_expenses_filters_ended() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::open(StayPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let property = PropertyId::new();

        let mut ended = FixedExpense::new(
            property,
            "Old contract",
            Money::from_units(50),
            Recurrence::Monthly,
            date(2023, 1, 1),
        );
        ended.end_date = Some(date(2023, 12, 31));
        storage.fixed_expenses.upsert(ended).unwrap();
        storage
            .fixed_expenses
            .upsert(FixedExpense::new(
                property,
                "Affitto",
                Money::from_units(1500),
                Recurrence::Monthly,
                date(2024, 1, 1),
            ))
            .unwrap();

        let active = storage.active_fixed_expenses(date(2024, 8, 1)).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].description, "Affitto");
    }
}
