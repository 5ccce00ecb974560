//! In-memory store
//!
//! Backs `expense generate --dry-run` with a snapshot of the on-disk data so
//! nothing is written, and gives the engine tests a store without files.

use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::{StayError, StayResult};
use crate::models::{
    Booking, BookingId, DateWindow, FixedExpense, PropertyId, UnitId, VariableExpense,
};

use super::store::{is_generated_match, BookingStore, ExpenseStore};
use super::Storage;

fn lock_error(e: impl std::fmt::Display) -> StayError {
    StayError::Storage(format!("Failed to acquire lock: {}", e))
}

#[derive(Default)]
pub struct MemoryStore {
    bookings: RwLock<Vec<Booking>>,
    fixed_expenses: RwLock<Vec<FixedExpense>>,
    variable_expenses: RwLock<Vec<VariableExpense>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy bookings and expenses out of file-backed storage
    pub fn from_storage(storage: &Storage) -> StayResult<Self> {
        Ok(Self {
            bookings: RwLock::new(storage.bookings.get_all()?),
            fixed_expenses: RwLock::new(storage.fixed_expenses.get_all()?),
            variable_expenses: RwLock::new(storage.variable_expenses.get_all()?),
        })
    }

    pub fn add_booking(&self, booking: Booking) -> StayResult<()> {
        self.bookings.write().map_err(lock_error)?.push(booking);
        Ok(())
    }

    pub fn add_fixed_expense(&self, expense: FixedExpense) -> StayResult<()> {
        self.fixed_expenses.write().map_err(lock_error)?.push(expense);
        Ok(())
    }

    pub fn variable_expenses(&self) -> StayResult<Vec<VariableExpense>> {
        Ok(self.variable_expenses.read().map_err(lock_error)?.clone())
    }
}

impl BookingStore for MemoryStore {
    fn bookings_for_unit(
        &self,
        unit_id: UnitId,
        exclude: Option<BookingId>,
    ) -> StayResult<Vec<Booking>> {
        let bookings = self.bookings.read().map_err(lock_error)?;
        let mut matching: Vec<Booking> = bookings
            .iter()
            .filter(|b| b.unit_id == unit_id && Some(b.id) != exclude)
            .cloned()
            .collect();
        matching.sort_by_key(|b| b.start_date);
        Ok(matching)
    }
}

impl ExpenseStore for MemoryStore {
    fn active_fixed_expenses(&self, as_of: NaiveDate) -> StayResult<Vec<FixedExpense>> {
        let expenses = self.fixed_expenses.read().map_err(lock_error)?;
        Ok(expenses.iter().filter(|e| e.is_active(as_of)).cloned().collect())
    }

    fn find_generated_expense(
        &self,
        property_id: PropertyId,
        unit_id: Option<UnitId>,
        description: &str,
        window: DateWindow,
    ) -> StayResult<Option<VariableExpense>> {
        let expenses = self.variable_expenses.read().map_err(lock_error)?;
        Ok(expenses
            .iter()
            .find(|e| is_generated_match(e, property_id, unit_id, description, window))
            .cloned())
    }

    fn create_variable_expense(&self, expense: VariableExpense) -> StayResult<VariableExpense> {
        self.variable_expenses
            .write()
            .map_err(lock_error)?
            .push(expense.clone());
        Ok(expense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GuestId, Money, Recurrence};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_bookings_for_unit_excludes_and_sorts() {
        let store = MemoryStore::new();
        let unit = UnitId::new();
        let late = Booking::new(unit, GuestId::new(), date(2024, 9, 1), date(2024, 9, 5), Money::zero());
        let early = Booking::new(unit, GuestId::new(), date(2024, 8, 1), date(2024, 8, 7), Money::zero());
        let other = Booking::new(UnitId::new(), GuestId::new(), date(2024, 8, 1), date(2024, 8, 7), Money::zero());
        store.add_booking(late.clone()).unwrap();
        store.add_booking(early.clone()).unwrap();
        store.add_booking(other).unwrap();

        let all = store.bookings_for_unit(unit, None).unwrap();
        assert_eq!(all.iter().map(|b| b.id).collect::<Vec<_>>(), vec![early.id, late.id]);

        let without = store.bookings_for_unit(unit, Some(early.id)).unwrap();
        assert_eq!(without.len(), 1);
        assert_eq!(without[0].id, late.id);
    }

    #[test]
    fn test_active_fixed_expenses() {
        let store = MemoryStore::new();
        let property = PropertyId::new();
        let mut ended = FixedExpense::new(property, "Old lease", Money::from_units(10), Recurrence::Monthly, date(2024, 1, 1));
        ended.end_date = Some(date(2024, 6, 30));
        let open = FixedExpense::new(property, "Rent", Money::from_units(10), Recurrence::Monthly, date(2024, 1, 1));
        store.add_fixed_expense(ended).unwrap();
        store.add_fixed_expense(open.clone()).unwrap();

        let active = store.active_fixed_expenses(date(2024, 8, 1)).unwrap();
        assert_eq!(active, vec![open]);
    }

    #[test]
    fn test_find_generated_expense_respects_window() {
        let store = MemoryStore::new();
        let property = PropertyId::new();
        let expense = VariableExpense::new(property, date(2024, 8, 31), "[Auto] Rent", Money::from_units(1500), "Monthly fixed");
        store.create_variable_expense(expense).unwrap();

        let august = DateWindow::month_of(date(2024, 8, 15)).unwrap();
        let september = DateWindow::month_of(date(2024, 9, 1)).unwrap();

        assert!(store.find_generated_expense(property, None, "[Auto] Rent", august).unwrap().is_some());
        assert!(store.find_generated_expense(property, None, "[Auto] Rent", september).unwrap().is_none());
        assert!(store.find_generated_expense(property, Some(UnitId::new()), "[Auto] Rent", august).unwrap().is_none());
    }
}
