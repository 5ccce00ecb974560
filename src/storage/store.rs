//! Persistence seams used by the booking overlap guard and the recurring
//! expense generator
//!
//! Both are implemented by the file-backed [`Storage`](super::Storage) and by
//! the in-memory [`MemoryStore`](super::MemoryStore).

use chrono::NaiveDate;

use crate::error::StayResult;
use crate::models::{
    Booking, BookingId, DateWindow, FixedExpense, PropertyId, UnitId, VariableExpense,
};

/// Read access to the bookings of a unit
pub trait BookingStore {
    /// Bookings of `unit_id`, optionally leaving one out (the booking being
    /// edited), sorted by start date ascending
    fn bookings_for_unit(
        &self,
        unit_id: UnitId,
        exclude: Option<BookingId>,
    ) -> StayResult<Vec<Booking>>;
}

/// Expense access needed to materialize recurring expenses
pub trait ExpenseStore {
    /// Fixed expenses with no end date or an end date on or after `as_of`
    fn active_fixed_expenses(&self, as_of: NaiveDate) -> StayResult<Vec<FixedExpense>>;

    /// A variable expense with exactly this property, unit and description
    /// dated inside `window`
    fn find_generated_expense(
        &self,
        property_id: PropertyId,
        unit_id: Option<UnitId>,
        description: &str,
        window: DateWindow,
    ) -> StayResult<Option<VariableExpense>>;

    /// Persist a new variable expense
    fn create_variable_expense(&self, expense: VariableExpense) -> StayResult<VariableExpense>;
}

/// Shared matching rule for [`ExpenseStore::find_generated_expense`]
pub(crate) fn is_generated_match(
    expense: &VariableExpense,
    property_id: PropertyId,
    unit_id: Option<UnitId>,
    description: &str,
    window: DateWindow,
) -> bool {
    expense.property_id == property_id
        && expense.unit_id == unit_id
        && expense.description == description
        && window.contains(expense.date)
}
