//! Core data models for StayKeeper
//!
//! This module contains the data structures of the rental domain:
//! properties and units, guests and bookings, fixed and variable expenses,
//! contacts and inquiries.

pub mod booking;
pub mod expense;
pub mod guest;
pub mod ids;
pub mod inquiry;
pub mod money;
pub mod period;
pub mod property;

pub use booking::{intervals_overlap, Booking};
pub use expense::{
    generated_description, FixedExpense, Recurrence, VariableExpense, DEFAULT_GENERATED_PREFIX,
};
pub use guest::Guest;
pub use ids::{
    BookingId, ContactId, FixedExpenseId, GuestId, InquiryId, PropertyId, UnitId,
    VariableExpenseId,
};
pub use inquiry::{Contact, Inquiry, InquiryStatus};
pub use money::Money;
pub use period::{DateWindow, ReportPeriod};
pub use property::{Property, Unit, UnitKind};
