//! Service layer for StayKeeper
//!
//! Business logic on top of the storage layer: validation, cross-entity
//! checks, audit logging, and the two rule engines (the booking overlap
//! guard and the recurring expense generator).

pub mod booking;
pub mod expense;
pub mod guest;
pub mod inquiry;
pub mod overlap;
pub mod property;
pub mod recurring;

pub use booking::{BookingFilter, BookingService, BookingUpdate, NewBooking};
pub use expense::{ExpenseService, FixedExpenseUpdate, NewFixedExpense, NewVariableExpense};
pub use guest::{GuestDetails, GuestService};
pub use inquiry::{BoardColumn, ContactDetails, InquiryService};
pub use overlap::BookingOverlapGuard;
pub use property::{NewUnit, PropertyService, PropertyUpdate, UnitUpdate};
pub use recurring::{
    due_occurrence, GenerationFailure, GenerationReport, GeneratorOptions,
    RecurringExpenseGenerator,
};
