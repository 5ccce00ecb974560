//! Audit logging for StayKeeper
//!
//! Records every create, update and delete with before/after snapshots in an
//! append-only, line-delimited JSON log (`audit.log`).
//!
//! - `AuditEntry`: one operation on one entity, with an optional diff summary.
//! - `AuditLogger`: appends entries and reads them back.
//!
//! # Example
//!
//! ```rust,ignore
//! use staykeeper::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(
//!     EntityType::Booking,
//!     booking.id.to_string(),
//!     Some(booking.to_string()),
//!     &booking,
//! ))?;
//! ```

mod entry;
mod logger;

pub use entry::{generate_diff, AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
