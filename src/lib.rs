//! StayKeeper - property management for short-term rentals
//!
//! This library provides the core of the StayKeeper application: properties
//! and their units, guests and bookings, fixed and variable expenses,
//! contacts and inquiries, and a Profit & Loss report per property.
//!
//! Two rule engines sit at the center:
//!
//! - the booking overlap guard ([`services::BookingOverlapGuard`]) refuses a
//!   stay whose dates touch another stay on the same unit;
//! - the recurring expense generator ([`services::RecurringExpenseGenerator`])
//!   turns fixed expense templates into dated expenses when they fall due,
//!   at most once per template per month.
//!
//! # Architecture
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types
//! - `models`: Core data models
//! - `storage`: JSON file storage layer and the store traits
//! - `services`: Business logic layer
//! - `auth`: Role-based authorization policy
//! - `audit`: Audit logging system
//! - `reports`: Profit & Loss
//! - `export`: JSON and CSV export
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `staykeeper` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use staykeeper::config::paths::StayPaths;
//! use staykeeper::storage::Storage;
//! use staykeeper::services::BookingService;
//!
//! let storage = Storage::open(StayPaths::new()?)?;
//! let free = BookingService::new(&storage)
//!     .check_availability(unit_id, start, end, None)?
//!     .is_none();
//! ```

pub mod audit;
pub mod auth;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{StayError, StayResult};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber
///
/// Logs go to stderr so command output stays clean, coloured only when stderr
/// is a terminal. `RUST_LOG` overrides the default `staykeeper=info` filter.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use std::io::IsTerminal;
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("staykeeper=info"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(std::io::stderr().is_terminal())
            .init();
    });
}
