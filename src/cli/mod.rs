//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Every handler
//! authorizes the acting role before it touches a service.

pub mod audit;
pub mod booking;
pub mod expense;
pub mod export;
pub mod guest;
pub mod inquiry;
pub mod property;
pub mod report;

pub use audit::handle_audit_command;
pub use booking::{handle_booking_command, BookingCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportCommands};
pub use guest::{handle_guest_command, GuestCommands};
pub use inquiry::{handle_inquiry_command, InquiryCommands};
pub use property::{handle_property_command, PropertyCommands};
pub use report::{handle_report_command, ReportCommands};

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{Local, NaiveDate};

use crate::error::{StayError, StayResult};
use crate::models::Money;

/// Parse a `YYYY-MM-DD` argument
pub(crate) fn parse_date(value: &str) -> StayResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        StayError::Validation(format!(
            "Invalid date: '{}'. Use format YYYY-MM-DD",
            value
        ))
    })
}

pub(crate) fn parse_optional_date(value: Option<&str>) -> StayResult<Option<NaiveDate>> {
    value.map(parse_date).transpose()
}

/// Parse an amount like "80", "80.5" or "80.50"
pub(crate) fn parse_money(value: &str) -> StayResult<Money> {
    Money::parse(value).map_err(|e| {
        StayError::Validation(format!(
            "Invalid amount: '{}'. Use format like '80.00' or '80'. Error: {}",
            value, e
        ))
    })
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn create_output(path: &Path) -> StayResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        StayError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-08-07").unwrap(),
            NaiveDate::from_ymd_opt(2024, 8, 7).unwrap()
        );
        assert!(parse_date("07/08/2024").unwrap_err().is_validation());
        assert_eq!(parse_optional_date(None).unwrap(), None);
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("80.50").unwrap(), Money::from_cents(8050));
        assert!(parse_money("eighty").unwrap_err().is_validation());
    }
}
