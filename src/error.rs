//! Custom error types for StayKeeper
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for StayKeeper operations
#[derive(Error, Debug)]
pub enum StayError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models and command input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// A booking collides with an existing booking on the same unit
    #[error("Booking conflict on unit {unit}: {start} - {end} overlaps booking {existing}")]
    Conflict {
        unit: String,
        existing: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// The acting role may not perform the requested action
    #[error("Not authorized: role '{role}' cannot {action}")]
    Unauthorized { role: String, action: String },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl StayError {
    /// Create a "not found" error for properties
    pub fn property_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Property",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for units
    pub fn unit_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Unit",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for guests
    pub fn guest_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Guest",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for bookings
    pub fn booking_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Booking",
            identifier: identifier.into(),
        }
    }

    pub fn fixed_expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Fixed expense",
            identifier: identifier.into(),
        }
    }

    pub fn variable_expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    pub fn contact_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Contact",
            identifier: identifier.into(),
        }
    }

    pub fn inquiry_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Inquiry",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a booking conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Check if this is an authorization failure
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

impl From<std::io::Error> for StayError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for StayError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for StayKeeper operations
pub type StayResult<T> = Result<T, StayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StayError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = StayError::unit_not_found("Garden Apartment");
        assert_eq!(err.to_string(), "Unit not found: Garden Apartment");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_conflict_error() {
        let err = StayError::Conflict {
            unit: "unt-1234abcd".into(),
            existing: "bkg-5678abcd".into(),
            start: NaiveDate::from_ymd_opt(2024, 8, 7).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 8, 10).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Booking conflict on unit unt-1234abcd: 2024-08-07 - 2024-08-10 overlaps booking bkg-5678abcd"
        );
        assert!(err.is_conflict());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_unauthorized_error() {
        let err = StayError::Unauthorized {
            role: "viewer".into(),
            action: "create bookings".into(),
        };
        assert_eq!(
            err.to_string(),
            "Not authorized: role 'viewer' cannot create bookings"
        );
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let stay_err: StayError = io_err.into();
        assert!(matches!(stay_err, StayError::Io(_)));
    }
}
