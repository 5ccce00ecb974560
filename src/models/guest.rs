//! Guest model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::GuestId;

/// A person who stays at a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    pub id: GuestId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Guest {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: GuestId::new(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn validate(&self) -> Result<(), GuestValidationError> {
        if self.first_name.trim().is_empty() && self.last_name.trim().is_empty() {
            return Err(GuestValidationError::EmptyName);
        }
        if !self.email.is_empty() && !self.email.contains('@') {
            return Err(GuestValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}

impl fmt::Display for Guest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuestValidationError {
    EmptyName,
    InvalidEmail(String),
}

impl fmt::Display for GuestValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Guest needs a first or last name"),
            Self::InvalidEmail(email) => write!(f, "Invalid email address: {}", email),
        }
    }
}

impl std::error::Error for GuestValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let guest = Guest::new("Mario", "Rossi");
        assert_eq!(guest.full_name(), "Mario Rossi");
        assert_eq!(Guest::new("Cher", "").full_name(), "Cher");
    }

    #[test]
    fn test_validation() {
        let mut guest = Guest::new("Giulia", "Bianchi");
        assert!(guest.validate().is_ok());

        guest.email = "not-an-email".into();
        assert!(matches!(
            guest.validate(),
            Err(GuestValidationError::InvalidEmail(_))
        ));

        let nameless = Guest::new(" ", "");
        assert_eq!(nameless.validate(), Err(GuestValidationError::EmptyName));
    }
}
