//! Property and unit models
//!
//! A property is a building or site; units are the rooms or apartments
//! inside it that guests actually book.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{PropertyId, UnitId};
use super::money::Money;

const MAX_NAME_LEN: usize = 100;

/// A managed property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PropertyId::new(),
            name: name.into(),
            address: address.into(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), NameValidationError> {
        validate_name(&self.name)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.address.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.address)
        }
    }
}

/// Kind of rentable unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    #[default]
    Room,
    Apartment,
}

impl UnitKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "room" | "camera" => Some(Self::Room),
            "apartment" | "apt" | "flat" | "appartamento" => Some(Self::Apartment),
            _ => None,
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Room => write!(f, "Room"),
            Self::Apartment => write!(f, "Apartment"),
        }
    }
}

/// A rentable room or apartment within a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub property_id: PropertyId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: UnitKind,
    #[serde(default)]
    pub beds: u32,
    #[serde(default)]
    pub baths: u32,
    /// Floor surface in square meters
    #[serde(default)]
    pub surface: u32,
    /// Nightly list price
    #[serde(default)]
    pub base_price: Money,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Unit {
    pub fn new(property_id: PropertyId, name: impl Into<String>, kind: UnitKind) -> Self {
        let now = Utc::now();
        Self {
            id: UnitId::new(),
            property_id,
            name: name.into(),
            kind,
            beds: 0,
            baths: 0,
            surface: 0,
            base_price: Money::zero(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), NameValidationError> {
        validate_name(&self.name)?;
        if self.base_price.is_negative() {
            return Err(NameValidationError::NegativePrice);
        }
        Ok(())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

fn validate_name(name: &str) -> Result<(), NameValidationError> {
    if name.trim().is_empty() {
        return Err(NameValidationError::EmptyName);
    }
    if name.len() > MAX_NAME_LEN {
        return Err(NameValidationError::NameTooLong(name.len()));
    }
    Ok(())
}

/// Validation errors for properties and units
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    EmptyName,
    NameTooLong(usize),
    NegativePrice,
}

impl fmt::Display for NameValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Name too long ({} chars, max {})", len, MAX_NAME_LEN)
            }
            Self::NegativePrice => write!(f, "Base price cannot be negative"),
        }
    }
}

impl std::error::Error for NameValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_property() {
        let property = Property::new("Villa Serena", "Via Roma 123, Milano");
        assert_eq!(property.name, "Villa Serena");
        assert!(property.validate().is_ok());
        assert_eq!(property.to_string(), "Villa Serena (Via Roma 123, Milano)");
    }

    #[test]
    fn test_property_validation() {
        let mut property = Property::new("  ", "");
        assert_eq!(property.validate(), Err(NameValidationError::EmptyName));

        property.name = "x".repeat(101);
        assert_eq!(
            property.validate(),
            Err(NameValidationError::NameTooLong(101))
        );
    }

    #[test]
    fn test_unit_kind_parse() {
        assert_eq!(UnitKind::parse("Room"), Some(UnitKind::Room));
        assert_eq!(UnitKind::parse("apt"), Some(UnitKind::Apartment));
        assert_eq!(UnitKind::parse("castle"), None);
    }

    #[test]
    fn test_unit_validation() {
        let mut unit = Unit::new(PropertyId::new(), "Deluxe Room", UnitKind::Room);
        assert!(unit.validate().is_ok());

        unit.base_price = Money::from_cents(-1);
        assert_eq!(unit.validate(), Err(NameValidationError::NegativePrice));
    }

    #[test]
    fn test_unit_serializes_kind_as_type() {
        let unit = Unit::new(PropertyId::new(), "Garden Apartment", UnitKind::Apartment);
        let json = serde_json::to_value(&unit).unwrap();
        assert_eq!(json["type"], "apartment");
    }
}
