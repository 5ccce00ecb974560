//! Expense models
//!
//! A [`FixedExpense`] is a recurring cost template (rent, insurance, taxes).
//! A [`VariableExpense`] is a one-off dated charge, either entered by hand or
//! materialized from a fixed expense by the recurring expense generator.
//! Generated records carry a recognizable prefix on their description.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{FixedExpenseId, PropertyId, UnitId, VariableExpenseId};
use super::money::Money;

/// Description prefix marking machine-generated expenses
pub const DEFAULT_GENERATED_PREFIX: &str = "[Auto]";

/// Build the description a generated expense carries
pub fn generated_description(prefix: &str, description: &str) -> String {
    format!("{} {}", prefix, description.trim())
}

/// How often a fixed expense recurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Monthly,
    Annual,
}

impl Recurrence {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" | "m" => Some(Self::Monthly),
            "annual" | "annually" | "yearly" | "year" | "y" => Some(Self::Annual),
            _ => None,
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly => write!(f, "Monthly"),
            Self::Annual => write!(f, "Annual"),
        }
    }
}

/// A recurring cost template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedExpense {
    pub id: FixedExpenseId,
    pub property_id: PropertyId,
    /// Set when the cost belongs to one unit rather than the whole property
    pub unit_id: Option<UnitId>,
    pub description: String,
    pub amount: Money,
    pub recurrence: Recurrence,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Category given to generated expenses; falls back to a per-recurrence default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FixedExpense {
    pub fn new(
        property_id: PropertyId,
        description: impl Into<String>,
        amount: Money,
        recurrence: Recurrence,
        start_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: FixedExpenseId::new(),
            property_id,
            unit_id: None,
            description: description.into(),
            amount,
            recurrence,
            start_date,
            end_date: None,
            category: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Active while there is no end date or the end date is not before `as_of`
    pub fn is_active(&self, as_of: NaiveDate) -> bool {
        self.end_date.map_or(true, |end| end >= as_of)
    }

    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        validate_common(&self.description, self.amount)?;
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(ExpenseValidationError::EndBeforeStart {
                    start: self.start_date,
                    end,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for FixedExpense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.description, self.amount, self.recurrence)
    }
}

/// A one-off dated charge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableExpense {
    pub id: VariableExpenseId,
    pub property_id: PropertyId,
    pub unit_id: Option<UnitId>,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    #[serde(default)]
    pub category: String,
    /// Template this record was generated from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_fixed_expense: Option<FixedExpenseId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VariableExpense {
    pub fn new(
        property_id: PropertyId,
        date: NaiveDate,
        description: impl Into<String>,
        amount: Money,
        category: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: VariableExpenseId::new(),
            property_id,
            unit_id: None,
            date,
            description: description.into(),
            amount,
            category: category.into(),
            source_fixed_expense: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this record was produced by the recurring expense generator
    pub fn is_generated(&self, prefix: &str) -> bool {
        self.source_fixed_expense.is_some() || self.description.starts_with(prefix)
    }

    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        validate_common(&self.description, self.amount)
    }
}

impl fmt::Display for VariableExpense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.description, self.amount)
    }
}

fn validate_common(description: &str, amount: Money) -> Result<(), ExpenseValidationError> {
    if description.trim().is_empty() {
        return Err(ExpenseValidationError::EmptyDescription);
    }
    if !amount.is_positive() {
        return Err(ExpenseValidationError::NonPositiveAmount(amount));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyDescription,
    NonPositiveAmount(Money),
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "Expense description cannot be empty"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Expense amount must be positive, got {}", amount)
            }
            Self::EndBeforeStart { start, end } => {
                write!(f, "End date {} is before start date {}", end, start)
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn rent() -> FixedExpense {
        FixedExpense::new(
            PropertyId::new(),
            "Rent",
            Money::from_units(1500),
            Recurrence::Monthly,
            d(2024, 1, 1),
        )
    }

    #[test]
    fn test_is_active() {
        let mut expense = rent();
        assert!(expense.is_active(d(2030, 1, 1)));

        expense.end_date = Some(d(2024, 8, 15));
        assert!(expense.is_active(d(2024, 8, 15)));
        assert!(!expense.is_active(d(2024, 8, 16)));
    }

    #[test]
    fn test_fixed_validation() {
        let mut expense = rent();
        assert!(expense.validate().is_ok());

        expense.end_date = Some(d(2023, 12, 31));
        assert!(matches!(
            expense.validate(),
            Err(ExpenseValidationError::EndBeforeStart { .. })
        ));

        let mut zero = rent();
        zero.amount = Money::zero();
        assert!(matches!(
            zero.validate(),
            Err(ExpenseValidationError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_generated_marker() {
        let description = generated_description(DEFAULT_GENERATED_PREFIX, "Insurance");
        assert_eq!(description, "[Auto] Insurance");

        let generated = VariableExpense::new(
            PropertyId::new(),
            d(2025, 1, 1),
            description,
            Money::from_units(1200),
            "Annual fixed",
        );
        assert!(generated.is_generated(DEFAULT_GENERATED_PREFIX));

        let manual = VariableExpense::new(
            PropertyId::new(),
            d(2024, 7, 15),
            "Air conditioner repair",
            Money::from_units(250),
            "Maintenance",
        );
        assert!(!manual.is_generated(DEFAULT_GENERATED_PREFIX));
    }

    #[test]
    fn test_recurrence_parse() {
        assert_eq!(Recurrence::parse("MONTHLY"), Some(Recurrence::Monthly));
        assert_eq!(Recurrence::parse("yearly"), Some(Recurrence::Annual));
        assert_eq!(Recurrence::parse("weekly"), None);
    }
}
