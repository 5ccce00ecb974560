//! Booking model
//!
//! A booking reserves one unit for one guest over a closed date interval
//! `[start_date, end_date]`. Two bookings on the same unit may not overlap,
//! and touching boundaries count as overlap: a stay ending on the 7th
//! collides with one starting on the 7th.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BookingId, GuestId, UnitId};
use super::money::Money;

/// Whether the closed intervals `[s1, e1]` and `[s2, e2]` share any day.
///
/// ```
/// use chrono::NaiveDate;
/// use staykeeper::models::intervals_overlap;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 8, day).unwrap();
/// assert!(intervals_overlap(d(1), d(7), d(7), d(10)));
/// assert!(!intervals_overlap(d(1), d(6), d(7), d(10)));
/// ```
pub fn intervals_overlap(s1: NaiveDate, e1: NaiveDate, s2: NaiveDate, e2: NaiveDate) -> bool {
    s1 <= e2 && e1 >= s2
}

/// A reservation of a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub unit_id: UnitId,
    pub guest_id: GuestId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Total price of the stay
    pub price: Money,
    /// Channel the booking came from (e.g. "Airbnb", "Booking.com", "Direct")
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        unit_id: UnitId,
        guest_id: GuestId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        price: Money,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BookingId::new(),
            unit_id,
            guest_id,
            start_date,
            end_date,
            price,
            source: String::new(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Number of nights between check-in and check-out
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Whether this booking collides with the interval `[start, end]`
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        intervals_overlap(self.start_date, self.end_date, start, end)
    }

    pub fn validate(&self) -> Result<(), BookingValidationError> {
        if self.start_date >= self.end_date {
            return Err(BookingValidationError::InvalidDates {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.price.is_negative() {
            return Err(BookingValidationError::NegativePrice(self.price));
        }
        Ok(())
    }
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.start_date, self.end_date, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingValidationError {
    InvalidDates { start: NaiveDate, end: NaiveDate },
    NegativePrice(Money),
}

impl fmt::Display for BookingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDates { start, end } => write!(
                f,
                "Check-out ({}) must be after check-in ({})",
                end, start
            ),
            Self::NegativePrice(price) => write!(f, "Price cannot be negative: {}", price),
        }
    }
}

impl std::error::Error for BookingValidationError {}
