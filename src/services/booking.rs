//! Booking service
//!
//! Create, update and delete bookings. Every write that sets dates or a unit
//! runs the overlap guard first; a collision becomes `StayError::Conflict`.

use chrono::{NaiveDate, Utc};

use crate::audit::EntityType;
use crate::error::{StayError, StayResult};
use crate::models::{Booking, BookingId, GuestId, Money, PropertyId, UnitId};
use crate::storage::Storage;

use super::overlap::BookingOverlapGuard;

/// Input for a new booking
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub unit_id: UnitId,
    pub guest_id: GuestId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Money,
    pub source: String,
    pub notes: String,
}

/// Partial update for a booking; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct BookingUpdate {
    pub unit_id: Option<UnitId>,
    pub guest_id: Option<GuestId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub price: Option<Money>,
    pub source: Option<String>,
    pub notes: Option<String>,
}

/// Filter for listing bookings; every set field must match
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub property_id: Option<PropertyId>,
    pub unit_id: Option<UnitId>,
    pub guest_id: Option<GuestId>,
    /// Keep bookings overlapping `[from, to]`
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub struct BookingService<'a> {
    storage: &'a Storage,
}

impl<'a> BookingService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Check a prospective stay without writing anything
    pub fn check_availability(
        &self,
        unit_id: UnitId,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<BookingId>,
    ) -> StayResult<Option<Booking>> {
        BookingOverlapGuard::new(self.storage).check_overlap(unit_id, start, end, exclude)
    }

    fn ensure_references(&self, unit_id: UnitId, guest_id: GuestId) -> StayResult<()> {
        if self.storage.units.get(unit_id)?.is_none() {
            return Err(StayError::unit_not_found(unit_id.to_string()));
        }
        if self.storage.guests.get(guest_id)?.is_none() {
            return Err(StayError::guest_not_found(guest_id.to_string()));
        }
        Ok(())
    }

    fn ensure_free(&self, booking: &Booking, exclude: Option<BookingId>) -> StayResult<()> {
        let conflict = self.check_availability(
            booking.unit_id,
            booking.start_date,
            booking.end_date,
            exclude,
        )?;

        match conflict {
            Some(existing) => {
                tracing::warn!(
                    unit = %booking.unit_id,
                    existing = %existing.id,
                    start = %booking.start_date,
                    end = %booking.end_date,
                    "booking rejected: dates overlap"
                );
                Err(StayError::Conflict {
                    unit: booking.unit_id.to_string(),
                    existing: existing.id.to_string(),
                    start: booking.start_date,
                    end: booking.end_date,
                })
            }
            None => Ok(()),
        }
    }

    /// Create a new booking
    pub fn create(&self, new: NewBooking) -> StayResult<Booking> {
        self.ensure_references(new.unit_id, new.guest_id)?;

        let mut booking = Booking::new(
            new.unit_id,
            new.guest_id,
            new.start_date,
            new.end_date,
            new.price,
        );
        booking.source = new.source.trim().to_string();
        booking.notes = new.notes;
        booking
            .validate()
            .map_err(|e| StayError::Validation(e.to_string()))?;

        self.ensure_free(&booking, None)?;

        self.storage.bookings.upsert(booking.clone())?;
        self.storage.bookings.save()?;
        self.storage.log_create(
            EntityType::Booking,
            booking.id.to_string(),
            Some(booking.to_string()),
            &booking,
        )?;

        tracing::info!(booking = %booking.id, unit = %booking.unit_id, "booking created");
        Ok(booking)
    }

    /// Apply a partial update, re-checking overlap against every other booking
    pub fn update(&self, id: BookingId, changes: BookingUpdate) -> StayResult<Booking> {
        let before = self
            .storage
            .bookings
            .get(id)?
            .ok_or_else(|| StayError::booking_not_found(id.to_string()))?;
        let mut booking = before.clone();

        if let Some(unit_id) = changes.unit_id {
            booking.unit_id = unit_id;
        }
        if let Some(guest_id) = changes.guest_id {
            booking.guest_id = guest_id;
        }
        if let Some(start) = changes.start_date {
            booking.start_date = start;
        }
        if let Some(end) = changes.end_date {
            booking.end_date = end;
        }
        if let Some(price) = changes.price {
            booking.price = price;
        }
        if let Some(source) = changes.source {
            booking.source = source.trim().to_string();
        }
        if let Some(notes) = changes.notes {
            booking.notes = notes;
        }

        self.ensure_references(booking.unit_id, booking.guest_id)?;
        booking
            .validate()
            .map_err(|e| StayError::Validation(e.to_string()))?;

        let dates_changed = booking.unit_id != before.unit_id
            || booking.start_date != before.start_date
            || booking.end_date != before.end_date;
        if dates_changed {
            self.ensure_free(&booking, Some(id))?;
        }

        booking.updated_at = Utc::now();
        self.storage.bookings.upsert(booking.clone())?;
        self.storage.bookings.save()?;
        self.storage.log_update(
            EntityType::Booking,
            booking.id.to_string(),
            Some(booking.to_string()),
            &before,
            &booking,
        )?;

        tracing::info!(booking = %booking.id, "booking updated");
        Ok(booking)
    }

    pub fn delete(&self, id: BookingId) -> StayResult<Booking> {
        let booking = self
            .storage
            .bookings
            .delete(id)?
            .ok_or_else(|| StayError::booking_not_found(id.to_string()))?;
        self.storage.bookings.save()?;
        self.storage.log_delete(
            EntityType::Booking,
            booking.id.to_string(),
            Some(booking.to_string()),
            &booking,
        )?;

        tracing::info!(booking = %booking.id, "booking deleted");
        Ok(booking)
    }

    pub fn get(&self, id: BookingId) -> StayResult<Option<Booking>> {
        self.storage.bookings.get(id)
    }

    /// Find a booking by short display id or full UUID
    pub fn find(&self, identifier: &str) -> StayResult<Option<Booking>> {
        self.storage.bookings.find_by_id_str(identifier)
    }

    pub fn require(&self, identifier: &str) -> StayResult<Booking> {
        self.find(identifier)?
            .ok_or_else(|| StayError::booking_not_found(identifier))
    }

    /// Bookings matching `filter`, ordered by start date ascending
    pub fn list(&self, filter: &BookingFilter) -> StayResult<Vec<Booking>> {
        let property_units: Option<Vec<UnitId>> = match filter.property_id {
            Some(property_id) => Some(
                self.storage
                    .units
                    .filter(|u| u.property_id == property_id)?
                    .into_iter()
                    .map(|u| u.id)
                    .collect(),
            ),
            None => None,
        };

        let candidates = match filter.unit_id {
            Some(unit_id) => self.storage.bookings.get_by_unit(unit_id)?,
            None => self.storage.bookings.get_all()?,
        };

        let from = filter.from.unwrap_or(NaiveDate::MIN);
        let to = filter.to.unwrap_or(NaiveDate::MAX);

        Ok(candidates
            .into_iter()
            .filter(|b| {
                property_units
                    .as_ref()
                    .map_or(true, |units| units.contains(&b.unit_id))
            })
            .filter(|b| filter.guest_id.map_or(true, |g| b.guest_id == g))
            .filter(|b| b.overlaps(from, to))
            .collect())
    }
}
