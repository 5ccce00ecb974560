//! Booking overlap guard
//!
//! Answers whether a proposed stay on a unit collides with an existing one.
//! Boundaries are inclusive: a check-out on the 7th and a check-in on the
//! 7th conflict, so same-day turnover is never allowed.

use chrono::NaiveDate;

use crate::error::StayResult;
use crate::models::{Booking, BookingId, UnitId};
use crate::storage::BookingStore;

/// Read-only overlap check over any [`BookingStore`]
pub struct BookingOverlapGuard<'a, S: BookingStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: BookingStore + ?Sized> BookingOverlapGuard<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// The earliest-starting booking on `unit_id` that collides with
    /// `[start, end]`, ignoring `exclude`
    ///
    /// Callers validate `start < end` beforehand. Finding a conflict is a
    /// normal outcome; only store failures are errors.
    pub fn check_overlap(
        &self,
        unit_id: UnitId,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<BookingId>,
    ) -> StayResult<Option<Booking>> {
        let existing = self.store.bookings_for_unit(unit_id, exclude)?;

        let conflict = existing
            .into_iter()
            .filter(|b| Some(b.id) != exclude && b.overlaps(start, end))
            .min_by_key(|b| (b.start_date, b.created_at));

        if let Some(found) = &conflict {
            tracing::debug!(
                unit = %unit_id,
                existing = %found.id,
                %start,
                %end,
                "overlap detected"
            );
        }

        Ok(conflict)
    }
}
