//! Booking repository for JSON storage
//!
//! Manages loading and saving bookings to bookings.json, with an index by
//! unit so overlap checks only scan the bookings of one unit.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{StayError, StayResult};
use crate::models::{Booking, BookingId, UnitId};

use super::file_io::{read_json, write_json_atomic};

fn lock_error(e: impl std::fmt::Display) -> StayError {
    StayError::Storage(format!("Failed to acquire lock: {}", e))
}

/// Repository for booking persistence with a unit index
pub struct BookingRepository {
    path: PathBuf,
    data: RwLock<HashMap<BookingId, Booking>>,
    /// Index: unit_id -> booking_ids
    by_unit: RwLock<HashMap<UnitId, Vec<BookingId>>>,
}

impl BookingRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_unit: RwLock::new(HashMap::new()),
        }
    }

    /// Load bookings from disk and rebuild the index
    pub fn load(&self) -> StayResult<()> {
        let bookings: Vec<Booking> = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_unit = self.by_unit.write().map_err(lock_error)?;

        data.clear();
        by_unit.clear();

        for booking in bookings {
            by_unit.entry(booking.unit_id).or_default().push(booking.id);
            data.insert(booking.id, booking);
        }

        Ok(())
    }

    /// Save bookings to disk, ordered by check-in
    pub fn save(&self) -> StayResult<()> {
        let bookings = self.get_all()?;
        write_json_atomic(&self.path, &bookings)
    }

    pub fn get(&self, id: BookingId) -> StayResult<Option<Booking>> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// All bookings sorted by start date ascending
    pub fn get_all(&self) -> StayResult<Vec<Booking>> {
        let data = self.data.read().map_err(lock_error)?;
        let mut bookings: Vec<_> = data.values().cloned().collect();
        sort_by_start(&mut bookings);
        Ok(bookings)
    }

    /// Bookings of one unit sorted by start date ascending
    pub fn get_by_unit(&self, unit_id: UnitId) -> StayResult<Vec<Booking>> {
        let data = self.data.read().map_err(lock_error)?;
        let by_unit = self.by_unit.read().map_err(lock_error)?;

        let ids = by_unit.get(&unit_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut bookings: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        sort_by_start(&mut bookings);
        Ok(bookings)
    }

    /// Find a booking by short display id or full UUID
    pub fn find_by_id_str(&self, s: &str) -> StayResult<Option<Booking>> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.values().find(|b| b.id.matches(s)).cloned())
    }

    pub fn any<F>(&self, predicate: F) -> StayResult<bool>
    where
        F: Fn(&Booking) -> bool,
    {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.values().any(predicate))
    }

    /// Insert or update a booking, moving it in the index if its unit changed
    pub fn upsert(&self, booking: Booking) -> StayResult<()> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_unit = self.by_unit.write().map_err(lock_error)?;

        if let Some(old) = data.get(&booking.id) {
            if old.unit_id != booking.unit_id {
                if let Some(ids) = by_unit.get_mut(&old.unit_id) {
                    ids.retain(|id| *id != booking.id);
                }
            }
        }

        let ids = by_unit.entry(booking.unit_id).or_default();
        if !ids.contains(&booking.id) {
            ids.push(booking.id);
        }

        data.insert(booking.id, booking);
        Ok(())
    }

    pub fn delete(&self, id: BookingId) -> StayResult<Option<Booking>> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_unit = self.by_unit.write().map_err(lock_error)?;

        let removed = data.remove(&id);
        if let Some(booking) = &removed {
            if let Some(ids) = by_unit.get_mut(&booking.unit_id) {
                ids.retain(|other| *other != id);
            }
        }
        Ok(removed)
    }

    pub fn count(&self) -> StayResult<usize> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}

fn sort_by_start(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| {
        a.start_date
            .cmp(&b.start_date)
            .then(a.created_at.cmp(&b.created_at))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GuestId, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn create_repo() -> (TempDir, BookingRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = BookingRepository::new(temp_dir.path().join("bookings.json"));
        (temp_dir, repo)
    }

    fn booking(unit: UnitId, start: NaiveDate, end: NaiveDate) -> Booking {
        Booking::new(unit, GuestId::new(), start, end, Money::from_units(100))
    }

    #[test]
    fn test_get_by_unit_sorted() {
        let (_temp, repo) = create_repo();
        let unit = UnitId::new();
        let other = UnitId::new();

        repo.upsert(booking(unit, date(9, 1), date(9, 5))).unwrap();
        repo.upsert(booking(unit, date(8, 1), date(8, 7))).unwrap();
        repo.upsert(booking(other, date(8, 1), date(8, 7))).unwrap();

        let bookings = repo.get_by_unit(unit).unwrap();
        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0].start_date, date(8, 1));
        assert_eq!(bookings[1].start_date, date(9, 1));
    }

    #[test]
    fn test_upsert_moves_index() {
        let (_temp, repo) = create_repo();
        let unit_a = UnitId::new();
        let unit_b = UnitId::new();

        let mut b = booking(unit_a, date(8, 1), date(8, 7));
        repo.upsert(b.clone()).unwrap();

        b.unit_id = unit_b;
        repo.upsert(b).unwrap();

        assert!(repo.get_by_unit(unit_a).unwrap().is_empty());
        assert_eq!(repo.get_by_unit(unit_b).unwrap().len(), 1);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_save_and_reload_rebuilds_index() {
        let (temp, repo) = create_repo();
        let unit = UnitId::new();
        let b = booking(unit, date(8, 1), date(8, 7));
        let id = b.id;
        repo.upsert(b).unwrap();
        repo.save().unwrap();

        let reloaded = BookingRepository::new(temp.path().join("bookings.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.get_by_unit(unit).unwrap()[0].id, id);

        reloaded.delete(id).unwrap();
        assert!(reloaded.get_by_unit(unit).unwrap().is_empty());
    }
}
