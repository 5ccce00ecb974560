//! Generic JSON-backed repository
//!
//! Every entity file holds a JSON array of records. Records are kept in
//! memory keyed by id and written back in creation order.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{StayError, StayResult};
use crate::models::{
    Booking, Contact, FixedExpense, Guest, Inquiry, Property, Unit, VariableExpense,
};

use super::file_io::{read_json, write_json_atomic};

/// An entity that can be stored in a [`JsonRepository`]
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Hash + Display;

    fn id(&self) -> Self::Id;

    fn created_at(&self) -> DateTime<Utc>;

    /// Whether `s` names this record, as a short display id or a full UUID
    fn id_matches(&self, s: &str) -> bool;
}

macro_rules! impl_record {
    ($($ty:ty => $id:ty),* $(,)?) => {
        $(
            impl Record for $ty {
                type Id = $id;

                fn id(&self) -> $id {
                    self.id
                }

                fn created_at(&self) -> DateTime<Utc> {
                    self.created_at
                }

                fn id_matches(&self, s: &str) -> bool {
                    self.id.matches(s)
                }
            }
        )*
    };
}

impl_record! {
    Property => crate::models::PropertyId,
    Unit => crate::models::UnitId,
    Guest => crate::models::GuestId,
    Booking => crate::models::BookingId,
    FixedExpense => crate::models::FixedExpenseId,
    VariableExpense => crate::models::VariableExpenseId,
    Contact => crate::models::ContactId,
    Inquiry => crate::models::InquiryId,
}

/// In-memory map of records backed by one JSON file
pub struct JsonRepository<T: Record> {
    path: PathBuf,
    data: RwLock<HashMap<T::Id, T>>,
}

impl<T: Record> JsonRepository<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> StayResult<RwLockReadGuard<'_, HashMap<T::Id, T>>> {
        self.data
            .read()
            .map_err(|e| StayError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> StayResult<RwLockWriteGuard<'_, HashMap<T::Id, T>>> {
        self.data
            .write()
            .map_err(|e| StayError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Replace the in-memory contents with the file's
    pub fn load(&self) -> StayResult<()> {
        let records: Vec<T> = read_json(&self.path)?;
        let mut data = self.write()?;
        data.clear();
        data.extend(records.into_iter().map(|r| (r.id(), r)));
        Ok(())
    }

    pub fn save(&self) -> StayResult<()> {
        let records = self.get_all()?;
        write_json_atomic(&self.path, &records)
    }

    pub fn get(&self, id: T::Id) -> StayResult<Option<T>> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// All records, oldest first
    pub fn get_all(&self) -> StayResult<Vec<T>> {
        let mut records: Vec<T> = self.read()?.values().cloned().collect();
        records.sort_by_key(|r| r.created_at());
        Ok(records)
    }

    /// Records matching a predicate, oldest first
    pub fn filter<F>(&self, predicate: F) -> StayResult<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        let mut records: Vec<T> = self
            .read()?
            .values()
            .filter(|r| predicate(r))
            .cloned()
            .collect();
        records.sort_by_key(|r| r.created_at());
        Ok(records)
    }

    pub fn any<F>(&self, predicate: F) -> StayResult<bool>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.read()?.values().any(predicate))
    }

    /// Find a record by short display id or full UUID
    pub fn find_by_id_str(&self, s: &str) -> StayResult<Option<T>> {
        let s = s.trim();
        Ok(self.read()?.values().find(|r| r.id_matches(s)).cloned())
    }

    pub fn upsert(&self, record: T) -> StayResult<()> {
        self.write()?.insert(record.id(), record);
        Ok(())
    }

    /// Remove a record, returning it if it existed
    pub fn delete(&self, id: T::Id) -> StayResult<Option<T>> {
        Ok(self.write()?.remove(&id))
    }

    pub fn count(&self) -> StayResult<usize> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_repo() -> (TempDir, JsonRepository<Guest>) {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonRepository::new(temp_dir.path().join("guests.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp, repo) = create_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_save_reload() {
        let (_temp, repo) = create_repo();
        let guest = Guest::new("Mario", "Rossi");
        let id = guest.id;

        repo.upsert(guest).unwrap();
        repo.save().unwrap();

        repo.load().unwrap();
        let loaded = repo.get(id).unwrap().unwrap();
        assert_eq!(loaded.full_name(), "Mario Rossi");
    }

    #[test]
    fn test_find_by_display_id() {
        let (_temp, repo) = create_repo();
        let guest = Guest::new("Giulia", "Bianchi");
        let display = guest.id.to_string();
        let full = guest.id.as_uuid().to_string();
        repo.upsert(guest.clone()).unwrap();

        assert_eq!(repo.find_by_id_str(&display).unwrap(), Some(guest.clone()));
        assert_eq!(repo.find_by_id_str(&full).unwrap(), Some(guest));
        assert_eq!(repo.find_by_id_str("gst-00000000").unwrap(), None);
    }

    #[test]
    fn test_delete() {
        let (_temp, repo) = create_repo();
        let guest = Guest::new("Paolo", "Verdi");
        let id = guest.id;
        repo.upsert(guest).unwrap();

        assert!(repo.delete(id).unwrap().is_some());
        assert!(repo.delete(id).unwrap().is_none());
        assert_eq!(repo.count().unwrap(), 0);
    }
}
