//! Guest service

use crate::audit::EntityType;
use crate::error::{StayError, StayResult};
use crate::models::{Guest, GuestId};
use crate::storage::Storage;

/// Contact details for a new or edited guest; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct GuestDetails {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl GuestDetails {
    fn apply(self, guest: &mut Guest) {
        if let Some(v) = self.first_name {
            guest.first_name = v.trim().to_string();
        }
        if let Some(v) = self.last_name {
            guest.last_name = v.trim().to_string();
        }
        if let Some(v) = self.email {
            guest.email = v.trim().to_string();
        }
        if let Some(v) = self.phone {
            guest.phone = v.trim().to_string();
        }
        if let Some(v) = self.address {
            guest.address = v.trim().to_string();
        }
        if let Some(v) = self.notes {
            guest.notes = v;
        }
    }
}

pub struct GuestService<'a> {
    storage: &'a Storage,
}

impl<'a> GuestService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, first_name: &str, last_name: &str, details: GuestDetails) -> StayResult<Guest> {
        let mut guest = Guest::new(first_name.trim(), last_name.trim());
        details.apply(&mut guest);
        guest
            .validate()
            .map_err(|e| StayError::Validation(e.to_string()))?;

        self.storage.guests.upsert(guest.clone())?;
        self.storage.guests.save()?;
        self.storage.log_create(
            EntityType::Guest,
            guest.id.to_string(),
            Some(guest.full_name()),
            &guest,
        )?;

        tracing::debug!(guest = %guest.id, "guest created");
        Ok(guest)
    }

    pub fn get(&self, id: GuestId) -> StayResult<Option<Guest>> {
        self.storage.guests.get(id)
    }

    /// All guests ordered by last name, then first name
    pub fn list(&self) -> StayResult<Vec<Guest>> {
        let mut guests = self.storage.guests.get_all()?;
        guests.sort_by(|a, b| {
            (a.last_name.to_lowercase(), a.first_name.to_lowercase())
                .cmp(&(b.last_name.to_lowercase(), b.first_name.to_lowercase()))
        });
        Ok(guests)
    }

    /// Find a guest by ID string, email, or full name (case-insensitive)
    pub fn find(&self, identifier: &str) -> StayResult<Option<Guest>> {
        if let Some(guest) = self.storage.guests.find_by_id_str(identifier)? {
            return Ok(Some(guest));
        }

        let needle = identifier.trim().to_lowercase();
        let matches = self.storage.guests.filter(|g| {
            (!g.email.is_empty() && g.email.to_lowercase() == needle)
                || g.full_name().to_lowercase() == needle
        })?;

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.into_iter().next()),
            n => Err(StayError::Validation(format!(
                "{} guests match '{}'; use the guest id",
                n,
                identifier.trim()
            ))),
        }
    }

    pub fn require(&self, identifier: &str) -> StayResult<Guest> {
        self.find(identifier)?
            .ok_or_else(|| StayError::guest_not_found(identifier))
    }

    pub fn update(&self, id: GuestId, details: GuestDetails) -> StayResult<Guest> {
        let before = self
            .storage
            .guests
            .get(id)?
            .ok_or_else(|| StayError::guest_not_found(id.to_string()))?;

        let mut guest = before.clone();
        details.apply(&mut guest);
        guest
            .validate()
            .map_err(|e| StayError::Validation(e.to_string()))?;
        guest.updated_at = chrono::Utc::now();

        self.storage.guests.upsert(guest.clone())?;
        self.storage.guests.save()?;
        self.storage.log_update(
            EntityType::Guest,
            guest.id.to_string(),
            Some(guest.full_name()),
            &before,
            &guest,
        )?;

        Ok(guest)
    }

    /// Delete a guest that no booking references
    pub fn delete(&self, id: GuestId) -> StayResult<Guest> {
        let guest = self
            .storage
            .guests
            .get(id)?
            .ok_or_else(|| StayError::guest_not_found(id.to_string()))?;

        if self.storage.bookings.any(|b| b.guest_id == id)? {
            return Err(StayError::Validation(format!(
                "Guest '{}' has bookings and cannot be deleted",
                guest.full_name()
            )));
        }

        self.storage.guests.delete(id)?;
        self.storage.guests.save()?;
        self.storage.log_delete(
            EntityType::Guest,
            guest.id.to_string(),
            Some(guest.full_name()),
            &guest,
        )?;

        Ok(guest)
    }
}
