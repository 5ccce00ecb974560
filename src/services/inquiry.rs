//! Contacts and inquiries
//!
//! Inquiries move across a three-column board (new, in progress, closed).

use crate::audit::EntityType;
use crate::error::{StayError, StayResult};
use crate::models::{Contact, ContactId, Inquiry, InquiryId, InquiryStatus};
use crate::storage::Storage;

/// Optional fields for a new contact
#[derive(Debug, Clone, Default)]
pub struct ContactDetails {
    pub email: String,
    pub phone: String,
    pub company: String,
    pub tags: Vec<String>,
    pub notes: String,
}

/// One board column
#[derive(Debug, Clone)]
pub struct BoardColumn {
    pub status: InquiryStatus,
    pub inquiries: Vec<Inquiry>,
}

pub struct InquiryService<'a> {
    storage: &'a Storage,
}

impl<'a> InquiryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create_contact(
        &self,
        first_name: &str,
        last_name: &str,
        details: ContactDetails,
    ) -> StayResult<Contact> {
        let mut contact = Contact::new(first_name.trim(), last_name.trim());
        if contact.full_name().is_empty() {
            return Err(StayError::Validation("Contact needs a first or last name".into()));
        }
        if !details.email.is_empty() && !details.email.contains('@') {
            return Err(StayError::Validation(format!(
                "Invalid email address: {}",
                details.email
            )));
        }
        contact.email = details.email.trim().to_string();
        contact.phone = details.phone.trim().to_string();
        contact.company = details.company.trim().to_string();
        contact.notes = details.notes;
        for tag in &details.tags {
            contact.add_tag(tag);
        }

        self.storage.contacts.upsert(contact.clone())?;
        self.storage.contacts.save()?;
        self.storage.log_create(
            EntityType::Contact,
            contact.id.to_string(),
            Some(contact.full_name()),
            &contact,
        )?;

        Ok(contact)
    }

    pub fn list_contacts(&self) -> StayResult<Vec<Contact>> {
        let mut contacts = self.storage.contacts.get_all()?;
        contacts.sort_by_key(|c| c.full_name().to_lowercase());
        Ok(contacts)
    }

    /// Find a contact by ID string, email, or full name
    pub fn find_contact(&self, identifier: &str) -> StayResult<Option<Contact>> {
        if let Some(contact) = self.storage.contacts.find_by_id_str(identifier)? {
            return Ok(Some(contact));
        }
        let needle = identifier.trim().to_lowercase();
        Ok(self
            .storage
            .contacts
            .filter(|c| {
                (!c.email.is_empty() && c.email.to_lowercase() == needle)
                    || c.full_name().to_lowercase() == needle
            })?
            .into_iter()
            .next())
    }

    pub fn require_contact(&self, identifier: &str) -> StayResult<Contact> {
        self.find_contact(identifier)?
            .ok_or_else(|| StayError::contact_not_found(identifier))
    }

    /// Delete a contact with no open or closed inquiries
    pub fn delete_contact(&self, id: ContactId) -> StayResult<Contact> {
        let contact = self
            .storage
            .contacts
            .get(id)?
            .ok_or_else(|| StayError::contact_not_found(id.to_string()))?;

        if self.storage.inquiries.any(|i| i.contact_id == id)? {
            return Err(StayError::Validation(format!(
                "Contact '{}' has inquiries and cannot be deleted",
                contact.full_name()
            )));
        }

        self.storage.contacts.delete(id)?;
        self.storage.contacts.save()?;
        self.storage.log_delete(
            EntityType::Contact,
            contact.id.to_string(),
            Some(contact.full_name()),
            &contact,
        )?;
        Ok(contact)
    }

    pub fn create_inquiry(
        &self,
        contact_id: ContactId,
        subject: &str,
        message: &str,
    ) -> StayResult<Inquiry> {
        if self.storage.contacts.get(contact_id)?.is_none() {
            return Err(StayError::contact_not_found(contact_id.to_string()));
        }
        if subject.trim().is_empty() {
            return Err(StayError::Validation("Inquiry subject cannot be empty".into()));
        }

        let inquiry = Inquiry::new(contact_id, subject.trim(), message.trim());
        self.storage.inquiries.upsert(inquiry.clone())?;
        self.storage.inquiries.save()?;
        self.storage.log_create(
            EntityType::Inquiry,
            inquiry.id.to_string(),
            Some(inquiry.subject.clone()),
            &inquiry,
        )?;

        Ok(inquiry)
    }

    pub fn find_inquiry(&self, identifier: &str) -> StayResult<Option<Inquiry>> {
        self.storage.inquiries.find_by_id_str(identifier)
    }

    pub fn require_inquiry(&self, identifier: &str) -> StayResult<Inquiry> {
        self.find_inquiry(identifier)?
            .ok_or_else(|| StayError::inquiry_not_found(identifier))
    }

    /// Every status column in board order, newest inquiries first
    pub fn board(&self) -> StayResult<Vec<BoardColumn>> {
        let mut all = self.storage.inquiries.get_all()?;
        all.reverse();

        Ok(InquiryStatus::all()
            .into_iter()
            .map(|status| BoardColumn {
                status,
                inquiries: all.iter().filter(|i| i.status == status).cloned().collect(),
            })
            .collect())
    }

    /// Move an inquiry to another column; moving to its current column is a no-op
    pub fn move_inquiry(&self, id: InquiryId, status: InquiryStatus) -> StayResult<Inquiry> {
        let before = self
            .storage
            .inquiries
            .get(id)?
            .ok_or_else(|| StayError::inquiry_not_found(id.to_string()))?;

        let mut inquiry = before.clone();
        if !inquiry.move_to(status) {
            return Ok(inquiry);
        }

        self.storage.inquiries.upsert(inquiry.clone())?;
        self.storage.inquiries.save()?;
        self.storage.log_update(
            EntityType::Inquiry,
            inquiry.id.to_string(),
            Some(inquiry.subject.clone()),
            &before,
            &inquiry,
        )?;

        Ok(inquiry)
    }

    pub fn delete_inquiry(&self, id: InquiryId) -> StayResult<Inquiry> {
        let inquiry = self
            .storage
            .inquiries
            .delete(id)?
            .ok_or_else(|| StayError::inquiry_not_found(id.to_string()))?;
        self.storage.inquiries.save()?;
        self.storage.log_delete(
            EntityType::Inquiry,
            inquiry.id.to_string(),
            Some(inquiry.subject.clone()),
            &inquiry,
        )?;
        Ok(inquiry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::StayPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::open(StayPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_contact_with_tags() {
        let (_temp, storage) = create_test_storage();
        let service = InquiryService::new(&storage);

        let contact = service
            .create_contact(
                "Roberto",
                "Neri",
                ContactDetails {
                    company: "Agenzia Viaggi Sole".into(),
                    tags: vec!["Agenzia".into(), "partner".into(), "agenzia".into()],
                    ..ContactDetails::default()
                },
            )
            .unwrap();

        assert_eq!(contact.tags, vec!["agenzia", "partner"]);
        assert_eq!(service.require_contact("roberto neri").unwrap().id, contact.id);
    }

    #[test]
    fn test_board_and_move() {
        let (_temp, storage) = create_test_storage();
        let service = InquiryService::new(&storage);
        let contact = service
            .create_contact("Laura", "Gialli", ContactDetails::default())
            .unwrap();

        let inquiry = service
            .create_inquiry(contact.id, "Informazioni appartamento", "")
            .unwrap();
        assert_eq!(inquiry.status, InquiryStatus::New);

        service.move_inquiry(inquiry.id, InquiryStatus::InProgress).unwrap();

        let board = service.board().unwrap();
        assert_eq!(board.len(), 3);
        assert!(board[0].inquiries.is_empty());
        assert_eq!(board[1].status, InquiryStatus::InProgress);
        assert_eq!(board[1].inquiries[0].id, inquiry.id);
    }

    #[test]
    fn test_inquiry_requires_contact_and_subject() {
        let (_temp, storage) = create_test_storage();
        let service = InquiryService::new(&storage);

        assert!(service
            .create_inquiry(ContactId::new(), "Hello", "")
            .unwrap_err()
            .is_not_found());

        let contact = service
            .create_contact("Laura", "Gialli", ContactDetails::default())
            .unwrap();
        assert!(service
            .create_inquiry(contact.id, "  ", "")
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_contact_delete_blocked_by_inquiry() {
        let (_temp, storage) = create_test_storage();
        let service = InquiryService::new(&storage);
        let contact = service
            .create_contact("Laura", "Gialli", ContactDetails::default())
            .unwrap();
        let inquiry = service.create_inquiry(contact.id, "Disponibilità", "").unwrap();

        assert!(service.delete_contact(contact.id).unwrap_err().is_validation());

        service.delete_inquiry(inquiry.id).unwrap();
        service.delete_contact(contact.id).unwrap();
        assert!(service.list_contacts().unwrap().is_empty());
    }
}
