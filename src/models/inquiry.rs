//! Contacts and inquiries
//!
//! Contacts are prospects, agencies and partners; inquiries are their
//! requests, tracked on a three-column board (new, in progress, closed).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ContactId, InquiryId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ContactId::new(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: String::new(),
            phone: String::new(),
            company: String::new(),
            tags: Vec::new(),
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

    /// Add a tag, ignoring case-insensitive duplicates
    pub fn add_tag(&mut self, tag: &str) {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.company.is_empty() {
            write!(f, "{}", self.full_name())
        } else {
            write!(f, "{} ({})", self.full_name(), self.company)
        }
    }
}

/// Position of an inquiry on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    #[default]
    New,
    InProgress,
    Closed,
}

impl InquiryStatus {
    pub fn all() -> [InquiryStatus; 3] {
        [Self::New, Self::InProgress, Self::Closed]
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "new" => Some(Self::New),
            "in_progress" | "progress" | "open" => Some(Self::InProgress),
            "closed" | "done" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "New"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: InquiryId,
    pub contact_id: ContactId,
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Inquiry {
    pub fn new(contact_id: ContactId, subject: impl Into<String>, message: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: InquiryId::new(),
            contact_id,
            subject: subject.into(),
            message: message.into(),
            status: InquiryStatus::New,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move the inquiry to another column; returns false when nothing changed
    pub fn move_to(&mut self, status: InquiryStatus) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        self.updated_at = Utc::now();
        true
    }
}
