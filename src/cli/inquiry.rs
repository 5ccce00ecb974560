//! Inquiry CLI commands
//!
//! Contacts and the inquiry board.

use std::collections::HashMap;

use clap::Subcommand;

use crate::auth::{authorize, Action, Role};
use crate::display::{format_board, format_contact_list};
use crate::error::{StayError, StayResult};
use crate::models::InquiryStatus;
use crate::services::{ContactDetails, InquiryService};
use crate::storage::Storage;

/// Inquiry subcommands
#[derive(Subcommand)]
pub enum InquiryCommands {
    /// Add a contact
    AddContact {
        first_name: String,
        last_name: String,
        #[arg(short, long, default_value = "")]
        email: String,
        #[arg(short, long, default_value = "")]
        phone: String,
        #[arg(short, long, default_value = "")]
        company: String,
        /// Tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    /// List contacts
    Contacts,
    /// Delete a contact with no inquiries
    DeleteContact {
        /// Contact ID, email, or full name
        contact: String,
    },
    /// Open a new inquiry for a contact
    Add {
        /// Contact ID, email, or full name
        contact: String,
        subject: String,
        #[arg(short, long, default_value = "")]
        message: String,
    },
    /// Show the inquiry board
    Board,
    /// Move an inquiry to another column (new, in-progress, closed)
    Move {
        /// Inquiry ID
        inquiry: String,
        status: String,
    },
    /// Delete an inquiry
    Delete {
        /// Inquiry ID
        inquiry: String,
    },
}

/// Handle an inquiry command
pub fn handle_inquiry_command(storage: &Storage, role: Role, cmd: InquiryCommands) -> StayResult<()> {
    let service = InquiryService::new(storage);

    match cmd {
        InquiryCommands::AddContact {
            first_name,
            last_name,
            email,
            phone,
            company,
            tags,
            notes,
        } => {
            authorize(role, Action::ManageInquiries)?;
            let contact = service.create_contact(
                &first_name,
                &last_name,
                ContactDetails {
                    email,
                    phone,
                    company,
                    tags,
                    notes,
                },
            )?;
            println!("Added contact: {}", contact.full_name());
            println!("  ID: {}", contact.id);
        }

        InquiryCommands::Contacts => {
            authorize(role, Action::View)?;
            print!("{}", format_contact_list(&service.list_contacts()?));
        }

        InquiryCommands::DeleteContact { contact } => {
            authorize(role, Action::ManageInquiries)?;
            let found = service.require_contact(&contact)?;
            let deleted = service.delete_contact(found.id)?;
            println!("Deleted contact: {}", deleted.full_name());
        }

        InquiryCommands::Add {
            contact,
            subject,
            message,
        } => {
            authorize(role, Action::ManageInquiries)?;
            let contact = service.require_contact(&contact)?;
            let inquiry = service.create_inquiry(contact.id, &subject, &message)?;
            println!("Opened inquiry '{}' for {}", inquiry.subject, contact.full_name());
            println!("  ID: {}", inquiry.id);
        }

        InquiryCommands::Board => {
            authorize(role, Action::View)?;
            let names: HashMap<_, _> = service
                .list_contacts()?
                .into_iter()
                .map(|c| (c.id, c.full_name()))
                .collect();
            print!("{}", format_board(&service.board()?, &names));
        }

        InquiryCommands::Move { inquiry, status } => {
            authorize(role, Action::ManageInquiries)?;
            let status = InquiryStatus::parse(&status).ok_or_else(|| {
                StayError::Validation(format!(
                    "Invalid status: '{}'. Valid values: new, in-progress, closed",
                    status
                ))
            })?;
            let found = service.require_inquiry(&inquiry)?;
            let moved = service.move_inquiry(found.id, status)?;
            println!("'{}' is now {}", moved.subject, moved.status);
        }

        InquiryCommands::Delete { inquiry } => {
            authorize(role, Action::ManageInquiries)?;
            let found = service.require_inquiry(&inquiry)?;
            let deleted = service.delete_inquiry(found.id)?;
            println!("Deleted inquiry: {}", deleted.subject);
        }
    }

    Ok(())
}
