//! Contact and inquiry board display formatting

use std::collections::HashMap;

use super::{separator, truncate};
use crate::models::{Contact, ContactId};
use crate::services::BoardColumn;

pub fn format_contact_list(contacts: &[Contact]) -> String {
    if contacts.is_empty() {
        return "No contacts found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<24}  {:<28}  {:<20}  {}\n",
        "ID", "Name", "Email", "Company", "Tags"
    ));
    output.push_str(&separator(96));
    output.push('\n');

    for c in contacts {
        output.push_str(&format!(
            "{:<12}  {:<24}  {:<28}  {:<20}  {}\n",
            c.id.to_string(),
            truncate(&c.full_name(), 24),
            truncate(&c.email, 28),
            truncate(&c.company, 20),
            c.tags.join(", ")
        ));
    }

    output
}

/// Render the board one column after another, each headed by its status
pub fn format_board(columns: &[BoardColumn], contacts: &HashMap<ContactId, String>) -> String {
    let mut output = String::new();

    for column in columns {
        output.push_str(&format!("{} ({})\n", column.status, column.inquiries.len()));
        output.push_str(&separator(40));
        output.push('\n');

        if column.inquiries.is_empty() {
            output.push_str("  (empty)\n");
        }
        for inquiry in &column.inquiries {
            let contact = contacts
                .get(&inquiry.contact_id)
                .map(String::as_str)
                .unwrap_or("Unknown contact");
            output.push_str(&format!(
                "  {:<12}  {}  [{}]\n",
                inquiry.id.to_string(),
                truncate(&inquiry.subject, 40),
                contact
            ));
        }
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Inquiry, InquiryStatus};

    #[test]
    fn test_format_board() {
        let contact = Contact::new("Laura", "Gialli");
        let inquiry = Inquiry::new(contact.id, "Informazioni appartamento", "");
        let columns: Vec<BoardColumn> = InquiryStatus::all()
            .into_iter()
            .map(|status| BoardColumn {
                status,
                inquiries: if status == InquiryStatus::New {
                    vec![inquiry.clone()]
                } else {
                    Vec::new()
                },
            })
            .collect();
        let names = HashMap::from([(contact.id, contact.full_name())]);

        let output = format_board(&columns, &names);
        assert!(output.starts_with("New (1)\n"));
        assert!(output.contains("Informazioni appartamento  [Laura Gialli]"));
        assert!(output.contains("In Progress (0)"));
        assert!(output.contains("(empty)"));
    }

    #[test]
    fn test_format_contact_tags() {
        let mut contact = Contact::new("Roberto", "Neri");
        contact.add_tag("agenzia");
        contact.add_tag("partner");
        assert!(format_contact_list(&[contact]).contains("agenzia, partner"));
    }
}
