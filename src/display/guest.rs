//! Guest display formatting

use super::{column_width, separator};
use crate::models::Guest;

pub fn format_guest_list(guests: &[Guest]) -> String {
    if guests.is_empty() {
        return "No guests found.\n".to_string();
    }

    let names: Vec<String> = guests.iter().map(|g| g.full_name()).collect();
    let name_width = column_width("Name", names.iter().map(String::as_str));
    let email_width = column_width("Email", guests.iter().map(|g| g.email.as_str()));

    let mut output = String::new();
    output.push_str(&format!(
        "{:<14}  {:<name_width$}  {:<email_width$}  {}\n",
        "ID",
        "Name",
        "Email",
        "Phone",
        name_width = name_width,
        email_width = email_width
    ));
    output.push_str(&format!(
        "{}  {}  {}  {}\n",
        separator(14),
        separator(name_width),
        separator(email_width),
        separator(16)
    ));

    for (guest, name) in guests.iter().zip(&names) {
        output.push_str(&format!(
            "{:<14}  {:<name_width$}  {:<email_width$}  {}\n",
            guest.id.to_string(),
            name,
            guest.email,
            guest.phone,
            name_width = name_width,
            email_width = email_width
        ));
    }

    output
}

/// Format a guest with the number of stays on record
pub fn format_guest_details(guest: &Guest, booking_count: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("Guest: {}\n", guest.full_name()));
    output.push_str(&format!("  ID:       {}\n", guest.id));
    for (label, value) in [
        ("Email", &guest.email),
        ("Phone", &guest.phone),
        ("Address", &guest.address),
        ("Notes", &guest.notes),
    ] {
        if !value.is_empty() {
            output.push_str(&format!("  {:<9} {}\n", format!("{}:", label), value));
        }
    }
    output.push_str(&format!("  Bookings: {}\n", booking_count));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_guest_list() {
        let mut guest = Guest::new("Mario", "Rossi");
        guest.email = "mario.rossi@example.com".into();

        let output = format_guest_list(&[guest]);
        assert!(output.contains("Mario Rossi"));
        assert!(output.contains("mario.rossi@example.com"));
        assert_eq!(format_guest_list(&[]), "No guests found.\n");
    }

    #[test]
    fn test_details_skip_empty_fields() {
        let guest = Guest::new("Giulia", "Bianchi");
        let output = format_guest_details(&guest, 2);

        assert!(output.contains("Guest: Giulia Bianchi"));
        assert!(output.contains("Bookings: 2"));
        assert!(!output.contains("Email:"));
    }
}
