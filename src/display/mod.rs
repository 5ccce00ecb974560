//! Display formatting for terminal output
//!
//! Plain-text tables and detail views for every entity, plus a few shared
//! helpers for column layout.

pub mod audit;
pub mod booking;
pub mod expense;
pub mod guest;
pub mod inquiry;
pub mod property;

pub use audit::format_audit_entries;
pub use booking::{format_booking_details, format_booking_list, BookingRow};
pub use expense::{format_fixed_expense_list, format_generation_report, format_variable_expense_list};
pub use guest::{format_guest_details, format_guest_list};
pub use inquiry::{format_board, format_contact_list};
pub use property::{format_property_details, format_property_list, format_unit_list};

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

/// Widest value in a column, never narrower than its header
pub(crate) fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.chars().count())
}

pub(crate) fn separator(width: usize) -> String {
    "-".repeat(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 5), "He...");
        assert_eq!(truncate("Hi", 5), "Hi");
        assert_eq!(truncate("Disponibilità agosto", 16), "Disponibilità...");
        assert_eq!(truncate("Hello", 2), "..");
    }

    #[test]
    fn test_column_width() {
        let values = ["Villa Serena", "Casa"];
        assert_eq!(column_width("Name", values.iter().copied()), 12);
        assert_eq!(column_width("Property", std::iter::empty()), 8);
    }
}
