//! Booking display formatting

use super::{column_width, separator, truncate};
use crate::models::Booking;

/// A booking with its unit and guest names resolved
#[derive(Debug, Clone)]
pub struct BookingRow {
    pub booking: Booking,
    pub property: String,
    pub unit: String,
    pub guest: String,
}

/// Format bookings as a table with a revenue total
pub fn format_booking_list(rows: &[BookingRow], currency: &str) -> String {
    if rows.is_empty() {
        return "No bookings found.\n".to_string();
    }

    let unit_width = column_width("Unit", rows.iter().map(|r| r.unit.as_str())).min(24);
    let guest_width = column_width("Guest", rows.iter().map(|r| r.guest.as_str())).min(24);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<10}  {:<10}  {:>6}  {:<unit_width$}  {:<guest_width$}  {:>12}  {}\n",
        "ID",
        "Check-in",
        "Check-out",
        "Nights",
        "Unit",
        "Guest",
        "Price",
        "Source",
        unit_width = unit_width,
        guest_width = guest_width
    ));
    output.push_str(&format!(
        "{}  {}  {}  {}  {}  {}  {}  {}\n",
        separator(12),
        separator(10),
        separator(10),
        separator(6),
        separator(unit_width),
        separator(guest_width),
        separator(12),
        separator(10)
    ));

    for row in rows {
        let b = &row.booking;
        output.push_str(&format!(
            "{:<12}  {:<10}  {:<10}  {:>6}  {:<unit_width$}  {:<guest_width$}  {:>12}  {}\n",
            b.id.to_string(),
            b.start_date.to_string(),
            b.end_date.to_string(),
            b.nights(),
            truncate(&row.unit, unit_width),
            truncate(&row.guest, guest_width),
            b.price.format_with_symbol(currency),
            b.source,
            unit_width = unit_width,
            guest_width = guest_width
        ));
    }

    let total = rows.iter().map(|r| r.booking.price).sum::<crate::models::Money>();
    output.push_str(&format!(
        "\n{} booking(s), total {}\n",
        rows.len(),
        total.format_with_symbol(currency)
    ));

    output
}

pub fn format_booking_details(row: &BookingRow, currency: &str) -> String {
    let b = &row.booking;
    let mut output = String::new();

    output.push_str(&format!("Booking: {}\n", b.id));
    output.push_str(&format!("  Property:  {}\n", row.property));
    output.push_str(&format!("  Unit:      {}\n", row.unit));
    output.push_str(&format!("  Guest:     {}\n", row.guest));
    output.push_str(&format!("  Check-in:  {}\n", b.start_date));
    output.push_str(&format!("  Check-out: {}\n", b.end_date));
    output.push_str(&format!("  Nights:    {}\n", b.nights()));
    output.push_str(&format!("  Price:     {}\n", b.price.format_with_symbol(currency)));
    if !b.source.is_empty() {
        output.push_str(&format!("  Source:    {}\n", b.source));
    }
    if !b.notes.is_empty() {
        output.push_str(&format!("  Notes:     {}\n", b.notes));
    }
    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        b.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        b.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GuestId, Money, UnitId};
    use chrono::NaiveDate;

    fn row() -> BookingRow {
        let mut booking = Booking::new(
            UnitId::new(),
            GuestId::new(),
            NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 8, 7).unwrap(),
            Money::from_units(560),
        );
        booking.source = "Airbnb".into();
        BookingRow {
            booking,
            property: "Villa Serena".into(),
            unit: "Camera Deluxe".into(),
            guest: "Mario Rossi".into(),
        }
    }

    #[test]
    fn test_format_booking_list() {
        let output = format_booking_list(&[row()], "€");
        assert!(output.contains("2024-08-01"));
        assert!(output.contains("Camera Deluxe"));
        assert!(output.contains("1 booking(s), total €560.00"));
    }

    #[test]
    fn test_format_booking_details() {
        let output = format_booking_details(&row(), "€");
        assert!(output.contains("Nights:    6"));
        assert!(output.contains("Source:    Airbnb"));
        assert!(!output.contains("Notes:"));
    }
}
