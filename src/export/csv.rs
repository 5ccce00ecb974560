//! CSV export
//!
//! Bookings and expenses flattened to one row each, with names resolved
//! so the files read well in a spreadsheet.

use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;

use crate::error::StayResult;
use crate::models::{PropertyId, UnitId};
use crate::storage::Storage;

#[derive(Serialize)]
struct BookingRow<'a> {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Property")]
    property: &'a str,
    #[serde(rename = "Unit")]
    unit: &'a str,
    #[serde(rename = "Guest")]
    guest: String,
    #[serde(rename = "Check-in")]
    start_date: String,
    #[serde(rename = "Check-out")]
    end_date: String,
    #[serde(rename = "Nights")]
    nights: i64,
    #[serde(rename = "Price")]
    price: String,
    #[serde(rename = "Source")]
    source: &'a str,
    #[serde(rename = "Notes")]
    notes: &'a str,
}

#[derive(Serialize)]
struct ExpenseRow<'a> {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Kind")]
    kind: &'static str,
    #[serde(rename = "Property")]
    property: &'a str,
    #[serde(rename = "Unit")]
    unit: &'a str,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "End Date")]
    end_date: String,
    #[serde(rename = "Recurrence")]
    recurrence: String,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Amount")]
    amount: String,
}

struct Names {
    properties: HashMap<PropertyId, String>,
    units: HashMap<UnitId, (PropertyId, String)>,
}

impl Names {
    fn load(storage: &Storage) -> StayResult<Self> {
        let properties = storage
            .properties
            .get_all()?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();
        let units = storage
            .units
            .get_all()?
            .into_iter()
            .map(|u| (u.id, (u.property_id, u.name)))
            .collect();
        Ok(Self { properties, units })
    }

    fn property(&self, id: &PropertyId) -> &str {
        self.properties.get(id).map(String::as_str).unwrap_or("Unknown")
    }

    fn unit(&self, id: Option<&UnitId>) -> &str {
        match id {
            Some(id) => self.units.get(id).map(|(_, n)| n.as_str()).unwrap_or("Unknown"),
            None => "",
        }
    }
}

/// Export every booking, ordered by check-in date
pub fn export_bookings_csv<W: Write>(storage: &Storage, writer: W) -> StayResult<usize> {
    let names = Names::load(storage)?;
    let guests: HashMap<_, _> = storage
        .guests
        .get_all()?
        .into_iter()
        .map(|g| (g.id, g.full_name()))
        .collect();

    let bookings = storage.bookings.get_all()?;
    let mut csv = csv::Writer::from_writer(writer);

    for booking in &bookings {
        let property = names
            .units
            .get(&booking.unit_id)
            .map(|(property_id, _)| names.property(property_id))
            .unwrap_or("Unknown");

        csv.serialize(BookingRow {
            id: booking.id.to_string(),
            property,
            unit: names.unit(Some(&booking.unit_id)),
            guest: guests
                .get(&booking.guest_id)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string()),
            start_date: booking.start_date.to_string(),
            end_date: booking.end_date.to_string(),
            nights: booking.nights(),
            price: booking.price.to_string(),
            source: &booking.source,
            notes: &booking.notes,
        })?;
    }

    csv.flush()?;
    Ok(bookings.len())
}

/// Export fixed expense templates followed by dated variable expenses
pub fn export_expenses_csv<W: Write>(storage: &Storage, writer: W) -> StayResult<usize> {
    let names = Names::load(storage)?;
    let fixed = storage.fixed_expenses.get_all()?;
    let mut variable = storage.variable_expenses.get_all()?;
    variable.sort_by_key(|e| e.date);

    let mut csv = csv::Writer::from_writer(writer);

    for expense in &fixed {
        csv.serialize(ExpenseRow {
            id: expense.id.to_string(),
            kind: "fixed",
            property: names.property(&expense.property_id),
            unit: names.unit(expense.unit_id.as_ref()),
            date: expense.start_date.to_string(),
            end_date: expense.end_date.map(|d| d.to_string()).unwrap_or_default(),
            recurrence: expense.recurrence.to_string(),
            description: &expense.description,
            category: expense.category.as_deref().unwrap_or(""),
            amount: expense.amount.to_string(),
        })?;
    }

    for expense in &variable {
        csv.serialize(ExpenseRow {
            id: expense.id.to_string(),
            kind: "variable",
            property: names.property(&expense.property_id),
            unit: names.unit(expense.unit_id.as_ref()),
            date: expense.date.to_string(),
            end_date: String::new(),
            recurrence: String::new(),
            description: &expense.description,
            category: &expense.category,
            amount: expense.amount.to_string(),
        })?;
    }

    csv.flush()?;
    Ok(fixed.len() + variable.len())
}
