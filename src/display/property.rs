//! Property and unit display formatting

use super::{column_width, separator};
use crate::models::{Property, Unit};

/// Format properties with their unit counts as a table
pub fn format_property_list(properties: &[(Property, usize)]) -> String {
    if properties.is_empty() {
        return "No properties found.\n".to_string();
    }

    let name_width = column_width("Name", properties.iter().map(|(p, _)| p.name.as_str()));
    let mut output = String::new();
    output.push_str(&format!(
        "{:<14}  {:<name_width$}  {:>5}  {}\n",
        "ID",
        "Name",
        "Units",
        "Address",
        name_width = name_width
    ));
    output.push_str(&format!(
        "{}  {}  {}  {}\n",
        separator(14),
        separator(name_width),
        separator(5),
        separator(20)
    ));

    for (property, unit_count) in properties {
        output.push_str(&format!(
            "{:<14}  {:<name_width$}  {:>5}  {}\n",
            property.id.to_string(),
            property.name,
            unit_count,
            property.address,
            name_width = name_width
        ));
    }

    output
}

/// Format units as a table
pub fn format_unit_list(units: &[Unit], currency: &str) -> String {
    if units.is_empty() {
        return "No units.\n".to_string();
    }

    let name_width = column_width("Unit", units.iter().map(|u| u.name.as_str()));
    let mut output = String::new();
    output.push_str(&format!(
        "{:<14}  {:<name_width$}  {:<9}  {:>4}  {:>5}  {:>6}  {:>12}\n",
        "ID",
        "Unit",
        "Type",
        "Beds",
        "Baths",
        "m²",
        "Base/night",
        name_width = name_width
    ));

    for unit in units {
        output.push_str(&format!(
            "{:<14}  {:<name_width$}  {:<9}  {:>4}  {:>5}  {:>6}  {:>12}\n",
            unit.id.to_string(),
            unit.name,
            unit.kind.to_string(),
            unit.beds,
            unit.baths,
            unit.surface,
            unit.base_price.format_with_symbol(currency),
            name_width = name_width
        ));
    }

    output
}

/// Format a property with its units
pub fn format_property_details(property: &Property, units: &[Unit], currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Property: {}\n", property.name));
    output.push_str(&format!("  ID:       {}\n", property.id));
    if !property.address.is_empty() {
        output.push_str(&format!("  Address:  {}\n", property.address));
    }
    if !property.notes.is_empty() {
        output.push_str(&format!("  Notes:    {}\n", property.notes));
    }
    output.push_str(&format!(
        "  Created:  {}\n",
        property.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push('\n');
    output.push_str(&format_unit_list(units, currency));

    output
}
