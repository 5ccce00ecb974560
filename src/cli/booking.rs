//! Booking CLI commands
//!
//! Create and edit stays. Overlapping dates on the same unit are refused
//! with a conflict error naming the booking already holding those nights.

use std::collections::HashMap;

use clap::Subcommand;

use super::property::resolve_property;
use super::{parse_date, parse_money, parse_optional_date};
use crate::auth::{authorize, Action, Role};
use crate::config::settings::Settings;
use crate::display::{format_booking_details, format_booking_list, BookingRow};
use crate::error::StayResult;
use crate::models::Booking;
use crate::services::{BookingFilter, BookingService, BookingUpdate, GuestService, NewBooking, PropertyService};
use crate::storage::Storage;

/// Booking subcommands
#[derive(Subcommand)]
pub enum BookingCommands {
    /// Create a booking
    Create {
        /// Unit name or ID
        unit: String,
        /// Guest ID, email, or full name
        guest: String,
        /// Check-in date (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,
        /// Check-out date (YYYY-MM-DD)
        #[arg(short, long)]
        end: String,
        /// Total price for the stay
        #[arg(short, long)]
        price: String,
        /// Channel (Airbnb, Booking.com, Direct, ...)
        #[arg(long, default_value = "")]
        source: String,
        #[arg(short, long, default_value = "")]
        notes: String,
        /// Property the unit belongs to (needed when unit names repeat)
        #[arg(short = 'P', long)]
        property: Option<String>,
    },
    /// List bookings
    List {
        /// Only bookings on this property's units
        #[arg(short = 'P', long)]
        property: Option<String>,
        /// Only bookings on this unit
        #[arg(short, long)]
        unit: Option<String>,
        /// Only bookings for this guest
        #[arg(short, long)]
        guest: Option<String>,
        /// Stays touching this date or later (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Stays touching this date or earlier (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Show a booking
    Show {
        /// Booking ID
        booking: String,
    },
    /// Edit a booking
    Edit {
        /// Booking ID
        booking: String,
        /// Move the stay to another unit
        #[arg(short, long)]
        unit: Option<String>,
        #[arg(short, long)]
        guest: Option<String>,
        #[arg(short, long)]
        start: Option<String>,
        #[arg(short, long)]
        end: Option<String>,
        #[arg(short, long)]
        price: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
        #[arg(short = 'P', long)]
        property: Option<String>,
    },
    /// Delete a booking
    Delete {
        /// Booking ID
        booking: String,
    },
    /// Check whether a unit is free for the given dates
    Check {
        /// Unit name or ID
        unit: String,
        /// Check-in date (YYYY-MM-DD)
        start: String,
        /// Check-out date (YYYY-MM-DD)
        end: String,
        #[arg(short = 'P', long)]
        property: Option<String>,
    },
}

/// Resolve unit, property and guest names for display
fn booking_rows(storage: &Storage, bookings: Vec<Booking>) -> StayResult<Vec<BookingRow>> {
    let properties: HashMap<_, _> = storage
        .properties
        .get_all()?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();
    let units: HashMap<_, _> = storage
        .units
        .get_all()?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    let guests: HashMap<_, _> = storage
        .guests
        .get_all()?
        .into_iter()
        .map(|g| (g.id, g.full_name()))
        .collect();

    Ok(bookings
        .into_iter()
        .map(|booking| {
            let unit = units.get(&booking.unit_id);
            BookingRow {
                property: unit
                    .and_then(|u| properties.get(&u.property_id))
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                unit: unit
                    .map(|u| u.name.clone())
                    .unwrap_or_else(|| "Unknown".to_string()),
                guest: guests
                    .get(&booking.guest_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                booking,
            }
        })
        .collect())
}

/// Handle a booking command
pub fn handle_booking_command(
    storage: &Storage,
    settings: &Settings,
    role: Role,
    cmd: BookingCommands,
) -> StayResult<()> {
    let service = BookingService::new(storage);
    let properties = PropertyService::new(storage);
    let guests = GuestService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        BookingCommands::Create {
            unit,
            guest,
            start,
            end,
            price,
            source,
            notes,
            property,
        } => {
            authorize(role, Action::CreateBooking)?;
            let property_id = resolve_property(&properties, property.as_deref())?;
            let unit = properties.require_unit(&unit, property_id)?;
            let guest = guests.require(&guest)?;

            let booking = service.create(NewBooking {
                unit_id: unit.id,
                guest_id: guest.id,
                start_date: parse_date(&start)?,
                end_date: parse_date(&end)?,
                price: parse_money(&price)?,
                source,
                notes,
            })?;

            println!(
                "Booked {} for {}: {} -> {} ({} nights, {})",
                unit.name,
                guest.full_name(),
                booking.start_date,
                booking.end_date,
                booking.nights(),
                booking.price.format_with_symbol(currency)
            );
            println!("  ID: {}", booking.id);
        }

        BookingCommands::List {
            property,
            unit,
            guest,
            from,
            to,
        } => {
            authorize(role, Action::View)?;
            let property_id = resolve_property(&properties, property.as_deref())?;
            let unit_id = unit
                .as_deref()
                .map(|u| properties.require_unit(u, property_id).map(|found| found.id))
                .transpose()?;
            let guest_id = guest
                .as_deref()
                .map(|g| guests.require(g).map(|found| found.id))
                .transpose()?;

            let filter = BookingFilter {
                property_id,
                unit_id,
                guest_id,
                from: parse_optional_date(from.as_deref())?,
                to: parse_optional_date(to.as_deref())?,
            };
            let rows = booking_rows(storage, service.list(&filter)?)?;
            print!("{}", format_booking_list(&rows, currency));
        }

        BookingCommands::Show { booking } => {
            authorize(role, Action::View)?;
            let booking = service.require(&booking)?;
            let rows = booking_rows(storage, vec![booking])?;
            for row in &rows {
                print!("{}", format_booking_details(row, currency));
            }
        }

        BookingCommands::Edit {
            booking,
            unit,
            guest,
            start,
            end,
            price,
            source,
            notes,
            property,
        } => {
            authorize(role, Action::UpdateBooking)?;
            let found = service.require(&booking)?;
            let property_id = resolve_property(&properties, property.as_deref())?;

            let changes = BookingUpdate {
                unit_id: unit
                    .as_deref()
                    .map(|u| properties.require_unit(u, property_id).map(|found| found.id))
                    .transpose()?,
                guest_id: guest
                    .as_deref()
                    .map(|g| guests.require(g).map(|found| found.id))
                    .transpose()?,
                start_date: parse_optional_date(start.as_deref())?,
                end_date: parse_optional_date(end.as_deref())?,
                price: price.as_deref().map(parse_money).transpose()?,
                source,
                notes,
            };

            let updated = service.update(found.id, changes)?;
            println!("Updated booking: {}", updated);
        }

        BookingCommands::Delete { booking } => {
            authorize(role, Action::DeleteBooking)?;
            let found = service.require(&booking)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted booking: {}", deleted);
        }

        BookingCommands::Check {
            unit,
            start,
            end,
            property,
        } => {
            authorize(role, Action::View)?;
            let property_id = resolve_property(&properties, property.as_deref())?;
            let unit = properties.require_unit(&unit, property_id)?;
            let start = parse_date(&start)?;
            let end = parse_date(&end)?;

            match service.check_availability(unit.id, start, end, None)? {
                Some(existing) => println!(
                    "{} is NOT available {} -> {}: overlaps booking {}",
                    unit.name, start, end, existing
                ),
                None => println!("{} is available {} -> {}", unit.name, start, end),
            }
        }
    }

    Ok(())
}
