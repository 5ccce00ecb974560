//! Storage initialization
//!
//! Handles first-run setup and the optional demo data set.

use chrono::NaiveDate;

use crate::config::paths::StayPaths;
use crate::config::settings::Settings;
use crate::error::{StayError, StayResult};
use crate::models::{
    Booking, Contact, FixedExpense, Guest, Inquiry, InquiryStatus, Money, Property, PropertyId,
    Recurrence, Unit, UnitId, UnitKind, VariableExpense,
};

use super::Storage;

/// Initialize storage for a fresh installation
///
/// Creates the directory layout and writes default settings if none exist.
pub fn initialize_storage(paths: &StayPaths) -> StayResult<Settings> {
    paths.ensure_directories()?;

    if paths.settings_file().exists() {
        return Settings::load_or_create(paths);
    }

    let settings = Settings::default();
    settings.save(paths)?;
    tracing::info!(base_dir = %paths.base_dir().display(), "initialized data directory");
    Ok(settings)
}

fn date(year: i32, month: u32, day: u32) -> StayResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| StayError::Validation(format!("Invalid date {year}-{month}-{day}")))
}

#[allow(clippy::too_many_arguments)]
fn unit(
    property_id: PropertyId,
    name: &str,
    kind: UnitKind,
    beds: u32,
    baths: u32,
    surface: u32,
    base_price: i64,
    notes: &str,
) -> Unit {
    let mut unit = Unit::new(property_id, name, kind);
    unit.beds = beds;
    unit.baths = baths;
    unit.surface = surface;
    unit.base_price = Money::from_units(base_price);
    unit.notes = notes.to_string();
    unit
}

fn guest(first: &str, last: &str, email: &str, phone: &str, address: &str) -> Guest {
    let mut guest = Guest::new(first, last);
    guest.email = email.to_string();
    guest.phone = phone.to_string();
    guest.address = address.to_string();
    guest
}

/// Populate empty storage with two properties and a season of activity
///
/// Fails if any property already exists.
pub fn seed_demo_data(storage: &Storage) -> StayResult<()> {
    if storage.properties.count()? > 0 {
        return Err(StayError::Validation(
            "Demo data can only be loaded into empty storage".into(),
        ));
    }

    let mut villa = Property::new("Villa Serena", "Via Roma 123, Milano");
    villa.notes = "Villa con giardino e piscina".into();
    let mut residence = Property::new("Residence Belvedere", "Via Garibaldi 45, Roma");
    residence.notes = "Residence con vista panoramica".into();

    let units = [
        unit(villa.id, "Camera Deluxe", UnitKind::Room, 2, 1, 25, 80, "Camera con vista giardino"),
        unit(villa.id, "Suite Premium", UnitKind::Room, 3, 2, 35, 120, "Suite con balcone"),
        unit(
            villa.id,
            "Appartamento Giardino",
            UnitKind::Apartment,
            4,
            2,
            70,
            150,
            "Appartamento con accesso diretto al giardino",
        ),
        unit(residence.id, "Camera Standard", UnitKind::Room, 2, 1, 20, 65, "Camera standard con vista città"),
        unit(residence.id, "Camera Superior", UnitKind::Room, 2, 1, 25, 85, "Camera superior con vista panoramica"),
        unit(
            residence.id,
            "Appartamento Panoramico",
            UnitKind::Apartment,
            5,
            2,
            90,
            180,
            "Appartamento con terrazza panoramica",
        ),
    ];
    let unit_id = |i: usize| -> UnitId { units[i].id };

    let guests = [
        guest("Mario", "Rossi", "mario.rossi@example.com", "+39 333 1234567", "Via Verdi 10, Torino"),
        guest("Giulia", "Bianchi", "giulia.bianchi@example.com", "+39 345 7654321", "Via Dante 25, Firenze"),
        guest("Paolo", "Verdi", "paolo.verdi@example.com", "+39 347 9876543", "Via Manzoni 5, Bologna"),
    ];

    let booking_rows = [
        (0, 0, date(2024, 8, 1)?, date(2024, 8, 7)?, 560, "Booking.com", "Richiesto late check-out"),
        (1, 1, date(2024, 8, 10)?, date(2024, 8, 17)?, 840, "AirBnB", "Richiesto servizio in camera"),
        (5, 2, date(2024, 9, 1)?, date(2024, 9, 10)?, 1800, "Diretto", "Famiglia con bambini"),
        (3, 0, date(2024, 9, 15)?, date(2024, 9, 20)?, 325, "Expedia", "Viaggio di lavoro"),
        (2, 1, date(2024, 10, 1)?, date(2024, 10, 15)?, 2250, "Diretto", "Soggiorno lungo"),
    ];

    let start = date(2024, 1, 1)?;
    let fixed_rows = [
        (villa.id, None, "Affitto", 1500, Recurrence::Monthly),
        (villa.id, None, "Assicurazione", 1200, Recurrence::Annual),
        (villa.id, Some(unit_id(2)), "Manutenzione giardino", 100, Recurrence::Monthly),
        (residence.id, None, "Condominio", 800, Recurrence::Monthly),
        (residence.id, None, "Tasse comunali", 950, Recurrence::Annual),
    ];

    let variable_rows = [
        (villa.id, None, date(2024, 7, 15)?, "Riparazione condizionatore", 250, "Manutenzione"),
        (villa.id, Some(unit_id(1)), date(2024, 7, 20)?, "Sostituzione frigorifero", 450, "Elettrodomestici"),
        (residence.id, None, date(2024, 7, 10)?, "Pulizia straordinaria", 180, "Pulizie"),
        (residence.id, Some(unit_id(5)), date(2024, 7, 25)?, "Riparazione perdita acqua", 320, "Idraulica"),
    ];

    for (unit_idx, guest_idx, start_date, end_date, price, source, notes) in booking_rows {
        let mut booking = Booking::new(
            unit_id(unit_idx),
            guests[guest_idx].id,
            start_date,
            end_date,
            Money::from_units(price),
        );
        booking.source = source.to_string();
        booking.notes = notes.to_string();
        storage.bookings.upsert(booking)?;
    }

    for (property_id, unit, description, amount, recurrence) in fixed_rows {
        let mut expense = FixedExpense::new(
            property_id,
            description,
            Money::from_units(amount),
            recurrence,
            start,
        );
        expense.unit_id = unit;
        storage.fixed_expenses.upsert(expense)?;
    }

    for (property_id, unit, on, description, amount, category) in variable_rows {
        let mut expense =
            VariableExpense::new(property_id, on, description, Money::from_units(amount), category);
        expense.unit_id = unit;
        storage.variable_expenses.upsert(expense)?;
    }

    let mut roberto = Contact::new("Roberto", "Neri");
    roberto.email = "roberto.neri@example.com".into();
    roberto.phone = "+39 348 1122334".into();
    roberto.company = "Agenzia Viaggi Sole".into();
    roberto.add_tag("agenzia");
    roberto.add_tag("partner");
    roberto.notes = "Contatto principale per prenotazioni di gruppo".into();

    let mut laura = Contact::new("Laura", "Gialli");
    laura.email = "laura.gialli@example.com".into();
    laura.phone = "+39 349 5566778".into();
    laura.add_tag("cliente");
    laura.add_tag("vip");
    laura.notes = "Cliente abituale".into();

    let group_request = Inquiry::new(
        roberto.id,
        "Disponibilità per gruppo turistico",
        "Richiesta disponibilità per gruppo di 15 persone dal 15 al 20 settembre",
    );
    let mut apartment_info = Inquiry::new(
        laura.id,
        "Informazioni appartamento panoramico",
        "Vorrei informazioni dettagliate sull'appartamento panoramico e i servizi inclusi",
    );
    apartment_info.move_to(InquiryStatus::InProgress);

    storage.properties.upsert(villa)?;
    storage.properties.upsert(residence)?;
    for unit in units {
        storage.units.upsert(unit)?;
    }
    for guest in guests {
        storage.guests.upsert(guest)?;
    }
    storage.contacts.upsert(roberto)?;
    storage.contacts.upsert(laura)?;
    storage.inquiries.upsert(group_request)?;
    storage.inquiries.upsert(apartment_info)?;

    storage.save_all()?;
    tracing::info!("demo data loaded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage_writes_settings_once() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StayPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(!paths.is_initialized());
        initialize_storage(&paths).unwrap();
        assert!(paths.is_initialized());

        let mut settings = Settings::load_or_create(&paths).unwrap();
        settings.currency_symbol = "$".into();
        settings.save(&paths).unwrap();

        let again = initialize_storage(&paths).unwrap();
        assert_eq!(again.currency_symbol, "$");
    }

    #[test]
    fn test_seed_demo_data() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StayPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths.clone()).unwrap();

        seed_demo_data(&storage).unwrap();

        let reloaded = Storage::open(paths).unwrap();
        assert_eq!(reloaded.properties.count().unwrap(), 2);
        assert_eq!(reloaded.units.count().unwrap(), 6);
        assert_eq!(reloaded.guests.count().unwrap(), 3);
        assert_eq!(reloaded.bookings.count().unwrap(), 5);
        assert_eq!(reloaded.fixed_expenses.count().unwrap(), 5);
        assert_eq!(reloaded.variable_expenses.count().unwrap(), 4);
        assert_eq!(reloaded.contacts.count().unwrap(), 2);
        assert_eq!(reloaded.inquiries.count().unwrap(), 2);
    }

    #[test]
    fn test_seed_refuses_non_empty_storage() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::open(StayPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        seed_demo_data(&storage).unwrap();

        let err = seed_demo_data(&storage).unwrap_err();
        assert!(err.is_validation());
    }
}
