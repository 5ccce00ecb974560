//! Property CLI commands
//!
//! Properties and the units inside them.

use clap::Subcommand;

use super::parse_money;
use crate::auth::{authorize, Action, Role};
use crate::config::settings::Settings;
use crate::display::{format_property_details, format_property_list};
use crate::error::{StayError, StayResult};
use crate::models::{PropertyId, UnitKind};
use crate::services::{NewUnit, PropertyService, PropertyUpdate, UnitUpdate};
use crate::storage::Storage;

/// Property subcommands
#[derive(Subcommand)]
pub enum PropertyCommands {
    /// Create a new property
    Create {
        /// Property name
        name: String,
        /// Street address
        #[arg(short, long, default_value = "")]
        address: String,
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    /// List all properties
    List,
    /// Show a property and its units
    Show {
        /// Property name or ID
        property: String,
    },
    /// Edit a property
    Edit {
        /// Property name or ID
        property: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        address: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Delete a property with no units or expenses
    Delete {
        /// Property name or ID
        property: String,
    },
    /// Add a unit (room or apartment) to a property
    AddUnit {
        /// Property name or ID
        property: String,
        /// Unit name
        name: String,
        /// Unit type (room, apartment)
        #[arg(short = 't', long, default_value = "room")]
        kind: String,
        #[arg(long, default_value_t = 0)]
        beds: u32,
        #[arg(long, default_value_t = 0)]
        baths: u32,
        /// Surface in square meters
        #[arg(long, default_value_t = 0)]
        surface: u32,
        /// Nightly base price
        #[arg(short, long, default_value = "0")]
        price: String,
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    /// Edit a unit
    EditUnit {
        /// Unit name or ID
        unit: String,
        /// Property the unit belongs to (needed when names repeat)
        #[arg(short = 'P', long)]
        property: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(short = 't', long)]
        kind: Option<String>,
        #[arg(long)]
        beds: Option<u32>,
        #[arg(long)]
        baths: Option<u32>,
        #[arg(long)]
        surface: Option<u32>,
        #[arg(short, long)]
        price: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Delete a unit with no bookings or expenses
    DeleteUnit {
        /// Unit name or ID
        unit: String,
        #[arg(short = 'P', long)]
        property: Option<String>,
    },
}

fn parse_kind(value: &str) -> StayResult<UnitKind> {
    UnitKind::parse(value).ok_or_else(|| {
        StayError::Validation(format!(
            "Invalid unit type: '{}'. Valid types: room, apartment",
            value
        ))
    })
}

/// Resolve an optional `--property` argument to its ID
pub(crate) fn resolve_property(
    service: &PropertyService,
    property: Option<&str>,
) -> StayResult<Option<PropertyId>> {
    property
        .map(|p| service.require(p).map(|found| found.id))
        .transpose()
}

/// Handle a property command
pub fn handle_property_command(
    storage: &Storage,
    settings: &Settings,
    role: Role,
    cmd: PropertyCommands,
) -> StayResult<()> {
    let service = PropertyService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        PropertyCommands::Create {
            name,
            address,
            notes,
        } => {
            authorize(role, Action::ManageProperties)?;
            let property = service.create(&name, &address, &notes)?;
            println!("Created property: {}", property.name);
            println!("  ID: {}", property.id);
        }

        PropertyCommands::List => {
            authorize(role, Action::View)?;
            let rows = service
                .list()?
                .into_iter()
                .map(|p| service.units(p.id).map(|units| (p, units.len())))
                .collect::<StayResult<Vec<_>>>()?;
            print!("{}", format_property_list(&rows));
        }

        PropertyCommands::Show { property } => {
            authorize(role, Action::View)?;
            let property = service.require(&property)?;
            let units = service.units(property.id)?;
            print!("{}", format_property_details(&property, &units, currency));
        }

        PropertyCommands::Edit {
            property,
            name,
            address,
            notes,
        } => {
            authorize(role, Action::ManageProperties)?;
            let found = service.require(&property)?;

            if name.is_none() && address.is_none() && notes.is_none() {
                println!("No changes specified. Use --name, --address or --notes.");
                return Ok(());
            }

            let updated = service.update(
                found.id,
                PropertyUpdate {
                    name,
                    address,
                    notes,
                },
            )?;
            println!("Updated property: {}", updated.name);
        }

        PropertyCommands::Delete { property } => {
            authorize(role, Action::ManageProperties)?;
            let found = service.require(&property)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted property: {}", deleted.name);
        }

        PropertyCommands::AddUnit {
            property,
            name,
            kind,
            beds,
            baths,
            surface,
            price,
            notes,
        } => {
            authorize(role, Action::ManageProperties)?;
            let found = service.require(&property)?;
            let unit = service.add_unit(
                found.id,
                NewUnit {
                    name,
                    kind: parse_kind(&kind)?,
                    beds,
                    baths,
                    surface,
                    base_price: parse_money(&price)?,
                    notes,
                },
            )?;
            println!("Added {} '{}' to {}", unit.kind, unit.name, found.name);
            println!("  ID: {}", unit.id);
        }

        PropertyCommands::EditUnit {
            unit,
            property,
            name,
            kind,
            beds,
            baths,
            surface,
            price,
            notes,
        } => {
            authorize(role, Action::ManageProperties)?;
            let property_id = resolve_property(&service, property.as_deref())?;
            let found = service.require_unit(&unit, property_id)?;

            let changes = UnitUpdate {
                name,
                kind: kind.as_deref().map(parse_kind).transpose()?,
                beds,
                baths,
                surface,
                base_price: price.as_deref().map(parse_money).transpose()?,
                notes,
            };
            let updated = service.update_unit(found.id, changes)?;
            println!("Updated unit: {}", updated.name);
        }

        PropertyCommands::DeleteUnit { unit, property } => {
            authorize(role, Action::ManageProperties)?;
            let property_id = resolve_property(&service, property.as_deref())?;
            let found = service.require_unit(&unit, property_id)?;
            let deleted = service.delete_unit(found.id)?;
            println!("Deleted unit: {}", deleted.name);
        }
    }

    Ok(())
}
