//! Guest CLI commands

use clap::Subcommand;

use crate::auth::{authorize, Action, Role};
use crate::display::{format_guest_details, format_guest_list};
use crate::error::StayResult;
use crate::services::{GuestDetails, GuestService};
use crate::storage::Storage;

/// Guest subcommands
#[derive(Subcommand)]
pub enum GuestCommands {
    /// Add a guest
    Add {
        first_name: String,
        last_name: String,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
        #[arg(short, long)]
        address: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List all guests
    List,
    /// Show a guest
    Show {
        /// Guest ID, email, or full name
        guest: String,
    },
    /// Edit a guest
    Edit {
        /// Guest ID, email, or full name
        guest: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
        #[arg(short, long)]
        address: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Delete a guest with no bookings
    Delete {
        /// Guest ID, email, or full name
        guest: String,
    },
}

/// Handle a guest command
pub fn handle_guest_command(storage: &Storage, role: Role, cmd: GuestCommands) -> StayResult<()> {
    let service = GuestService::new(storage);

    match cmd {
        GuestCommands::Add {
            first_name,
            last_name,
            email,
            phone,
            address,
            notes,
        } => {
            authorize(role, Action::ManageGuests)?;
            let guest = service.create(
                &first_name,
                &last_name,
                GuestDetails {
                    email,
                    phone,
                    address,
                    notes,
                    ..GuestDetails::default()
                },
            )?;
            println!("Added guest: {}", guest.full_name());
            println!("  ID: {}", guest.id);
        }

        GuestCommands::List => {
            authorize(role, Action::View)?;
            print!("{}", format_guest_list(&service.list()?));
        }

        GuestCommands::Show { guest } => {
            authorize(role, Action::View)?;
            let guest = service.require(&guest)?;
            let bookings = storage.bookings.get_all()?;
            let count = bookings.iter().filter(|b| b.guest_id == guest.id).count();
            print!("{}", format_guest_details(&guest, count));
        }

        GuestCommands::Edit {
            guest,
            first_name,
            last_name,
            email,
            phone,
            address,
            notes,
        } => {
            authorize(role, Action::ManageGuests)?;
            let found = service.require(&guest)?;
            let updated = service.update(
                found.id,
                GuestDetails {
                    first_name,
                    last_name,
                    email,
                    phone,
                    address,
                    notes,
                },
            )?;
            println!("Updated guest: {}", updated.full_name());
        }

        GuestCommands::Delete { guest } => {
            authorize(role, Action::ManageGuests)?;
            let found = service.require(&guest)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted guest: {}", deleted.full_name());
        }
    }

    Ok(())
}
