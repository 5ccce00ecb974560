//! CLI commands for data export

use std::io::Write;
use std::path::PathBuf;

use clap::Subcommand;

use super::create_output;
use crate::auth::{authorize, Action, Role};
use crate::error::StayResult;
use crate::export::{export_bookings_csv, export_expenses_csv, export_full_json};
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export every collection to a JSON file
    Json {
        /// Output file path
        output: PathBuf,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Export bookings to CSV
    Bookings {
        /// Output file path
        output: PathBuf,
    },
    /// Export fixed and dated expenses to CSV
    Expenses {
        /// Output file path
        output: PathBuf,
    },
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, role: Role, cmd: ExportCommands) -> StayResult<()> {
    authorize(role, Action::Export)?;

    match cmd {
        ExportCommands::Json { output, pretty } => {
            let mut writer = create_output(&output)?;
            export_full_json(storage, &mut writer, pretty)?;
            writer.flush()?;
            println!("Full database exported to: {}", output.display());
        }
        ExportCommands::Bookings { output } => {
            let count = export_bookings_csv(storage, create_output(&output)?)?;
            println!("Exported {} bookings to: {}", count, output.display());
        }
        ExportCommands::Expenses { output } => {
            let count = export_expenses_csv(storage, create_output(&output)?)?;
            println!("Exported {} expenses to: {}", count, output.display());
        }
    }

    Ok(())
}
