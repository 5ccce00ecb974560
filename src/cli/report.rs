//! Report CLI commands

use std::path::PathBuf;

use clap::Subcommand;

use super::{create_output, today};
use crate::auth::{authorize, Action, Role};
use crate::config::settings::Settings;
use crate::error::{StayError, StayResult};
use crate::models::ReportPeriod;
use crate::reports::ProfitLossReport;
use crate::services::PropertyService;
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Profit & Loss for a property
    #[command(alias = "profit-loss")]
    Pl {
        /// Property name or ID
        property: String,
        /// Month to report (YYYY-MM, default current month)
        #[arg(short, long, conflicts_with = "year")]
        month: Option<String>,
        /// Whole year to report (YYYY)
        #[arg(short, long)]
        year: Option<i32>,
        /// Write the report as CSV to this file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    role: Role,
    cmd: ReportCommands,
) -> StayResult<()> {
    match cmd {
        ReportCommands::Pl {
            property,
            month,
            year,
            output,
        } => {
            authorize(role, Action::View)?;
            let property = PropertyService::new(storage).require(&property)?;

            let period = match (month, year) {
                (Some(month), _) => match ReportPeriod::parse(&month) {
                    Ok(period @ ReportPeriod::Month { .. }) => period,
                    _ => {
                        return Err(StayError::Validation(format!(
                            "Invalid month: '{}'. Use format YYYY-MM",
                            month
                        )))
                    }
                },
                (None, Some(year)) => ReportPeriod::year(year),
                (None, None) => ReportPeriod::month_of(today()),
            };

            let report =
                ProfitLossReport::generate(storage, &property, period, &settings.generated_prefix)?;

            match output {
                Some(path) => {
                    report.export_csv(create_output(&path)?)?;
                    println!("Report exported to: {}", path.display());
                }
                None => print!("{}", report.format_terminal(&settings.currency_symbol)),
            }
        }
    }

    Ok(())
}
