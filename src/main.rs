use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use staykeeper::auth::Role;
use staykeeper::cli::{
    handle_audit_command, handle_booking_command, handle_expense_command, handle_export_command,
    handle_guest_command, handle_inquiry_command, handle_property_command, handle_report_command,
};
use staykeeper::config::{paths::StayPaths, settings::Settings};
use staykeeper::storage::{initialize_storage, seed_demo_data, Storage};

#[derive(Parser)]
#[command(
    name = "staykeeper",
    version,
    about = "Property management for short-term rentals",
    long_about = "StayKeeper manages rooms and apartments from the terminal: bookings \
                  that never double-book a unit, recurring costs that post themselves, \
                  and a Profit & Loss view per property."
)]
struct Cli {
    /// Act as this role (admin, staff, viewer)
    #[arg(long, global = true, env = "STAYKEEPER_ROLE")]
    role: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and default settings
    Init {
        /// Also load a demo data set
        #[arg(long)]
        demo: bool,
    },

    /// Show current configuration and paths
    Config,

    /// Property and unit management
    #[command(subcommand)]
    Property(staykeeper::cli::PropertyCommands),

    /// Guest management
    #[command(subcommand)]
    Guest(staykeeper::cli::GuestCommands),

    /// Booking management
    #[command(subcommand)]
    Booking(staykeeper::cli::BookingCommands),

    /// Fixed and variable expenses
    #[command(subcommand)]
    Expense(staykeeper::cli::ExpenseCommands),

    /// Contacts and the inquiry board
    #[command(subcommand)]
    Inquiry(staykeeper::cli::InquiryCommands),

    /// Financial reports
    #[command(subcommand)]
    Report(staykeeper::cli::ReportCommands),

    /// Export data to JSON or CSV
    #[command(subcommand)]
    Export(staykeeper::cli::ExportCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

fn resolve_role(flag: Option<&str>, settings: &Settings) -> Result<Role> {
    match flag {
        Some(value) => Role::parse(value).with_context(|| {
            format!("Invalid role '{}'. Valid roles: admin, staff, viewer", value)
        }),
        None => Ok(settings.default_role),
    }
}

fn main() -> Result<()> {
    staykeeper::init_tracing();
    let cli = Cli::parse();

    let paths = StayPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let role = resolve_role(cli.role.as_deref(), &settings)?;

    let storage = Storage::open(paths.clone())?;

    match cli.command {
        Some(Commands::Init { demo }) => {
            println!("Initializing StayKeeper at: {}", paths.base_dir().display());
            initialize_storage(&paths)?;
            if demo {
                seed_demo_data(&storage)?;
                println!("Demo data loaded: 2 properties, 6 units, 5 bookings.");
            }
            println!("Initialization complete!");
            println!();
            println!("Run 'staykeeper property list' to get started.");
        }
        Some(Commands::Config) => {
            println!("StayKeeper Configuration");
            println!("========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!("  Default role:      {}", settings.default_role);
            println!("  Acting role:       {}", role);
            println!("  Generated prefix:  {}", settings.generated_prefix);
            println!("  Monthly category:  {}", settings.monthly_category);
            println!("  Annual category:   {}", settings.annual_category);
        }
        Some(Commands::Property(cmd)) => handle_property_command(&storage, &settings, role, cmd)?,
        Some(Commands::Guest(cmd)) => handle_guest_command(&storage, role, cmd)?,
        Some(Commands::Booking(cmd)) => handle_booking_command(&storage, &settings, role, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, &settings, role, cmd)?,
        Some(Commands::Inquiry(cmd)) => handle_inquiry_command(&storage, role, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, role, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, role, cmd)?,
        Some(Commands::Audit { limit }) => handle_audit_command(&storage, role, limit)?,
        None => {
            println!("StayKeeper - property management for short-term rentals");
            println!();
            println!("Run 'staykeeper --help' for usage information.");
        }
    }

    Ok(())
}
