//! Reports module for StayKeeper
//!
//! Currently a single report: profit and loss per property and period.

pub mod profit_loss;

pub use profit_loss::{CategoryLine, ProfitLossReport, UnitRevenue};
