//! User settings for StayKeeper
//!
//! Display preferences, the default acting role for the CLI, and the labels
//! the recurring expense generator stamps on the records it creates.

use serde::{Deserialize, Serialize};

use super::paths::StayPaths;
use crate::auth::Role;
use crate::error::StayError;
use crate::models::{Recurrence, DEFAULT_GENERATED_PREFIX};

/// User settings for StayKeeper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Role the CLI acts as when neither `--role` nor the environment sets one
    #[serde(default)]
    pub default_role: Role,

    /// Description prefix for generated expenses
    #[serde(default = "default_generated_prefix")]
    pub generated_prefix: String,

    /// Category for generated monthly expenses whose template has none
    #[serde(default = "default_monthly_category")]
    pub monthly_category: String,

    /// Category for generated annual expenses whose template has none
    #[serde(default = "default_annual_category")]
    pub annual_category: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "€".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_generated_prefix() -> String {
    DEFAULT_GENERATED_PREFIX.to_string()
}

fn default_monthly_category() -> String {
    "Monthly fixed".to_string()
}

fn default_annual_category() -> String {
    "Annual fixed".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            default_role: Role::default(),
            generated_prefix: default_generated_prefix(),
            monthly_category: default_monthly_category(),
            annual_category: default_annual_category(),
        }
    }
}

impl Settings {
    /// Default category for a generated expense of the given recurrence
    pub fn category_for(&self, recurrence: Recurrence) -> &str {
        match recurrence {
            Recurrence::Monthly => &self.monthly_category,
            Recurrence::Annual => &self.annual_category,
        }
    }

    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &StayPaths) -> Result<Self, StayError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| StayError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| StayError::Config(format!("Failed to parse settings file: {}", e)))
    }

    pub fn save(&self, paths: &StayPaths) -> Result<(), StayError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| StayError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| StayError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
