//! Path management for StayKeeper
//!
//! Provides XDG-compliant path resolution for configuration and data.
//!
//! ## Path Resolution Order
//!
//! 1. `STAYKEEPER_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/staykeeper` or `~/.config/staykeeper`
//! 3. Windows: `%APPDATA%\staykeeper`

use std::path::PathBuf;

use crate::error::StayError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "STAYKEEPER_DATA_DIR";

/// Manages all paths used by StayKeeper
#[derive(Debug, Clone)]
pub struct StayPaths {
    base_dir: PathBuf,
}

impl StayPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if neither the override nor a home directory is available.
    pub fn new() -> Result<Self, StayError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create StayPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/staykeeper/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn properties_file(&self) -> PathBuf {
        self.data_dir().join("properties.json")
    }

    pub fn units_file(&self) -> PathBuf {
        self.data_dir().join("units.json")
    }

    pub fn guests_file(&self) -> PathBuf {
        self.data_dir().join("guests.json")
    }

    pub fn bookings_file(&self) -> PathBuf {
        self.data_dir().join("bookings.json")
    }

    pub fn fixed_expenses_file(&self) -> PathBuf {
        self.data_dir().join("fixed_expenses.json")
    }

    pub fn variable_expenses_file(&self) -> PathBuf {
        self.data_dir().join("variable_expenses.json")
    }

    pub fn contacts_file(&self) -> PathBuf {
        self.data_dir().join("contacts.json")
    }

    pub fn inquiries_file(&self) -> PathBuf {
        self.data_dir().join("inquiries.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), StayError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| StayError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| StayError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if StayKeeper has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, StayError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                StayError::Config(format!(
                    "Could not determine home directory; set {}",
                    DATA_DIR_ENV
                ))
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("staykeeper"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, StayError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| StayError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("staykeeper"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StayPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(
            paths.bookings_file(),
            temp_dir.path().join("data").join("bookings.json")
        );
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StayPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(!paths.is_initialized());
    }
}
