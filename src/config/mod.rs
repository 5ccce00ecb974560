//! Configuration module for StayKeeper
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::StayPaths;
pub use settings::Settings;
