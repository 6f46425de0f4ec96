//! Configuration for the export planner.
//!
//! This module provides:
//! - TOML-based settings with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Validation on load with automatic defaults
//!
//! # Example
//!
//! ```no_run
//! use cutplan::config::ConfigManager;
//!
//! let mut config = ConfigManager::new(".config/cutplan.toml");
//! config.load_or_create().unwrap();
//!
//! println!("safe names: {}", config.settings().output.safe_output_file_name);
//!
//! config.settings_mut().streams.include_all_tracks = true;
//! config.save().unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{OutputSettings, Settings, StreamSettings};
