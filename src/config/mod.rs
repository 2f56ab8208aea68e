//! Configuration loading and management for the margin engine.
//!
//! This module provides the calculation [`Settings`] (target margin and
//! statutory insurance rates) and loads them, together with the server
//! configuration, from a YAML file.
//!
//! # Example
//!
//! ```no_run
//! use arari_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/settings.yaml").unwrap();
//! println!("Target margin: {}%", config.settings().target_margin);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ConfigFile, DEFAULT_EMPLOYMENT_INSURANCE_RATE, DEFAULT_TARGET_MARGIN,
    DEFAULT_WORKERS_COMP_RATE, ServerConfig, Settings,
};
