//! Configuration module for Email-Sweep
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every setting has a default, so running without a
//! file behaves exactly like running with an empty one.
//!
//! # Example
//!
//! ```no_run
//! use email_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! println!("Harvest will stop after {}s", config.harvest.max_run_time_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, HarvestConfig, DEFAULT_CLICKABLE_SELECTOR, DEFAULT_MAX_RUN_TIME_SECS,
    DEFAULT_REQUEST_TIMEOUT_MS,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
