//! Email-Sweep: a click-everything email harvester
//!
//! This crate drives a real browser across a single website, clicking every
//! visible clickable element on every page it can reach, and collects the
//! email addresses that show up in the rendered markup along the way.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Email-Sweep operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("No browser session is open")]
    NoSession,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing domain in URL: {0}")]
    MissingDomain(String),
}

/// Errors reported by a browser driver
///
/// The variants are the recovery classes the crawler cares about: a page
/// that could not be reached, a session that has gone away, and a single
/// element that could not be interacted with.
#[derive(Debug, Clone, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Browser session lost: {0}")]
    SessionLost(String),

    #[error("Element interaction failed: {0}")]
    Interaction(String),

    #[error("Script evaluation failed: {0}")]
    Script(String),

    #[error("Browser protocol error: {0}")]
    Protocol(String),
}

impl BrowserError {
    /// Returns true if the session (connection or window) is gone and must
    /// be replaced before anything else can be done with it
    pub fn is_session_lost(&self) -> bool {
        matches!(self, Self::SessionLost(_))
    }
}

/// Result type alias for Email-Sweep operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

/// Result type alias for browser driver operations
pub type BrowserResult<T> = std::result::Result<T, BrowserError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_harvest, Coordinator, Frontier, StopReason};
pub use output::{EmailSet, RunReport};
pub use state::{PageProgress, RunClock};
pub use url::{canonicalize, domain_of, DomainKey, PageKey};
