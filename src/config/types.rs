use serde::Deserialize;
use std::time::Duration;

/// Default time budget for a run, in seconds
pub const DEFAULT_MAX_RUN_TIME_SECS: u64 = 120;

/// Default CSS selector for the elements the harvester clicks
pub const DEFAULT_CLICKABLE_SELECTOR: &str = "div";

/// Default per-navigation timeout, in milliseconds
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Main configuration structure for Email-Sweep
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub harvest: HarvestConfig,
    pub browser: BrowserConfig,
}

/// Harvest behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Wall-clock budget for the whole run (seconds)
    #[serde(rename = "max-run-time-secs")]
    pub max_run_time_secs: u64,

    /// CSS selector for the elements to click on each page
    #[serde(rename = "clickable-selector")]
    pub clickable_selector: String,
}

impl HarvestConfig {
    /// Returns the time budget as a Duration
    pub fn max_run_time(&self) -> Duration {
        Duration::from_secs(self.max_run_time_secs)
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            max_run_time_secs: DEFAULT_MAX_RUN_TIME_SECS,
            clickable_selector: DEFAULT_CLICKABLE_SELECTOR.to_string(),
        }
    }
}

/// Browser launch configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run Chromium without a visible window
    pub headless: bool,

    /// Maximum time to wait for one navigation (milliseconds)
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,

    /// Browser window width in pixels
    #[serde(rename = "window-width")]
    pub window_width: u32,

    /// Browser window height in pixels
    #[serde(rename = "window-height")]
    pub window_height: u32,

    /// Explicit path to a Chrome/Chromium binary; auto-detected when unset
    #[serde(rename = "chrome-executable")]
    pub chrome_executable: Option<String>,
}

impl BrowserConfig {
    /// Returns the navigation timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            window_width: 1280,
            window_height: 800,
            chrome_executable: None,
        }
    }
}
