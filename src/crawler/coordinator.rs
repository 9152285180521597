//! Harvest coordinator - the main run loop
//!
//! The coordinator opens a browser session, loads the start page, and then
//! repeats one step until the frontier is complete or the time budget runs
//! out:
//! - Track the page the browser is on
//! - If it has no work left, move on to the next incomplete page
//! - Click through whatever is left on it
//!
//! The budget is checked between steps only, so a run can overshoot it by
//! the length of one page visit.

use crate::browser::Browser;
use crate::config::{Config, HarvestConfig};
use crate::crawler::crawl_state::CrawlState;
use crate::crawler::interaction::{explore_page, VisitOutcome};
use crate::crawler::navigator::navigate_to_next_page;
use crate::output::RunReport;
use crate::Result;
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// Why a run stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Every tracked page was explored or retired
    Exhausted,

    /// The time budget ran out with work still pending
    OutOfTime,

    /// An unrecoverable error ended the run early
    Aborted(String),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted => write!(f, "frontier exhausted"),
            Self::OutOfTime => write!(f, "out of time"),
            Self::Aborted(reason) => write!(f, "aborted: {}", reason),
        }
    }
}

/// Main harvest coordinator structure
pub struct Coordinator<B: Browser> {
    browser: B,
    state: CrawlState,
    started_at: DateTime<Utc>,
}

impl<B: Browser> Coordinator<B> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `browser` - Driver used to open sessions
    /// * `start_url` - Where the run starts; also fixes the run's domain
    /// * `config` - Harvest settings
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run; no browser has been opened yet
    /// * `Err(HarvestError)` - `start_url` has no readable domain
    pub fn new(browser: B, start_url: &str, config: &HarvestConfig) -> Result<Self> {
        Self::with_budget(browser, start_url, config.max_run_time())
    }

    /// Creates a coordinator with an explicit time budget
    pub fn with_budget(browser: B, start_url: &str, budget: Duration) -> Result<Self> {
        let state = CrawlState::new(start_url, budget)?;
        tracing::info!(
            "Harvesting {} starting at {} ({}s budget)",
            state.domain(),
            state.start_location(),
            state.clock.budget().as_secs()
        );

        Ok(Self {
            browser,
            state,
            started_at: Utc::now(),
        })
    }

    /// Returns the run state
    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// Opens a session and loads the start URL
    ///
    /// The start URL is loaded as given, minus its query. This first load is
    /// not retried; if it fails the run fails.
    pub async fn start(&mut self) -> Result<()> {
        if !self.state.has_session() {
            let session = self.browser.open().await?;
            self.state.attach_session(session);
        }

        self.state.goto_start().await
    }

    /// Runs the main loop until the frontier is complete or time runs out
    pub async fn run(&mut self) -> Result<StopReason> {
        self.start().await?;

        loop {
            if self.state.frontier.is_empty() {
                tracing::info!("Frontier is empty, harvest complete");
                return Ok(StopReason::Exhausted);
            }

            if self.state.clock.is_expired() {
                tracing::info!("Ran out of time, terminating execution");
                return Ok(StopReason::OutOfTime);
            }

            if let Some(outcome) = self.step().await? {
                tracing::debug!(
                    "Visit ended: {:?} ({}s left)",
                    outcome,
                    self.state.clock.remaining().as_secs()
                );
            }
        }
    }

    /// Runs one step of the main loop
    ///
    /// # Returns
    ///
    /// * `Ok(Some(outcome))` - A page was visited
    /// * `Ok(None)` - No page with work left could be reached
    pub async fn step(&mut self) -> Result<Option<VisitOutcome>> {
        let current = self.state.current_page().await?;
        self.state.frontier.ensure_tracked(current.as_str());

        if !self.state.frontier.is_pending(&current)
            && navigate_to_next_page(&mut self.state).await?.is_none()
        {
            return Ok(None);
        }

        let current = self.state.current_page().await?;
        if !self.state.frontier.is_pending(&current) {
            return Ok(None);
        }

        let outcome = explore_page(&mut self.state, &self.browser).await?;
        Ok(Some(outcome))
    }

    /// Closes the browser and builds the run report
    pub async fn finish(mut self, stop_reason: StopReason) -> RunReport {
        if let Some(session) = self.state.take_session() {
            if let Err(e) = session.close().await {
                tracing::warn!("Failed to close browser session: {}", e);
            }
        }

        RunReport {
            started_at: self.started_at,
            finished_at: Utc::now(),
            stop_reason,
            frontier: self.state.frontier.stats(),
            emails: self.state.emails,
        }
    }
}

/// Runs a complete harvest
///
/// This is the main entry point. A run that fails part way still produces a
/// report with everything found before the failure; only a start URL with
/// no readable domain is returned as an error.
///
/// # Arguments
///
/// * `browser` - Driver used to open sessions
/// * `start_url` - Where the run starts
/// * `config` - The harvest configuration
///
/// # Example
///
/// ```no_run
/// use email_sweep::browser::ChromiumBrowser;
/// use email_sweep::config::Config;
/// use email_sweep::crawler::run_harvest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let browser = ChromiumBrowser::new(config.browser.clone(), &config.harvest.clickable_selector);
/// let report = run_harvest(browser, "https://example.com", &config).await?;
/// for email in report.emails.iter() {
///     println!("{}", email);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest<B: Browser>(browser: B, start_url: &str, config: &Config) -> Result<RunReport> {
    let mut coordinator = Coordinator::new(browser, start_url, &config.harvest)?;

    let stop_reason = match coordinator.run().await {
        Ok(reason) => reason,
        Err(e) => {
            tracing::error!("Harvest aborted: {}", e);
            StopReason::Aborted(e.to_string())
        }
    };

    let report = coordinator.finish(stop_reason).await;
    report.log_summary();
    Ok(report)
}
