//! Mutable state of a single harvest run

use crate::browser::Session;
use crate::crawler::frontier::Frontier;
use crate::output::EmailSet;
use crate::state::RunClock;
use crate::url::{canonicalize, domain_of, navigable_url, DomainKey, PageKey};
use crate::{BrowserError, HarvestError, Result, UrlError};
use std::time::Duration;

/// Everything a harvest run carries between steps
///
/// The run owns its frontier, the addresses found so far, its clock, and the
/// browser session currently in use. Nothing here is shared; the coordinator
/// hands out `&mut CrawlState` to one step at a time.
pub struct CrawlState {
    /// Pages seen on the run's domain and how far each has been explored
    pub frontier: Frontier,

    /// Addresses found so far, in discovery order
    pub emails: EmailSet,

    /// Wall-clock budget for the run
    pub clock: RunClock,

    start_page: PageKey,
    start_location: String,
    scheme: String,
    session: Option<Box<dyn Session>>,
}

impl CrawlState {
    /// Creates the state for a run starting at `start_url`
    ///
    /// The start page is tracked immediately. The scheme of `start_url`
    /// (`http` if it has none) is used for every navigation of the run.
    /// The first load goes to `start_url` itself minus its query, so a host
    /// that only answers on `www.` can still be reached.
    ///
    /// # Arguments
    ///
    /// * `start_url` - The URL the run starts from
    /// * `budget` - How long the run may take
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlState)` - State seeded with the start page
    /// * `Err(HarvestError::UrlError)` - No domain could be read from `start_url`
    pub fn new(start_url: &str, budget: Duration) -> Result<Self> {
        let domain = domain_of(start_url)
            .ok_or_else(|| UrlError::MissingDomain(start_url.to_string()))?;
        let start_page = canonicalize(start_url);

        if start_page.is_empty() {
            return Err(UrlError::MissingDomain(start_url.to_string()).into());
        }

        let scheme = start_url
            .split_once("://")
            .map(|(scheme, _)| scheme.to_ascii_lowercase())
            .filter(|scheme| !scheme.is_empty())
            .unwrap_or_else(|| "http".to_string());

        let location = start_url.split('?').next().unwrap_or_default();
        let location = location
            .rsplit_once("://")
            .map_or(location, |(_, rest)| rest);
        let start_location = format!("{}://{}", scheme, location);

        Ok(Self {
            frontier: Frontier::new(domain, start_page.clone()),
            emails: EmailSet::new(),
            clock: RunClock::start(budget),
            start_page,
            start_location,
            scheme,
            session: None,
        })
    }

    /// The domain the run is confined to
    pub fn domain(&self) -> &DomainKey {
        self.frontier.domain()
    }

    /// The canonical key of the start page
    pub fn start_page(&self) -> &PageKey {
        &self.start_page
    }

    /// The URL the first navigation of the run loads
    pub fn start_location(&self) -> &str {
        &self.start_location
    }

    /// The scheme prepended to page keys when navigating
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns true if a browser session is attached
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// The attached session
    pub fn session(&self) -> Result<&dyn Session> {
        self.session.as_deref().ok_or(HarvestError::NoSession)
    }

    /// The attached session, mutably
    pub fn session_mut(&mut self) -> Result<&mut (dyn Session + 'static)> {
        self.session.as_deref_mut().ok_or(HarvestError::NoSession)
    }

    /// Attaches a session, returning the one it replaces
    pub fn attach_session(&mut self, session: Box<dyn Session>) -> Option<Box<dyn Session>> {
        self.session.replace(session)
    }

    /// Detaches the current session
    pub fn take_session(&mut self) -> Option<Box<dyn Session>> {
        self.session.take()
    }

    /// Canonical key of the page the primary window is showing
    pub async fn current_page(&self) -> Result<PageKey> {
        let url = self.session()?.current_url().await?;
        Ok(canonicalize(&url))
    }

    /// Navigates the primary window to a page key
    ///
    /// A key that cannot be turned back into a URL is reported as a
    /// navigation failure, the same as a page that cannot be reached.
    pub async fn goto_page(&mut self, page: &PageKey) -> Result<()> {
        self.goto(page.as_str()).await
    }

    /// Navigates the primary window to the start URL as given
    pub async fn goto_start(&mut self) -> Result<()> {
        let location = self.start_location.clone();
        self.goto(&location).await
    }

    async fn goto(&mut self, location: &str) -> Result<()> {
        let url = navigable_url(location, &self.scheme).map_err(|e| BrowserError::Navigation {
            url: location.to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!("Navigating to {}", url);
        self.session_mut()?.goto(url.as_str()).await?;
        Ok(())
    }
}
