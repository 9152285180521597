//! Browser driver abstraction
//!
//! The crawler never talks to a browser engine directly. It goes through the
//! `Browser`, `Session` and `Element` traits defined here, which the
//! Chromium driver (`chromium`) implements over the DevTools protocol.
//!
//! Every call is awaited before the next one is issued; a session is never
//! used from two places at once.

pub mod chromium;

use crate::BrowserResult;
use async_trait::async_trait;
use serde::Deserialize;

pub use chromium::ChromiumBrowser;

/// A browser window (tab) as seen by the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// Driver-specific identifier, passed back to `Session::close_window`
    pub id: String,

    /// URL currently loaded in the window
    pub url: String,

    /// True for the window the session navigates and clicks in
    pub primary: bool,
}

/// A hyperlink on the current page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Hyperlink {
    /// Resolved target of the link; empty when the anchor has no href
    #[serde(default)]
    pub href: String,

    /// Whether the anchor is currently rendered visibly
    #[serde(default)]
    pub visible: bool,
}

/// Something that can open browser sessions
#[async_trait]
pub trait Browser: Send + Sync {
    /// Open a fresh session with one primary window
    async fn open(&self) -> BrowserResult<Box<dyn Session>>;
}

/// One browser session: a primary window plus whatever popups it spawned
#[async_trait]
pub trait Session: Send + Sync {
    /// Navigate the primary window to `url`
    ///
    /// Fails with `BrowserError::Navigation` when the page cannot be reached.
    async fn goto(&mut self, url: &str) -> BrowserResult<()>;

    /// URL currently loaded in the primary window
    async fn current_url(&self) -> BrowserResult<String>;

    /// Full rendered HTML of the primary window
    async fn markup(&self) -> BrowserResult<String>;

    /// Every open window, the primary one included
    async fn windows(&self) -> BrowserResult<Vec<Window>>;

    /// Close the window with the given id
    async fn close_window(&mut self, id: &str) -> BrowserResult<()>;

    /// Every clickable element on the current page, visible or not
    async fn clickable_elements(&self) -> BrowserResult<Vec<Box<dyn Element>>>;

    /// Every hyperlink on the current page, visible or not
    async fn hyperlinks(&self) -> BrowserResult<Vec<Hyperlink>>;

    /// Shut the session down
    async fn close(self: Box<Self>) -> BrowserResult<()>;
}

/// A clickable element on the current page
#[async_trait]
pub trait Element: Send + Sync {
    /// Whether the element is currently rendered visibly
    async fn is_visible(&self) -> BrowserResult<bool>;

    /// Click the element
    ///
    /// Fails with `BrowserError::Interaction` when the element is stale or
    /// detached.
    async fn click(&self) -> BrowserResult<()>;
}
