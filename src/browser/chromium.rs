//! Chromium driver built on chromiumoxide
//!
//! Each session launches its own Chromium process, so a session that has
//! gone bad can be thrown away and replaced without touching anything else.

use super::{Browser, Element, Hyperlink, Session, Window};
use crate::config::BrowserConfig;
use crate::{BrowserError, BrowserResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as ChromeBrowser, BrowserConfig as ChromeConfig};
use chromiumoxide::element::Element as ChromeElement;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Longest a click waits for a navigation it started to commit
const CLICK_SETTLE: Duration = Duration::from_millis(500);

/// Error-message fragments that mean the session itself is unusable
const SESSION_LOST_MARKERS: &[&str] = &[
    "connection refused",
    "window not found",
    "no such window",
    "target closed",
    "session closed",
    "not attached",
    "channel closed",
    "broken pipe",
    "websocket",
];

/// Rendered-and-not-hidden check, run with the element as `this`
const IS_VISIBLE_FN: &str = r#"function() {
    const style = window.getComputedStyle(this);
    const rect = this.getBoundingClientRect();
    return style.visibility !== 'hidden' && style.display !== 'none'
        && rect.width > 0 && rect.height > 0;
}"#;

/// Every anchor on the page with its resolved href and visibility
const HYPERLINKS_EXPR: &str = r#"Array.from(document.querySelectorAll('a')).map(a => {
    const style = window.getComputedStyle(a);
    const rect = a.getBoundingClientRect();
    return {
        href: typeof a.href === 'string' ? a.href : '',
        visible: style.visibility !== 'hidden' && style.display !== 'none'
            && rect.width > 0 && rect.height > 0
    };
})"#;

/// Maps a CDP error onto the crawler's recovery classes
fn classify(err: CdpError) -> BrowserError {
    let message = err.to_string();
    let lowered = message.to_lowercase();

    if SESSION_LOST_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
    {
        BrowserError::SessionLost(message)
    } else {
        BrowserError::Protocol(message)
    }
}

/// Maps a CDP error raised while handling an element
///
/// A lost session stays a lost session; anything else is an interaction
/// failure local to that element.
fn element_error(err: CdpError) -> BrowserError {
    match classify(err) {
        BrowserError::Protocol(message) => BrowserError::Interaction(message),
        other => other,
    }
}

/// Opens Chromium sessions
pub struct ChromiumBrowser {
    config: BrowserConfig,
    clickable_selector: String,
}

impl ChromiumBrowser {
    /// Creates a driver that launches Chromium with the given settings
    ///
    /// # Arguments
    ///
    /// * `config` - Browser launch settings
    /// * `clickable_selector` - CSS selector for the elements to click
    pub fn new(config: BrowserConfig, clickable_selector: impl Into<String>) -> Self {
        Self {
            config,
            clickable_selector: clickable_selector.into(),
        }
    }

    fn launch_config(&self) -> BrowserResult<ChromeConfig> {
        let mut builder = ChromeConfig::builder()
            .request_timeout(self.config.request_timeout())
            .window_size(self.config.window_width, self.config.window_height)
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--no-first-run")
            .arg("--no-default-browser-check");

        if !self.config.headless {
            builder = builder.with_head();
        }

        if let Some(path) = &self.config.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(BrowserError::Launch)
    }
}

#[async_trait]
impl Browser for ChromiumBrowser {
    async fn open(&self) -> BrowserResult<Box<dyn Session>> {
        tracing::debug!("Launching Chromium");

        let (browser, mut handler) = ChromeBrowser::launch(self.launch_config()?)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("Browser handler error: {:?}", e);
                }
            }
            tracing::debug!("Browser event handler task completed");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Launch(format!("failed to open page: {}", e)))?;
        let primary_id = page.target_id().inner().clone();

        Ok(Box::new(ChromiumSession {
            browser,
            handler,
            page,
            primary_id,
            clickable_selector: self.clickable_selector.clone(),
            navigation_timeout: self.config.request_timeout(),
        }))
    }
}

/// One Chromium process and its primary page
pub struct ChromiumSession {
    browser: ChromeBrowser,
    handler: JoinHandle<()>,
    page: Page,
    primary_id: String,
    clickable_selector: String,
    navigation_timeout: Duration,
}

#[async_trait]
impl Session for ChromiumSession {
    async fn goto(&mut self, url: &str) -> BrowserResult<()> {
        let result = tokio::time::timeout(self.navigation_timeout, self.page.goto(url)).await;

        match result {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Err(_) => Err(BrowserError::Navigation {
                url: url.to_string(),
                message: format!("timed out after {:?}", self.navigation_timeout),
            }),
        }
    }

    async fn current_url(&self) -> BrowserResult<String> {
        let url = self.page.url().await.map_err(classify)?;
        Ok(url.unwrap_or_default())
    }

    async fn markup(&self) -> BrowserResult<String> {
        self.page.content().await.map_err(classify)
    }

    async fn windows(&self) -> BrowserResult<Vec<Window>> {
        let pages = self.browser.pages().await.map_err(classify)?;
        let mut windows = Vec::with_capacity(pages.len());

        for page in pages {
            let id = page.target_id().inner().clone();
            let url = page.url().await.map_err(classify)?.unwrap_or_default();
            windows.push(Window {
                primary: id == self.primary_id,
                id,
                url,
            });
        }

        Ok(windows)
    }

    async fn close_window(&mut self, id: &str) -> BrowserResult<()> {
        if id == self.primary_id {
            return Err(BrowserError::Interaction(
                "refusing to close the primary window".to_string(),
            ));
        }

        let pages = self.browser.pages().await.map_err(classify)?;
        for page in pages {
            if page.target_id().inner() == id {
                page.close().await.map_err(classify)?;
                break;
            }
        }

        Ok(())
    }

    async fn clickable_elements(&self) -> BrowserResult<Vec<Box<dyn Element>>> {
        let elements = self
            .page
            .find_elements(self.clickable_selector.as_str())
            .await
            .map_err(classify)?;

        Ok(elements
            .into_iter()
            .map(|inner| {
                Box::new(ChromiumElement {
                    inner,
                    page: self.page.clone(),
                }) as Box<dyn Element>
            })
            .collect())
    }

    async fn hyperlinks(&self) -> BrowserResult<Vec<Hyperlink>> {
        let result = self.page.evaluate(HYPERLINKS_EXPR).await.map_err(classify)?;

        result
            .into_value::<Vec<Hyperlink>>()
            .map_err(|e| BrowserError::Script(format!("failed to read hyperlinks: {}", e)))
    }

    async fn close(self: Box<Self>) -> BrowserResult<()> {
        let mut session = self;

        session.browser.close().await.map_err(classify)?;
        if let Err(e) = session.browser.wait().await {
            tracing::debug!("Chromium did not exit cleanly: {}", e);
        }

        Ok(())
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        // The handler loop never ends on its own while the process lives.
        self.handler.abort();
    }
}

/// A clickable element on a Chromium page
struct ChromiumElement {
    inner: ChromeElement,
    page: Page,
}

#[async_trait]
impl Element for ChromiumElement {
    async fn is_visible(&self) -> BrowserResult<bool> {
        let returns = self
            .inner
            .call_js_fn(IS_VISIBLE_FN, false)
            .await
            .map_err(element_error)?;

        Ok(returns
            .result
            .value
            .as_ref()
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false))
    }

    async fn click(&self) -> BrowserResult<()> {
        self.inner.click().await.map_err(element_error)?;

        // Click handlers that navigate only queue the load.
        if let Ok(Err(e)) =
            tokio::time::timeout(CLICK_SETTLE, self.page.wait_for_navigation()).await
        {
            tracing::trace!("Waiting for navigation after click failed: {}", e);
        }

        Ok(())
    }
}
