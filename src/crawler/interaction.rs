//! Clicking through a page
//!
//! A visit harvests the page's markup, records how many visible clickable
//! elements it has, picks up the visible on-domain links, and then clicks
//! elements one at a time starting from the page's cursor. The cursor is
//! advanced before each click, so an element whose click goes wrong is
//! never clicked again. A click that navigates away ends the visit, and the
//! page's remaining elements are given up on.

use crate::browser::{Browser, Element, Session};
use crate::crawler::crawl_state::CrawlState;
use crate::crawler::extractor::extract_emails;
use crate::crawler::navigator::navigate_reliably;
use crate::url::{domain_of, is_on_domain, PageKey};
use crate::{BrowserResult, Result};

/// How a visit to a page ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitOutcome {
    /// Every remaining element was clicked
    Finished { page: PageKey },

    /// A click took the primary window to another page; the elements of
    /// `from` that were not clicked yet are skipped for the rest of the run
    Navigated { from: PageKey, to: PageKey },

    /// The session died while the page's elements were being listed; the
    /// page was retired and a fresh session opened
    SessionReplaced { page: PageKey },
}

/// What a single click did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickEffect {
    /// The element was no longer visible and was not clicked
    Hidden,

    /// Nothing observable changed
    Unchanged,

    /// The markup changed in place and was harvested again
    Mutated { new_emails: usize },

    /// The primary window ended up on another page
    Navigated(PageKey),
}

/// Explores the page the browser is currently showing
///
/// # Arguments
///
/// * `state` - The run state; the current page is expected to be tracked
/// * `browser` - Used to open a replacement session if the current one dies
///
/// # Returns
///
/// * `Ok(VisitOutcome)` - How the visit ended
/// * `Err(HarvestError)` - A failure the run cannot recover from
pub async fn explore_page(state: &mut CrawlState, browser: &dyn Browser) -> Result<VisitOutcome> {
    let page = state.current_page().await?;
    tracing::info!("VISITING: {}", page);

    let markup = state.session()?.markup().await?;
    extract_emails(&markup, &mut state.emails);

    let listing = visible_elements(state.session()?).await;
    let elements = match listing {
        Ok(elements) => elements,
        Err(e) if e.is_session_lost() => {
            tracing::warn!("Lost the browser session on {}: {}", page, e);
            state.frontier.retire(&page);
            replace_session(state, browser).await?;

            if let Some(next) = state.frontier.next_incomplete().cloned() {
                navigate_reliably(state, &next).await?;
            }
            return Ok(VisitOutcome::SessionReplaced { page });
        }
        Err(e) => return Err(e.into()),
    };

    state.frontier.size_page(&page, elements.len());
    track_links(state).await?;

    while let Some(index) = state.frontier.next_click(&page) {
        tracing::info!("Clicking element: {}", index);

        let before = state.session()?.markup().await?;
        state.frontier.advance_cursor(&page);

        let Some(element) = elements.get(index) else {
            tracing::warn!("Element {} is gone from {}, continuing", index, page);
            continue;
        };

        match click_element(state, element.as_ref(), &page, &before).await {
            Ok(ClickEffect::Navigated(to)) => {
                state.frontier.abandon_rest(&page);
                return Ok(VisitOutcome::Navigated { from: page, to });
            }
            Ok(effect) => tracing::debug!("Element {} on {}: {:?}", index, page, effect),
            Err(e) => tracing::warn!("Error clicking element {} on {}: {}, continuing", index, page, e),
        }
    }

    Ok(VisitOutcome::Finished { page })
}

/// Lists the clickable elements that are currently visible
async fn visible_elements(session: &dyn Session) -> BrowserResult<Vec<Box<dyn Element>>> {
    let mut visible = Vec::new();

    for element in session.clickable_elements().await? {
        if element.is_visible().await? {
            visible.push(element);
        }
    }

    Ok(visible)
}

/// Tracks every visible, non-empty, on-domain link on the current page
async fn track_links(state: &mut CrawlState) -> Result<usize> {
    let links = state.session()?.hyperlinks().await?;
    let mut added = 0;

    for link in links.iter().filter(|link| link.visible && !link.href.is_empty()) {
        if is_on_domain(&link.href, state.domain()) && state.frontier.ensure_tracked(&link.href) {
            added += 1;
        }
    }

    Ok(added)
}

/// Clicks one element and works out what the click did
async fn click_element(
    state: &mut CrawlState,
    element: &dyn Element,
    origin: &PageKey,
    before: &str,
) -> Result<ClickEffect> {
    if !element.is_visible().await? {
        return Ok(ClickEffect::Hidden);
    }

    element.click().await?;
    close_popups(state).await?;

    let current = state.current_page().await?;
    if &current != origin {
        state.frontier.ensure_tracked(current.as_str());
        return Ok(ClickEffect::Navigated(current));
    }

    let after = state.session()?.markup().await?;
    if after != before {
        let new_emails = extract_emails(&after, &mut state.emails);
        return Ok(ClickEffect::Mutated { new_emails });
    }

    Ok(ClickEffect::Unchanged)
}

/// Closes every secondary window showing a page off the run's domain
///
/// The primary window is never closed, whatever it shows.
async fn close_popups(state: &mut CrawlState) -> Result<usize> {
    let windows = state.session()?.windows().await?;
    let domain = state.domain().clone();
    let mut closed = 0;

    for window in windows {
        if window.primary || domain_of(&window.url).as_ref() == Some(&domain) {
            continue;
        }

        tracing::debug!("Closing popup: {}", window.url);
        state.session_mut()?.close_window(&window.id).await?;
        closed += 1;
    }

    Ok(closed)
}

/// Throws the current session away and opens a new one
async fn replace_session(state: &mut CrawlState, browser: &dyn Browser) -> Result<()> {
    if let Some(old) = state.take_session() {
        if let Err(e) = old.close().await {
            tracing::debug!("Failed to close the lost session: {}", e);
        }
    }

    let session = browser.open().await?;
    state.attach_session(session);
    tracing::info!("Opened a new browser session");
    Ok(())
}
