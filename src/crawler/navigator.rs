//! Navigation that survives unreachable pages and redirects
//!
//! A page that cannot be loaded, or that loads as some other page, is
//! retired and the next incomplete page is tried instead. Both loops
//! retire one page per failure, so they always end.

use crate::crawler::crawl_state::CrawlState;
use crate::url::PageKey;
use crate::{HarvestError, Result};

/// Navigates to `target`, falling through to later pages on failure
///
/// Each browser failure retires the next incomplete page and retries with
/// whatever is next after that. Errors that are not browser failures (such
/// as a missing session) are returned as-is.
///
/// # Returns
///
/// * `Ok(Some(page))` - The page that was navigated to
/// * `Ok(None)` - Every page failed and the frontier is now complete
pub async fn navigate_reliably(state: &mut CrawlState, target: &PageKey) -> Result<Option<PageKey>> {
    let mut target = target.clone();

    loop {
        match state.goto_page(&target).await {
            Ok(()) => return Ok(Some(target)),
            Err(HarvestError::Browser(e)) => {
                tracing::warn!("Could not reach {}: {}", target, e);
                state.frontier.retire_next();

                match state.frontier.next_incomplete() {
                    Some(next) => target = next.clone(),
                    None => return Ok(None),
                }
            }
            Err(e) => return Err(e),
        }
    }
}

/// Moves the browser onto the next incomplete page
///
/// After navigating, the page the browser actually shows is compared with
/// the one requested. A mismatch means the request was redirected; the
/// requested page is retired and the next one is tried. The page it was
/// redirected to is left for the main loop to pick up.
///
/// # Returns
///
/// * `Ok(Some(page))` - The browser is on `page`, which is tracked and incomplete
/// * `Ok(None)` - Nothing incomplete is left
pub async fn navigate_to_next_page(state: &mut CrawlState) -> Result<Option<PageKey>> {
    while let Some(next) = state.frontier.next_incomplete().cloned() {
        let Some(target) = navigate_reliably(state, &next).await? else {
            return Ok(None);
        };

        let arrived = state.current_page().await?;
        if arrived == target {
            return Ok(Some(arrived));
        }

        tracing::warn!("Redirected from {} to {}, dropping {}", target, arrived, target);
        state.frontier.retire(&target);
    }

    Ok(None)
}
