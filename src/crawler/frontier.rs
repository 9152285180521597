//! Crawl frontier: every page known so far and how far each has been clicked
//!
//! This module handles:
//! - Tracking same-domain pages as they are discovered
//! - Per-page click cursors
//! - Picking the next page to visit (lowest page key first)
//! - Retiring pages that cannot be visited so the walk keeps moving

use crate::state::PageProgress;
use crate::url::{canonicalize, is_on_domain, DomainKey, PageKey};
use std::collections::BTreeMap;

/// Counts of pages by progress, for the run report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrontierStats {
    /// Number of pages tracked
    pub tracked: usize,

    /// Pages whose every element was clicked
    pub explored: usize,

    /// Pages force-completed by error recovery
    pub retired: usize,

    /// Pages still holding work (unvisited or partially clicked)
    pub pending: usize,
}

/// Frontier manages page progress for a single-domain run
///
/// The frontier is the only writer of click cursors. Pages are never
/// removed; pages that cannot be visited are retired instead.
#[derive(Debug, Clone)]
pub struct Frontier {
    /// Domain every tracked page must belong to
    domain: DomainKey,

    /// Progress per page, iterated in ascending key order
    pages: BTreeMap<PageKey, PageProgress>,
}

impl Frontier {
    /// Creates a frontier seeded with the start page
    ///
    /// The seed is tracked unconditionally; it defines the domain.
    pub fn new(domain: DomainKey, start: PageKey) -> Self {
        let mut pages = BTreeMap::new();
        tracing::info!("Adding page: {}", start);
        pages.insert(start, PageProgress::Unvisited);

        Self { domain, pages }
    }

    /// Returns the domain this frontier is confined to
    pub fn domain(&self) -> &DomainKey {
        &self.domain
    }

    /// Starts tracking a page if it is new, on the run's domain, and not a
    /// mailto link
    ///
    /// # Returns
    ///
    /// * `true` - The page was inserted
    /// * `false` - The page was already tracked or was rejected
    pub fn ensure_tracked(&mut self, url: &str) -> bool {
        let page = canonicalize(url);

        if page.as_str().contains("mailto") || self.pages.contains_key(&page) {
            return false;
        }

        if !is_on_domain(page.as_str(), &self.domain) {
            tracing::debug!("Not tracking off-domain page: {}", page);
            return false;
        }

        tracing::info!("Adding page: {}", page);
        self.pages.insert(page, PageProgress::Unvisited);
        true
    }

    /// Returns true if the page is tracked
    pub fn contains(&self, page: &PageKey) -> bool {
        self.pages.contains_key(page)
    }

    /// Returns the progress of a page, if tracked
    pub fn progress(&self, page: &PageKey) -> Option<PageProgress> {
        self.pages.get(page).copied()
    }

    /// Returns true when every tracked page is complete
    pub fn is_empty(&self) -> bool {
        self.pages.values().all(PageProgress::is_complete)
    }

    /// Returns the number of tracked pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Records the page's element count; only the first sizing counts
    pub fn size_page(&mut self, page: &PageKey, count: usize) {
        if let Some(progress) = self.pages.get_mut(page) {
            progress.size(count);
        }
    }

    /// Moves the page's click cursor past the current element
    pub fn advance_cursor(&mut self, page: &PageKey) {
        if let Some(progress) = self.pages.get_mut(page) {
            progress.advance();
        }
    }

    /// Skips every element on the page that has not been clicked yet
    pub fn abandon_rest(&mut self, page: &PageKey) {
        if let Some(progress) = self.pages.get_mut(page) {
            if let Some(index) = progress.next_click() {
                tracing::debug!("Abandoning {} from element {}", page, index);
            }
            progress.abandon();
        }
    }

    /// Returns the index of the next element to click on the page
    pub fn next_click(&self, page: &PageKey) -> Option<usize> {
        self.pages.get(page).and_then(PageProgress::next_click)
    }

    /// Returns true if the page has been sized and fully clicked (or retired)
    ///
    /// Untracked pages are not complete.
    pub fn is_page_complete(&self, page: &PageKey) -> bool {
        self.pages
            .get(page)
            .map(PageProgress::is_complete)
            .unwrap_or(false)
    }

    /// Returns true if the page is tracked and still has work left
    pub fn is_pending(&self, page: &PageKey) -> bool {
        self.pages
            .get(page)
            .map(|progress| !progress.is_complete())
            .unwrap_or(false)
    }

    /// Returns the lowest page key that is not complete
    ///
    /// Unsized pages count as pending work. `None` means the whole frontier
    /// is complete.
    pub fn next_incomplete(&self) -> Option<&PageKey> {
        self.pages
            .iter()
            .find(|(_, progress)| !progress.is_complete())
            .map(|(page, _)| page)
    }

    /// Retires the page `next_incomplete` would return
    ///
    /// # Returns
    ///
    /// The retired page, or `None` if nothing was left to retire
    pub fn retire_next(&mut self) -> Option<PageKey> {
        let page = self.next_incomplete()?.clone();
        self.retire(&page);
        Some(page)
    }

    /// Retires a specific page so it is never visited again
    pub fn retire(&mut self, page: &PageKey) {
        if let Some(progress) = self.pages.get_mut(page) {
            tracing::info!("Removing: {} from queue", page);
            *progress = PageProgress::Retired;
        }
    }

    /// Iterates over tracked pages in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&PageKey, &PageProgress)> {
        self.pages.iter()
    }

    /// Counts pages by progress
    pub fn stats(&self) -> FrontierStats {
        let mut stats = FrontierStats {
            tracked: self.pages.len(),
            ..FrontierStats::default()
        };

        for progress in self.pages.values() {
            match progress {
                PageProgress::Retired => stats.retired += 1,
                p if p.is_complete() => stats.explored += 1,
                _ => stats.pending += 1,
            }
        }

        stats
    }
}
