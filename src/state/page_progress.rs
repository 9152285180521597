/// Per-page click progress definitions
///
/// This module defines how far the crawler has gotten through the clickable
/// elements of a single page.
use std::fmt;

/// Represents how much of a page's clickable elements have been explored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageProgress {
    /// Page is known but has never been sized (element count unknown)
    Unvisited,

    /// Page has been sized; `cursor` is the index of the next element to click
    Exploring { cursor: usize, total: usize },

    /// Page was force-completed by error recovery and will never be visited
    Retired,
}

impl PageProgress {
    /// Returns true once every element has been clicked or the page was retired
    ///
    /// A page sized with zero elements is complete immediately.
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Unvisited => false,
            Self::Exploring { cursor, total } => cursor == total,
            Self::Retired => true,
        }
    }

    /// Records the element count; only the first call has any effect
    pub fn size(&mut self, total: usize) {
        if let Self::Unvisited = self {
            *self = Self::Exploring { cursor: 0, total };
        }
    }

    /// Moves the cursor past the current element
    ///
    /// The cursor never passes the total, and unsized or retired pages are
    /// left alone.
    pub fn advance(&mut self) {
        if let Self::Exploring { cursor, total } = self {
            if *cursor < *total {
                *cursor += 1;
            }
        }
    }

    /// Gives up on the elements not yet clicked; the page becomes complete
    ///
    /// Unsized pages stay unsized, since nothing about them is known yet.
    pub fn abandon(&mut self) {
        if let Self::Exploring { cursor, total } = self {
            *cursor = *total;
        }
    }

    /// Returns the index of the next element to click, if any remain
    pub fn next_click(&self) -> Option<usize> {
        match self {
            Self::Exploring { cursor, total } if cursor < total => Some(*cursor),
            _ => None,
        }
    }
}

impl Default for PageProgress {
    fn default() -> Self {
        Self::Unvisited
    }
}

impl fmt::Display for PageProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unvisited => write!(f, "unvisited"),
            Self::Exploring { cursor, total } => write!(f, "{}/{}", cursor, total),
            Self::Retired => write!(f, "retired"),
        }
    }
}
