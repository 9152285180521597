//! URL handling module for Email-Sweep
//!
//! This module provides the two identities the crawler works with:
//! - `PageKey`: the canonical form of a URL, used as a page's identity
//! - `DomainKey`: the host a run is confined to

mod domain;
mod normalize;

use std::fmt;

// Re-export main functions
pub use domain::domain_of;
pub use normalize::{canonicalize, navigable_url};

/// Canonical identity of a page in the frontier
///
/// Produced only by [`canonicalize`]; two URLs that canonicalize identically
/// are the same page.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageKey(String);

impl PageKey {
    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the key is the empty string
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for PageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Host a run is confined to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainKey(String);

impl DomainKey {
    /// Returns the domain as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns true if `url` resolves to the given domain
///
/// URLs the domain pattern cannot read (empty strings, bare paths) are never
/// on the domain.
pub fn is_on_domain(url: &str, domain: &DomainKey) -> bool {
    domain_of(url).as_ref() == Some(domain)
}
