//! Deduplicated, insertion-ordered set of harvested addresses

use indexmap::IndexSet;

/// Every address found during a run
///
/// The set only grows. Iteration follows the order addresses were first
/// seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailSet {
    emails: IndexSet<String>,
}

impl EmailSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an address
    ///
    /// # Returns
    ///
    /// * `true` - The address was new
    /// * `false` - The address was already present
    pub fn insert(&mut self, email: impl Into<String>) -> bool {
        self.emails.insert(email.into())
    }

    /// Returns true if the address has been found
    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(email)
    }

    /// Returns the number of addresses
    pub fn len(&self) -> usize {
        self.emails.len()
    }

    /// Returns true if nothing has been found
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    /// Iterates over addresses in the order they were found
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.emails.iter().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a EmailSet {
    type Item = &'a String;
    type IntoIter = indexmap::set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.emails.iter()
    }
}
