//! Email extraction from rendered markup
//!
//! A best-effort heuristic, not an RFC 5322 validator: false positives and
//! negatives around boundary punctuation are expected.

use crate::output::EmailSet;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Local part, "@", a lazily matched domain, then the dotted label tail up to
/// the next word boundary
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([a-zA-Z0-9._%+-]+)@([a-zA-Z0-9.-]+?)(\.[a-zA-Z.]*)\b")
        .expect("email pattern is a valid regex")
});

/// Returns the distinct addresses in `markup`, in order of first appearance
pub fn find_emails(markup: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    EMAIL_PATTERN
        .captures_iter(markup)
        .map(|caps| format!("{}@{}{}", &caps[1], &caps[2], &caps[3]))
        .filter(|email| seen.insert(email.clone()))
        .collect()
}

/// Scans `markup` and folds every address into `emails`
///
/// # Returns
///
/// The number of addresses that were not already in the set
///
/// # Example
///
/// ```
/// use email_sweep::crawler::extract_emails;
/// use email_sweep::output::EmailSet;
///
/// let mut emails = EmailSet::new();
/// extract_emails("contact us at jane.doe@example.com!", &mut emails);
/// assert!(emails.contains("jane.doe@example.com"));
/// ```
pub fn extract_emails(markup: &str, emails: &mut EmailSet) -> usize {
    let mut added = 0;

    for email in find_emails(markup) {
        if emails.insert(email) {
            added += 1;
        }
    }

    if added > 0 {
        tracing::debug!("Found {} new email address(es)", added);
    }

    added
}
