use crate::url::DomainKey;
use regex::Regex;
use std::sync::LazyLock;

/// Optional scheme, optional userinfo, optional "www.", then the host up to
/// the first port separator, slash or newline
static DOMAIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^(?:https?://)?(?:[^@/\n]+@)?(?:www\.)?([^:/\n]+)")
        .expect("domain pattern is a valid regex")
});

/// Extracts the domain key from a URL
///
/// The scheme is optional, so bare inputs such as `example.com/contact` work
/// the same as absolute URLs. The host is lowercased.
///
/// # Returns
///
/// * `Some(DomainKey)` - The host, without "www." and without port or path
/// * `None` - If the pattern does not match (empty input, bare paths)
///
/// # Examples
///
/// ```
/// use email_sweep::url::domain_of;
///
/// assert_eq!(domain_of("https://www.example.com:8080/a").unwrap().as_str(), "example.com");
/// assert_eq!(domain_of("example.com/contact").unwrap().as_str(), "example.com");
/// assert!(domain_of("/relative/path").is_none());
/// ```
pub fn domain_of(url: &str) -> Option<DomainKey> {
    DOMAIN_PATTERN
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|host| DomainKey(host.as_str().to_lowercase()))
}
