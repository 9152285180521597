use crate::url::PageKey;
use crate::UrlError;
use url::Url;

/// Canonicalizes a URL into the page key used for all frontier lookups
///
/// # Canonicalization Steps
///
/// 1. Drop everything up to and including the last "://"
/// 2. Drop everything from the first "?" onward
/// 3. Trim trailing characters that are not ASCII letters or digits
/// 4. Remove the first occurrence of "www." anywhere in what is left
///
/// Step 4 is a plain substring removal, not a host-prefix strip: a path
/// segment containing "www." is rewritten too. Trimming stops at the empty
/// string.
///
/// # Examples
///
/// ```
/// use email_sweep::url::canonicalize;
///
/// assert_eq!(canonicalize("https://www.example.com/about/?ref=nav").as_str(), "example.com/about");
/// assert_eq!(canonicalize("example.com/").as_str(), "example.com");
/// ```
pub fn canonicalize(url: &str) -> PageKey {
    let without_scheme = match url.rsplit_once("://") {
        Some((_, rest)) => rest,
        None => url,
    };

    let without_query = without_scheme.split('?').next().unwrap_or_default();

    let trimmed = without_query.trim_end_matches(|c: char| !c.is_ascii_alphanumeric());

    PageKey(trimmed.replacen("www.", "", 1))
}

/// Turns a page key (or any scheme-less URL) into an absolute URL the
/// browser can load
///
/// Page keys carry no scheme, so `scheme` is prepended when the input has
/// none. Inputs that already carry a scheme are parsed as they are.
///
/// # Returns
///
/// * `Ok(Url)` - The absolute URL
/// * `Err(UrlError)` - The result does not parse as a URL
pub fn navigable_url(page: &str, scheme: &str) -> Result<Url, UrlError> {
    let absolute = if page.contains("://") {
        page.to_string()
    } else {
        format!("{}://{}", scheme, page)
    };

    Url::parse(&absolute).map_err(|e| UrlError::Parse(format!("{}: {}", absolute, e)))
}
