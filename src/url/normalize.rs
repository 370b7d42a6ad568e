use crate::{UrlError, UrlResult};
use std::borrow::Cow;
use url::Url;

/// Scheme assumed when a URL string carries none
const DEFAULT_SCHEME: &str = "http";

/// Parses a URL string, treating a missing scheme as `http`
///
/// Only HTTP and HTTPS URLs with a host are accepted, since those are the
/// only ones the crawler can fetch.
///
/// # Arguments
///
/// * `raw` - The URL string, e.g. `https://blog.boot.dev/path` or `blog.boot.dev`
///
/// # Returns
///
/// * `Ok(Url)` - The parsed URL
/// * `Err(UrlError)` - The string is malformed, uses another scheme, or has no host
///
/// # Examples
///
/// ```
/// use site_ripple::url::parse_with_default_scheme;
///
/// let url = parse_with_default_scheme("blog.boot.dev/path").unwrap();
/// assert_eq!(url.as_str(), "http://blog.boot.dev/path");
/// ```
pub fn parse_with_default_scheme(raw: &str) -> UrlResult<Url> {
    let url = Url::parse(&with_default_scheme(raw)).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Prefixes the default scheme when the string has none
pub(crate) fn with_default_scheme(raw: &str) -> Cow<'_, str> {
    let raw = raw.trim();
    if has_scheme(raw) {
        Cow::Borrowed(raw)
    } else {
        Cow::Owned(format!("{}://{}", DEFAULT_SCHEME, raw))
    }
}

/// Returns true if `raw` starts with `scheme://`
///
/// Only the leading token counts, so a `://` inside a path or query does
/// not make a schemeless URL look absolute.
fn has_scheme(raw: &str) -> bool {
    let Some((scheme, _)) = raw.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().map_or(false, |c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Normalizes a URL string into its dedup key
///
/// # Normalization Rules
///
/// 1. A missing scheme is treated as `http`; the scheme is then dropped
/// 2. The key is the host (with a non-default port) followed by the path
/// 3. A bare `/` path is omitted entirely
/// 4. Exactly one trailing slash is stripped from any other path
/// 5. Query string and fragment are not part of the key
///
/// # Arguments
///
/// * `raw` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(String)` - The normalized key
/// * `Err(UrlError)` - Failed to parse the URL
///
/// # Examples
///
/// ```
/// use site_ripple::url::normalize_url;
///
/// assert_eq!(normalize_url("https://blog.boot.dev/path/").unwrap(), "blog.boot.dev/path");
/// assert_eq!(normalize_url("http://blog.boot.dev/path").unwrap(), "blog.boot.dev/path");
/// assert_eq!(normalize_url("blog.boot.dev/").unwrap(), "blog.boot.dev");
/// ```
pub fn normalize_url(raw: &str) -> UrlResult<String> {
    let url = parse_with_default_scheme(raw)?;
    Ok(normalized_key(&url))
}

/// Computes the dedup key of an already parsed URL
///
/// Infallible counterpart of [`normalize_url`], used by the crawler once a
/// discovered link has been parsed.
pub fn normalized_key(url: &Url) -> String {
    let mut key = String::new();

    if let Some(host) = url.host_str() {
        key.push_str(host);
    }
    if let Some(port) = url.port() {
        key.push(':');
        key.push_str(&port.to_string());
    }

    let path = url.path();
    if path != "/" {
        key.push_str(path.strip_suffix('/').unwrap_or(path));
    }

    key
}
