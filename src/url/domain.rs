use url::Url;

/// Extracts the host from a URL
///
/// The `url` crate already lowercases domain hosts; the port is not included.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_ripple::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if both URLs point at the same hostname
///
/// Scheme and port are ignored, so `http://site` and `https://site:8443`
/// share a host. URLs without a host never match anything.
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (extract_host(a), extract_host(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
