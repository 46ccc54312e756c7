use url::Url;

/// Extracts the hostname from a URL
///
/// This function retrieves the host portion of a URL, without the port, in
/// lowercase. If the URL has no host it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use status_crawler::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM:8443/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the key a URL is rate limited under: its host and explicit port
///
/// Returns None when the string does not parse or carries no host.
///
/// # Examples
///
/// ```
/// use status_crawler::url::host_key;
///
/// assert_eq!(host_key("http://a.test/page"), Some("a.test".to_string()));
/// assert_eq!(host_key("http://127.0.0.1:8080/"), Some("127.0.0.1:8080".to_string()));
/// assert_eq!(host_key("not a url"), None);
/// ```
pub fn host_key(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let host = extract_domain(&url)?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// Checks whether a discovered link lives on the same host as the seed
///
/// Hostnames are compared without ports. Links that fail to parse are never
/// considered internal.
pub fn is_same_host(seed: &Url, link: &str) -> bool {
    let Ok(parsed) = Url::parse(link) else {
        return false;
    };
    match (extract_domain(seed), extract_domain(&parsed)) {
        (Some(seed_host), Some(link_host)) => seed_host == link_host,
        _ => false,
    }
}
