use url::Url;

/// Returns the authority used to compare hosts and key robots policies
///
/// This is the lowercase host followed by `:port` when the URL carries a
/// non-default port, e.g. `example.com` or `127.0.0.1:8080`. URLs without a
/// host have no key.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use hostcrawl::url::host_key;
///
/// let url = Url::parse("https://Example.COM/path").unwrap();
/// assert_eq!(host_key(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(host_key(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// Returns true when `url` lives on the crawl's allowed host
pub fn is_same_host(url: &Url, allowed_host: &str) -> bool {
    host_key(url).is_some_and(|key| key == allowed_host)
}

/// Builds the `{scheme}://{host}/robots.txt` location for a URL
pub fn robots_url(url: &Url) -> Option<Url> {
    host_key(url)?;
    let mut robots = url.join("/robots.txt").ok()?;
    robots.set_query(None);
    robots.set_fragment(None);
    Some(robots)
}
