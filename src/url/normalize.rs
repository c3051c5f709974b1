use crate::LinkError;
use url::Url;

/// Pseudo-schemes rejected before any parsing is attempted
const PSEUDO_SCHEMES: &[&str] = &["mailto:", "tel:"];

/// Resolves an href found on `base_url` into a canonical absolute URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace from the href
/// 2. Reject empty hrefs, pure fragments (`#...`), and `mailto:`/`tel:` links
/// 3. Parse the base URL; reject if malformed
/// 4. Resolve the href against the base (relative, absolute-path and
///    protocol-relative references are all supported)
/// 5. Reject anything that does not resolve to http or https
/// 6. Remove the fragment
///
/// The result is the crawl's deduplication key: two links denote the same page
/// exactly when their normalized strings are equal.
///
/// # Examples
///
/// ```
/// use hostcrawl::url::normalize_link;
///
/// let url = normalize_link("https://x.com/a/b", "../c#top").unwrap();
/// assert_eq!(url.as_str(), "https://x.com/c");
/// ```
pub fn normalize_link(base_url: &str, href: &str) -> Result<Url, LinkError> {
    let href = href.trim();

    if href.is_empty() {
        return Err(LinkError::InvalidLink("empty href".to_string()));
    }

    if href.starts_with('#') {
        return Err(LinkError::InvalidLink(format!("fragment-only href: {}", href)));
    }

    let lowered = href.to_ascii_lowercase();
    if PSEUDO_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return Err(LinkError::InvalidLink(format!("pseudo-scheme href: {}", href)));
    }

    let base = Url::parse(base_url)
        .map_err(|e| LinkError::MalformedUrl(format!("base {}: {}", base_url, e)))?;

    let mut resolved = base
        .join(href)
        .map_err(|e| LinkError::MalformedUrl(format!("{}: {}", href, e)))?;

    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return Err(LinkError::UnsupportedScheme(resolved.scheme().to_string()));
    }

    resolved.set_fragment(None);

    Ok(resolved)
}

/// Canonicalizes a seed URL by resolving it against itself
///
/// The seed must already be absolute; a relative seed has nothing to resolve
/// against and is reported as malformed.
pub fn normalize_seed(seed: &str) -> Result<Url, LinkError> {
    normalize_link(seed.trim(), seed)
}
