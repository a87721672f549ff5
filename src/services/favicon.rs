//! Hostname and favicon URL derivation for bookmark cards.
//!
//! Nothing is fetched here; the renderer loads the icon URL itself and hides
//! the image if it fails.

use url::Url;

const FAVICON_ENDPOINT: &str = "https://www.google.com/s2/favicons";

/// Host of `url`, or the raw string when it does not parse or has no host.
pub fn hostname(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

/// Third-party favicon URL for the bookmark's host.
///
/// `None` when the bookmark URL has no host to key the lookup on.
pub fn favicon_url(url: &str, size: u32) -> Option<String> {
    let host = Url::parse(url).ok()?.host_str()?.to_string();
    let mut endpoint = Url::parse(FAVICON_ENDPOINT).ok()?;
    endpoint
        .query_pairs_mut()
        .append_pair("domain", &host)
        .append_pair("sz", &size.to_string());
    Some(endpoint.to_string())
}
