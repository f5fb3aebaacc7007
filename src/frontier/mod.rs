//! URL frontier: the finite set of URLs each stage visits
//!
//! Everything here is pure. No function touches the network, and the same
//! inputs always produce the same URLs in the same order.

use crate::FrontierError;
use url::Url;

/// Path of the paginated project listing
pub const SHOWCASE_PATH: &str = "/showcase";

/// Path of the hackathon index
pub const EVENT_INDEX_PATH: &str = "/events/hackathons";

/// Href marker identifying a project detail link on a listing page
pub const PROJECT_LINK_MARKER: &str = "/showcase/";

/// Href prefix identifying an event link on the hackathon index
pub const EVENT_PATH_PREFIX: &str = "/events/";

/// Suffix turning an event URL into its prize page URL
pub const PRIZES_SUFFIX: &str = "/prizes";

/// Parses and checks the site root every frontier URL hangs off
pub fn parse_base_url(base_url: &str) -> Result<Url, FrontierError> {
    let url = Url::parse(base_url).map_err(|e| FrontierError::InvalidBaseUrl {
        url: base_url.to_string(),
        message: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(FrontierError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: "URL cannot be used as a base".to_string(),
        });
    }

    Ok(url)
}

/// Builds the showcase listing URLs for one event
///
/// Pages are 1-indexed and `total_pages` is inclusive. A page count of zero
/// is rejected rather than clamped, so a misconfigured stage fails before it
/// sends a single request.
///
/// # Examples
///
/// ```
/// use showcase_harvest::frontier::{parse_base_url, showcase_urls};
///
/// let base = parse_base_url("https://ethglobal.com").unwrap();
/// let urls = showcase_urls(&base, "bangkok", 2).unwrap();
/// assert_eq!(urls[0], "https://ethglobal.com/showcase?events=bangkok&page=1");
/// assert_eq!(urls[1], "https://ethglobal.com/showcase?events=bangkok&page=2");
/// ```
pub fn showcase_urls(base: &Url, event: &str, total_pages: u32) -> Result<Vec<String>, FrontierError> {
    if total_pages < 1 {
        return Err(FrontierError::InvalidPageCount(total_pages));
    }

    let event = event.trim();
    if event.is_empty() {
        return Err(FrontierError::EmptyEvent);
    }

    let listing = join(base, SHOWCASE_PATH)?;

    Ok((1..=total_pages)
        .map(|page| {
            let mut url = listing.clone();
            url.query_pairs_mut()
                .append_pair("events", event)
                .append_pair("page", &page.to_string());
            url.to_string()
        })
        .collect())
}

/// The hackathon index URL
pub fn event_index_url(base: &Url, index_path: &str) -> Result<String, FrontierError> {
    Ok(join(base, index_path)?.to_string())
}

/// The prize page URL for an event
///
/// # Examples
///
/// ```
/// use showcase_harvest::frontier::prizes_url;
///
/// assert_eq!(
///     prizes_url("https://ethglobal.com/events/sanfrancisco2024"),
///     "https://ethglobal.com/events/sanfrancisco2024/prizes"
/// );
/// ```
pub fn prizes_url(event_url: &str) -> String {
    format!("{}{}", event_url.trim_end_matches('/'), PRIZES_SUFFIX)
}

/// Inverse of [`prizes_url`]; URLs without the suffix come back unchanged
pub fn event_url_from_prizes(prizes_url: &str) -> &str {
    prizes_url.strip_suffix(PRIZES_SUFFIX).unwrap_or(prizes_url)
}

/// Resolves an href found on a page against the site root
///
/// Relative and root-relative hrefs are joined; anything that does not parse
/// as a URL reference falls back to plain concatenation with the site origin.
pub fn absolute_url(base: &Url, href: &str) -> String {
    match base.join(href) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}{}", base.as_str().trim_end_matches('/'), href),
    }
}

fn join(base: &Url, path: &str) -> Result<Url, FrontierError> {
    base.join(path).map_err(|e| FrontierError::InvalidBaseUrl {
        url: base.to_string(),
        message: e.to_string(),
    })
}
