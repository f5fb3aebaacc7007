use super::text::{first_four_digit_word, mentions_month, title_case};
use super::{ExtractionError, PageExtractor};
use crate::dom::Document;
use crate::records::{or_sentinel, EventDetail};
use crate::state::Stage;
use url::Url;

const BRAND: &str = "ETHGlobal";
const VIRTUAL_LOCATION: &str = "Virtual";

/// Derives an event's name, location and year
///
/// Name and location come from the URL slug, which is more regular than the
/// page markup. The page is only read to find the year on the first line that
/// mentions a month.
pub struct EventDetailExtractor;

impl PageExtractor for EventDetailExtractor {
    type Record = EventDetail;

    fn stage(&self) -> Stage {
        Stage::EventDetails
    }

    fn extract(&self, url: &str, doc: &Document) -> Result<Vec<EventDetail>, ExtractionError> {
        let slug = event_slug(url).ok_or_else(|| ExtractionError::MissingSlug(url.to_string()))?;
        let (event_name, location) = name_and_location(&slug);

        Ok(vec![EventDetail {
            event_url: url.to_string(),
            event_name,
            location,
            year: or_sentinel(event_year(doc)),
        }])
    }
}

/// Last non-empty path segment of the event URL
fn event_slug(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .filter(|s| !s.is_empty())
        .last()
        .map(str::to_string)
}

/// Name and location from a slug like `sanfrancisco2024` or `eth-online`
fn name_and_location(slug: &str) -> (String, String) {
    let mut name = title_case(&slug.replace('-', " "));
    if !name.contains("ETH") && !name.contains("Eth") {
        name = format!("{} {}", BRAND, name);
    }

    let mut location = name.clone();
    if location.contains(BRAND) {
        location = location.replace(BRAND, "").trim().to_string();
    }
    if location.contains("ETH") {
        location = location.replace("ETH", "").trim().to_string();
    }

    let lowered = location.to_lowercase();
    if lowered == "online" || lowered == "virtual" {
        name = format!("ETH{}", name);
        location = VIRTUAL_LOCATION.to_string();
    }

    (name, location)
}

/// Four-digit year on the first text fragment that names a month
fn event_year(doc: &Document) -> Option<String> {
    let date_line = doc.stripped_strings().find(|s| mentions_month(s))?;
    first_four_digit_word(date_line).map(str::to_string)
}
