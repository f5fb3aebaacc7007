use super::{ExtractionError, PageExtractor};
use crate::dom::Document;
use crate::frontier::{absolute_url, EVENT_PATH_PREFIX};
use crate::records::EventUrl;
use crate::state::Stage;
use std::collections::HashSet;
use url::Url;

/// Collects event page links from the hackathon index
///
/// Anchors whose href starts with `/events/` are kept once each, in the order
/// they first appear.
pub struct EventIndexExtractor {
    base: Url,
}

impl EventIndexExtractor {
    pub fn new(base: Url) -> Self {
        Self { base }
    }
}

impl PageExtractor for EventIndexExtractor {
    type Record = EventUrl;

    fn stage(&self) -> Stage {
        Stage::Events
    }

    fn extract(&self, url: &str, doc: &Document) -> Result<Vec<EventUrl>, ExtractionError> {
        let mut seen = HashSet::new();
        let mut events = Vec::new();

        for (_, href) in doc.links() {
            if !href.starts_with(EVENT_PATH_PREFIX) {
                continue;
            }

            let event_url = absolute_url(&self.base, href);
            if seen.insert(event_url.clone()) {
                events.push(EventUrl { event_url });
            }
        }

        tracing::debug!("Found {} event links on {}", events.len(), url);
        Ok(events)
    }
}
