use super::{ExtractionError, PageExtractor};
use crate::dom::{Document, Node};
use crate::records::{join_or_sentinel, or_sentinel, ProjectDetail};
use crate::state::Stage;
use chrono::Datelike;

/// Oldest year the event-label scan looks for
pub const EARLIEST_EVENT_YEAR: i32 = 2020;

const CREATED_AT_LABEL: &str = "Created At";
const DESCRIPTION_LABEL: &str = "Project Description";
const HOW_ITS_MADE_LABEL: &str = "How it's Made";
const WINNER_LABEL: &str = "Winner of";
const DEMO_LINK_TEXT: &str = "Live Demo";
const SOURCE_LINK_TEXT: &str = "Source Code";

/// Builds a [`ProjectDetail`] from a project page
///
/// Each field comes from its own lookup; a miss fills that field with the
/// sentinel and leaves the others alone.
pub struct ProjectDetailExtractor {
    current_year: i32,
}

impl ProjectDetailExtractor {
    /// Uses the current UTC year as the upper bound of the year scan
    pub fn new() -> Self {
        Self::with_current_year(chrono::Utc::now().year())
    }

    /// Fixes the "current" year, for reproducible runs and tests
    pub fn with_current_year(current_year: i32) -> Self {
        Self { current_year }
    }

    /// Builds the record; never fails, every miss becomes the sentinel
    pub fn build(&self, url: &str, doc: &Document) -> ProjectDetail {
        let (event_name, event_year) = match event_label(doc) {
            Some(label) => {
                let (name, year) = split_event_label(&label, self.current_year);
                (or_sentinel(Some(name)), year)
            }
            None => (or_sentinel(None), self.current_year),
        };

        let (demo_url, source_code_url) = project_links(doc);

        ProjectDetail {
            project_url: url.to_string(),
            project_name: or_sentinel(project_name(doc)),
            event_name,
            event_year,
            short_description: or_sentinel(short_description(doc)),
            full_description: or_sentinel(section_paragraphs(doc, DESCRIPTION_LABEL, "h3")),
            demo_url: or_sentinel(demo_url),
            source_code_url: or_sentinel(source_code_url),
            tech_stack: or_sentinel(section_paragraphs(doc, HOW_ITS_MADE_LABEL, "h2")),
            prizes: join_or_sentinel(&prize_titles(doc)),
        }
    }
}

impl Default for ProjectDetailExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageExtractor for ProjectDetailExtractor {
    type Record = ProjectDetail;

    fn stage(&self) -> Stage {
        Stage::ProjectDetails
    }

    fn extract(&self, url: &str, doc: &Document) -> Result<Vec<ProjectDetail>, ExtractionError> {
        Ok(vec![self.build(url, doc)])
    }
}

/// Splits a trailing or embedded year token out of an event label
///
/// Years are tried from [`EARLIEST_EVENT_YEAR`] up to `current_year`; the first
/// one found is removed from the label (every occurrence) and returned. A label
/// without any year in that window keeps its text and gets `current_year`.
///
/// ```
/// use showcase_harvest::extract::split_event_label;
///
/// assert_eq!(
///     split_event_label("San Francisco 2024", 2025),
///     ("San Francisco".to_string(), 2024)
/// );
/// ```
pub fn split_event_label(label: &str, current_year: i32) -> (String, i32) {
    for year in EARLIEST_EVENT_YEAR..=current_year {
        let token = year.to_string();
        if label.contains(&token) {
            return (label.replace(&token, "").trim().to_string(), year);
        }
    }

    (label.to_string(), current_year)
}

fn project_name(doc: &Document) -> Option<String> {
    doc.find_tag("h1").map(|h1| h1.text())
}

/// Text of the element right after the "Created At" label
fn event_label(doc: &Document) -> Option<String> {
    let anchor = doc.find_text(CREATED_AT_LABEL)?;
    let label = anchor.next_element()?.text();
    if label.is_empty() {
        tracing::debug!("Empty event label after '{}'", CREATED_AT_LABEL);
        return None;
    }
    Some(label)
}

/// First paragraph after the project heading
fn short_description(doc: &Document) -> Option<String> {
    let h1 = doc.find_tag("h1")?;
    h1.find_next("p").map(|p| p.text())
}

/// Paragraphs after `label`, up to the next `stop_tag` heading, space-joined
fn section_paragraphs(doc: &Document, label: &str, stop_tag: &str) -> Option<String> {
    let anchor = doc.find_text(label)?;
    let paragraphs = collect_paragraphs(anchor, stop_tag);
    if paragraphs.is_empty() {
        return None;
    }
    Some(paragraphs.join(" "))
}

fn collect_paragraphs<'a>(anchor: Node<'a>, stop_tag: &'a str) -> Vec<String> {
    anchor
        .following_until(move |n| n.is_tag(stop_tag))
        .filter(|n| n.is_tag("p"))
        .map(|p| p.text())
        .collect()
}

/// Demo and source links; when several anchors match, the last one wins
fn project_links(doc: &Document) -> (Option<String>, Option<String>) {
    let mut demo = None;
    let mut source = None;

    for (anchor, href) in doc.links() {
        let text = anchor.text();
        if text.contains(DEMO_LINK_TEXT) {
            demo = Some(href.to_string());
        } else if text.contains(SOURCE_LINK_TEXT) {
            source = Some(href.to_string());
        }
    }

    (demo, source)
}

/// Every `h4` inside the element that follows the "Winner of" label
fn prize_titles(doc: &Document) -> Vec<String> {
    let Some(container) = doc
        .find_text(WINNER_LABEL)
        .and_then(|anchor| anchor.next_element())
    else {
        return Vec::new();
    };

    container
        .find_all("h4", "")
        .into_iter()
        .map(|h4| h4.text())
        .filter(|t| !t.is_empty())
        .collect()
}
