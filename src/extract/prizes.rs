use super::text::strip_emoji;
use super::{ExtractionError, PageExtractor};
use crate::dom::{Document, Node};
use crate::frontier::event_url_from_prizes;
use crate::records::{join_or_sentinel, PrizeRecord, NOT_AVAILABLE};
use crate::state::Stage;

/// Class markers on the prize page, as used by the site's stylesheet
mod markers {
    pub const PARTNER_SECTION: &str = "border-b-2";
    pub const PARTNER_TOTAL: &str = "text-2xl";
    pub const PRIZE_TITLE: &str = "text-xl font-semibold break-normal";
    pub const PRIZE_AMOUNT: &str = "text-xl font-medium";
    pub const DESCRIPTION_ANCHOR: &str = "group flex text-md";
    pub const DESCRIPTION: &str = "text-lg mt-1.5 mb-2";
    pub const BREAKDOWN: &str = "flex flex-col lg:flex-row gap-y-2 gap-x-10";
    pub const PLACE: &str = "flex gap-x-1";
    pub const PLACE_INFO: &str = "flex flex-col";
    pub const PLACE_NAME: &str = "w-fit";
    pub const PLACE_AMOUNT: &str = "text-gray-900";
}

const COLLAPSIBLE_ID: &str = "collapsible-data";

/// Partner-level fields shared by every prize in a section
struct Partner {
    name: String,
    total: String,
}

/// Extracts sponsor prizes from an event's `/prizes` page
///
/// A partner section without a name or total is skipped; a prize without a
/// title, amount, or well-formed placement breakdown is skipped. Neither fails
/// the page.
pub struct PrizePageExtractor;

impl PageExtractor for PrizePageExtractor {
    type Record = PrizeRecord;

    fn stage(&self) -> Stage {
        Stage::Prizes
    }

    fn extract(&self, url: &str, doc: &Document) -> Result<Vec<PrizeRecord>, ExtractionError> {
        let event_url = event_url_from_prizes(url);
        let sections = doc.find_all("div", markers::PARTNER_SECTION);
        tracing::debug!("Found {} partner sections on {}", sections.len(), url);

        let mut prizes = Vec::new();
        for section in sections {
            let Some(partner) = partner(section) else {
                tracing::debug!("Skipping partner section without name or total on {}", url);
                continue;
            };

            for block in open_collapsibles(section) {
                match prize(event_url, &partner, block) {
                    Some(record) => prizes.push(record),
                    None => tracing::debug!(
                        "Skipping incomplete prize block for partner '{}' on {}",
                        partner.name,
                        url
                    ),
                }
            }
        }

        tracing::debug!("Found {} prizes on {}", prizes.len(), url);
        Ok(prizes)
    }
}

fn partner(section: Node<'_>) -> Option<Partner> {
    let name = section.find("h2", "")?.text();
    let total = section.find("p", markers::PARTNER_TOTAL)?.text();
    Some(Partner { name, total })
}

fn open_collapsibles(section: Node<'_>) -> Vec<Node<'_>> {
    section
        .descendants()
        .filter(|n| {
            n.is_tag("div")
                && n.attr("data-state") == Some("open")
                && n.attr("id") == Some(COLLAPSIBLE_ID)
        })
        .collect()
}

fn prize(event_url: &str, partner: &Partner, block: Node<'_>) -> Option<PrizeRecord> {
    let title = strip_emoji(&block.find("span", markers::PRIZE_TITLE)?.text());
    let amount = block.find("span", markers::PRIZE_AMOUNT)?.text();
    let breakdown = breakdown(block)?;

    Some(PrizeRecord {
        event_url: event_url.to_string(),
        partner_name: partner.name.clone(),
        total_partner_amount: partner.total.clone(),
        prize_title: title,
        prize_amount: amount,
        description: description(block),
        prize_breakdown: join_or_sentinel(&breakdown),
    })
}

/// Text of the description block that follows the breakdown header
fn description(block: Node<'_>) -> String {
    block
        .find("div", markers::DESCRIPTION_ANCHOR)
        .and_then(|anchor| anchor.next_sibling_matching("div", markers::DESCRIPTION))
        .map(|desc| desc.text())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// `"<placement>: <amount>"` entries
///
/// No breakdown container means an empty list. A placement without its name
/// node makes the whole prize unreadable, so that returns `None`; a missing
/// amount only degrades to the sentinel.
fn breakdown(block: Node<'_>) -> Option<Vec<String>> {
    let Some(container) = block.find("div", markers::BREAKDOWN) else {
        return Some(Vec::new());
    };

    let mut places = Vec::new();
    for place in container.find_all("div", markers::PLACE) {
        let Some(info) = place.find("div", markers::PLACE_INFO) else {
            continue;
        };
        let name = info.find("div", markers::PLACE_NAME)?.text();
        let amount = info
            .find("div", markers::PLACE_AMOUNT)
            .map(|n| n.text())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        places.push(format!("{}: {}", name, amount));
    }

    Some(places)
}
