//! Record types produced by the extractors
//!
//! Every record type knows its own fixed column order. Unresolved string
//! fields hold [`NOT_AVAILABLE`] rather than being empty or missing, so every
//! row of a table has the same shape.

/// Placeholder for any field extraction could not populate
pub const NOT_AVAILABLE: &str = "N/A";

/// Separator used when a field holds a list (prize titles, prize breakdown)
pub const LIST_SEPARATOR: &str = " | ";

/// A record that can be written as one CSV row
pub trait TableRow {
    /// Column names, in output order
    const COLUMNS: &'static [&'static str];

    /// Field values, in the same order as [`TableRow::COLUMNS`]
    fn to_row(&self) -> Vec<String>;
}

/// Returns the value, or the sentinel when it is missing or blank
pub fn or_sentinel(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Joins list items, or returns the sentinel when the list is empty
pub fn join_or_sentinel(items: &[String]) -> String {
    if items.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        items.join(LIST_SEPARATOR)
    }
}

/// A project page discovered on a showcase listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLink {
    pub project_url: String,
}

impl TableRow for ProjectLink {
    const COLUMNS: &'static [&'static str] = &["project_url"];

    fn to_row(&self) -> Vec<String> {
        vec![self.project_url.clone()]
    }
}

/// Everything extracted from one project page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDetail {
    pub project_url: String,
    pub project_name: String,
    pub event_name: String,
    /// Four-digit year found in the event label, or the run's current year
    pub event_year: i32,
    pub short_description: String,
    pub full_description: String,
    pub demo_url: String,
    pub source_code_url: String,
    pub tech_stack: String,
    /// Prize titles joined with [`LIST_SEPARATOR`], or the sentinel
    pub prizes: String,
}

impl TableRow for ProjectDetail {
    const COLUMNS: &'static [&'static str] = &[
        "project_url",
        "project_name",
        "event_name",
        "event_year",
        "short_description",
        "full_description",
        "demo_url",
        "source_code_url",
        "tech_stack",
        "prizes",
    ];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.project_url.clone(),
            self.project_name.clone(),
            self.event_name.clone(),
            self.event_year.to_string(),
            self.short_description.clone(),
            self.full_description.clone(),
            self.demo_url.clone(),
            self.source_code_url.clone(),
            self.tech_stack.clone(),
            self.prizes.clone(),
        ]
    }
}

/// A hackathon event page linked from the events index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventUrl {
    pub event_url: String,
}

impl TableRow for EventUrl {
    const COLUMNS: &'static [&'static str] = &["event_url"];

    fn to_row(&self) -> Vec<String> {
        vec![self.event_url.clone()]
    }
}

/// Name, location and year of an event, mostly derived from its URL slug
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetail {
    pub event_url: String,
    pub event_name: String,
    pub location: String,
    /// Four-digit year from the event's date line, or the sentinel
    pub year: String,
}

impl TableRow for EventDetail {
    const COLUMNS: &'static [&'static str] = &["event_url", "event_name", "location", "year"];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.event_url.clone(),
            self.event_name.clone(),
            self.location.clone(),
            self.year.clone(),
        ]
    }
}

/// One sponsor prize on an event's prize page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrizeRecord {
    pub event_url: String,
    pub partner_name: String,
    pub total_partner_amount: String,
    pub prize_title: String,
    pub prize_amount: String,
    pub description: String,
    /// `"<placement>: <amount>"` entries joined with [`LIST_SEPARATOR`], or the sentinel
    pub prize_breakdown: String,
}

impl TableRow for PrizeRecord {
    const COLUMNS: &'static [&'static str] = &[
        "event_url",
        "partner_name",
        "total_partner_amount",
        "prize_title",
        "prize_amount",
        "description",
        "prize_breakdown",
    ];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.event_url.clone(),
            self.partner_name.clone(),
            self.total_partner_amount.clone(),
            self.prize_title.clone(),
            self.prize_amount.clone(),
            self.description.clone(),
            self.prize_breakdown.clone(),
        ]
    }
}
