//! Page extractors, one per page type
//!
//! Each extractor is a pure function from a parsed [`Document`] to records.
//! Structural surprises degrade to [`NOT_AVAILABLE`](crate::NOT_AVAILABLE) or
//! to skipping the current sub-item; only a page that cannot be interpreted at
//! all comes back as an [`ExtractionError`].

mod event_detail;
mod event_index;
mod prizes;
mod project_detail;
mod project_links;
pub mod text;

pub use event_detail::EventDetailExtractor;
pub use event_index::EventIndexExtractor;
pub use prizes::PrizePageExtractor;
pub use project_detail::{split_event_label, ProjectDetailExtractor, EARLIEST_EVENT_YEAR};
pub use project_links::ProjectLinkExtractor;

use crate::dom::Document;
use crate::state::Stage;
use thiserror::Error;

/// A page-level extraction failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("cannot derive an event slug from {0}")]
    MissingSlug(String),

    #[error("unexpected page structure: {0}")]
    Structure(String),
}

/// Turns one fetched page into zero or more records
///
/// Implementations are shared across worker tasks, so they hold only
/// immutable configuration (base URL, current year).
pub trait PageExtractor: Send + Sync + 'static {
    /// Record type this extractor produces
    type Record: Send + 'static;

    /// The pipeline instance this extractor serves
    fn stage(&self) -> Stage;

    /// Extracts records from `doc`, which was fetched from `url`
    fn extract(&self, url: &str, doc: &Document) -> Result<Vec<Self::Record>, ExtractionError>;
}
