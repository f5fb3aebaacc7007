use super::{ExtractionError, PageExtractor};
use crate::dom::Document;
use crate::frontier::{absolute_url, PROJECT_LINK_MARKER};
use crate::records::ProjectLink;
use crate::state::Stage;
use url::Url;

/// Collects project links from a showcase listing page
///
/// Every anchor whose href contains `/showcase/` is returned, resolved against
/// the site root, in page order. Duplicates are kept: listing pages can overlap
/// and this stage only collects links.
pub struct ProjectLinkExtractor {
    base: Url,
}

impl ProjectLinkExtractor {
    pub fn new(base: Url) -> Self {
        Self { base }
    }
}

impl PageExtractor for ProjectLinkExtractor {
    type Record = ProjectLink;

    fn stage(&self) -> Stage {
        Stage::ProjectLinks
    }

    fn extract(&self, url: &str, doc: &Document) -> Result<Vec<ProjectLink>, ExtractionError> {
        let links: Vec<ProjectLink> = doc
            .find_all_by_attr_containing("a", "href", PROJECT_LINK_MARKER)
            .into_iter()
            .filter_map(|anchor| anchor.attr("href"))
            .map(|href| ProjectLink {
                project_url: absolute_url(&self.base, href),
            })
            .collect();

        tracing::debug!("Found {} project links on {}", links.len(), url);
        Ok(links)
    }
}
