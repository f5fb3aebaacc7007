use std::fmt;

/// The pipeline instances that share the coordinator and sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Showcase listing pages -> project URLs
    ProjectLinks,

    /// Project pages -> project details
    ProjectDetails,

    /// Hackathon index -> event URLs
    Events,

    /// Event pages -> name, location, year
    EventDetails,

    /// Event prize pages -> sponsor prizes
    Prizes,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectLinks => "project_links",
            Self::ProjectDetails => "project_details",
            Self::Events => "events",
            Self::EventDetails => "event_details",
            Self::Prizes => "prizes",
        }
    }

    pub fn all_stages() -> [Self; 5] {
        [
            Self::ProjectLinks,
            Self::ProjectDetails,
            Self::Events,
            Self::EventDetails,
            Self::Prizes,
        ]
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
