use serde::Deserialize;

/// Default site root
pub const DEFAULT_BASE_URL: &str = "https://ethglobal.com";

/// Default number of simultaneous in-flight fetch+extract units
pub const DEFAULT_MAX_CONCURRENCY: u32 = 20;

/// Main configuration structure for Showcase-Harvest
///
/// Every section falls back to its defaults, so an empty file (or no file at
/// all) describes a complete run against the live site.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub showcase: ShowcaseConfig,
    pub events: EventsConfig,
    pub output: OutputConfig,
}

/// Fetch and worker-pool behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Site root every frontier URL is built from
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum number of tasks in flight at once
    #[serde(rename = "max-concurrency")]
    pub max_concurrency: u32,

    /// Whole-request timeout handed to the HTTP transport (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Connection timeout handed to the HTTP transport (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// How many times the coordinator retries a transient transport failure
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Pause between retries (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_retries: 0,
            retry_delay_ms: 500,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "ShowcaseHarvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            contact_email: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    ///
    /// The parenthesized part only carries the contact fields that are set.
    pub fn header_value(&self) -> String {
        let contact: Vec<String> = [
            self.contact_url.as_ref().map(|u| format!("+{}", u)),
            self.contact_email.clone(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if contact.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} ({})",
                self.crawler_name,
                self.crawler_version,
                contact.join("; ")
            )
        }
    }
}

/// Which showcase listing to walk
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShowcaseConfig {
    /// Event filter value used in the listing query (e.g. "bangkok")
    pub event: String,

    /// Number of listing pages, 1-indexed and inclusive
    #[serde(rename = "total-pages")]
    pub total_pages: u32,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            event: "bangkok".to_string(),
            total_pages: 23,
        }
    }
}

/// Where the hackathon index lives
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    #[serde(rename = "index-path")]
    pub index_path: String,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            index_path: crate::frontier::EVENT_INDEX_PATH.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory every CSV file is written into
    pub directory: String,

    #[serde(rename = "project-urls")]
    pub project_urls: String,

    #[serde(rename = "project-details")]
    pub project_details: String,

    pub events: String,

    #[serde(rename = "event-details")]
    pub event_details: String,

    pub prizes: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "results".to_string(),
            project_urls: "project_urls.csv".to_string(),
            project_details: "project_details.csv".to_string(),
            events: "events.csv".to_string(),
            event_details: "event_details.csv".to_string(),
            prizes: "prizes.csv".to_string(),
        }
    }
}
