//! Stage wiring
//!
//! Every stage is the same shape: build a frontier, run it through the
//! coordinator with one extractor, order the completed records into a table
//! and write it out. Stages that depend on an earlier one read their input
//! URLs back from that stage's CSV.

use crate::config::{self, Config};
use crate::crawler::{Coordinator, Fetcher, ProgressFn, RetryPolicy};
use crate::extract::{
    EventDetailExtractor, EventIndexExtractor, PageExtractor, PrizePageExtractor,
    ProjectDetailExtractor, ProjectLinkExtractor,
};
use crate::frontier::{event_index_url, parse_base_url, prizes_url, showcase_urls};
use crate::output::{read_url_column, write_table, StageReport, Table};
use crate::records::TableRow;
use crate::state::Stage;
use crate::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Where a stage's URLs come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageInput {
    /// Computed from configuration, no I/O needed
    Urls(Vec<String>),
    /// Read from a column of an earlier stage's table
    Table { path: PathBuf, column: &'static str },
}

/// What a stage would do, without doing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePlan {
    pub stage: Stage,
    pub input: StageInput,
    pub output: PathBuf,
}

/// Runs stages against one site with one shared HTTP client
pub struct Pipeline {
    config: Config,
    base: Url,
    coordinator: Coordinator,
}

impl Pipeline {
    /// Validates `config` and builds the fetcher and coordinator
    pub fn new(config: Config) -> Result<Self> {
        config::validate(&config)?;
        let base = parse_base_url(&config.scraper.base_url)?;

        let fetcher = Fetcher::from_config(&config.scraper, &config.user_agent)?;
        let coordinator = Coordinator::new(
            Arc::new(fetcher),
            config.scraper.max_concurrency as usize,
            RetryPolicy::from_config(&config.scraper),
        );

        Ok(Self {
            config,
            base,
            coordinator,
        })
    }

    /// Installs a progress observer on every stage
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.coordinator = self.coordinator.with_progress(progress);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Output file of `stage` inside the configured directory
    pub fn output_path(&self, stage: Stage) -> PathBuf {
        let output = &self.config.output;
        let file = match stage {
            Stage::ProjectLinks => &output.project_urls,
            Stage::ProjectDetails => &output.project_details,
            Stage::Events => &output.events,
            Stage::EventDetails => &output.event_details,
            Stage::Prizes => &output.prizes,
        };
        Path::new(&output.directory).join(file)
    }

    /// Where `stage` gets its URLs from
    pub fn input(&self, stage: Stage) -> Result<StageInput> {
        let input = match stage {
            Stage::ProjectLinks => StageInput::Urls(showcase_urls(
                &self.base,
                &self.config.showcase.event,
                self.config.showcase.total_pages,
            )?),
            Stage::Events => StageInput::Urls(vec![event_index_url(
                &self.base,
                &self.config.events.index_path,
            )?]),
            Stage::ProjectDetails => StageInput::Table {
                path: self.output_path(Stage::ProjectLinks),
                column: "project_url",
            },
            Stage::EventDetails | Stage::Prizes => StageInput::Table {
                path: self.output_path(Stage::Events),
                column: "event_url",
            },
        };
        Ok(input)
    }

    /// Every stage's input and output, for `--dry-run`
    pub fn plan(&self) -> Result<Vec<StagePlan>> {
        Stage::all_stages()
            .into_iter()
            .map(|stage| {
                Ok(StagePlan {
                    stage,
                    input: self.input(stage)?,
                    output: self.output_path(stage),
                })
            })
            .collect()
    }

    /// Reads the URLs a dependent stage consumes
    ///
    /// `path` overrides the earlier stage's output file; the column name stays
    /// the same.
    pub fn read_input(&self, stage: Stage, path: Option<&Path>) -> Result<Vec<String>> {
        match self.input(stage)? {
            StageInput::Urls(urls) => Ok(urls),
            StageInput::Table {
                path: default_path,
                column,
            } => {
                let path = path.unwrap_or(default_path.as_path());
                tracing::info!("Reading {} input from {}", stage, path.display());
                Ok(read_url_column(path, column)?)
            }
        }
    }

    /// Showcase listing pages -> `project_urls.csv`
    pub async fn project_links(&self) -> Result<StageReport> {
        let urls = self.read_input(Stage::ProjectLinks, None)?;
        let extractor = ProjectLinkExtractor::new(self.base.clone());
        self.run_stage(urls, extractor).await
    }

    /// Project pages -> `project_details.csv`
    pub async fn project_details(&self, project_urls: Vec<String>) -> Result<StageReport> {
        self.run_stage(project_urls, ProjectDetailExtractor::new()).await
    }

    /// Hackathon index -> `events.csv`
    pub async fn events(&self) -> Result<StageReport> {
        let urls = self.read_input(Stage::Events, None)?;
        let extractor = EventIndexExtractor::new(self.base.clone());
        self.run_stage(urls, extractor).await
    }

    /// Event pages -> `event_details.csv`
    pub async fn event_details(&self, event_urls: Vec<String>) -> Result<StageReport> {
        self.run_stage(event_urls, EventDetailExtractor).await
    }

    /// Prize pages of the given events -> `prizes.csv`
    pub async fn prizes(&self, event_urls: Vec<String>) -> Result<StageReport> {
        let urls = event_urls.iter().map(|u| prizes_url(u)).collect();
        self.run_stage(urls, PrizePageExtractor).await
    }

    /// Every stage in dependency order, each reading its predecessor's table
    pub async fn run_all(&self) -> Result<Vec<StageReport>> {
        let mut reports = Vec::with_capacity(Stage::all_stages().len());

        reports.push(self.project_links().await?);
        let project_urls = self.read_input(Stage::ProjectDetails, None)?;
        reports.push(self.project_details(project_urls).await?);

        reports.push(self.events().await?);
        let event_urls = self.read_input(Stage::EventDetails, None)?;
        reports.push(self.event_details(event_urls.clone()).await?);
        reports.push(self.prizes(event_urls).await?);

        Ok(reports)
    }

    async fn run_stage<E>(&self, urls: Vec<String>, extractor: E) -> Result<StageReport>
    where
        E: PageExtractor,
        E::Record: TableRow,
    {
        let stage = extractor.stage();
        let path = self.output_path(stage);

        let run = self.coordinator.run(urls, Arc::new(extractor)).await;
        let report = StageReport::from_run(&run, &path);

        // partial results are written even when some URLs failed
        write_table(&path, &Table::from_run(run))?;
        report.log_summary();

        Ok(report)
    }
}
