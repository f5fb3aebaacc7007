//! Stage coordinator: bounded concurrent fetch + extract
//!
//! This module runs one stage over a list of URLs:
//! - One worker task per URL, gated by a semaphore of `max_concurrency` permits
//! - Fetch (with optional retry of transient failures), parse, extract
//! - Every URL yields exactly one [`TaskOutcome`], delivered in completion order
//!
//! A failure on one URL, including a panic inside an extractor, never stops
//! the other URLs.

use crate::config::ScraperConfig;
use crate::crawler::fetcher::{FetchError, FetchedPage, Fetcher};
use crate::dom::Document;
use crate::extract::{ExtractionError, PageExtractor};
use crate::state::{Stage, TaskState, TaskTracker};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};

/// How transient fetch failures are retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub max_retries: u32,
    /// Pause between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// A single attempt per URL
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            delay: Duration::ZERO,
        }
    }

    pub fn from_config(config: &ScraperConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Counters handed to the progress callback after every finished URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub failed: usize,
}

/// Progress observer, called from the coordinating task only
pub type ProgressFn = Arc<dyn Fn(Progress) + Send + Sync>;

/// Why a URL produced no records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Transport(FetchError),
    Extraction(ExtractionError),
    /// The extractor panicked; holds the panic message
    Panicked(String),
    /// The worker task ended without reporting back
    WorkerLost(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "{}", e),
            Self::Extraction(e) => write!(f, "extraction failed: {}", e),
            Self::Panicked(msg) => write!(f, "extractor panicked: {}", msg),
            Self::WorkerLost(msg) => write!(f, "worker lost: {}", msg),
        }
    }
}

/// A per-URL failure record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionFailure {
    /// Position of the URL in the stage input
    pub index: usize,
    pub url: String,
    pub stage: Stage,
    pub reason: FailureReason,
}

impl fmt::Display for ExtractionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.stage, self.url, self.reason)
    }
}

/// What happened to one input URL
#[derive(Debug)]
pub enum TaskOutcome<R> {
    Completed {
        index: usize,
        url: String,
        records: Vec<R>,
    },
    Failed(ExtractionFailure),
}

impl<R> TaskOutcome<R> {
    pub fn index(&self) -> usize {
        match self {
            Self::Completed { index, .. } => *index,
            Self::Failed(failure) => failure.index,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Completed { url, .. } => url,
            Self::Failed(failure) => &failure.url,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Everything a stage produced, in completion order
#[derive(Debug)]
pub struct StageRun<R> {
    pub stage: Stage,
    /// Number of input URLs
    pub total: usize,
    pub outcomes: Vec<TaskOutcome<R>>,
    pub elapsed: Duration,
}

impl<R> StageRun<R> {
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn succeeded_count(&self) -> usize {
        self.outcomes.len() - self.failed_count()
    }

    pub fn record_count(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                TaskOutcome::Completed { records, .. } => records.len(),
                TaskOutcome::Failed(_) => 0,
            })
            .sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ExtractionFailure> {
        self.outcomes.iter().filter_map(|o| match o {
            TaskOutcome::Failed(failure) => Some(failure),
            TaskOutcome::Completed { .. } => None,
        })
    }
}

/// Runs stages over a shared fetcher with bounded concurrency
pub struct Coordinator {
    fetcher: Arc<Fetcher>,
    max_concurrency: usize,
    retry: RetryPolicy,
    progress: Option<ProgressFn>,
}

impl Coordinator {
    /// Creates a coordinator; a `max_concurrency` of 0 is treated as 1
    pub fn new(fetcher: Arc<Fetcher>, max_concurrency: usize, retry: RetryPolicy) -> Self {
        Self {
            fetcher,
            max_concurrency: max_concurrency.max(1),
            retry,
            progress: None,
        }
    }

    /// Installs a progress observer
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Fetches and extracts every URL, returning one outcome per URL
    ///
    /// At most `max_concurrency` URLs are in flight at once. Outcomes arrive in
    /// completion order; `index` on each one points back into `urls`.
    pub async fn run<E: PageExtractor>(&self, urls: Vec<String>, extractor: Arc<E>) -> StageRun<E::Record> {
        let stage = extractor.stage();
        let total = urls.len();
        let start = Instant::now();

        tracing::info!(
            "Stage {}: {} URLs, up to {} in flight",
            stage,
            total,
            self.max_concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let (tx, mut rx) = mpsc::unbounded_channel::<TaskOutcome<E::Record>>();
        let mut handles = Vec::with_capacity(total);

        for (index, url) in urls.iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let fetcher = Arc::clone(&self.fetcher);
            let extractor = Arc::clone(&extractor);
            let tx = tx.clone();
            let url = url.clone();
            let retry = self.retry;

            handles.push(tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                let outcome = process_url(index, url, stage, &fetcher, extractor.as_ref(), retry).await;
                // the receiver only goes away if the coordinator itself was dropped
                let _ = tx.send(outcome);
            }));
        }
        drop(tx);

        let mut outcomes = Vec::with_capacity(total);
        let mut reported = vec![false; total];
        let mut failed = 0;

        while let Some(outcome) = rx.recv().await {
            reported[outcome.index()] = true;
            if let TaskOutcome::Failed(failure) = &outcome {
                failed += 1;
                tracing::warn!("{}", failure);
            }
            outcomes.push(outcome);
            self.report(Progress {
                completed: outcomes.len(),
                total,
                failed,
            });
        }

        // every sender is gone, so these joins do not wait on live work
        let mut join_errors = HashMap::new();
        for (index, handle) in handles.into_iter().enumerate() {
            if let Err(e) = handle.await {
                join_errors.insert(index, e.to_string());
            }
        }

        for (index, url) in urls.into_iter().enumerate() {
            if reported[index] {
                continue;
            }
            let detail = join_errors
                .remove(&index)
                .unwrap_or_else(|| "task exited without a result".to_string());
            let failure = ExtractionFailure {
                index,
                url,
                stage,
                reason: FailureReason::WorkerLost(detail),
            };
            tracing::error!("{}", failure);
            failed += 1;
            outcomes.push(TaskOutcome::Failed(failure));
            self.report(Progress {
                completed: outcomes.len(),
                total,
                failed,
            });
        }

        let run = StageRun {
            stage,
            total,
            outcomes,
            elapsed: start.elapsed(),
        };

        tracing::info!(
            "Stage {} finished: {} succeeded, {} failed, {} records in {:?}",
            stage,
            run.succeeded_count(),
            run.failed_count(),
            run.record_count(),
            run.elapsed
        );

        run
    }

    fn report(&self, progress: Progress) {
        if let Some(callback) = &self.progress {
            callback(progress);
        }
    }
}

/// Fetch, parse and extract one URL; never panics past the extractor boundary
async fn process_url<E: PageExtractor>(
    index: usize,
    url: String,
    stage: Stage,
    fetcher: &Fetcher,
    extractor: &E,
    retry: RetryPolicy,
) -> TaskOutcome<E::Record> {
    let mut tracker = TaskTracker::new(url.as_str());
    advance(&mut tracker, TaskState::Fetching);

    let page = match fetch_with_retry(fetcher, &url, retry).await {
        Ok(page) => page,
        Err(e) => {
            advance(&mut tracker, TaskState::Failed);
            return failed(index, url, stage, FailureReason::Transport(e));
        }
    };

    advance(&mut tracker, TaskState::Extracting);

    // the parsed document is not Send, so it must not live across an await
    let result = catch_unwind(AssertUnwindSafe(|| {
        let doc = Document::parse(&page.body);
        extractor.extract(&url, &doc)
    }));

    match result {
        Ok(Ok(records)) => {
            advance(&mut tracker, TaskState::Completed);
            tracing::debug!(
                "{} records from {} (served by {})",
                records.len(),
                url,
                page.final_url
            );
            TaskOutcome::Completed {
                index,
                url,
                records,
            }
        }
        Ok(Err(e)) => {
            advance(&mut tracker, TaskState::Failed);
            failed(index, url, stage, FailureReason::Extraction(e))
        }
        Err(payload) => {
            advance(&mut tracker, TaskState::Failed);
            failed(index, url, stage, FailureReason::Panicked(panic_message(payload.as_ref())))
        }
    }
}

async fn fetch_with_retry(fetcher: &Fetcher, url: &str, retry: RetryPolicy) -> Result<FetchedPage, FetchError> {
    let mut attempt = 0;
    loop {
        match fetcher.fetch(url).await {
            Ok(page) => return Ok(page),
            Err(e) if e.is_transient() && attempt < retry.max_retries => {
                attempt += 1;
                tracing::debug!(
                    "Retrying {} ({}/{}) after: {}",
                    url,
                    attempt,
                    retry.max_retries,
                    e.cause
                );
                tokio::time::sleep(retry.delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

fn advance(tracker: &mut TaskTracker, next: TaskState) {
    if let Err(e) = tracker.advance(next) {
        tracing::warn!("{}", e);
    }
}

fn failed<R>(index: usize, url: String, stage: Stage, reason: FailureReason) -> TaskOutcome<R> {
    TaskOutcome::Failed(ExtractionFailure {
        index,
        url,
        stage,
        reason,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
