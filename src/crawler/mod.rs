//! Crawler module for page fetching and stage execution
//!
//! This module contains the network side of the pipeline, including:
//! - HTTP fetching with typed failures
//! - Bounded concurrent fetch + extract over a URL list
//! - Progress reporting and per-URL failure records

mod coordinator;
mod fetcher;

pub use coordinator::{
    Coordinator, ExtractionFailure, FailureReason, Progress, ProgressFn, RetryPolicy, StageRun,
    TaskOutcome,
};
pub use fetcher::{build_http_client, FetchCause, FetchError, FetchedPage, Fetcher};
