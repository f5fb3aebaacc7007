//! Per-stage run statistics
//!
//! This module turns a finished [`StageRun`] into a summary that is logged at
//! the end of the stage and can be printed for the CLI.

use crate::crawler::{ExtractionFailure, StageRun};
use crate::state::Stage;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Totals for one stage run
#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: Stage,

    /// URLs handed to the coordinator
    pub submitted: usize,

    /// URLs that produced a record set (possibly empty)
    pub completed: usize,

    /// URLs that produced a failure
    pub failed: usize,

    /// Rows written to the table
    pub records: usize,

    /// Where the table was written
    pub output_path: PathBuf,

    pub elapsed: Duration,

    /// Failures, sorted by input position
    pub failures: Vec<ExtractionFailure>,
}

impl StageReport {
    /// Builds a report from a run before its records are moved into a table
    pub fn from_run<R>(run: &StageRun<R>, output_path: &Path) -> Self {
        let mut failures: Vec<ExtractionFailure> = run.failures().cloned().collect();
        failures.sort_by_key(|f| f.index);

        Self {
            stage: run.stage,
            submitted: run.total,
            completed: run.succeeded_count(),
            failed: failures.len(),
            records: run.record_count(),
            output_path: output_path.to_path_buf(),
            elapsed: run.elapsed,
            failures,
        }
    }

    /// Share of submitted URLs that completed, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.submitted == 0 {
            return 100.0;
        }
        (self.completed as f64 / self.submitted as f64) * 100.0
    }

    /// Emits the totals and every failure through `tracing`
    pub fn log_summary(&self) {
        tracing::info!(
            "Stage {}: {} submitted, {} completed, {} failed, {} records -> {} ({:.1}s)",
            self.stage,
            self.submitted,
            self.completed,
            self.failed,
            self.records,
            self.output_path.display(),
            self.elapsed.as_secs_f64()
        );

        for failure in &self.failures {
            tracing::warn!("  failed: {} ({})", failure.url, failure.reason);
        }
    }
}

/// Prints reports to stdout in a formatted manner
pub fn print_reports(reports: &[StageReport]) {
    println!("=== Harvest Summary ===\n");

    for report in reports {
        println!("{}:", report.stage);
        println!("  URLs submitted: {}", report.submitted);
        println!(
            "  Completed: {} ({:.1}%)",
            report.completed,
            report.success_rate()
        );
        println!("  Failed: {}", report.failed);
        println!("  Rows written: {}", report.records);
        println!("  Output: {}", report.output_path.display());
        println!();
    }

    let failed: usize = reports.iter().map(|r| r.failed).sum();
    if failed > 0 {
        println!("Failures ({}):", failed);
        for failure in reports.iter().flat_map(|r| &r.failures) {
            println!("  - {}", failure);
        }
        println!();
    }
}
