//! Output module for result tables and run reports
//!
//! This module handles:
//! - Ordering completed records into a table
//! - Writing tables as fully quoted CSV, replacing previous files
//! - Reading a URL column back for the next stage
//! - Summarizing each stage run

pub mod stats;
mod table;

pub use stats::{print_reports, StageReport};
pub use table::{read_url_column, write_table, Table};

use thiserror::Error;

/// Errors from writing or reading result tables
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("column '{column}' not found in {path}")]
    MissingColumn { path: String, column: String },
}
