//! In-memory result table and its CSV rendering

use super::OutputError;
use crate::crawler::{StageRun, TaskOutcome};
use crate::records::TableRow;
use std::fs;
use std::io;
use std::path::Path;

/// Completed records of one stage, ordered by input position
///
/// Workers finish in any order; sorting by the index of the URL that produced
/// each record set (records within a page keep their page order) makes the
/// table identical across runs over the same content.
#[derive(Debug)]
pub struct Table<R> {
    rows: Vec<R>,
}

impl<R: TableRow> Table<R> {
    pub fn from_rows(rows: Vec<R>) -> Self {
        Self { rows }
    }

    /// Collects the completed outcomes of `run`; failures contribute nothing
    pub fn from_run(run: StageRun<R>) -> Self {
        let mut completed: Vec<(usize, Vec<R>)> = run
            .outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                TaskOutcome::Completed { index, records, .. } => Some((index, records)),
                TaskOutcome::Failed(_) => None,
            })
            .collect();
        completed.sort_by_key(|(index, _)| *index);

        Self {
            rows: completed.into_iter().flat_map(|(_, records)| records).collect(),
        }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }
}

/// Writes `table` to `path` as CSV with every field quoted
///
/// An existing file is removed first and the parent directory is created if
/// needed. The header row is written even for an empty table.
pub fn write_table<R: TableRow>(path: &Path, table: &Table<R>) -> Result<(), OutputError> {
    match fs::remove_file(path) {
        Ok(()) => tracing::debug!("Removed previous {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_path(path)?;

    writer.write_record(R::COLUMNS)?;
    for row in table.rows() {
        writer.write_record(row.to_row())?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Reads one column of a previously written table, in row order
///
/// Blank cells are skipped. Used to chain a stage onto the output of an
/// earlier one.
pub fn read_url_column(path: &Path, column: &str) -> Result<Vec<String>, OutputError> {
    let mut reader = csv::Reader::from_path(path)?;

    let position = reader
        .headers()?
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| OutputError::MissingColumn {
            path: path.display().to_string(),
            column: column.to_string(),
        })?;

    let mut urls = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(value) = record.get(position).map(str::trim).filter(|v| !v.is_empty()) {
            urls.push(value.to_string());
        }
    }

    tracing::debug!("Read {} values of '{}' from {}", urls.len(), column, path.display());
    Ok(urls)
}
