//! Task catalog import and export as JSON files.
//!
//! An import file is a JSON array of rows shaped like [`NewTask`]. Rows are
//! validated one by one; a bad row is reported and skipped without aborting
//! the rest of the file.

use crate::database::models::{NewTask, Task, UpsertOutcome};
use crate::database::store::TaskCatalogStore;
use crate::error::CatalogFileError;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// A row that could not be imported, by 1-based position in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ImportReport {
    pub created: usize,
    pub updated: usize,
    pub failed: Vec<RowError>,
}

impl ImportReport {
    pub fn summary(&self) -> String {
        let mut text = format!(
            "Imported tasks: {} created, {} updated, {} failed.",
            self.created,
            self.updated,
            self.failed.len()
        );
        for failure in self.failed.iter().take(10) {
            text.push_str(&format!("\nRow {}: {}", failure.row, failure.reason));
        }
        text
    }
}

fn validate(row: &NewTask) -> Result<(), String> {
    if row.name.trim().is_empty() {
        return Err("name is empty".into());
    }
    if !(0..=100).contains(&row.rating) {
        return Err(format!("rating {} is outside 0..=100", row.rating));
    }
    Ok(())
}

/// Parses a catalog document without touching the store.
pub fn parse_rows(json: &str) -> Result<Vec<Result<NewTask, String>>, CatalogFileError> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .map(|value| {
            let row: NewTask = serde_json::from_value(value).map_err(|e| e.to_string())?;
            validate(&row)?;
            Ok(row)
        })
        .collect())
}

/// Upserts every valid row of `json` by task name.
pub async fn import_tasks<S>(store: &S, json: &str) -> Result<ImportReport, CatalogFileError>
where
    S: TaskCatalogStore + ?Sized,
{
    let mut report = ImportReport::default();
    for (index, parsed) in parse_rows(json)?.into_iter().enumerate() {
        let row = index + 1;
        match parsed {
            Ok(task) => match store.upsert_task(&task).await? {
                UpsertOutcome::Created => report.created += 1,
                UpsertOutcome::Updated => report.updated += 1,
            },
            Err(reason) => {
                warn!(target = "catalog", row, %reason, "skipping catalog row");
                report.failed.push(RowError { row, reason });
            }
        }
    }
    Ok(report)
}

#[instrument(level = "info", skip(store))]
pub async fn import_file<S>(store: &S, path: &Path) -> Result<ImportReport, CatalogFileError>
where
    S: TaskCatalogStore + ?Sized,
{
    let json = tokio::fs::read_to_string(path).await?;
    let report = import_tasks(store, &json).await?;
    info!(
        target = "catalog",
        created = report.created,
        updated = report.updated,
        failed = report.failed.len(),
        "catalog imported"
    );
    Ok(report)
}

fn as_row(task: Task) -> NewTask {
    NewTask {
        name: task.name,
        description: task.description,
        rating: task.rating,
        active: task.active,
        once: task.once,
        task_type: task.task_type,
    }
}

pub fn export_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}_tasks.json", date.format("%Y_%m_%d")))
}

/// Writes the whole catalog to a dated file in `dir` and returns its path.
#[instrument(level = "info", skip(store))]
pub async fn export_file<S>(store: &S, dir: &Path, date: NaiveDate) -> Result<PathBuf, CatalogFileError>
where
    S: TaskCatalogStore + ?Sized,
{
    let rows: Vec<NewTask> = store.all_tasks().await?.into_iter().map(as_row).collect();
    let json = serde_json::to_string_pretty(&rows)?;
    tokio::fs::create_dir_all(dir).await?;
    let path = export_path(dir, date);
    tokio::fs::write(&path, json).await?;
    info!(target = "catalog", tasks = rows.len(), path = %path.display(), "catalog exported");
    Ok(path)
}
