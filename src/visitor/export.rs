//! Visit log export documents

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::visitor::models::LogEntry;

pub const EXPORT_FILE_PREFIX: &str = "visitor-logs-";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub exported_at: String,
    /// Stored stats object as found, `{}` when none
    pub stats: Map<String, Value>,
    pub logs: Vec<LogEntry>,
}

impl ExportDocument {
    pub fn new(exported_at: DateTime<Utc>, stats: Map<String, Value>, logs: Vec<LogEntry>) -> Self {
        Self {
            exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            stats,
            logs,
        }
    }

    /// UTC calendar day of the export, falling back to today for foreign documents
    pub fn export_date(&self) -> NaiveDate {
        DateTime::parse_from_rfc3339(&self.exported_at)
            .map(|at| at.with_timezone(&Utc).date_naive())
            .unwrap_or_else(|_| Utc::now().date_naive())
    }
}

/// `visitor-logs-YYYY-MM-DD.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{}{}.json", EXPORT_FILE_PREFIX, date.format("%Y-%m-%d"))
}

/// Write `document` as pretty-printed JSON into `dir`, returning the file path
pub async fn write_export(document: &ExportDocument, dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let path = dir.join(export_file_name(document.export_date()));
    let body = serde_json::to_string_pretty(document)?;

    tokio::fs::write(&path, body)
        .await
        .with_context(|| format!("Failed to write export file {}", path.display()))?;

    Ok(path)
}
