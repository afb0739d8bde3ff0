//! Read-only export projections
//!
//! JSON mirrors the on-disk document shape; CSV flattens each task into a
//! row with `tags` comma-joined. Quoting follows RFC 4180: a field
//! containing a comma, quote, or newline is wrapped in double quotes with
//! inner quotes doubled.

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::task::Task;

/// CSV column order, matching the task field order in the JSON document
const CSV_HEADER: [&str; 9] = [
    "id",
    "title",
    "done",
    "tags",
    "priority",
    "due_date",
    "note",
    "created_at",
    "completed_at",
];

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(Error::InvalidArgument(format!(
                "invalid format '{}': must be json or csv",
                s
            ))),
        }
    }
}

/// Render tasks as a pretty-printed JSON array
pub fn to_json(tasks: &[Task]) -> Result<String> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// Render tasks as CSV with a header row
pub fn to_csv(tasks: &[Task]) -> String {
    let mut out = String::new();
    out.push_str(&CSV_HEADER.join(","));
    out.push('\n');

    for task in tasks {
        let fields = [
            task.id.to_string(),
            task.title.clone(),
            task.done.to_string(),
            task.tags.join(","),
            task.priority.as_str().to_string(),
            task.due_date.clone().unwrap_or_default(),
            task.note.clone().unwrap_or_default(),
            task.created_at.to_rfc3339(),
            task.completed_at
                .map(|ts| ts.to_rfc3339())
                .unwrap_or_default(),
        ];

        let row: Vec<String> = fields.iter().map(|field| csv_field(field)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

fn csv_field(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
