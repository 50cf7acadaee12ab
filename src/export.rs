//! CSV and JSON export of processed rows.
//!
//! Export only produces text. Getting it to the user (download, clipboard,
//! upload) belongs to the caller.

use crate::column::Column;
use crate::error::{Result, TableError};
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = TableError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(TableError::UnknownFormat(s.to_string())),
        }
    }
}

/// A named export ready to hand to whatever delivers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportPayload {
    pub filename: String,
    pub format: ExportFormat,
    pub content: String,
}

impl ExportPayload {
    pub fn new(filename: &str, format: ExportFormat, content: String) -> Self {
        ExportPayload {
            filename: export_filename(filename, format),
            format,
            content,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }
}

/// Appends the format's extension unless `name` already ends with it.
/// A blank name becomes `export`.
pub fn export_filename(name: &str, format: ExportFormat) -> String {
    let name = name.trim();
    let name = if name.is_empty() { "export" } else { name };
    let suffix = format!(".{}", format.extension());
    if name.to_lowercase().ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{}{}", name, suffix)
    }
}

/// Renders rows as CSV: a header of column labels, then one record per row.
///
/// Cells are the stringified accessor values. Fields containing a comma, a
/// double quote or a line break are quoted, with inner quotes doubled.
pub fn to_csv<R>(rows: &[&R], columns: &[&Column<R>]) -> Result<String> {
    if columns.is_empty() {
        return Ok(String::new());
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(|c| c.label()))?;
    for row in rows {
        let cells: Vec<String> = columns.iter().map(|c| c.value(row).to_string()).collect();
        writer.write_record(&cells)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| TableError::Csv(csv::Error::from(err.into_error())))?;
    Ok(String::from_utf8(bytes)?)
}

/// Renders rows as a pretty-printed JSON array of objects keyed by column id.
///
/// Values keep their types.
pub fn to_json<R>(rows: &[&R], columns: &[&Column<R>]) -> Result<String> {
    let objects: Vec<JsonMap<String, JsonValue>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| {
                    let value = serde_json::to_value(c.value(row)).unwrap_or(JsonValue::Null);
                    (c.id().to_string(), value)
                })
                .collect()
        })
        .collect();
    Ok(serde_json::to_string_pretty(&objects)?)
}

pub fn export<R>(rows: &[&R], columns: &[&Column<R>], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Csv => to_csv(rows, columns),
        ExportFormat::Json => to_json(rows, columns),
    }
}
