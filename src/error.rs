//! Error types for schema construction, export and state persistence.

/// Errors raised by schema construction, parsing and export.
///
/// Nothing in the search → filter → sort pipeline produces one of these:
/// malformed sort or filter input is skipped instead.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Two columns in one schema share an id.
    #[error("Duplicate column id '{0}' in schema")]
    DuplicateColumn(String),

    /// A column was declared with an empty id.
    #[error("Column labelled '{label}' has an empty id")]
    EmptyColumnId { label: String },

    /// An export format name was not recognised.
    #[error("Unknown export format: '{0}'. Use 'csv' or 'json'")]
    UnknownFormat(String),

    /// A `column:direction` sort string could not be parsed.
    #[error("Invalid sort criterion: '{0}'")]
    InvalidSort(String),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Export produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TableError {
    /// Creates an empty column id error.
    pub fn empty_column_id(label: impl Into<String>) -> Self {
        Self::EmptyColumnId {
            label: label.into(),
        }
    }
}

/// Errors raised by a [`StateStore`](crate::persist::StateStore) write.
///
/// These never leave the crate's own state managers; they are logged and
/// dropped there.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("State store is read-only")]
    ReadOnly,

    #[error("Failed to write '{key}': {message}")]
    Write { key: String, message: String },
}

impl StoreError {
    pub fn write(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            key: key.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TableError::DuplicateColumn("name".to_string()).to_string(),
            "Duplicate column id 'name' in schema"
        );
        assert_eq!(
            TableError::empty_column_id("Score").to_string(),
            "Column labelled 'Score' has an empty id"
        );
        assert_eq!(
            StoreError::write("expanded", "quota exceeded").to_string(),
            "Failed to write 'expanded': quota exceeded"
        );
    }
}
