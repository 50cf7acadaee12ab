//! Processed view.
//!
//! A `ProcessedView` is a read-only snapshot of a [`TableState`]: the rows
//! left after search → filter → sort, the visible columns, and the summary
//! counters. It borrows the state, so it is rebuilt rather than updated
//! whenever the state changes.
//!
//! [`TableState`]: crate::table::TableState

use crate::column::Column;
use crate::error::Result;
use crate::export::{export, ExportFormat};
use crate::value::Value;
use std::fmt::Debug;

pub struct ProcessedView<'a, R> {
    pub rows: Vec<&'a R>,
    pub visible_columns: Vec<&'a Column<R>>,
    /// Rows before search and filtering.
    pub total_rows: usize,
    /// Rows after search and filtering.
    pub filtered_rows: usize,
    pub is_filtered: bool,
}

impl<'a, R> ProcessedView<'a, R> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Visible-column values of one processed row.
    pub fn cells(&self, index: usize) -> Option<Vec<Value>> {
        let row = self.rows.get(index)?;
        Some(self.visible_columns.iter().map(|c| c.value(row)).collect())
    }

    /// Value of one visible column in one processed row.
    pub fn get_value(&self, index: usize, column_id: &str) -> Option<Value> {
        let row = self.rows.get(index)?;
        let column = self.visible_columns.iter().find(|c| c.id() == column_id)?;
        Some(column.value(row))
    }

    /// Every processed row projected onto the visible columns.
    pub fn project(&self) -> Vec<Vec<Value>> {
        self.rows
            .iter()
            .map(|row| self.visible_columns.iter().map(|c| c.value(row)).collect())
            .collect()
    }

    /// Exports the view's rows over its visible, exportable columns.
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        let columns: Vec<&Column<R>> = self
            .visible_columns
            .iter()
            .copied()
            .filter(|c| c.is_exportable())
            .collect();
        export(&self.rows, &columns, format)
    }
}

impl<'a, R> Debug for ProcessedView<'a, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ProcessedView {{ rows: {}, columns: {:?}, total: {}, filtered: {}, is_filtered: {} }}",
            self.rows.len(),
            self.visible_columns.iter().map(|c| c.id()).collect::<Vec<_>>(),
            self.total_rows,
            self.filtered_rows,
            self.is_filtered
        )
    }
}
