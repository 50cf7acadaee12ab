//! Table state.
//!
//! `TableState` owns the rows, the schema and the view state (sorting,
//! filters, search term, hidden columns) of one table. Every mutator
//! recomputes the processed index by running search, then filter, then sort
//! over the raw rows. The caller's rows are never reordered; readers hand out
//! references in processed order.
//!
//! # Examples
//!
//! ```
//! use tablestate::{
//!     Column, CompareOperator, DataType, FilterSpec, Record, Schema, TableOptions, TableState,
//! };
//!
//! let rows = vec![
//!     Record::new().set("id", 1).set("name", "Ann").set("score", 10),
//!     Record::new().set("id", 2).set("name", "Bo").set("score", 10),
//!     Record::new().set("id", 3).set("name", "Cy").set("score", 5),
//! ];
//! let schema = Schema::new(vec![
//!     Column::field("id", "ID").data_type(DataType::Number),
//!     Column::field("name", "Name"),
//!     Column::field("score", "Score").data_type(DataType::Number),
//! ])
//! .unwrap();
//!
//! let mut table = TableState::new(rows, schema, TableOptions::default());
//! table.add_sort("score", true);
//! table.add_sort("name", false);
//! table.update_filter("score", FilterSpec::number(CompareOperator::Gte, 10.0));
//!
//! let names: Vec<String> = table.data().iter().map(|r| r.value("name").to_string()).collect();
//! assert_eq!(names, vec!["Ann", "Bo"]);
//! assert_eq!(table.total_rows(), 3);
//! assert_eq!(table.filtered_rows(), 2);
//! assert!(table.is_filtered());
//! ```

use crate::column::{Column, Schema};
use crate::error::Result;
use crate::expansion::{deserialize_ids, serialize_ids};
use crate::export::{export, ExportFormat, ExportPayload};
use crate::filter::{filter_indices, has_active_filters, FilterOptions, FilterSpec};
use crate::persist::{QueryParams, StateStore};
use crate::record::Record;
use crate::search::{search_columns, search_indices};
use crate::sort::{self, format_sorting, parse_sorting, sort_indices, SortCriterion};
use crate::view::ProcessedView;
use crate::visibility::ColumnVisibility;
use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::rc::Rc;

/// Query key for the sort list.
pub const SORT_KEY: &str = "sort";
/// Query key for the search term.
pub const SEARCH_KEY: &str = "q";
/// Query key for the hidden-column list.
pub const HIDDEN_KEY: &str = "hidden";

/// Row identifier function: row and its position in the raw rows.
pub type RowIdFn<R> = Rc<dyn Fn(&R, usize) -> String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableOptions {
    pub enable_multi_sort: bool,
    pub enable_filtering: bool,
    pub enable_search: bool,
    pub enable_column_visibility: bool,
    /// Columns searched; empty means every text column.
    pub search_fields: Vec<String>,
    pub case_sensitive_search: bool,
    pub case_sensitive_filters: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions {
            enable_multi_sort: true,
            enable_filtering: true,
            enable_search: true,
            enable_column_visibility: true,
            search_fields: Vec::new(),
            case_sensitive_search: false,
            case_sensitive_filters: false,
        }
    }
}

pub struct TableState<R> {
    rows: Vec<R>,
    schema: Schema<R>,
    options: TableOptions,
    row_id: RowIdFn<R>,
    sorting: Vec<SortCriterion>,
    filters: IndexMap<String, FilterSpec>,
    search_term: String,
    visibility: ColumnVisibility,
    /// Positions into `rows`, in processed order.
    processed: Vec<usize>,
}

impl<R> TableState<R> {
    pub fn new(rows: Vec<R>, schema: Schema<R>, options: TableOptions) -> Self {
        let visibility = ColumnVisibility::new(&schema);
        let mut state = TableState {
            rows,
            schema,
            options,
            row_id: Rc::new(|_: &R, index: usize| index.to_string()),
            sorting: Vec::new(),
            filters: IndexMap::new(),
            search_term: String::new(),
            visibility,
            processed: Vec::new(),
        };
        state.rebuild_index();
        state
    }

    /// Sets the row identifier function. The default is the row's position.
    pub fn with_row_id<F>(mut self, row_id: F) -> Self
    where
        F: Fn(&R, usize) -> String + 'static,
    {
        self.row_id = Rc::new(row_id);
        self
    }

    /// Runs search → filter → sort over the raw rows.
    fn rebuild_index(&mut self) {
        let mut indices: Vec<usize> = (0..self.rows.len()).collect();

        if self.options.enable_search && !self.search_term.is_empty() {
            let columns = search_columns(&self.schema, &self.options.search_fields);
            search_indices(
                &self.rows,
                &mut indices,
                &self.search_term,
                &columns,
                self.options.case_sensitive_search,
            );
        }

        if self.options.enable_filtering {
            let options = FilterOptions {
                case_sensitive: self.options.case_sensitive_filters,
            };
            filter_indices(&self.rows, &mut indices, &self.filters, &self.schema, &options);
        }

        sort_indices(&self.rows, &mut indices, &self.sorting, &self.schema);
        self.processed = indices;
    }

    fn sortable(&self, column_id: &str) -> bool {
        match self.schema.get(column_id) {
            Some(column) if column.is_sortable() => true,
            Some(_) => {
                debug!("Ignoring sort on non-sortable column '{}'", column_id);
                false
            }
            None => {
                debug!("Ignoring sort on unknown column '{}'", column_id);
                false
            }
        }
    }

    // Data

    /// Replaces the raw rows, keeping the view state.
    pub fn update_data(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.rebuild_index();
    }

    /// Raw rows in their original order.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    // Sorting

    pub fn update_sorting(&mut self, mut criteria: Vec<SortCriterion>) {
        if !self.options.enable_multi_sort {
            criteria.truncate(1);
        }
        self.sorting = criteria;
        self.rebuild_index();
    }

    /// Sorts by `column_id`. With multi-sort the column is updated in place
    /// or appended as the lowest-priority key; without it, it replaces the
    /// whole list.
    pub fn add_sort(&mut self, column_id: &str, desc: bool) {
        if !self.sortable(column_id) {
            return;
        }
        let criterion = SortCriterion::new(column_id, desc);
        if !self.options.enable_multi_sort {
            self.sorting = vec![criterion];
        } else if let Some(existing) = self.sorting.iter_mut().find(|c| c.column_id == column_id) {
            existing.direction = criterion.direction;
        } else {
            self.sorting.push(criterion);
        }
        self.rebuild_index();
    }

    pub fn remove_sort(&mut self, column_id: &str) {
        let before = self.sorting.len();
        self.sorting.retain(|c| c.column_id != column_id);
        if self.sorting.len() != before {
            self.rebuild_index();
        }
    }

    pub fn clear_sorting(&mut self) {
        if !self.sorting.is_empty() {
            self.sorting.clear();
            self.rebuild_index();
        }
    }

    /// One header click: asc → desc → none.
    pub fn cycle_sort(&mut self, column_id: &str) {
        if !self.sortable(column_id) {
            return;
        }
        let next = sort::cycle_sort(&self.sorting, column_id, self.options.enable_multi_sort);
        self.update_sorting(next);
    }

    // Filtering

    pub fn update_filter(&mut self, column_id: &str, spec: FilterSpec) {
        self.filters.insert(column_id.to_string(), spec);
        self.rebuild_index();
    }

    pub fn remove_filter(&mut self, column_id: &str) {
        if self.filters.shift_remove(column_id).is_some() {
            self.rebuild_index();
        }
    }

    pub fn clear_filters(&mut self) {
        if !self.filters.is_empty() {
            self.filters.clear();
            self.rebuild_index();
        }
    }

    // Search

    pub fn update_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.rebuild_index();
    }

    pub fn clear_search(&mut self) {
        self.update_search(String::new());
    }

    // Column visibility

    fn visibility_enabled(&self) -> bool {
        if !self.options.enable_column_visibility {
            debug!("Column visibility is disabled; ignoring change");
        }
        self.options.enable_column_visibility
    }

    pub fn toggle_column_visibility(&mut self, column_id: &str) {
        if self.visibility_enabled() {
            self.visibility.toggle(column_id);
        }
    }

    pub fn show_column(&mut self, column_id: &str) {
        if self.visibility_enabled() {
            self.visibility.show(column_id);
        }
    }

    pub fn hide_column(&mut self, column_id: &str) {
        if self.visibility_enabled() {
            self.visibility.hide(column_id);
        }
    }

    pub fn reset_column_visibility(&mut self) {
        if self.visibility_enabled() {
            self.visibility.reset();
        }
    }

    // Readers

    /// Processed rows: searched, filtered and sorted.
    pub fn data(&self) -> Vec<&R> {
        self.processed.iter().map(|&i| &self.rows[i]).collect()
    }

    /// Positions of the processed rows in the raw rows.
    pub fn processed_indices(&self) -> &[usize] {
        &self.processed
    }

    pub fn visible_columns(&self) -> Vec<&Column<R>> {
        if self.options.enable_column_visibility {
            self.visibility.visible_columns(&self.schema)
        } else {
            self.schema.iter().collect()
        }
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn filtered_rows(&self) -> usize {
        self.processed.len()
    }

    /// True when an enabled search or filter stage is active.
    pub fn is_filtered(&self) -> bool {
        let searching = self.options.enable_search && !self.search_term.is_empty();
        let filtering = self.options.enable_filtering && has_active_filters(&self.filters);
        searching || filtering
    }

    pub fn sorting(&self) -> &[SortCriterion] {
        &self.sorting
    }

    pub fn filters(&self) -> &IndexMap<String, FilterSpec> {
        &self.filters
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn hidden_columns(&self) -> &IndexSet<String> {
        self.visibility.hidden()
    }

    pub fn is_column_visible(&self, column_id: &str) -> bool {
        !self.options.enable_column_visibility || self.visibility.is_visible(column_id)
    }

    pub fn view(&self) -> ProcessedView<'_, R> {
        ProcessedView {
            rows: self.data(),
            visible_columns: self.visible_columns(),
            total_rows: self.total_rows(),
            filtered_rows: self.filtered_rows(),
            is_filtered: self.is_filtered(),
        }
    }

    /// Identifiers of the processed rows, in processed order.
    pub fn row_ids(&self) -> Vec<String> {
        self.processed
            .iter()
            .map(|&i| (self.row_id)(&self.rows[i], i))
            .collect()
    }

    pub fn schema(&self) -> &Schema<R> {
        &self.schema
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    // Export

    /// Exports the processed rows over the visible, exportable columns.
    pub fn export_data(&self, format: ExportFormat, filename: &str) -> Result<ExportPayload> {
        let columns: Vec<&Column<R>> = self
            .visible_columns()
            .into_iter()
            .filter(|c| c.is_exportable())
            .collect();
        self.export_with(&columns, format, filename)
    }

    /// Exports the processed rows over an explicit column subset, in the
    /// order given. Unknown and non-exportable ids are skipped.
    pub fn export_columns(
        &self,
        format: ExportFormat,
        filename: &str,
        column_ids: &[&str],
    ) -> Result<ExportPayload> {
        let columns: Vec<&Column<R>> = column_ids
            .iter()
            .filter_map(|id| match self.schema.get(id) {
                Some(column) if column.is_exportable() => Some(column),
                _ => {
                    debug!("Skipping export column '{}'", id);
                    None
                }
            })
            .collect();
        self.export_with(&columns, format, filename)
    }

    fn export_with(
        &self,
        columns: &[&Column<R>],
        format: ExportFormat,
        filename: &str,
    ) -> Result<ExportPayload> {
        let content = export(&self.data(), columns, format)?;
        Ok(ExportPayload::new(filename, format, content))
    }

    // Location round-trip

    /// Writes sort, search and hidden columns into `params`. Empty sort and
    /// search remove their keys; so does the default hidden set. A hidden set
    /// emptied away from its defaults is written as `hidden=`.
    pub fn write_query(&self, params: &mut QueryParams) {
        let sort = (!self.sorting.is_empty()).then(|| format_sorting(&self.sorting));
        let search = (!self.search_term.is_empty()).then(|| self.search_term.clone());
        let hidden = (!self.visibility.is_default()).then(|| {
            serialize_ids(self.visibility.hidden().iter().map(String::as_str)).unwrap_or_default()
        });

        for (key, value) in [(SORT_KEY, sort), (SEARCH_KEY, search), (HIDDEN_KEY, hidden)] {
            if let Err(err) = params.write(key, value.as_deref()) {
                warn!("Could not write '{}' to query: {}", key, err);
            }
        }
    }

    /// Restores state from keys present in `params`; absent keys leave the
    /// matching state alone. Malformed entries are dropped.
    pub fn apply_query(&mut self, params: &QueryParams) {
        if let Some(raw) = params.get(SORT_KEY) {
            let mut criteria = parse_sorting(raw);
            criteria.retain(|c| self.sortable(&c.column_id));
            if !self.options.enable_multi_sort {
                criteria.truncate(1);
            }
            self.sorting = criteria;
        }
        if let Some(term) = params.get(SEARCH_KEY) {
            self.search_term = term.to_string();
        }
        // `hidden=` restores "nothing hidden"
        if let Some(raw) = params.get(HIDDEN_KEY) {
            if self.visibility_enabled() {
                self.visibility.set_hidden(deserialize_ids(Some(raw)));
            }
        }
        self.rebuild_index();
    }
}

impl TableState<Record> {
    /// Identifies rows by their `id` field, falling back to position.
    pub fn with_record_ids(self) -> Self {
        self.with_row_id(|row: &Record, index| row.id_or_index(index))
    }
}

impl<R> Debug for TableState<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableState")
            .field("schema", &self.schema)
            .field("total_rows", &self.rows.len())
            .field("filtered_rows", &self.processed.len())
            .field("sorting", &self.sorting)
            .field("filters", &self.filters)
            .field("search_term", &self.search_term)
            .field("hidden", self.visibility.hidden())
            .finish()
    }
}
