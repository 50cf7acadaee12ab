//! Column schema.
//!
//! A `Column` is static metadata: an id, a display label, an accessor that
//! pulls a [`Value`] out of a row, and the flags that drive sorting,
//! filtering, search, visibility, export and responsive disclosure. A
//! `Schema` is an ordered list of columns with unique ids.

use crate::error::{Result, TableError};
use crate::filter::FilterType;
use crate::record::Record;
use crate::responsive::ResponsivePriority;
use crate::value::{DataType, Value};
use std::collections::HashSet;
use std::fmt::Debug;
use std::rc::Rc;

/// Extracts a cell value from a row.
pub type Accessor<R> = Rc<dyn Fn(&R) -> Value>;

/// Static description of one column.
///
/// # Examples
///
/// ```
/// use tablestate::{Column, DataType, Record, ResponsivePriority, Value};
///
/// let score = Column::field("score", "Score")
///     .data_type(DataType::Number)
///     .responsive_priority(ResponsivePriority::High);
///
/// let row = Record::new().set("score", 10);
/// assert_eq!(score.value(&row), Value::Int(10));
/// assert!(score.is_sortable());
/// ```
pub struct Column<R> {
    id: String,
    label: String,
    accessor: Accessor<R>,
    data_type: DataType,
    sortable: bool,
    filterable: bool,
    filter_type: FilterType,
    responsive_priority: Option<ResponsivePriority>,
    visible_by_default: bool,
    exportable: bool,
}

impl<R> Column<R> {
    pub fn new<F>(id: impl Into<String>, label: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> Value + 'static,
    {
        Column {
            id: id.into(),
            label: label.into(),
            accessor: Rc::new(accessor),
            data_type: DataType::Text,
            sortable: true,
            filterable: true,
            filter_type: FilterType::Text,
            responsive_priority: None,
            visible_by_default: true,
            exportable: true,
        }
    }

    /// Sets the value type. Also resets the filter type to the one that
    /// matches it; call [`Column::filter_type`] afterwards to override.
    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self.filter_type = match data_type {
            DataType::Number => FilterType::Number,
            DataType::Date => FilterType::Date,
            DataType::Boolean => FilterType::Select,
            DataType::Text | DataType::Other => FilterType::Text,
        };
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn filter_type(mut self, filter_type: FilterType) -> Self {
        self.filter_type = filter_type;
        self
    }

    pub fn responsive_priority(mut self, priority: ResponsivePriority) -> Self {
        self.responsive_priority = Some(priority);
        self
    }

    pub fn visible_by_default(mut self, visible: bool) -> Self {
        self.visible_by_default = visible;
        self
    }

    pub fn exportable(mut self, exportable: bool) -> Self {
        self.exportable = exportable;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Runs the accessor against a row.
    pub fn value(&self, row: &R) -> Value {
        (self.accessor)(row)
    }

    pub fn get_data_type(&self) -> DataType {
        self.data_type
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn is_filterable(&self) -> bool {
        self.filterable
    }

    pub fn get_filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// Effective responsive tier; unset columns count as medium.
    pub fn get_responsive_priority(&self) -> ResponsivePriority {
        self.responsive_priority.unwrap_or_default()
    }

    /// The tier exactly as declared.
    pub fn declared_priority(&self) -> Option<ResponsivePriority> {
        self.responsive_priority
    }

    pub fn is_visible_by_default(&self) -> bool {
        self.visible_by_default
    }

    pub fn is_exportable(&self) -> bool {
        self.exportable
    }
}

impl Column<Record> {
    /// Column reading the field of the same name from a [`Record`].
    pub fn field(id: impl Into<String>, label: impl Into<String>) -> Self {
        let id = id.into();
        let key = id.clone();
        Column::new(id, label, move |row: &Record| row.value(&key))
    }
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Column {
            id: self.id.clone(),
            label: self.label.clone(),
            accessor: Rc::clone(&self.accessor),
            data_type: self.data_type,
            sortable: self.sortable,
            filterable: self.filterable,
            filter_type: self.filter_type,
            responsive_priority: self.responsive_priority,
            visible_by_default: self.visible_by_default,
            exportable: self.exportable,
        }
    }
}

impl<R> Debug for Column<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("data_type", &self.data_type)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("filter_type", &self.filter_type)
            .field("responsive_priority", &self.responsive_priority)
            .field("visible_by_default", &self.visible_by_default)
            .field("exportable", &self.exportable)
            .finish_non_exhaustive()
    }
}

/// Ordered column list with unique ids.
///
/// # Examples
///
/// ```
/// use tablestate::{Column, Schema};
///
/// let schema = Schema::new(vec![
///     Column::field("id", "ID"),
///     Column::field("name", "Name"),
/// ]).unwrap();
///
/// assert_eq!(schema.len(), 2);
/// assert_eq!(schema.get_column_index("name"), Some(1));
///
/// // Duplicate ids are rejected up front
/// assert!(Schema::new(vec![Column::field("id", "ID"), Column::field("id", "Id")]).is_err());
/// ```
pub struct Schema<R> {
    columns: Vec<Column<R>>,
}

impl<R> Schema<R> {
    /// Validates and wraps a column list.
    ///
    /// Fails on empty ids and on duplicate ids.
    pub fn new(columns: Vec<Column<R>>) -> Result<Self> {
        {
            let mut seen = HashSet::with_capacity(columns.len());
            for column in &columns {
                if column.id.is_empty() {
                    return Err(TableError::empty_column_id(column.label.as_str()));
                }
                if !seen.insert(column.id.as_str()) {
                    return Err(TableError::DuplicateColumn(column.id.clone()));
                }
            }
        }
        Ok(Schema { columns })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column<R>> {
        self.columns.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Column<R>> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn get_column_index(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    pub fn get_column_ids(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.id.as_str()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}

impl<R> Clone for Schema<R> {
    fn clone(&self) -> Self {
        Schema {
            columns: self.columns.clone(),
        }
    }
}

impl<R> Debug for Schema<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.columns.iter()).finish()
    }
}

impl<'a, R> IntoIterator for &'a Schema<R> {
    type Item = &'a Column<R>;
    type IntoIter = std::slice::Iter<'a, Column<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
