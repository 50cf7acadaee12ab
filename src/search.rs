//! Free-text search across columns.

use crate::column::{Column, Schema};
use crate::value::DataType;
use log::debug;

/// Columns a search runs over.
///
/// With no explicit `fields`, every text-typed column is searched. Unknown
/// field ids are skipped.
pub fn search_columns<'s, R>(schema: &'s Schema<R>, fields: &[String]) -> Vec<&'s Column<R>> {
    if fields.is_empty() {
        return default_search_columns(schema);
    }
    fields
        .iter()
        .filter_map(|field| {
            let column = schema.get(field);
            if column.is_none() {
                debug!("Ignoring unknown search field '{}'", field);
            }
            column
        })
        .collect()
}

/// Every column whose declared data type is text.
pub fn default_search_columns<R>(schema: &Schema<R>) -> Vec<&Column<R>> {
    schema
        .iter()
        .filter(|c| c.get_data_type() == DataType::Text)
        .collect()
}

/// Keeps the indices whose rows contain `term` in any of `columns`.
///
/// An empty term leaves `indices` untouched.
pub fn search_indices<R>(
    rows: &[R],
    indices: &mut Vec<usize>,
    term: &str,
    columns: &[&Column<R>],
    case_sensitive: bool,
) {
    if term.is_empty() {
        return;
    }
    let needle = if case_sensitive {
        term.to_string()
    } else {
        term.to_lowercase()
    };
    indices.retain(|&i| {
        columns.iter().any(|column| {
            let text = column.value(&rows[i]).to_string();
            if case_sensitive {
                text.contains(&needle)
            } else {
                text.to_lowercase().contains(&needle)
            }
        })
    });
}

/// Searches a row slice, returning references to matching rows in order.
pub fn search<'a, R>(
    rows: &'a [R],
    term: &str,
    fields: &[String],
    schema: &Schema<R>,
    case_sensitive: bool,
) -> Vec<&'a R> {
    let columns = search_columns(schema, fields);
    let mut indices: Vec<usize> = (0..rows.len()).collect();
    search_indices(rows, &mut indices, term, &columns, case_sensitive);
    indices.into_iter().map(|i| &rows[i]).collect()
}
