//! Multi-key stable sorting.
//!
//! Criteria are applied in list order: the first is the primary key and each
//! later one only breaks ties left by the ones before it. Rows that tie on
//! every criterion keep their original relative order. Null values sort last
//! in both directions; `Desc` reverses the comparison of present values only.

use crate::column::{Column, Schema};
use crate::error::TableError;
use crate::value::Value;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sort direction for one key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (smallest first)
    #[default]
    Asc,
    /// Descending order (largest first)
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn is_desc(&self) -> bool {
        matches!(self, SortDirection::Desc)
    }
}

/// A single sort key specifying a column and direction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortCriterion {
    pub column_id: String,
    pub direction: SortDirection,
}

impl SortCriterion {
    pub fn new(column_id: impl Into<String>, desc: bool) -> Self {
        SortCriterion {
            column_id: column_id.into(),
            direction: if desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            },
        }
    }

    pub fn asc(column_id: impl Into<String>) -> Self {
        Self::new(column_id, false)
    }

    pub fn desc(column_id: impl Into<String>) -> Self {
        Self::new(column_id, true)
    }
}

impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.column_id, self.direction.as_str())
    }
}

/// Parses `column`, `column:asc` or `column:desc`.
impl FromStr for SortCriterion {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (column, direction) = match s.rsplit_once(':') {
            Some((column, "asc")) => (column, SortDirection::Asc),
            Some((column, "desc")) => (column, SortDirection::Desc),
            Some(_) => return Err(TableError::InvalidSort(s.to_string())),
            None => (s, SortDirection::Asc),
        };
        if column.is_empty() {
            return Err(TableError::InvalidSort(s.to_string()));
        }
        Ok(SortCriterion {
            column_id: column.to_string(),
            direction,
        })
    }
}

/// Joins criteria as `a:asc,b:desc`.
pub fn format_sorting(criteria: &[SortCriterion]) -> String {
    criteria
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Inverse of [`format_sorting`]; malformed entries are dropped.
pub fn parse_sorting(s: &str) -> Vec<SortCriterion> {
    s.split(',')
        .filter(|part| !part.trim().is_empty())
        .filter_map(|part| match part.parse::<SortCriterion>() {
            Ok(criterion) => Some(criterion),
            Err(err) => {
                debug!("Dropping sort entry: {}", err);
                None
            }
        })
        .collect()
}

/// Case-folded ordering with a lowercase-first tie-break, the usual shape of
/// locale collation for Latin text.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| b.cmp(a))
}

/// Sort rank of a value's shape. Values of different shapes never compare
/// by content.
fn shape_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Int(_) | Value::Float(_) => 2,
        Value::Date(_) => 3,
        Value::String(_) => 4,
        Value::List(_) => 5,
        Value::Map(_) => 6,
    }
}

/// NaN sorts after every number; `-0.0` and `0.0` tie.
fn compare_floats(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => (a + 0.0).total_cmp(&(b + 0.0)),
    }
}

/// Exact comparison of an integer against a float, without rounding the
/// integer through `f64`.
fn compare_int_float(a: i64, b: f64) -> Ordering {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63
    if b.is_nan() || b >= LIMIT {
        return Ordering::Less;
    }
    if b < -LIMIT {
        return Ordering::Greater;
    }
    let whole = b.trunc();
    a.cmp(&(whole as i64)).then_with(|| compare_floats(0.0, b - whole))
}

/// Compares two non-null values: shape rank first, then content.
fn compare_present(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Float(a), Value::Float(b)) => compare_floats(*a, *b),
        (Value::Int(a), Value::Float(b)) => compare_int_float(*a, *b),
        (Value::Float(a), Value::Int(b)) => compare_int_float(*b, *a).reverse(),
        (Value::Date(a), Value::Date(b)) => a.cmp(b),
        (Value::String(a), Value::String(b)) => locale_cmp(a, b),
        (a, b) => shape_rank(a)
            .cmp(&shape_rank(b))
            .then_with(|| locale_cmp(&a.to_string(), &b.to_string())),
    }
}

/// Compare two values for one sort key. Nulls go last regardless of direction.
pub fn compare_values(a: &Value, b: &Value, direction: SortDirection) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let base_cmp = compare_present(a, b);
            match direction {
                SortDirection::Asc => base_cmp,
                SortDirection::Desc => base_cmp.reverse(),
            }
        }
    }
}

fn resolve_keys<'s, R>(
    criteria: &[SortCriterion],
    schema: &'s Schema<R>,
) -> Vec<(&'s Column<R>, SortDirection)> {
    criteria
        .iter()
        .filter_map(|c| match schema.get(&c.column_id) {
            Some(column) if column.is_sortable() => Some((column, c.direction)),
            Some(_) => {
                debug!("Ignoring sort on non-sortable column '{}'", c.column_id);
                None
            }
            None => {
                debug!("Ignoring sort on unknown column '{}'", c.column_id);
                None
            }
        })
        .collect()
}

/// Reorders `indices` (positions into `rows`) by `criteria`.
///
/// Accessor values are computed once per row before sorting. Criteria naming
/// unknown or non-sortable columns are skipped.
pub fn sort_indices<R>(
    rows: &[R],
    indices: &mut Vec<usize>,
    criteria: &[SortCriterion],
    schema: &Schema<R>,
) {
    let keys = resolve_keys(criteria, schema);
    if keys.is_empty() || indices.len() < 2 {
        return;
    }

    let mut decorated: Vec<(usize, Vec<Value>)> = indices
        .iter()
        .map(|&i| {
            let values = keys.iter().map(|(column, _)| column.value(&rows[i])).collect();
            (i, values)
        })
        .collect();

    // slice::sort_by is stable, so full ties keep their input order
    decorated.sort_by(|(_, a), (_, b)| {
        for (k, (_, direction)) in keys.iter().enumerate() {
            let cmp = compare_values(&a[k], &b[k], *direction);
            if cmp != Ordering::Equal {
                return cmp;
            }
        }
        Ordering::Equal
    });

    *indices = decorated.into_iter().map(|(i, _)| i).collect();
}

/// Sorts a row slice, returning references in sorted order.
pub fn sort<'a, R>(rows: &'a [R], criteria: &[SortCriterion], schema: &Schema<R>) -> Vec<&'a R> {
    let mut indices: Vec<usize> = (0..rows.len()).collect();
    sort_indices(rows, &mut indices, criteria, schema);
    indices.into_iter().map(|i| &rows[i]).collect()
}

/// Current direction of a column in a criteria list.
pub fn direction_of(criteria: &[SortCriterion], column_id: &str) -> Option<SortDirection> {
    criteria
        .iter()
        .find(|c| c.column_id == column_id)
        .map(|c| c.direction)
}

/// One click on a sortable header: none → asc → desc → none.
pub fn next_direction(current: Option<SortDirection>) -> Option<SortDirection> {
    match current {
        None => Some(SortDirection::Asc),
        Some(SortDirection::Asc) => Some(SortDirection::Desc),
        Some(SortDirection::Desc) => None,
    }
}

/// Advances `column_id` one step through asc → desc → none.
///
/// With `multi` the column keeps its place among the other criteria (or is
/// appended when new); without it the result holds at most that one column.
pub fn cycle_sort(criteria: &[SortCriterion], column_id: &str, multi: bool) -> Vec<SortCriterion> {
    let next = next_direction(direction_of(criteria, column_id));

    if !multi {
        return next
            .map(|direction| SortCriterion {
                column_id: column_id.to_string(),
                direction,
            })
            .into_iter()
            .collect();
    }

    let mut result = criteria.to_vec();
    match (result.iter().position(|c| c.column_id == column_id), next) {
        (Some(pos), Some(direction)) => result[pos].direction = direction,
        (Some(pos), None) => {
            result.remove(pos);
        }
        (None, Some(direction)) => result.push(SortCriterion {
            column_id: column_id.to_string(),
            direction,
        }),
        (None, None) => {}
    }
    result
}
