//! Per-column filters.
//!
//! A filter map holds at most one [`FilterSpec`] per column id. A row passes
//! when it satisfies every active spec. Specs without a value are inactive
//! and pass everything. Specs that name an unknown column, a non-filterable
//! column, or a type the column does not accept are skipped.

use crate::column::{Column, Schema};
use crate::value::Value;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Filter family declared by a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterType {
    #[default]
    Text,
    Number,
    Date,
    Select,
    Range,
}

impl FilterType {
    /// Whether a column declaring `self` accepts a spec of type `spec`.
    pub fn accepts(&self, spec: FilterType) -> bool {
        use FilterType::*;
        matches!(
            (self, spec),
            (Text, Text)
                | (Select, Select)
                | (Select, Text)
                | (Number, Number)
                | (Number, Range)
                | (Range, Range)
                | (Range, Number)
                | (Date, Date)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextOperator {
    Equals,
    #[default]
    Contains,
    StartsWith,
    EndsWith,
}

/// Operators shared by number and date filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompareOperator {
    #[default]
    Equals,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOperator {
    fn test(&self, ordering: Ordering) -> bool {
        match self {
            CompareOperator::Equals => ordering == Ordering::Equal,
            CompareOperator::Gt => ordering == Ordering::Greater,
            CompareOperator::Gte => ordering != Ordering::Less,
            CompareOperator::Lt => ordering == Ordering::Less,
            CompareOperator::Lte => ordering != Ordering::Greater,
        }
    }
}

/// Select filter operand: one exact value or membership in a set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectValue {
    AnyOf(Vec<Value>),
    One(Value),
}

/// A filter on one column, tagged by filter type.
///
/// # Examples
///
/// ```
/// use tablestate::{CompareOperator, FilterSpec};
///
/// let spec: FilterSpec =
///     serde_json::from_str(r#"{"type":"number","operator":"gte","value":10}"#).unwrap();
/// assert_eq!(spec, FilterSpec::number(CompareOperator::Gte, 10.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FilterSpec {
    Text {
        #[serde(default)]
        operator: TextOperator,
        #[serde(default)]
        value: Option<String>,
    },
    Number {
        #[serde(default)]
        operator: CompareOperator,
        #[serde(default)]
        value: Option<f64>,
    },
    Date {
        #[serde(default)]
        operator: CompareOperator,
        #[serde(default)]
        value: Option<DateTime<Utc>>,
    },
    Select {
        value: SelectValue,
    },
    Range {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
}

impl FilterSpec {
    pub fn text(operator: TextOperator, value: impl Into<String>) -> Self {
        FilterSpec::Text {
            operator,
            value: Some(value.into()),
        }
    }

    pub fn number(operator: CompareOperator, value: f64) -> Self {
        FilterSpec::Number {
            operator,
            value: Some(value),
        }
    }

    pub fn date(operator: CompareOperator, value: DateTime<Utc>) -> Self {
        FilterSpec::Date {
            operator,
            value: Some(value),
        }
    }

    pub fn select(value: impl Into<Value>) -> Self {
        FilterSpec::Select {
            value: SelectValue::One(value.into()),
        }
    }

    pub fn any_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        FilterSpec::Select {
            value: SelectValue::AnyOf(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        FilterSpec::Range { min, max }
    }

    pub fn filter_type(&self) -> FilterType {
        match self {
            FilterSpec::Text { .. } => FilterType::Text,
            FilterSpec::Number { .. } => FilterType::Number,
            FilterSpec::Date { .. } => FilterType::Date,
            FilterSpec::Select { .. } => FilterType::Select,
            FilterSpec::Range { .. } => FilterType::Range,
        }
    }

    /// False when the spec carries no value and therefore filters nothing.
    pub fn is_active(&self) -> bool {
        match self {
            FilterSpec::Text { value, .. } => value.as_deref().is_some_and(|v| !v.is_empty()),
            FilterSpec::Number { value, .. } => value.is_some(),
            FilterSpec::Date { value, .. } => value.is_some(),
            FilterSpec::Select { value } => match value {
                SelectValue::One(v) => !v.is_blank(),
                SelectValue::AnyOf(values) => !values.is_empty(),
            },
            FilterSpec::Range { min, max } => min.is_some() || max.is_some(),
        }
    }

    /// Tests one cell value against this spec.
    pub fn matches(&self, cell: &Value, options: &FilterOptions) -> bool {
        match self {
            FilterSpec::Text { operator, value } => match value.as_deref() {
                Some(needle) if !needle.is_empty() => {
                    text_matches(&cell.to_string(), needle, *operator, options.case_sensitive)
                }
                _ => true,
            },
            FilterSpec::Number { operator, value } => match value {
                Some(target) => cell
                    .to_number()
                    .and_then(|n| n.partial_cmp(target))
                    .is_some_and(|ord| operator.test(ord)),
                None => true,
            },
            FilterSpec::Date { operator, value } => match value {
                Some(target) => cell.to_date().is_some_and(|d| match operator {
                    CompareOperator::Equals => d.date_naive() == target.date_naive(),
                    op => op.test(d.cmp(target)),
                }),
                None => true,
            },
            FilterSpec::Select { value } => match value {
                SelectValue::One(v) if v.is_blank() => true,
                SelectValue::One(v) => select_matches(cell, v),
                SelectValue::AnyOf(values) if values.is_empty() => true,
                SelectValue::AnyOf(values) => values.iter().any(|v| select_matches(cell, v)),
            },
            FilterSpec::Range { min, max } => {
                if min.is_none() && max.is_none() {
                    return true;
                }
                match cell.to_number() {
                    Some(n) => {
                        min.map_or(true, |lo| n >= lo) && max.map_or(true, |hi| n <= hi)
                    }
                    None => false,
                }
            }
        }
    }
}

/// Filter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterOptions {
    pub case_sensitive: bool,
}

fn text_matches(haystack: &str, needle: &str, operator: TextOperator, case_sensitive: bool) -> bool {
    let (haystack, needle) = if case_sensitive {
        (haystack.to_string(), needle.to_string())
    } else {
        (haystack.to_lowercase(), needle.to_lowercase())
    };
    match operator {
        TextOperator::Equals => haystack == needle,
        TextOperator::Contains => haystack.contains(&needle),
        TextOperator::StartsWith => haystack.starts_with(&needle),
        TextOperator::EndsWith => haystack.ends_with(&needle),
    }
}

fn select_matches(cell: &Value, option: &Value) -> bool {
    if cell == option {
        return true;
    }
    if let (Some(a), Some(b)) = (cell.as_f64(), option.as_f64()) {
        return a == b;
    }
    !cell.is_null() && cell.to_string() == option.to_string()
}

/// Pairs each usable, active spec with its column.
fn resolve_specs<'s, 'f, R>(
    specs: &'f IndexMap<String, FilterSpec>,
    schema: &'s Schema<R>,
) -> Vec<(&'s Column<R>, &'f FilterSpec)> {
    specs
        .iter()
        .filter(|(_, spec)| spec.is_active())
        .filter_map(|(column_id, spec)| {
            let Some(column) = schema.get(column_id) else {
                debug!("Ignoring filter on unknown column '{}'", column_id);
                return None;
            };
            if !column.is_filterable() {
                debug!("Ignoring filter on non-filterable column '{}'", column_id);
                return None;
            }
            if !column.get_filter_type().accepts(spec.filter_type()) {
                debug!(
                    "Ignoring {:?} filter on column '{}' declared as {:?}",
                    spec.filter_type(),
                    column_id,
                    column.get_filter_type()
                );
                return None;
            }
            Some((column, spec))
        })
        .collect()
}

/// Keeps the indices whose rows satisfy every usable spec.
pub fn filter_indices<R>(
    rows: &[R],
    indices: &mut Vec<usize>,
    specs: &IndexMap<String, FilterSpec>,
    schema: &Schema<R>,
    options: &FilterOptions,
) {
    let resolved = resolve_specs(specs, schema);
    if resolved.is_empty() {
        return;
    }
    indices.retain(|&i| {
        resolved
            .iter()
            .all(|(column, spec)| spec.matches(&column.value(&rows[i]), options))
    });
}

/// Filters a row slice, returning references to the passing rows in order.
pub fn filter<'a, R>(
    rows: &'a [R],
    specs: &IndexMap<String, FilterSpec>,
    schema: &Schema<R>,
    options: &FilterOptions,
) -> Vec<&'a R> {
    let mut indices: Vec<usize> = (0..rows.len()).collect();
    filter_indices(rows, &mut indices, specs, schema, options);
    indices.into_iter().map(|i| &rows[i]).collect()
}

/// True when any spec in the map would filter something.
pub fn has_active_filters(specs: &IndexMap<String, FilterSpec>) -> bool {
    specs.values().any(FilterSpec::is_active)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::value::{parse_date, DataType};

    fn schema() -> Schema<Record> {
        Schema::new(vec![
            Column::field("name", "Name"),
            Column::field("score", "Score").data_type(DataType::Number),
            Column::field("position", "Position").filter_type(FilterType::Select),
            Column::field("joined", "Joined").data_type(DataType::Date),
            Column::field("age", "Age").data_type(DataType::Number).filter_type(FilterType::Range),
            Column::field("notes", "Notes").filterable(false),
        ])
        .unwrap()
    }

    fn rows() -> Vec<Record> {
        vec![
            Record::new()
                .set("name", "Ann")
                .set("score", 10)
                .set("position", "GK")
                .set("joined", "2023-05-01")
                .set("age", 21),
            Record::new()
                .set("name", "Bo")
                .set("score", 10)
                .set("position", "DF")
                .set("joined", parse_date("2024-01-15T09:00:00Z"))
                .set("age", 30),
            Record::new()
                .set("name", "Cy")
                .set("score", 5)
                .set("position", "FW")
                .set("joined", Value::Null)
                .set("age", "27"),
        ]
    }

    fn run(specs: &[(&str, FilterSpec)]) -> Vec<String> {
        let rows = rows();
        let map: IndexMap<String, FilterSpec> =
            specs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        filter(&rows, &map, &schema(), &FilterOptions::default())
            .iter()
            .map(|r| r.value("name").to_string())
            .collect()
    }

    #[test]
    fn test_number_gte() {
        assert_eq!(
            run(&[("score", FilterSpec::number(CompareOperator::Gte, 10.0))]),
            vec!["Ann", "Bo"]
        );
        assert_eq!(run(&[("score", FilterSpec::number(CompareOperator::Lt, 10.0))]), vec!["Cy"]);
        assert_eq!(
            run(&[("score", FilterSpec::number(CompareOperator::Equals, 5.0))]),
            vec!["Cy"]
        );
    }

    #[test]
    fn test_text_operators_case_insensitive() {
        assert_eq!(run(&[("name", FilterSpec::text(TextOperator::Contains, "O"))]), vec!["Bo"]);
        assert_eq!(run(&[("name", FilterSpec::text(TextOperator::Equals, "ann"))]), vec!["Ann"]);
        assert_eq!(run(&[("name", FilterSpec::text(TextOperator::StartsWith, "c"))]), vec!["Cy"]);
        assert_eq!(
            run(&[("name", FilterSpec::text(TextOperator::EndsWith, "N"))]),
            vec!["Ann"]
        );
    }

    #[test]
    fn test_text_case_sensitive() {
        let rows = rows();
        let mut map = IndexMap::new();
        map.insert("name".to_string(), FilterSpec::text(TextOperator::Contains, "ann"));
        let options = FilterOptions { case_sensitive: true };
        assert!(filter(&rows, &map, &schema(), &options).is_empty());
    }

    #[test]
    fn test_select_one_and_any_of() {
        assert_eq!(run(&[("position", FilterSpec::select("DF"))]), vec!["Bo"]);
        assert_eq!(
            run(&[("position", FilterSpec::any_of(["GK", "FW"]))]),
            vec!["Ann", "Cy"]
        );
    }

    #[test]
    fn test_select_matches_stringified() {
        assert!(select_matches(&Value::Int(10), &Value::from("10")));
        assert!(select_matches(&Value::Int(10), &Value::Float(10.0)));
        assert!(!select_matches(&Value::Null, &Value::from("x")));
    }

    #[test]
    fn test_date_operators() {
        let day = parse_date("2024-01-15").unwrap();
        assert_eq!(run(&[("joined", FilterSpec::date(CompareOperator::Equals, day))]), vec!["Bo"]);
        assert_eq!(run(&[("joined", FilterSpec::date(CompareOperator::Lt, day))]), vec!["Ann"]);
        // The null date never matches an active date filter
        assert_eq!(
            run(&[("joined", FilterSpec::date(CompareOperator::Gte, parse_date("2000-01-01").unwrap()))]),
            vec!["Ann", "Bo"]
        );
    }

    #[test]
    fn test_range_open_ended() {
        assert_eq!(run(&[("age", FilterSpec::range(Some(25.0), None))]), vec!["Bo", "Cy"]);
        assert_eq!(run(&[("age", FilterSpec::range(None, Some(27.0)))]), vec!["Ann", "Cy"]);
        assert_eq!(run(&[("age", FilterSpec::range(Some(21.0), Some(21.0)))]), vec!["Ann"]);
    }

    #[test]
    fn test_inactive_specs_pass_everything() {
        let all = vec!["Ann", "Bo", "Cy"];
        assert_eq!(run(&[("name", FilterSpec::text(TextOperator::Contains, ""))]), all);
        assert_eq!(
            run(&[("score", FilterSpec::Number { operator: CompareOperator::Gt, value: None })]),
            all
        );
        assert_eq!(run(&[("age", FilterSpec::range(None, None))]), all);
        assert_eq!(run(&[("position", FilterSpec::any_of(Vec::<String>::new()))]), all);
    }

    #[test]
    fn test_malformed_specs_ignored() {
        let all = vec!["Ann", "Bo", "Cy"];
        // Unknown column
        assert_eq!(run(&[("team", FilterSpec::text(TextOperator::Equals, "x"))]), all);
        // Non-filterable column
        assert_eq!(run(&[("notes", FilterSpec::text(TextOperator::Equals, "x"))]), all);
        // Type the column does not accept
        assert_eq!(run(&[("name", FilterSpec::number(CompareOperator::Gt, 1.0))]), all);
    }

    #[test]
    fn test_and_across_columns() {
        assert_eq!(
            run(&[
                ("score", FilterSpec::number(CompareOperator::Gte, 10.0)),
                ("position", FilterSpec::select("GK")),
            ]),
            vec!["Ann"]
        );
    }

    #[test]
    fn test_spec_serde() {
        let spec: FilterSpec = serde_json::from_str(r#"{"type":"range","min":18}"#).unwrap();
        assert_eq!(spec, FilterSpec::range(Some(18.0), None));

        let spec: FilterSpec =
            serde_json::from_str(r#"{"type":"select","value":["GK","DF"]}"#).unwrap();
        assert_eq!(spec, FilterSpec::any_of(["GK", "DF"]));

        let spec: FilterSpec =
            serde_json::from_str(r#"{"type":"text","operator":"startsWith","value":"A"}"#).unwrap();
        assert_eq!(spec, FilterSpec::text(TextOperator::StartsWith, "A"));
    }
}
