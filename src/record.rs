//! Dynamic record rows.

use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A row held as an insertion-ordered map of field name to [`Value`].
///
/// The engine itself is generic over any row type; `Record` is the ready-made
/// choice for rows that arrive as JSON objects.
///
/// # Examples
///
/// ```
/// use tablestate::{Record, Value};
///
/// let row = Record::new().set("id", 1).set("name", "Ann").set("score", 10);
/// assert_eq!(row.get("name"), Some(&Value::from("Ann")));
/// assert_eq!(row.id_or_index(5), "1");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field assignment.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Field value, or `Value::Null` when the field is missing.
    pub fn value(&self, field: &str) -> Value {
        self.fields.get(field).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Row identifier: the `id` field when present and non-blank, otherwise
    /// the row's position.
    pub fn id_or_index(&self, index: usize) -> String {
        match self.fields.get("id") {
            Some(id) if !id.is_blank() => id.to_string(),
            _ => index.to_string(),
        }
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Record {
            fields: iter.into_iter().collect(),
        }
    }
}
