//! External state stores.
//!
//! View state that should survive a reload or be shareable (expanded rows,
//! sort order, search term) is written to a keyed string store. The usual
//! store is the page's query string, modelled here by [`QueryParams`].

use crate::error::StoreError;
use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;

/// A keyed string store for view state.
pub trait StateStore {
    fn read(&self, key: &str) -> Option<String>;

    /// Writes `value` under `key`, or removes `key` when `value` is `None`.
    fn write(&mut self, key: &str, value: Option<&str>) -> Result<(), StoreError>;
}

impl<S: StateStore + ?Sized> StateStore for &mut S {
    fn read(&self, key: &str) -> Option<String> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: Option<&str>) -> Result<(), StoreError> {
        (**self).write(key, value)
    }
}

/// Ordered query-string parameters (`a=1&b=two`).
///
/// # Examples
///
/// ```
/// use tablestate::QueryParams;
///
/// let mut params = QueryParams::parse("?page=2&q=red%20sox");
/// assert_eq!(params.get("q"), Some("red sox"));
///
/// params.set("expanded", "7,12");
/// assert_eq!(params.to_string(), "page=2&q=red%20sox&expanded=7%2C12");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryParams {
    params: IndexMap<String, String>,
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        // Keep undecodable text as-is; consumers decide what to do with it
        Err(_) => spaced,
    }
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string, with or without the leading `?`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let params = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect();
        QueryParams { params }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.params.shift_remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            let key: Cow<'_, str> = urlencoding::encode(key);
            let value: Cow<'_, str> = urlencoding::encode(value);
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

impl StateStore for QueryParams {
    fn read(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    fn write(&mut self, key: &str, value: Option<&str>) -> Result<(), StoreError> {
        match value {
            Some(value) => self.set(key, value),
            None => {
                self.remove(key);
            }
        }
        Ok(())
    }
}
