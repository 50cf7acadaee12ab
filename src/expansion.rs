//! Expanded-row state.
//!
//! Each row is either collapsed (initial) or expanded. The expanded set can be
//! mirrored into a [`StateStore`] under one key as a comma-joined list of
//! percent-encoded row ids. An empty set removes the key, so "nothing
//! expanded" and "never touched" look the same from outside.

use crate::persist::{QueryParams, StateStore};
use indexmap::IndexSet;
use log::warn;
use serde::{Deserialize, Serialize};

/// Store key used when none is configured.
pub const EXPANDED_KEY: &str = "expanded";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpansionOptions {
    /// Mirror the set into the store on every change.
    pub persist: bool,
    pub key: String,
    /// Row to expand once when the state is mounted.
    pub auto_expand: Option<String>,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        ExpansionOptions {
            persist: false,
            key: EXPANDED_KEY.to_string(),
            auto_expand: None,
        }
    }
}

impl ExpansionOptions {
    pub fn persisted() -> Self {
        ExpansionOptions {
            persist: true,
            ..Self::default()
        }
    }

    pub fn auto_expand(mut self, row_id: impl Into<String>) -> Self {
        self.auto_expand = Some(row_id.into());
        self
    }
}

/// Encodes ids for the store. `None` for an empty set.
pub fn serialize_ids<'a, I>(ids: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let encoded: Vec<String> = ids
        .into_iter()
        .map(|id| urlencoding::encode(id).into_owned())
        .collect();
    if encoded.is_empty() {
        None
    } else {
        Some(encoded.join(","))
    }
}

/// Decodes a stored id list. Missing or corrupt input yields an empty set.
pub fn deserialize_ids(raw: Option<&str>) -> IndexSet<String> {
    let Some(raw) = raw else {
        return IndexSet::new();
    };
    let mut ids = IndexSet::new();
    for part in raw.split(',').filter(|p| !p.is_empty()) {
        match urlencoding::decode(part) {
            Ok(id) => {
                ids.insert(id.into_owned());
            }
            Err(err) => {
                warn!("Discarding corrupt expansion state '{}': {}", raw, err);
                return IndexSet::new();
            }
        }
    }
    ids
}

/// The set of expanded row ids for one view.
///
/// # Examples
///
/// ```
/// use tablestate::{ExpansionOptions, ExpansionState, QueryParams};
///
/// let location = QueryParams::parse("expanded=3");
/// let mut state = ExpansionState::mount(location, ExpansionOptions::persisted());
/// assert!(state.is_expanded("3"));
///
/// state.toggle("5");
/// assert_eq!(state.store().get("expanded"), Some("3,5"));
///
/// state.collapse_all();
/// assert!(!state.store().contains("expanded"));
/// ```
#[derive(Debug, Clone)]
pub struct ExpansionState<S: StateStore = QueryParams> {
    expanded: IndexSet<String>,
    options: ExpansionOptions,
    store: S,
    auto_expand_applied: bool,
}

impl ExpansionState<QueryParams> {
    /// In-memory state with no persistence.
    pub fn new() -> Self {
        ExpansionState {
            expanded: IndexSet::new(),
            options: ExpansionOptions::default(),
            store: QueryParams::new(),
            auto_expand_applied: false,
        }
    }
}

impl Default for ExpansionState<QueryParams> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateStore> ExpansionState<S> {
    /// Creates the state for a freshly mounted view.
    ///
    /// With persistence on, the set is seeded from the store. Then the
    /// `auto_expand` row, if any, is expanded.
    pub fn mount(store: S, options: ExpansionOptions) -> Self {
        let expanded = if options.persist {
            deserialize_ids(store.read(&options.key).as_deref())
        } else {
            IndexSet::new()
        };
        let mut state = ExpansionState {
            expanded,
            options,
            store,
            auto_expand_applied: false,
        };
        state.apply_auto_expand();
        state
    }

    /// Expands the configured `auto_expand` row. Only the first call does
    /// anything; later calls (re-renders) leave user changes alone.
    pub fn apply_auto_expand(&mut self) {
        if self.auto_expand_applied {
            return;
        }
        self.auto_expand_applied = true;
        if let Some(row_id) = self.options.auto_expand.clone() {
            self.expand(&row_id);
        }
    }

    pub fn is_expanded(&self, row_id: &str) -> bool {
        self.expanded.contains(row_id)
    }

    /// Expanded ids in the order they were expanded.
    pub fn expanded(&self) -> &IndexSet<String> {
        &self.expanded
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn toggle(&mut self, row_id: &str) {
        if !self.expanded.shift_remove(row_id) {
            self.expanded.insert(row_id.to_string());
        }
        self.persist();
    }

    pub fn expand(&mut self, row_id: &str) {
        if self.expanded.insert(row_id.to_string()) {
            self.persist();
        }
    }

    pub fn collapse(&mut self, row_id: &str) {
        if self.expanded.shift_remove(row_id) {
            self.persist();
        }
    }

    /// Replaces the whole set.
    pub fn expand_all<I, T>(&mut self, row_ids: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let next: IndexSet<String> = row_ids.into_iter().map(Into::into).collect();
        if next.iter().ne(self.expanded.iter()) {
            self.expanded = next;
            self.persist();
        }
    }

    pub fn collapse_all(&mut self) {
        if !self.expanded.is_empty() {
            self.expanded.clear();
            self.persist();
        }
    }

    pub fn options(&self) -> &ExpansionOptions {
        &self.options
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Tears the state down, handing back the store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) {
        if !self.options.persist {
            return;
        }
        let value = serialize_ids(self.expanded.iter().map(String::as_str));
        if let Err(err) = self.store.write(&self.options.key, value.as_deref()) {
            warn!("Could not persist expanded rows: {}", err);
        }
    }
}
