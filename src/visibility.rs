//! Column visibility.

use crate::column::{Column, Schema};
use indexmap::IndexSet;
use log::debug;

/// Tracks the hidden-column set for one table.
///
/// A column is visible iff its id is not hidden. The initial hidden set comes
/// from each column's `visible_by_default` flag, and `reset` returns to it.
/// Hiding every column is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnVisibility {
    known: IndexSet<String>,
    defaults: IndexSet<String>,
    hidden: IndexSet<String>,
}

impl ColumnVisibility {
    pub fn new<R>(schema: &Schema<R>) -> Self {
        let known = schema.iter().map(|c| c.id().to_string()).collect();
        let defaults: IndexSet<String> = schema
            .iter()
            .filter(|c| !c.is_visible_by_default())
            .map(|c| c.id().to_string())
            .collect();
        ColumnVisibility {
            known,
            hidden: defaults.clone(),
            defaults,
        }
    }

    fn check(&self, column_id: &str) -> bool {
        let known = self.known.contains(column_id);
        if !known {
            debug!("Ignoring visibility change for unknown column '{}'", column_id);
        }
        known
    }

    pub fn toggle(&mut self, column_id: &str) {
        if !self.check(column_id) {
            return;
        }
        if !self.hidden.shift_remove(column_id) {
            self.hidden.insert(column_id.to_string());
        }
    }

    pub fn show(&mut self, column_id: &str) {
        if self.check(column_id) {
            self.hidden.shift_remove(column_id);
        }
    }

    pub fn hide(&mut self, column_id: &str) {
        if self.check(column_id) {
            self.hidden.insert(column_id.to_string());
        }
    }

    pub fn reset(&mut self) {
        self.hidden = self.defaults.clone();
    }

    /// True when exactly the columns hidden by default are hidden.
    pub fn is_default(&self) -> bool {
        self.hidden == self.defaults
    }

    /// Replaces the hidden set. Unknown ids are dropped.
    pub fn set_hidden<I, T>(&mut self, column_ids: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut hidden = IndexSet::new();
        for id in column_ids {
            if self.check(id.as_ref()) {
                hidden.insert(id.as_ref().to_string());
            }
        }
        self.hidden = hidden;
    }

    pub fn is_visible(&self, column_id: &str) -> bool {
        !self.hidden.contains(column_id)
    }

    pub fn hidden(&self) -> &IndexSet<String> {
        &self.hidden
    }

    /// Schema columns that are not hidden, in schema order.
    pub fn visible_columns<'s, R>(&self, schema: &'s Schema<R>) -> Vec<&'s Column<R>> {
        schema.iter().filter(|c| self.is_visible(c.id())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn schema() -> Schema<Record> {
        Schema::new(vec![
            Column::field("id", "ID").visible_by_default(false),
            Column::field("name", "Name"),
            Column::field("score", "Score"),
        ])
        .unwrap()
    }

    fn ids(columns: &[&Column<Record>]) -> Vec<String> {
        columns.iter().map(|c| c.id().to_string()).collect()
    }

    #[test]
    fn test_defaults_hidden() {
        let schema = schema();
        let visibility = ColumnVisibility::new(&schema);
        assert!(!visibility.is_visible("id"));
        assert_eq!(ids(&visibility.visible_columns(&schema)), vec!["name", "score"]);
    }

    #[test]
    fn test_is_default_tracks_defaults() {
        let schema = schema();
        let mut visibility = ColumnVisibility::new(&schema);
        assert!(visibility.is_default());
        visibility.show("id");
        assert!(!visibility.is_default());
        visibility.hide("id");
        assert!(visibility.is_default());
        visibility.set_hidden(["score", "id"]);
        assert!(!visibility.is_default());
        visibility.reset();
        assert!(visibility.is_default());
    }

    #[test]
    fn test_toggle_twice_restores() {
        let schema = schema();
        let mut visibility = ColumnVisibility::new(&schema);
        let before = visibility.clone();
        visibility.toggle("score");
        assert!(!visibility.is_visible("score"));
        visibility.toggle("score");
        assert_eq!(visibility, before);
    }

    #[test]
    fn test_show_hide_reset() {
        let schema = schema();
        let mut visibility = ColumnVisibility::new(&schema);
        visibility.show("id");
        visibility.hide("name");
        visibility.hide("name");
        assert_eq!(ids(&visibility.visible_columns(&schema)), vec!["id", "score"]);
        visibility.reset();
        assert_eq!(ids(&visibility.visible_columns(&schema)), vec!["name", "score"]);
    }

    #[test]
    fn test_hide_all_allowed() {
        let schema = schema();
        let mut visibility = ColumnVisibility::new(&schema);
        visibility.hide("name");
        visibility.hide("score");
        assert!(visibility.visible_columns(&schema).is_empty());
    }

    #[test]
    fn test_unknown_column_ignored() {
        let schema = schema();
        let mut visibility = ColumnVisibility::new(&schema);
        visibility.hide("team");
        visibility.toggle("team");
        assert_eq!(visibility.hidden().len(), 1);
    }
}
