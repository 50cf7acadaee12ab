//! Responsive column tiers.
//!
//! Each column declares how important it is when horizontal space runs out.
//! This module turns those tiers into disclosure rules and into the
//! primary/secondary split used by card layouts. It knows breakpoints by
//! name only; pixel widths are the presentation layer's business.

use crate::column::Column;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Column importance at narrow widths, most important first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponsivePriority {
    High,
    #[default]
    Medium,
    Low,
    Lowest,
}

/// Named viewport widths, narrowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Breakpoint {
    Small,
    Medium,
    Large,
}

impl Breakpoint {
    fn prefix(&self) -> &'static str {
        match self {
            Breakpoint::Small => "sm",
            Breakpoint::Medium => "md",
            Breakpoint::Large => "lg",
        }
    }
}

/// When a column is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Disclosure {
    /// Shown at every width.
    Always,
    /// Shown from this breakpoint up, hidden below it.
    From(Breakpoint),
}

impl Disclosure {
    /// `width` is the current breakpoint; `None` means narrower than the
    /// smallest named one.
    pub fn shown_at(&self, width: Option<Breakpoint>) -> bool {
        match self {
            Disclosure::Always => true,
            Disclosure::From(min) => width.is_some_and(|w| w >= *min),
        }
    }

    /// Utility-class hint for table cells, e.g. `hidden md:table-cell`.
    pub fn class_hint(&self) -> String {
        match self {
            Disclosure::Always => String::new(),
            Disclosure::From(bp) => format!("hidden {}:table-cell", bp.prefix()),
        }
    }
}

impl ResponsivePriority {
    pub fn disclosure(&self) -> Disclosure {
        match self {
            ResponsivePriority::High => Disclosure::Always,
            ResponsivePriority::Medium => Disclosure::From(Breakpoint::Small),
            ResponsivePriority::Low => Disclosure::From(Breakpoint::Medium),
            ResponsivePriority::Lowest => Disclosure::From(Breakpoint::Large),
        }
    }
}

/// Columns shown at `width`, keeping input order.
pub fn visible_at<'a, R>(columns: &[&'a Column<R>], width: Option<Breakpoint>) -> Vec<&'a Column<R>> {
    columns
        .iter()
        .copied()
        .filter(|c| c.get_responsive_priority().disclosure().shown_at(width))
        .collect()
}

/// One labelled value on a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardField {
    pub column_id: String,
    pub label: String,
    pub value: Value,
}

/// A row rendered as a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    /// Always shown.
    pub primary: Vec<CardField>,
    /// Behind a "show more" toggle.
    pub secondary: Vec<CardField>,
}

/// Columns split into always-shown and behind-disclosure groups.
pub struct ResponsiveSplit<'a, R> {
    pub primary: Vec<&'a Column<R>>,
    pub secondary: Vec<&'a Column<R>>,
}

impl<'a, R> ResponsiveSplit<'a, R> {
    pub fn card(&self, row: &R) -> Card {
        Card {
            primary: card_fields(&self.primary, row),
            secondary: card_fields(&self.secondary, row),
        }
    }
}

fn card_fields<R>(columns: &[&Column<R>], row: &R) -> Vec<CardField> {
    columns
        .iter()
        .map(|c| CardField {
            column_id: c.id().to_string(),
            label: c.label().to_string(),
            value: c.value(row),
        })
        .collect()
}

/// Splits columns for card rendering.
///
/// Primary holds high-priority columns and columns with no declared
/// priority. Secondary holds the rest ordered medium, low, lowest, keeping
/// input order within a tier.
pub fn classify<'a, R>(columns: &[&'a Column<R>]) -> ResponsiveSplit<'a, R> {
    let (primary, mut secondary): (Vec<&Column<R>>, Vec<&Column<R>>) =
        columns.iter().copied().partition(|c| {
            matches!(c.declared_priority(), None | Some(ResponsivePriority::High))
        });
    secondary.sort_by_key(|c| c.get_responsive_priority());
    ResponsiveSplit { primary, secondary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn columns() -> Vec<Column<Record>> {
        vec![
            Column::field("notes", "Notes").responsive_priority(ResponsivePriority::Lowest),
            Column::field("name", "Name").responsive_priority(ResponsivePriority::High),
            Column::field("team", "Team").responsive_priority(ResponsivePriority::Low),
            Column::field("id", "ID"),
            Column::field("score", "Score").responsive_priority(ResponsivePriority::Medium),
            Column::field("age", "Age").responsive_priority(ResponsivePriority::Low),
        ]
    }

    fn ids(columns: &[&Column<Record>]) -> Vec<String> {
        columns.iter().map(|c| c.id().to_string()).collect()
    }

    #[test]
    fn test_classify_split_and_order() {
        let columns = columns();
        let refs: Vec<&Column<Record>> = columns.iter().collect();
        let split = classify(&refs);
        assert_eq!(ids(&split.primary), vec!["name", "id"]);
        assert_eq!(ids(&split.secondary), vec!["score", "team", "age", "notes"]);
    }

    #[test]
    fn test_disclosure_rules() {
        assert_eq!(ResponsivePriority::High.disclosure(), Disclosure::Always);
        assert_eq!(
            ResponsivePriority::Low.disclosure(),
            Disclosure::From(Breakpoint::Medium)
        );
        assert_eq!(ResponsivePriority::Lowest.disclosure().class_hint(), "hidden lg:table-cell");
        assert_eq!(Disclosure::Always.class_hint(), "");
        assert!(Disclosure::From(Breakpoint::Medium).shown_at(Some(Breakpoint::Large)));
        assert!(!Disclosure::From(Breakpoint::Small).shown_at(None));
    }

    #[test]
    fn test_visible_at() {
        let columns = columns();
        let refs: Vec<&Column<Record>> = columns.iter().collect();
        assert_eq!(ids(&visible_at(&refs, None)), vec!["name"]);
        // Unset priority counts as medium for disclosure
        assert_eq!(ids(&visible_at(&refs, Some(Breakpoint::Small))), vec!["name", "id", "score"]);
        assert_eq!(visible_at(&refs, Some(Breakpoint::Large)).len(), 6);
    }

    #[test]
    fn test_card() {
        let columns = columns();
        let refs: Vec<&Column<Record>> = columns.iter().collect();
        let split = classify(&refs);
        let row = Record::new().set("id", 7).set("name", "Ann").set("score", 10);
        let card = split.card(&row);
        assert_eq!(card.primary[0].label, "Name");
        assert_eq!(card.primary[0].value, Value::from("Ann"));
        assert_eq!(card.primary[1].value, Value::Int(7));
        assert_eq!(card.secondary.len(), 4);
        assert_eq!(card.secondary[0].column_id, "score");
        assert_eq!(card.secondary[1].value, Value::Null);
    }
}
