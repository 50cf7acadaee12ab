/// TableState - Tabular View Engine
///
/// Turns an in-memory row collection plus a column schema into a searched,
/// filtered, sorted and column-pruned view, with CSV/JSON export, responsive
/// column tiers and expandable-row state that round-trips through a query
/// string.

pub mod error;
pub mod value;
pub mod record;
pub mod column;
pub mod sort;
pub mod filter;
pub mod search;
pub mod visibility;
pub mod export;
pub mod responsive;
pub mod persist;
pub mod expansion;
pub mod view;
pub mod table;

pub use error::{Result, StoreError, TableError};
pub use value::{parse_date, DataType, Value};
pub use record::Record;
pub use column::{Accessor, Column, Schema};
pub use sort::{cycle_sort, format_sorting, parse_sorting, SortCriterion, SortDirection};
pub use filter::{CompareOperator, FilterOptions, FilterSpec, FilterType, SelectValue, TextOperator};
pub use search::search_columns;
pub use visibility::ColumnVisibility;
pub use export::{export_filename, ExportFormat, ExportPayload};
pub use responsive::{classify, visible_at, Breakpoint, Card, CardField, Disclosure, ResponsivePriority, ResponsiveSplit};
pub use persist::{QueryParams, StateStore};
pub use expansion::{deserialize_ids, serialize_ids, ExpansionOptions, ExpansionState, EXPANDED_KEY};
pub use view::ProcessedView;
pub use table::{RowIdFn, TableOptions, TableState};
