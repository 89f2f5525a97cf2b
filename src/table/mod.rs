//! Generic sortable, paginated table model
//!
//! The model knows nothing about terminals; the dashboard and the snapshot
//! printer both render the `TableBody` it produces.

pub mod column;
pub mod columns;
pub mod text;
pub mod view;

pub use column::{CellValue, Record};
pub use columns::{pair_table, track_table};
pub use view::{TableBody, TableView};
