//! Layout engine: table placement.
//!
//! Incremental layout places only tables that have no position yet, on a
//! deterministic grid. Auto layout re-places everything, clustering tables
//! connected by relationships.

mod engine;
mod grouping;
mod placement;
mod types;

pub use engine::LayoutEngine;
pub use grouping::{Group, group_tables};
pub use placement::column_count;
pub use types::{LayoutConfig, LayoutResult, Placement};
