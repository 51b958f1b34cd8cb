//! Table Reconciliation (C11) and Table-Cell Context (C12): everything
//! that treats a `w:tbl` as a grid rather than a flat run of text.

pub mod cell_context;
pub mod ingest_grid;
pub mod reconcile;

pub use cell_context::{find_table_cell_target, isolate_paragraph, splice_paragraph_result, CellMatch};
pub use ingest_grid::ingest_table_to_grid;
pub use reconcile::{convert_text_to_table, reconcile_table, TableOutcome};
