//! The shared data model: the linear run model, spans, format hints,
//! paragraph aggregates, the table virtual grid, sentinels, and revision
//! metadata. Every other crate in the workspace builds on these types
//! rather than inventing its own.

pub mod boundary;
pub mod format_hint;
pub mod grid;
pub mod paragraph;
pub mod revision;
pub mod run_entry;
pub mod sentinel;
pub mod span;

pub use boundary::{join_paragraphs, PARAGRAPH_BOUNDARY};
pub use format_hint::{Format, FormatHint};
pub use grid::{MergeRole, VirtualCell, VirtualGrid};
pub use paragraph::{normalize_for_comparison, ParagraphInfo};
pub use revision::{ensure_counter_past, next_revision_id, reset_revision_id_counter, Revision};
pub use run_entry::{RunEntry, RunKind};
pub use sentinel::{is_sentinel, PrivateUseAllocator, OBJECT_REPLACEMENT};
pub use span::{SpanIndex, TextSpan};
