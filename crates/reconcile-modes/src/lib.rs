//! Format Application (C7), Surgical Mode (C8), Reconstruction Mode (C9),
//! and List Generation (C10). Table reconciliation (C11/C12) lives in
//! `reconcile-tables`, which depends on this crate for the surgical
//! single-cell edit it routes formatting changes through.

pub mod format_apply;
pub mod list;
pub mod reconstruct;
pub mod surgical;

pub use format_apply::{
    apply_format_additions, apply_format_removal, diff_has_text_change, find_target_paragraph_info,
    split_spans_at_boundaries, swap_run_properties,
};
pub use list::{generate_list_paragraphs, ListGenerationResult, NumberingAllocator};
pub use reconstruct::reconstruct_paragraphs;
pub use surgical::run_surgical;
