//! Run property helpers (C5) and run/track-change builders (C6): every
//! mode that touches a run's `w:rPr` or needs to emit a `w:r`/`w:ins`/
//! `w:del` goes through this crate rather than hand-rolling XML.

pub mod builders;
pub mod rpr;

pub use builders::{create_formatted_runs, create_text_run, create_track_change, inject_formatting_to_rpr, TrackChangeKind};
pub use rpr::{
    apply_format_flags, extract_format_from_rpr, insert_in_schema_order,
    snapshot_and_attach_rpr_change, write_synchronized_flags,
};
