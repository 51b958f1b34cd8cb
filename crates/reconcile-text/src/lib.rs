//! Text-level transforms that never touch the OOXML tree: word-granular
//! diffing (C4), the markdown preprocessor (C3), list marker detection, and
//! markdown table parsing.

pub mod diff;
pub mod list_marker;
pub mod markdown;
pub mod table;

pub use diff::{diff_text, reconstruct_modified, reconstruct_original, DiffOpKind, DiffSpan};
pub use list_marker::{detect_indent_step, detect_marker, is_list_target, ListMarker, ListMarkerKind};
pub use markdown::preprocess_markdown;
pub use table::{parse_markdown_table, MarkdownTable};
