//! Public facade (C13/C14): the whole reconciliation pipeline behind two
//! entry points, `apply_redline_to_oxml` and its list-fallback variant.
//! Every other crate in the workspace is an implementation detail of this
//! one's `router` module.

mod envelope;
mod error;
mod options;
mod result;
mod router;
mod sanitize;

pub use error::{RedlineError, RedlineWarning};
pub use options::{discover, load_from, RedlineOptions, RedlineOptionsFile};
pub use result::RedlineResult;
pub use router::{apply_redline_to_oxml, apply_redline_to_oxml_with_list_fallback};
