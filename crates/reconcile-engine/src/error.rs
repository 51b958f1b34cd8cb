//! Error taxonomy (§7). `RedlineWarning` carries the four recoverable
//! members and rides along in [`crate::result::RedlineResult::warnings`];
//! `RedlineError` exists only for unrecoverable engine-internal bugs and
//! never escapes the public API — see `router::apply_redline_to_oxml`'s
//! `catch_unwind` boundary.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RedlineWarning {
    #[error("input is not well-formed XML; returned unchanged")]
    ParseError,
    #[error("no paragraph in scope matched the supplied original text")]
    NoTargetFound,
    #[error("modified text parsed as a table whose column count does not match the original")]
    TableShapeMismatch,
    #[error("a sentinel character in the modified text had no matching node and was dropped")]
    SentinelOrphan,
}

/// Unrecoverable engine-internal failures. The public entry points catch
/// any panic at their boundary and fold it into a `RedlineWarning::ParseError`
/// result rather than ever returning this type to a caller.
#[derive(Debug, Error)]
pub enum RedlineError {
    #[error("arena invariant violated: {0}")]
    Invariant(String),
}
