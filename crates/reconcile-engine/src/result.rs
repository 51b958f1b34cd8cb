use crate::error::RedlineWarning;

/// `{ oxml, hasChanges, warnings?, useNativeApi? }` from spec.md §6/§7.
#[derive(Debug, Clone)]
pub struct RedlineResult {
    pub oxml: String,
    pub has_changes: bool,
    pub warnings: Vec<RedlineWarning>,
    /// Set when a format-only operation couldn't locate its target
    /// paragraph, signaling the host to fall back to its native edit API.
    pub use_native_api: Option<bool>,
    /// Present when list generation allocated new `numId`/`abstractNumId`
    /// pairs and the caller needs the companion numbering part.
    pub numbering_fragment: Option<String>,
}

impl RedlineResult {
    pub fn unchanged(oxml: impl Into<String>) -> Self {
        RedlineResult {
            oxml: oxml.into(),
            has_changes: false,
            warnings: Vec::new(),
            use_native_api: None,
            numbering_fragment: None,
        }
    }

    pub fn unchanged_with_warning(oxml: impl Into<String>, warning: RedlineWarning) -> Self {
        let mut result = RedlineResult::unchanged(oxml);
        result.warnings.push(warning);
        result
    }
}
