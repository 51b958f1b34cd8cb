#![allow(dead_code)] // shared across several scenario tests; each pulls in a subset

use reconcile_engine::{apply_redline_to_oxml, RedlineOptions, RedlineResult};
use reconcile_model::reset_revision_id_counter;

/// Runs the engine with tracking on and a fixed author, after resetting the
/// revision counter so assertions on emitted `w:id` values are deterministic
/// across tests (tests in the same binary share the process-wide counter).
pub fn reconcile(oxml: &str, original: &str, modified: &str) -> RedlineResult {
    reset_revision_id_counter();
    let mut options = RedlineOptions::default();
    options.author = "Test Author".to_string();
    apply_redline_to_oxml(oxml, original, modified, &options)
}

pub fn reconcile_untracked(oxml: &str, original: &str, modified: &str) -> RedlineResult {
    reset_revision_id_counter();
    let mut options = RedlineOptions::default();
    options.generate_redlines = false;
    apply_redline_to_oxml(oxml, original, modified, &options)
}

/// Every `w:t`/`w:delText` the engine writes must carry `xml:space="preserve"`
/// per §6's wire invariants; this is the shared check several scenario tests
/// lean on.
pub fn all_text_nodes_preserve_space(oxml: &str) -> bool {
    let mut rest = oxml;
    while let Some(t_start) = rest.find("<w:t") {
        let tag_end = rest[t_start..].find('>').map(|i| t_start + i).unwrap_or(rest.len());
        let tag = &rest[t_start..tag_end];
        if tag.starts_with("<w:t ") || tag == "<w:t" {
            if !tag.contains(r#"xml:space="preserve""#) {
                return false;
            }
        }
        rest = &rest[tag_end..];
    }
    true
}
