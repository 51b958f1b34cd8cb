//! §6 wire invariants not already covered by a dedicated property test:
//! every `w:t`/`w:delText` the engine writes carries `xml:space="preserve"`,
//! and tracking-off mode never writes `w:ins`/`w:del`/`w:rPrChange`.

mod common;

use common::{all_text_nodes_preserve_space, reconcile, reconcile_untracked};

#[test]
fn reconstruction_mode_rewrites_every_text_node_with_preserve_space() {
    // No tables, a paragraph split and a substitution, so every resulting
    // `w:p` is synthesized fresh by reconstruction mode (C9) rather than
    // patched in place.
    let xml = r#"<w:p><w:r><w:t>OneTwoThree</w:t></w:r></w:p>"#;
    let result = reconcile(xml, "OneTwoThree", "One\nDeux\nThree");
    assert!(result.has_changes);
    assert!(all_text_nodes_preserve_space(&result.oxml));
}

#[test]
fn list_generation_rewrites_every_text_node_with_preserve_space() {
    let xml = r#"<w:p><w:r><w:t>Original</w:t></w:r></w:p>"#;
    let result = reconcile(xml, "Original", "A. One\nB. Two\nC. Three");
    assert!(result.has_changes);
    assert!(all_text_nodes_preserve_space(&result.oxml));
}

#[test]
fn tracking_off_never_emits_redline_wrappers() {
    let xml = r#"<w:p><w:r><w:t>Hello World</w:t></w:r></w:p>"#;
    let result = reconcile_untracked(xml, "Hello World", "Hello there **World**");
    assert!(result.has_changes);
    assert!(!result.oxml.contains("w:ins"));
    assert!(!result.oxml.contains("w:del"));
    assert!(!result.oxml.contains("w:rPrChange"));
}
