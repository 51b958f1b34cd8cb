//! Property 1 (spec.md §8): `applyRedlineToOxml(X, T(X), T(X))` reports
//! `hasChanges=false` when the modified text already equals the original
//! (no markup, no formatting hints).

mod common;

use common::reconcile;

#[test]
fn identical_plain_paragraph_is_a_no_op() {
    let xml = r#"<w:p><w:r><w:t>Hello World</w:t></w:r></w:p>"#;
    let result = reconcile(xml, "Hello World", "Hello World");
    assert!(!result.has_changes);
    assert!(result.warnings.is_empty());
}

#[test]
fn identical_multi_paragraph_body_is_a_no_op() {
    let xml = r#"<w:p><w:r><w:t>First</w:t></w:r></w:p><w:p><w:r><w:t>Second</w:t></w:r></w:p>"#;
    let result = reconcile(xml, "First\nSecond", "First\nSecond");
    assert!(!result.has_changes);
}

#[test]
fn identical_table_is_a_no_op() {
    let xml = r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell text</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#;
    let result = reconcile(xml, "Cell text", "Cell text");
    assert!(!result.has_changes);
}
