//! Property 3 (spec.md §8): concatenating every `w:delText` in the output
//! equals the diff engine's delete concatenation over `(acceptedText,
//! cleanModifiedText)`.

mod common;

use common::reconcile;
use reconcile_text::diff::{diff_text, DiffOpKind};
use reconcile_xml::namespaces::W;

fn deleted_text(oxml: &str) -> String {
    let doc = reconcile_xml::XmlDocument::parse(&format!("<redline:root>{oxml}</redline:root>")).unwrap();
    let root = doc.root();
    doc.descendants(root)
        .filter(|&n| doc.get(n).is_element_named(&W::delText()))
        .map(|n| doc.text_content(n))
        .collect()
}

fn diff_deletions(original: &str, modified: &str) -> String {
    diff_text(original, modified)
        .into_iter()
        .filter(|op| op.op == DiffOpKind::Delete)
        .map(|op| op.text)
        .collect()
}

#[test]
fn deleted_text_matches_the_diff_engines_delete_concatenation() {
    let xml = r#"<w:p><w:r><w:t>The quick brown fox</w:t></w:r></w:p>"#;
    let original = "The quick brown fox";
    let modified = "The slow brown fox";
    let result = reconcile(xml, original, modified);
    assert!(result.has_changes);
    assert_eq!(deleted_text(&result.oxml), diff_deletions(original, modified));
}

#[test]
fn pure_deletion_with_no_insertion() {
    let xml = r#"<w:p><w:r><w:t>Keep this part extra</w:t></w:r></w:p>"#;
    let original = "Keep this part extra";
    let modified = "Keep this part";
    let result = reconcile(xml, original, modified);
    assert!(result.has_changes);
    assert_eq!(deleted_text(&result.oxml), diff_deletions(original, modified));
}
