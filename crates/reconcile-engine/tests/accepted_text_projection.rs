//! Property 2 (spec.md §8): concatenating every `w:t` and every
//! `w:ins > ... > w:t` (never `w:delText`) in the output, honoring the
//! paragraph boundary policy, equals the clean modified text.

mod common;

use common::reconcile;

fn accepted_text(oxml: &str) -> String {
    // The engine's own paragraph-boundary policy is a single `\n` between
    // paragraphs and none trailing; reading `<w:p>` boundaries out of the
    // serialized output and joining with `\n` mirrors that directly.
    let doc = reconcile_xml::XmlDocument::parse(&format!("<redline:root>{oxml}</redline:root>")).unwrap();
    let root = doc.root();
    let paragraphs: Vec<String> = doc
        .descendants(root)
        .filter(|&n| doc.get(n).is_element_named(&reconcile_xml::namespaces::W::p()))
        .map(|p| accepted_text_of_paragraph(&doc, p))
        .collect();
    paragraphs.join("\n")
}

fn accepted_text_of_paragraph(doc: &reconcile_xml::XmlDocument, paragraph: reconcile_xml::NodeId) -> String {
    let mut out = String::new();
    collect(doc, paragraph, false, &mut out);
    out
}

fn collect(doc: &reconcile_xml::XmlDocument, node: reconcile_xml::NodeId, in_delete: bool, out: &mut String) {
    use reconcile_xml::namespaces::W;
    let data = doc.get(node);
    if data.is_element_named(&W::del()) {
        for child in doc.children(node) {
            collect(doc, child, true, out);
        }
        return;
    }
    if data.is_element_named(&W::t()) && !in_delete {
        out.push_str(&doc.text_content(node));
        return;
    }
    if data.is_element_named(&W::delText()) {
        return;
    }
    for child in doc.children(node) {
        collect(doc, child, in_delete, out);
    }
}

#[test]
fn insertion_projects_onto_the_modified_text() {
    let xml = r#"<w:p><w:r><w:t>Hello World</w:t></w:r></w:p>"#;
    let result = reconcile(xml, "Hello World", "Hello there World");
    assert!(result.has_changes);
    assert_eq!(accepted_text(&result.oxml), "Hello there World");
}

#[test]
fn deletion_is_excluded_from_the_accepted_projection() {
    let xml = r#"<w:p><w:r><w:t>Hello there World</w:t></w:r></w:p>"#;
    let result = reconcile(xml, "Hello there World", "Hello World");
    assert!(result.has_changes);
    assert_eq!(accepted_text(&result.oxml), "Hello World");
}

#[test]
fn two_paragraph_edit_joins_with_a_single_newline() {
    let xml = r#"<w:p><w:r><w:t>Alpha</w:t></w:r></w:p><w:p><w:r><w:t>Beta</w:t></w:r></w:p>"#;
    let result = reconcile(xml, "Alpha\nBeta", "Alpha\nGamma");
    assert!(result.has_changes);
    assert_eq!(accepted_text(&result.oxml), "Alpha\nGamma");
}
