//! Cross-component scenarios for List Generation (C10) and Format
//! Application (C7): each test drives a real ingested paragraph through
//! the crate's public entry points end to end, matching the concrete
//! scenarios spec.md §8 calls out rather than duplicating the unit tests
//! already inside `src/list.rs` and `src/format_apply.rs`.

use reconcile_model::{Format, FormatHint, ParagraphInfo, Revision};
use reconcile_modes::{
    apply_format_additions, apply_format_removal, generate_list_paragraphs, NumberingAllocator,
};
use reconcile_xml::namespaces::W;
use reconcile_xml::XmlDocument;

fn revision() -> Revision {
    Revision {
        id: 1000,
        author: "Reconciler".into(),
        date: "2026-07-28T00:00:00Z".into(),
    }
}

fn ingest(xml: &str) -> (XmlDocument, ParagraphInfo) {
    let doc = XmlDocument::parse(xml).unwrap();
    let mut paragraphs = reconcile_ingest::ingest_paragraphs(&doc, doc.root());
    (doc, paragraphs.remove(0).info)
}

#[test]
fn nested_bulleted_list_assigns_increasing_indent_levels() {
    let (mut doc, target) = ingest(r#"<w:body><w:p><w:r><w:t>Original</w:t></w:r></w:p></w:body>"#);
    let mut allocator = NumberingAllocator::default();
    let result = generate_list_paragraphs(
        &mut doc,
        &target,
        "- Parent\n  - Child one\n  - Child two",
        None,
        Some(&revision()),
        true,
        &mut allocator,
    );
    assert_eq!(result.paragraphs.len(), 4); // 3 items + trailing empty paragraph
    let ilvl_of = |p| {
        doc.descendants(p)
            .find(|&n| doc.get(n).is_element_named(&W::ilvl()))
            .and_then(|n| doc.get(n).attr("val").and_then(|v| v.parse::<usize>().ok()))
            .unwrap_or(0)
    };
    assert_eq!(ilvl_of(result.paragraphs[0]), 0);
    assert_eq!(ilvl_of(result.paragraphs[1]), 1);
    assert_eq!(ilvl_of(result.paragraphs[2]), 1);
}

#[test]
fn repeated_list_format_within_one_call_reuses_the_same_num_id() {
    let (mut doc, target) = ingest(r#"<w:body><w:p><w:r><w:t>Original</w:t></w:r></w:p></w:body>"#);
    let mut allocator = NumberingAllocator::default();
    let result = generate_list_paragraphs(
        &mut doc,
        &target,
        "1. One\n2. Two\n3. Three",
        None,
        Some(&revision()),
        true,
        &mut allocator,
    );
    let num_id_of = |p| {
        doc.descendants(p)
            .find(|&n| doc.get(n).is_element_named(&W::numId()))
            .and_then(|n| doc.get(n).attr("val").map(|v| v.to_string()))
    };
    let first = num_id_of(result.paragraphs[0]);
    let second = num_id_of(result.paragraphs[1]);
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn format_addition_then_removal_on_the_same_spans_round_trips() {
    let (mut doc, target) = ingest(
        r#"<w:body><w:p><w:r><w:t xml:space="preserve">Hello World</w:t></w:r></w:p></w:body>"#,
    );
    let hints = vec![FormatHint::new(
        6,
        11,
        Format {
            bold: true,
            ..Default::default()
        },
    )];
    let (spans, changed) =
        apply_format_additions(&mut doc, target.spans.clone(), &hints, Some(&revision()), true);
    assert!(changed);
    let out = doc.serialize();
    assert!(out.contains(r#"w:val="1""#));

    let removed = apply_format_removal(&mut doc, &spans, Some(&revision()), true);
    assert!(removed);
    let out = doc.serialize();
    assert!(out.contains("w:rPrChange"));
}
