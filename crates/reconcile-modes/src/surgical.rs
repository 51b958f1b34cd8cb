//! Surgical Mode (C8): in-place edits over the span list, required whenever
//! tables are present in scope (table rows/cells are not something a body
//! reconstruction pass can rebuild without losing grid structure). Walks
//! the word diff between the reconstructed original text and the clean
//! modified text, touching only the spans a change actually overlaps.

use crate::format_apply::{split_spans_at_boundaries, swap_run_properties};
use reconcile_format::builders::{create_formatted_runs, create_text_run, create_track_change, TrackChangeKind};
use reconcile_format::{extract_format_from_rpr, inject_formatting_to_rpr};
use reconcile_model::{Format, FormatHint, Revision, SpanIndex, TextSpan};
use reconcile_text::diff::{diff_text, DiffOpKind};
use reconcile_xml::{NodeId, XmlDocument};

/// Runs C8 over `spans` (already collected across every paragraph in
/// scope, in document order with `char_*` offsets into `original_text`).
/// Returns whether anything actually changed.
pub fn run_surgical(
    doc: &mut XmlDocument,
    mut spans: Vec<TextSpan>,
    original_text: &str,
    modified_text: &str,
    hints: &[FormatHint],
    revision: Option<&Revision>,
    generate_redlines: bool,
) -> bool {
    let diff = diff_text(original_text, modified_text);
    let mut changed = false;
    let mut original_pos = 0usize;
    let mut new_pos = 0usize;

    for op in &diff {
        let len = op.len();
        match op.op {
            DiffOpKind::Equal => {
                if reconcile_window(
                    doc,
                    &mut spans,
                    original_pos,
                    original_pos + len,
                    new_pos,
                    hints,
                    revision,
                    generate_redlines,
                ) {
                    changed = true;
                }
                original_pos += len;
                new_pos += len;
            }
            DiffOpKind::Delete => {
                delete_window(
                    doc,
                    &mut spans,
                    original_pos,
                    original_pos + len,
                    revision,
                    generate_redlines,
                );
                changed = true;
                original_pos += len;
            }
            DiffOpKind::Insert => {
                insert_at(
                    doc,
                    &mut spans,
                    original_pos,
                    new_pos,
                    &op.text,
                    hints,
                    revision,
                    generate_redlines,
                );
                changed = true;
                new_pos += len;
            }
        }
    }
    changed
}

/// For the `equal(len)` diff case: for every span overlapping
/// `[orig_start, orig_end)`, compares its existing format against the
/// hints covering the corresponding window in the modified text
/// (`new_start..new_start+len`) and swaps in a synchronized `w:rPr` (with
/// an `rPrChange` snapshot when tracking) wherever they differ.
fn reconcile_window(
    doc: &mut XmlDocument,
    spans: &mut Vec<TextSpan>,
    orig_start: usize,
    orig_end: usize,
    new_start: usize,
    hints: &[FormatHint],
    revision: Option<&Revision>,
    generate_redlines: bool,
) -> bool {
    if orig_start == orig_end {
        return false;
    }
    // Hint offsets are in modified-text coordinates; shift them into this
    // window's original-text coordinates before treating them as split
    // boundaries, since `spans` is indexed by original offsets.
    let shift = orig_start as i64 - new_start as i64;
    let mut boundaries = Vec::new();
    for hint in hints {
        if hint.overlaps(new_start, new_start + (orig_end - orig_start)) {
            let mapped_start = (hint.start as i64 + shift).clamp(orig_start as i64, orig_end as i64) as usize;
            let mapped_end = (hint.end as i64 + shift).clamp(orig_start as i64, orig_end as i64) as usize;
            boundaries.push(mapped_start);
            boundaries.push(mapped_end);
        }
    }
    if boundaries.is_empty() {
        return false;
    }

    let taken = std::mem::take(spans);
    let split = split_spans_at_boundaries(doc, taken, &boundaries);
    *spans = split;

    let mut changed = false;
    for span in spans.iter() {
        if !span.overlaps(orig_start, orig_end) {
            continue;
        }
        let window_new_start = (span.char_start as i64 - shift).max(0) as usize;
        let window_new_end = (span.char_end as i64 - shift).max(0) as usize;
        let mut merged = Format::default();
        let mut any_hint = false;
        for hint in hints {
            if hint.overlaps(window_new_start, window_new_end) {
                merged = merged.merged_with(&hint.format);
                any_hint = true;
            }
        }
        if !any_hint {
            continue;
        }
        let existing = span
            .run_properties
            .map(|rpr| extract_format_from_rpr(doc, rpr))
            .unwrap_or_default();
        if !existing.differs_from(&merged) {
            continue;
        }
        let new_rpr = inject_formatting_to_rpr(doc, span.run_properties, merged, revision, generate_redlines);
        swap_run_properties(doc, span.run, new_rpr);
        changed = true;
    }
    changed
}

/// For the `delete(text)` diff case: splits spans at the delete window's
/// edges, then for every span fully inside it either (tracking on) rewrites
/// its run as a `w:delText` run wrapped in `w:del`, or (tracking off)
/// simply removes the run outright.
fn delete_window(
    doc: &mut XmlDocument,
    spans: &mut Vec<TextSpan>,
    start: usize,
    end: usize,
    revision: Option<&Revision>,
    generate_redlines: bool,
) {
    if start == end {
        return;
    }
    let taken = std::mem::take(spans);
    let split = split_spans_at_boundaries(doc, taken, &[start, end]);

    let mut kept = Vec::with_capacity(split.len());
    for span in split {
        if span.char_start >= start && span.char_end <= end && span.char_start < span.char_end {
            let text = doc.text_content(span.text_node);
            if generate_redlines {
                if let Some(revision) = revision {
                    let del_run = create_text_run(doc, &text, span.run_properties, true);
                    let wrapper = create_track_change(doc, TrackChangeKind::Deletion, [del_run], revision);
                    doc.insert_before(wrapper, span.run);
                    doc.remove_subtree(span.run);
                    continue;
                }
            }
            doc.remove_subtree(span.run);
        } else {
            kept.push(span);
        }
    }
    *spans = kept;
}

/// For the `insert(text)` diff case: embedded newlines become spaces
/// (surgical mode never adds paragraphs — §4.8), the target span is
/// resolved by `orig_pos`, and the new run(s) are inserted just after (or,
/// at `orig_pos == target.char_start`, just before) the target's run,
/// wrapped in `w:ins` when tracking.
fn insert_at(
    doc: &mut XmlDocument,
    spans: &mut Vec<TextSpan>,
    orig_pos: usize,
    new_pos: usize,
    text: &str,
    hints: &[FormatHint],
    revision: Option<&Revision>,
    generate_redlines: bool,
) {
    let collapsed = text.replace('\n', " ");
    let index = SpanIndex::build(spans);
    let target_idx = index
        .span_containing(orig_pos)
        .or_else(|| index.span_ending_at(orig_pos))
        .or_else(|| index.last_span_before(orig_pos))
        .or(if spans.is_empty() { None } else { Some(spans.len() - 1) });

    let Some(target_idx) = target_idx else {
        return;
    };
    let target = spans[target_idx];
    let base_rpr = target.run_properties;

    let runs = create_formatted_runs(doc, &collapsed, base_rpr, hints, new_pos, false);
    if runs.is_empty() {
        return;
    }

    let anchor = if orig_pos == target.char_start {
        InsertAnchor::Before(target.run)
    } else {
        InsertAnchor::After(target.run)
    };

    if generate_redlines {
        if let Some(revision) = revision {
            let wrapper = create_track_change(doc, TrackChangeKind::Insertion, runs, revision);
            place(doc, wrapper, anchor);
            return;
        }
    }
    // `Before(target)` stays anchored to `target` for every run (each
    // insert lands immediately before it, preserving order). `After(target)`
    // must re-anchor to the just-placed run each time, or repeated
    // insert-after-target calls would reverse the sequence.
    let mut current_anchor = anchor;
    for run in runs {
        place(doc, run, current_anchor);
        if let InsertAnchor::After(_) = current_anchor {
            current_anchor = InsertAnchor::After(run);
        }
    }
}

#[derive(Clone, Copy)]
enum InsertAnchor {
    Before(NodeId),
    After(NodeId),
}

fn place(doc: &mut XmlDocument, node: NodeId, anchor: InsertAnchor) {
    match anchor {
        InsertAnchor::Before(reference) => doc.insert_before(node, reference),
        InsertAnchor::After(reference) => doc.insert_after(node, reference),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reconcile_model::ParagraphInfo;
    use reconcile_xml::namespaces::W;

    fn ingest(xml: &str) -> (XmlDocument, Vec<ParagraphInfo>, Vec<TextSpan>) {
        let doc = XmlDocument::parse(xml).unwrap();
        let ingested = reconcile_ingest::ingest_paragraphs(&doc, doc.root());
        let infos: Vec<ParagraphInfo> = ingested.iter().map(|p| p.info.clone()).collect();
        let spans: Vec<TextSpan> = infos.iter().flat_map(|p| p.spans.clone()).collect();
        (doc, infos, spans)
    }

    #[test]
    fn pure_insertion_adds_a_tracked_ins_run() {
        let (mut doc, infos, spans) = ingest(
            r#"<w:body><w:p><w:r><w:t xml:space="preserve">Hello</w:t></w:r></w:p></w:body>"#,
        );
        let original = infos[0].text.clone();
        let revision = Revision {
            id: 1000,
            author: "Reconciler".into(),
            date: "2026-07-28T00:00:00Z".into(),
        };
        let changed = run_surgical(&mut doc, spans, &original, "Hello World", &[], Some(&revision), true);
        assert!(changed);
        let out = doc.serialize();
        assert!(out.contains("w:ins"));
        assert!(out.contains("World"));
    }

    #[test]
    fn pure_deletion_wraps_removed_text_in_w_del() {
        let (mut doc, infos, spans) = ingest(
            r#"<w:body><w:p><w:r><w:t xml:space="preserve">Hello World</w:t></w:r></w:p></w:body>"#,
        );
        let original = infos[0].text.clone();
        let revision = Revision {
            id: 1000,
            author: "Reconciler".into(),
            date: "2026-07-28T00:00:00Z".into(),
        };
        let changed = run_surgical(&mut doc, spans, &original, "Hello", &[], Some(&revision), true);
        assert!(changed);
        let out = doc.serialize();
        assert!(out.contains("w:del"));
        assert!(out.contains("w:delText"));
    }

    #[test]
    fn untracked_deletion_removes_text_outright_with_no_wrapper() {
        let (mut doc, infos, spans) = ingest(
            r#"<w:body><w:p><w:r><w:t xml:space="preserve">Hello World</w:t></w:r></w:p></w:body>"#,
        );
        let original = infos[0].text.clone();
        let changed = run_surgical(&mut doc, spans, &original, "Hello", &[], None, false);
        assert!(changed);
        let out = doc.serialize();
        assert!(!out.contains("w:del"));
        assert!(!out.contains("World"));
    }

    #[test]
    fn format_only_change_inside_equal_region_swaps_rpr() {
        let (mut doc, infos, spans) = ingest(
            r#"<w:body><w:p><w:r><w:t xml:space="preserve">Hello World</w:t></w:r></w:p></w:body>"#,
        );
        let original = infos[0].text.clone();
        let hints = vec![FormatHint::new(
            6,
            11,
            Format {
                bold: true,
                ..Default::default()
            },
        )];
        let changed = run_surgical(&mut doc, spans, &original, "Hello World", &hints, None, false);
        assert!(changed);
        let out = doc.serialize();
        assert!(out.contains(r#"w:val="1""#));
        let b = doc
            .descendants(doc.root())
            .find(|n| doc.get(*n).is_element_named(&W::b()));
        assert!(b.is_some());
    }
}
