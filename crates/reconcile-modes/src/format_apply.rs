//! Format Application (C7): span splitting at format-hint boundaries, and
//! the format-only add/remove flows the router dispatches to when the
//! modified text is identical to the original but its formatting differs.

use reconcile_format::{
    apply_format_flags, extract_format_from_rpr, inject_formatting_to_rpr,
};
use reconcile_model::{normalize_for_comparison, Format, FormatHint, ParagraphInfo, Revision, TextSpan};
use reconcile_text::diff::DiffOpKind;
use reconcile_xml::namespaces::W;
use reconcile_xml::{NodeId, XmlDocument, XmlNodeData};

/// `splitSpansAtBoundaries`: iteratively splits spans at each boundary
/// falling strictly inside a span, until no further split is possible.
/// Splitting a span rewrites its backing run into two runs with the same
/// `w:rPr`, replacing the original in the tree.
pub fn split_spans_at_boundaries(
    doc: &mut XmlDocument,
    mut spans: Vec<TextSpan>,
    boundaries: &[usize],
) -> Vec<TextSpan> {
    loop {
        let split_at = boundaries
            .iter()
            .find_map(|&b| {
                spans
                    .iter()
                    .position(|s| b > s.char_start && b < s.char_end)
                    .map(|idx| (idx, b))
            });
        let Some((idx, boundary)) = split_at else {
            break;
        };
        let span = spans[idx];
        let (left, right) = split_text_span(doc, &span, boundary);
        spans.splice(idx..idx + 1, [left, right]);
    }
    spans.sort_by_key(|s| s.char_start);
    spans
}

/// Splits one span's backing run into two runs at the absolute character
/// offset `at`, which must fall strictly inside `[span.char_start,
/// span.char_end)`. Both halves keep a clone of the original `w:rPr`.
fn split_text_span(doc: &mut XmlDocument, span: &TextSpan, at: usize) -> (TextSpan, TextSpan) {
    let local = at - span.char_start;
    let full = doc.text_content(span.text_node);
    let chars: Vec<char> = full.chars().collect();
    let left_text: String = chars[..local].iter().collect();
    let right_text: String = chars[local..].iter().collect();

    let left_run = reconcile_format::builders::create_text_run(doc, &left_text, span.run_properties, false);
    let right_run =
        reconcile_format::builders::create_text_run(doc, &right_text, span.run_properties, false);
    doc.insert_before(left_run, span.run);
    doc.insert_before(right_run, span.run);
    doc.remove_subtree(span.run);

    let left_rpr = doc.first_child_named(left_run, &W::rPr());
    let right_rpr = doc.first_child_named(right_run, &W::rPr());
    let left_text_node = doc.first_child_named(left_run, &W::t()).unwrap_or(left_run);
    let right_text_node = doc.first_child_named(right_run, &W::t()).unwrap_or(right_run);

    (
        TextSpan {
            char_start: span.char_start,
            char_end: at,
            text_node: left_text_node,
            run: left_run,
            paragraph: span.paragraph,
            container: span.container,
            run_properties: left_rpr,
        },
        TextSpan {
            char_start: at,
            char_end: span.char_end,
            text_node: right_text_node,
            run: right_run,
            paragraph: span.paragraph,
            container: span.container,
            run_properties: right_rpr,
        },
    )
}

/// Replaces `run`'s `w:rPr` child with `new_rpr` (inserting it as the first
/// child if the run previously carried none).
pub fn swap_run_properties(doc: &mut XmlDocument, run: NodeId, new_rpr: NodeId) {
    if let Some(old) = doc.first_child_named(run, &W::rPr()) {
        doc.insert_before(new_rpr, old);
        doc.remove_subtree(old);
    } else if let Some(first) = doc.children(run).next() {
        doc.insert_before(new_rpr, first);
    } else {
        doc.append_existing(run, new_rpr);
    }
}

/// `applyFormatAdditionsAsSurgicalReplacement`: splits spans at hint
/// boundaries, then for each span overlapping a hint, merges the
/// overlapping hints' formats, compares against the span's existing
/// (intrinsic) format, and swaps in a synchronized `w:rPr` — with an
/// `rPrChange` snapshot when tracking — whenever they differ. Returns the
/// (possibly longer, due to splitting) span list and whether anything
/// actually changed.
pub fn apply_format_additions(
    doc: &mut XmlDocument,
    spans: Vec<TextSpan>,
    hints: &[FormatHint],
    revision: Option<&Revision>,
    generate_redlines: bool,
) -> (Vec<TextSpan>, bool) {
    if hints.is_empty() {
        return (spans, false);
    }

    let mut boundaries: Vec<usize> = Vec::with_capacity(hints.len() * 2);
    for hint in hints {
        boundaries.push(hint.start);
        boundaries.push(hint.end);
    }
    let spans = split_spans_at_boundaries(doc, spans, &boundaries);

    let mut changed = false;
    for span in &spans {
        let overlapping: Vec<&FormatHint> = hints
            .iter()
            .filter(|h| h.overlaps(span.char_start, span.char_end))
            .collect();
        if overlapping.is_empty() {
            continue;
        }
        let mut merged = Format::default();
        for hint in &overlapping {
            merged = merged.merged_with(&hint.format);
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
    (spans, changed)
}

/// `applyFormatRemovalAsSurgicalReplacement`: for each run carrying
/// formatting, snapshots its `rPr` (when tracking) and writes explicit
/// *off* overrides for every flag currently set.
pub fn apply_format_removal(
    doc: &mut XmlDocument,
    spans: &[TextSpan],
    revision: Option<&Revision>,
    generate_redlines: bool,
) -> bool {
    let mut changed = false;
    for span in spans {
        let Some(rpr) = span.run_properties else {
            continue;
        };
        let format = extract_format_from_rpr(doc, rpr);
        if format.is_empty() {
            continue;
        }
        if generate_redlines {
            if let Some(revision) = revision {
                reconcile_format::snapshot_and_attach_rpr_change(
                    doc,
                    rpr,
                    &revision.author,
                    &revision.date,
                    revision.id,
                    rpr,
                );
            }
        }
        apply_format_flags(doc, rpr, format, false);
        changed = true;
    }
    changed
}

/// `findTargetParagraphInfo`: exact normalized match, then trimmed, then
/// substring within the joined-with-`\n` normalized document. Returns the
/// paragraph index and the character offset of the match inside that
/// paragraph's own text.
pub fn find_target_paragraph_info(
    paragraphs: &[ParagraphInfo],
    original_text: &str,
) -> Option<(usize, usize)> {
    let needle = normalize_for_comparison(original_text);

    for (idx, p) in paragraphs.iter().enumerate() {
        if p.normalized_text == needle {
            return Some((idx, 0));
        }
    }

    let trimmed_needle = needle.trim();
    for (idx, p) in paragraphs.iter().enumerate() {
        if p.normalized_text.trim() == trimmed_needle {
            return Some((idx, 0));
        }
    }

    let joined = reconcile_model::join_paragraphs(paragraphs.iter().map(|p| p.normalized_text.as_str()));
    let pos = joined.find(&needle)?;
    let char_pos = joined[..pos].chars().count();
    for p in paragraphs {
        if char_pos >= p.start_offset && char_pos <= p.end_offset() {
            return Some((
                paragraphs.iter().position(|q| q.paragraph == p.paragraph)?,
                char_pos - p.start_offset,
            ));
        }
    }
    None
}

/// True when `original` and `modified` differ only in whitespace that the
/// diff engine would still report as Equal/Delete/Insert-but-whitespace —
/// used by the router to distinguish "no text change" from "text changed".
pub fn diff_has_text_change(diff: &[reconcile_text::diff::DiffSpan]) -> bool {
    diff.iter().any(|s| s.op != DiffOpKind::Equal)
}
