//! Reconstruction Mode (C9): rebuilds body paragraphs from a diff, the mode
//! used whenever no table is in scope and the edit may add or remove
//! paragraphs (surgical mode never grows/shrinks the paragraph count).
//!
//! Unlike surgical mode, which patches spans in place, this mode throws
//! away the original `w:p` elements entirely and synthesizes new ones from
//! the diff walk, reusing `w:pPr`/`w:rPr` subtrees cloned from whichever
//! original paragraph/run covered that stretch of text.

use reconcile_format::builders::{create_formatted_runs, create_text_run, create_track_change, TrackChangeKind};
use reconcile_model::{is_sentinel, FormatHint, ParagraphInfo, Revision, SpanIndex, TextSpan};
use reconcile_text::diff::{diff_text, DiffOpKind};
use reconcile_xml::namespaces::W;
use reconcile_xml::{NodeId, XmlDocument, XmlNodeData};

struct ParagraphBuilder {
    p_pr_source: Option<NodeId>,
    children: Vec<NodeId>,
}

impl ParagraphBuilder {
    fn new(p_pr_source: Option<NodeId>) -> Self {
        ParagraphBuilder {
            p_pr_source,
            children: Vec::new(),
        }
    }
}

fn flush_paragraph(doc: &mut XmlDocument, builder: ParagraphBuilder) -> NodeId {
    let p = doc.new_node(XmlNodeData::element("w:p"));
    if let Some(source) = builder.p_pr_source {
        let clone = doc.clone_subtree(source);
        doc.append_existing(p, clone);
    }
    for child in builder.children {
        doc.append_existing(p, child);
    }
    p
}

fn paragraph_for_offset(paragraphs: &[ParagraphInfo], pos: usize) -> Option<&ParagraphInfo> {
    paragraphs
        .iter()
        .find(|p| pos >= p.start_offset && pos <= p.end_offset())
        .or_else(|| paragraphs.last())
}

fn p_pr_of(doc: &XmlDocument, paragraph: NodeId) -> Option<NodeId> {
    doc.first_child_named(paragraph, &W::pPr())
}

/// Rebuilds the whole paragraph sequence. Returns the new `w:p` nodes, in
/// order, ready to replace the originals inside their container.
pub fn reconstruct_paragraphs(
    doc: &mut XmlDocument,
    paragraphs: &[ParagraphInfo],
    original_text: &str,
    modified_text: &str,
    hints: &[FormatHint],
    revision: Option<&Revision>,
    generate_redlines: bool,
) -> Vec<NodeId> {
    let all_spans: Vec<TextSpan> = paragraphs.iter().flat_map(|p| p.spans.clone()).collect();
    let span_index = SpanIndex::build(&all_spans);
    let original_chars: Vec<char> = original_text.chars().collect();

    let diff = diff_text(original_text, modified_text);
    let mut output = Vec::new();
    let mut original_pos = 0usize;
    let mut new_pos = 0usize;
    let first_p_pr = paragraphs.first().map(|p| p.paragraph).and_then(|p| p_pr_of(doc, p));
    let mut builder = ParagraphBuilder::new(first_p_pr);

    for op in &diff {
        let len = op.len();
        match op.op {
            DiffOpKind::Equal | DiffOpKind::Delete => {
                let is_delete = op.op == DiffOpKind::Delete;
                consume_original_range(
                    doc,
                    &mut builder,
                    &mut output,
                    paragraphs,
                    &span_index,
                    &all_spans,
                    &original_chars,
                    original_pos,
                    original_pos + len,
                    is_delete,
                    revision,
                    generate_redlines,
                );
                original_pos += len;
            }
            DiffOpKind::Insert => {
                emit_insert(
                    doc,
                    &mut builder,
                    &mut output,
                    paragraphs,
                    &span_index,
                    &all_spans,
                    original_pos,
                    new_pos,
                    &op.text,
                    hints,
                    revision,
                    generate_redlines,
                );
                new_pos += len;
            }
        }
    }
    output.push(flush_paragraph(doc, builder));
    output
}

#[allow(clippy::too_many_arguments)]
fn consume_original_range(
    doc: &mut XmlDocument,
    builder: &mut ParagraphBuilder,
    output: &mut Vec<NodeId>,
    paragraphs: &[ParagraphInfo],
    span_index: &SpanIndex,
    all_spans: &[TextSpan],
    original_chars: &[char],
    start: usize,
    end: usize,
    is_delete: bool,
    revision: Option<&Revision>,
    generate_redlines: bool,
) {
    let mut pos = start;
    while pos < end {
        let c = original_chars[pos];

        if c == '\n' {
            if !is_delete {
                let finished = std::mem::replace(
                    builder,
                    ParagraphBuilder::new(
                        paragraph_for_offset(paragraphs, pos + 1)
                            .map(|p| p.paragraph)
                            .and_then(|p| p_pr_of(doc, p)),
                    ),
                );
                output.push(flush_paragraph(doc, finished));
            }
            // A deleted paragraph boundary merges two original paragraphs
            // into one; nothing to emit, the builder just keeps going.
            pos += 1;
            continue;
        }

        if is_sentinel(c) {
            if let Some(idx) = span_index.span_containing(pos) {
                let source = all_spans[idx].run;
                if !is_delete {
                    let clone = doc.clone_subtree(source);
                    builder.children.push(clone);
                }
            }
            pos += 1;
            continue;
        }

        // Chunk forward while the run-properties source stays the same and
        // we haven't hit a boundary/sentinel, so equal runs of text don't
        // get split one character at a time.
        let chunk_start = pos;
        let rpr_here = span_index.span_containing(pos).and_then(|i| all_spans[i].run_properties);
        while pos < end {
            let ch = original_chars[pos];
            if ch == '\n' || is_sentinel(ch) {
                break;
            }
            let this_rpr = span_index.span_containing(pos).and_then(|i| all_spans[i].run_properties);
            if this_rpr != rpr_here {
                break;
            }
            pos += 1;
        }
        let chunk: String = original_chars[chunk_start..pos].iter().collect();
        if chunk.is_empty() {
            continue;
        }

        if is_delete {
            let run = create_text_run(doc, &chunk, rpr_here, true);
            if generate_redlines {
                if let Some(revision) = revision {
                    let wrapper = create_track_change(doc, TrackChangeKind::Deletion, [run], revision);
                    builder.children.push(wrapper);
                    continue;
                }
            }
            // Tracking off: the deleted text simply doesn't appear.
        } else {
            let run = create_text_run(doc, &chunk, rpr_here, false);
            builder.children.push(run);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn emit_insert(
    doc: &mut XmlDocument,
    builder: &mut ParagraphBuilder,
    output: &mut Vec<NodeId>,
    paragraphs: &[ParagraphInfo],
    span_index: &SpanIndex,
    all_spans: &[TextSpan],
    original_pos: usize,
    new_pos: usize,
    text: &str,
    hints: &[FormatHint],
    revision: Option<&Revision>,
    generate_redlines: bool,
) {
    let inherited_rpr = span_index
        .span_containing(original_pos)
        .or_else(|| span_index.last_span_before(original_pos))
        .and_then(|i| all_spans[i].run_properties);

    let mut local_offset = 0usize;
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            let finished = std::mem::replace(
                builder,
                ParagraphBuilder::new(
                    paragraph_for_offset(paragraphs, original_pos)
                        .map(|p| p.paragraph)
                        .and_then(|p| p_pr_of(doc, p)),
                ),
            );
            output.push(flush_paragraph(doc, finished));
        }
        if !line.is_empty() {
            let runs = create_formatted_runs(doc, line, inherited_rpr, hints, new_pos + local_offset, false);
            if generate_redlines {
                if let Some(revision) = revision {
                    if !runs.is_empty() {
                        let wrapper = create_track_change(doc, TrackChangeKind::Insertion, runs, revision);
                        builder.children.push(wrapper);
                    }
                    local_offset += line.chars().count() + 1;
                    continue;
                }
            }
            builder.children.extend(runs);
        }
        local_offset += line.chars().count() + 1;
    }
}
