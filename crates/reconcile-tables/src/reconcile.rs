//! Table Reconciliation (C11): diffs an existing `w:tbl`'s [`VirtualGrid`]
//! against a parsed markdown table, row by row, and routes any per-cell
//! text change through the same surgical pipeline a plain paragraph edit
//! uses. Also covers the reverse direction — "text-to-table" — where the
//! original has no table at all and a brand new one needs to replace the
//! paragraphs it supersedes.

use reconcile_format::builders::{create_text_run, create_track_change, TrackChangeKind};
use reconcile_model::{Revision, VirtualGrid};
use reconcile_modes::run_surgical;
use reconcile_text::table::MarkdownTable;
use reconcile_xml::namespaces::W;
use reconcile_xml::{NodeId, XmlDocument, XmlNodeData};

#[derive(Debug, PartialEq, Eq)]
pub enum TableOutcome {
    Reconciled,
    ShapeMismatch,
}

#[derive(Clone, Copy)]
enum RowPlan {
    Keep(usize),
    Edit(usize, usize),
    Insert(usize),
    Delete(usize),
}

enum RowOp {
    Match(usize, usize),
    Delete(usize),
    Insert(usize),
}

/// Longest-common-subsequence diff over row keys, the same DP-plus-backtrack
/// shape as the word-level text diff, just at row granularity.
fn diff_rows(old_keys: &[String], new_keys: &[String]) -> Vec<RowOp> {
    let n = old_keys.len();
    let m = new_keys.len();
    let mut dp = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            dp[i][j] = if old_keys[i] == new_keys[j] {
                dp[i + 1][j + 1] + 1
            } else {
                dp[i + 1][j].max(dp[i][j + 1])
            };
        }
    }
    let mut ops = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old_keys[i] == new_keys[j] {
            ops.push(RowOp::Match(i, j));
            i += 1;
            j += 1;
        } else if dp[i + 1][j] >= dp[i][j + 1] {
            ops.push(RowOp::Delete(i));
            i += 1;
        } else {
            ops.push(RowOp::Insert(j));
            j += 1;
        }
    }
    while i < n {
        ops.push(RowOp::Delete(i));
        i += 1;
    }
    while j < m {
        ops.push(RowOp::Insert(j));
        j += 1;
    }
    ops
}

/// Plans the body-row sequence: LCS-matches whole rows first, then merges
/// an adjacent delete/insert pair into a single edit whenever their header
/// (first) column aligns, per the tie-break rule — a row whose key column
/// survived is an edit, not a drop-and-add.
fn plan_rows(grid: &VirtualGrid, md: &MarkdownTable) -> Vec<RowPlan> {
    let body_row_count = grid.row_count.saturating_sub(1);
    let old_full: Vec<String> = (0..body_row_count)
        .map(|r| grid.row_texts(r + 1).join("\u{1f}"))
        .collect();
    let new_full: Vec<String> = md.rows.iter().map(|r| r.join("\u{1f}")).collect();
    let ops = diff_rows(&old_full, &new_full);

    let plans: Vec<RowPlan> = ops
        .into_iter()
        .map(|op| match op {
            RowOp::Match(i, _j) => RowPlan::Keep(i),
            RowOp::Delete(i) => RowPlan::Delete(i),
            RowOp::Insert(j) => RowPlan::Insert(j),
        })
        .collect();

    let mut merged = Vec::with_capacity(plans.len());
    let mut idx = 0;
    while idx < plans.len() {
        if let RowPlan::Delete(i) = plans[idx] {
            if let Some(RowPlan::Insert(j)) = plans.get(idx + 1).copied() {
                let old_header = grid.row_texts(i + 1).first().cloned().unwrap_or_default();
                let new_header = md.rows[j].first().cloned().unwrap_or_default();
                if !old_header.trim().is_empty() && old_header.trim() == new_header.trim() {
                    merged.push(RowPlan::Edit(i, j));
                    idx += 2;
                    continue;
                }
            }
        }
        merged.push(plans[idx]);
        idx += 1;
    }
    merged
}

fn prepend_child(doc: &mut XmlDocument, parent: NodeId, child: NodeId) {
    if let Some(first) = doc.children(parent).next() {
        doc.insert_before(child, first);
    } else {
        doc.append_existing(parent, child);
    }
}

fn mark_row_trpr(doc: &mut XmlDocument, tr: NodeId, kind: TrackChangeKind, revision: &Revision) {
    let tr_pr = match doc.first_child_named(tr, &W::trPr()) {
        Some(existing) => existing,
        None => {
            let node = doc.new_node(XmlNodeData::element("w:trPr"));
            prepend_child(doc, tr, node);
            node
        }
    };
    let tag = match kind {
        TrackChangeKind::Insertion => "w:ins",
        TrackChangeKind::Deletion => "w:del",
    };
    let marker = doc.new_node(XmlNodeData::element_with_attrs(
        tag,
        [
            ("w:id".to_string(), revision.id.to_string()),
            ("w:author".to_string(), revision.author.clone()),
            ("w:date".to_string(), revision.date.clone()),
        ],
    ));
    doc.append_existing(tr_pr, marker);
}

/// Deletes every paragraph's content in every cell of `tr`, in place, using
/// the same span-reconciliation path a full-paragraph text deletion takes.
fn delete_row_contents(doc: &mut XmlDocument, tr: NodeId, revision: Option<&Revision>, generate_redlines: bool) {
    let cells: Vec<NodeId> = doc.children_named(tr, &W::tc()).collect();
    for tc in cells {
        let ingested = reconcile_ingest::ingest_paragraphs(doc, tc);
        for p in ingested {
            if p.info.text.is_empty() {
                continue;
            }
            let spans = p.info.spans.clone();
            let text = p.info.text.clone();
            run_surgical(doc, spans, &text, "", &[], revision, generate_redlines);
        }
    }
}

fn build_plain_cell(
    doc: &mut XmlDocument,
    text: &str,
    revision: Option<&Revision>,
    generate_redlines: bool,
) -> NodeId {
    let tc = doc.new_node(XmlNodeData::element("w:tc"));
    let p = doc.new_node(XmlNodeData::element("w:p"));
    if !text.is_empty() {
        let run = create_text_run(doc, text, None, false);
        if generate_redlines {
            if let Some(revision) = revision {
                let wrapper = create_track_change(doc, TrackChangeKind::Insertion, [run], revision);
                doc.append_existing(p, wrapper);
                doc.append_existing(tc, p);
                return tc;
            }
        }
        doc.append_existing(p, run);
    }
    doc.append_existing(tc, p);
    tc
}

fn build_inserted_row(
    doc: &mut XmlDocument,
    cells: &[String],
    col_count: usize,
    revision: Option<&Revision>,
    generate_redlines: bool,
) -> NodeId {
    let tr = doc.new_node(XmlNodeData::element("w:tr"));
    if generate_redlines {
        if let Some(revision) = revision {
            mark_row_trpr(doc, tr, TrackChangeKind::Insertion, revision);
        }
    }
    for i in 0..col_count {
        let text = cells.get(i).map(String::as_str).unwrap_or("");
        let tc = build_plain_cell(doc, text, revision, generate_redlines);
        doc.append_existing(tr, tc);
    }
    tr
}

/// Reconciles `tbl` against `md`, given a grid already ingested from it by
/// [`crate::ingest_grid::ingest_table_to_grid`] (caller must not have
/// mutated `doc` in between — row indices are positional). Returns
/// [`TableOutcome::ShapeMismatch`] when the header column counts disagree,
/// in which case the caller should fall back to reconstruction mode.
pub fn reconcile_table(
    doc: &mut XmlDocument,
    tbl: NodeId,
    grid: &VirtualGrid,
    md: &MarkdownTable,
    revision: Option<&Revision>,
    generate_redlines: bool,
) -> TableOutcome {
    if grid.col_count != md.headers.len() {
        return TableOutcome::ShapeMismatch;
    }
    let trs: Vec<NodeId> = doc.children_named(tbl, &W::tr()).collect();
    if trs.is_empty() {
        return TableOutcome::ShapeMismatch;
    }
    let body_trs = trs[1..].to_vec();

    let plans = plan_rows(grid, md);
    let mut new_trs = Vec::new();
    for plan in plans {
        match plan {
            RowPlan::Keep(i) => new_trs.push(doc.clone_subtree(body_trs[i])),
            RowPlan::Edit(i, j) => {
                let clone = doc.clone_subtree(body_trs[i]);
                let tcs: Vec<NodeId> = doc.children_named(clone, &W::tc()).collect();
                let old_row_texts = grid.row_texts(i + 1);
                for (col, tc) in tcs.iter().enumerate() {
                    let old_text = old_row_texts.get(col).cloned().unwrap_or_default();
                    let new_text = md.rows[j].get(col).cloned().unwrap_or_default();
                    if old_text == new_text {
                        continue;
                    }
                    let ingested = reconcile_ingest::ingest_paragraphs(doc, *tc);
                    if let Some(first) = ingested.into_iter().next() {
                        let spans = first.info.spans.clone();
                        run_surgical(doc, spans, &old_text, &new_text, &[], revision, generate_redlines);
                    }
                }
                new_trs.push(clone);
            }
            RowPlan::Insert(j) => {
                new_trs.push(build_inserted_row(doc, &md.rows[j], grid.col_count, revision, generate_redlines));
            }
            RowPlan::Delete(i) => {
                if generate_redlines {
                    if let Some(revision) = revision {
                        let clone = doc.clone_subtree(body_trs[i]);
                        mark_row_trpr(doc, clone, TrackChangeKind::Deletion, revision);
                        delete_row_contents(doc, clone, Some(revision), true);
                        new_trs.push(clone);
                    }
                }
                // untracked: the row simply doesn't appear in the output.
            }
        }
    }

    for &tr in &body_trs {
        doc.remove_subtree(tr);
    }
    for tr in new_trs {
        doc.append_existing(tbl, tr);
    }
    TableOutcome::Reconciled
}

/// Builds a brand-new `w:tbl` from a parsed markdown table, every row
/// wrapped as an insertion.
fn build_table_from_markdown(
    doc: &mut XmlDocument,
    md: &MarkdownTable,
    revision: Option<&Revision>,
    generate_redlines: bool,
) -> NodeId {
    let tbl = doc.new_node(XmlNodeData::element("w:tbl"));
    let header_row = build_inserted_row(doc, &md.headers, md.headers.len(), revision, generate_redlines);
    doc.append_existing(tbl, header_row);
    for row in &md.rows {
        let tr = build_inserted_row(doc, row, md.headers.len(), revision, generate_redlines);
        doc.append_existing(tbl, tr);
    }
    tbl
}

/// Marks every run directly inside `paragraph` as deleted (the whole
/// paragraph is being replaced by a new table).
fn mark_paragraph_deleted(doc: &mut XmlDocument, paragraph: NodeId, revision: Option<&Revision>, generate_redlines: bool) {
    let runs: Vec<NodeId> = doc.children_named(paragraph, &W::r()).collect();
    for run in runs {
        let rpr = doc.first_child_named(run, &W::rPr());
        let text = doc.text_content(run);
        if generate_redlines {
            if let Some(revision) = revision {
                let del_run = create_text_run(doc, &text, rpr, true);
                let wrapper = create_track_change(doc, TrackChangeKind::Deletion, [del_run], revision);
                doc.insert_before(wrapper, run);
                doc.remove_subtree(run);
                continue;
            }
        }
        doc.remove_subtree(run);
    }
}

/// Text-to-table: the original has no table in scope, but the modified
/// text parses as one. Inserts the new table before the first paragraph in
/// `paragraphs` and marks every one of those paragraphs' runs deleted.
pub fn convert_text_to_table(
    doc: &mut XmlDocument,
    container: NodeId,
    paragraphs: &[NodeId],
    md: &MarkdownTable,
    revision: Option<&Revision>,
    generate_redlines: bool,
) -> NodeId {
    let new_table = build_table_from_markdown(doc, md, revision, generate_redlines);
    match paragraphs.first() {
        Some(&first) => doc.insert_before(new_table, first),
        None => doc.append_existing(container, new_table),
    }
    for &p in paragraphs {
        mark_paragraph_deleted(doc, p, revision, generate_redlines);
    }
    new_table
}
