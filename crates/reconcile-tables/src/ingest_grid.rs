//! Normalizes an OOXML `w:tbl` into the dense [`VirtualGrid`] (§3 "Virtual
//! Grid"), expanding `w:gridSpan` and `w:vMerge` so every logical cell
//! occupies a coordinate, continuations included.

use reconcile_ingest::{ingest_paragraphs, joined_text};
use reconcile_model::{MergeRole, VirtualCell, VirtualGrid};
use reconcile_xml::namespaces::W;
use reconcile_xml::{NodeId, XmlDocument};

#[derive(Clone, Copy, PartialEq, Eq)]
enum VMergeState {
    None,
    Restart,
    Continue,
}

fn grid_span(doc: &XmlDocument, tc: NodeId) -> usize {
    doc.first_child_named(tc, &W::tcPr())
        .and_then(|tc_pr| doc.first_child_named(tc_pr, &W::gridSpan()))
        .and_then(|gs| doc.get(gs).attr("val"))
        .and_then(|v| v.parse().ok())
        .unwrap_or(1)
        .max(1)
}

fn v_merge_state(doc: &XmlDocument, tc: NodeId) -> VMergeState {
    let Some(tc_pr) = doc.first_child_named(tc, &W::tcPr()) else {
        return VMergeState::None;
    };
    let Some(vm) = doc.first_child_named(tc_pr, &W::vMerge()) else {
        return VMergeState::None;
    };
    match doc.get(vm).attr("val") {
        Some("restart") => VMergeState::Restart,
        _ => VMergeState::Continue,
    }
}

fn cell_text(doc: &XmlDocument, tc: NodeId) -> String {
    let paragraphs = ingest_paragraphs(doc, tc);
    joined_text(&paragraphs)
}

/// Ingests every `w:tr`/`w:tc` under `tbl` into a dense grid. Column count
/// is the maximum `gridSpan`-expanded width observed across rows.
pub fn ingest_table_to_grid(doc: &XmlDocument, tbl: NodeId) -> VirtualGrid {
    let rows: Vec<NodeId> = doc.children_named(tbl, &W::tr()).collect();
    let row_count = rows.len();

    // First pass: compute each row's expanded width so the grid can be
    // sized to the widest row before any cell is placed.
    let mut row_widths = Vec::with_capacity(row_count);
    for &row in &rows {
        let width: usize = doc
            .children_named(row, &W::tc())
            .map(|tc| grid_span(doc, tc))
            .sum();
        row_widths.push(width);
    }
    let col_count = row_widths.iter().copied().max().unwrap_or(0);

    let mut grid = VirtualGrid::new(row_count, col_count.max(1));

    for (row_idx, &row) in rows.iter().enumerate() {
        let mut col = 0usize;
        for tc in doc.children_named(row, &W::tc()) {
            let span = grid_span(doc, tc);
            let state = v_merge_state(doc, tc);
            let text = cell_text(doc, tc);

            let base_role = match state {
                VMergeState::Restart => MergeRole::VMergeStart,
                VMergeState::Continue => MergeRole::VMergeContinue,
                VMergeState::None => MergeRole::None,
            };

            let origin_for_continue = if state == VMergeState::Continue && row_idx > 0 {
                match grid.get(row_idx - 1, col).map(|c| (c.merge_role, c.origin)) {
                    Some((MergeRole::VMergeStart, _)) => Some((row_idx - 1, col)),
                    Some((MergeRole::VMergeContinue, Some(origin))) => Some(origin),
                    _ => None,
                }
            } else {
                None
            };

            for offset in 0..span {
                let c = col + offset;
                if c >= grid.col_count {
                    break;
                }
                let role = if offset == 0 {
                    if span > 1 && base_role == MergeRole::None {
                        MergeRole::GridSpanOrigin
                    } else {
                        base_role
                    }
                } else {
                    MergeRole::GridSpanContinue
                };
                let origin = if offset > 0 {
                    Some((row_idx, col))
                } else if base_role == MergeRole::VMergeContinue {
                    origin_for_continue
                } else {
                    None
                };
                grid.set(
                    row_idx,
                    c,
                    VirtualCell {
                        source: Some(tc),
                        text: if offset == 0 { text.clone() } else { String::new() },
                        merge_role: role,
                        origin,
                        row_span: 1,
                        col_span: span,
                    },
                );
            }
            col += span;
        }
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_two_by_two_grid() {
        let xml = r#"<w:tbl>
            <w:tr><w:tc><w:p><w:r><w:t>A</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>B</w:t></w:r></w:p></w:tc></w:tr>
            <w:tr><w:tc><w:p><w:r><w:t>1</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>2</w:t></w:r></w:p></w:tc></w:tr>
        </w:tbl>"#;
        let doc = XmlDocument::parse(xml).unwrap();
        let grid = ingest_table_to_grid(&doc, doc.root());
        assert_eq!(grid.row_count, 2);
        assert_eq!(grid.col_count, 2);
        assert_eq!(grid.row_texts(0), vec!["A", "B"]);
        assert_eq!(grid.row_texts(1), vec!["1", "2"]);
    }

    #[test]
    fn grid_span_expands_a_wide_cell_across_columns() {
        let xml = r#"<w:tbl>
            <w:tr><w:tc><w:tcPr><w:gridSpan w:val="2"/></w:tcPr><w:p><w:r><w:t>Wide</w:t></w:r></w:p></w:tc></w:tr>
            <w:tr><w:tc><w:p><w:r><w:t>1</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>2</w:t></w:r></w:p></w:tc></w:tr>
        </w:tbl>"#;
        let doc = XmlDocument::parse(xml).unwrap();
        let grid = ingest_table_to_grid(&doc, doc.root());
        assert_eq!(grid.col_count, 2);
        assert_eq!(grid.get(0, 0).unwrap().merge_role, MergeRole::GridSpanOrigin);
        assert_eq!(grid.get(0, 1).unwrap().merge_role, MergeRole::GridSpanContinue);
        assert_eq!(grid.get(0, 1).unwrap().origin, Some((0, 0)));
    }

    #[test]
    fn vmerge_continuation_points_to_the_restart_row() {
        let xml = r#"<w:tbl>
            <w:tr><w:tc><w:tcPr><w:vMerge w:val="restart"/></w:tcPr><w:p><w:r><w:t>Tall</w:t></w:r></w:p></w:tc></w:tr>
            <w:tr><w:tc><w:tcPr><w:vMerge/></w:tcPr><w:p/></w:tc></w:tr>
        </w:tbl>"#;
        let doc = XmlDocument::parse(xml).unwrap();
        let grid = ingest_table_to_grid(&doc, doc.root());
        assert_eq!(grid.get(0, 0).unwrap().merge_role, MergeRole::VMergeStart);
        assert_eq!(grid.get(1, 0).unwrap().merge_role, MergeRole::VMergeContinue);
        assert_eq!(grid.get(1, 0).unwrap().origin, Some((0, 0)));
    }
}
