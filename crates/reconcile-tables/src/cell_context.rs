//! Table-Cell Context (C12): detects the case where the caller handed the
//! engine an entire table wrapper but actually intends to edit one
//! paragraph inside a cell, isolates that paragraph for a recursive
//! reconciliation, and splices the recursive result back into its cell.
//!
//! The recursion itself (re-invoking the router with `isolatedTableCell`
//! set) lives in `reconcile-engine` — this module only owns detection and
//! the XML surgery either side of that call.

use reconcile_ingest::ingest_paragraphs;
use reconcile_xml::error::XmlError;
use reconcile_xml::namespaces::W;
use reconcile_xml::{NodeId, XmlDocument};

#[derive(Debug, Clone, Copy)]
pub struct CellMatch {
    pub cell: NodeId,
    pub paragraph: NodeId,
}

/// Selection priority: an exact `w14:paraId` match first, then an exact
/// text match of some paragraph inside a table cell, then a trimmed-text
/// match. Returns `None` when `root` has no table at all, or no cell
/// paragraph matches by any of the three criteria.
pub fn find_table_cell_target(
    doc: &XmlDocument,
    root: NodeId,
    target_paragraph_id: Option<&str>,
    original_text: &str,
) -> Option<CellMatch> {
    let tables: Vec<NodeId> = doc.descendants(root).filter(|n| doc.get(*n).is_element_named(&W::tbl())).collect();
    if tables.is_empty() {
        return None;
    }
    let cells: Vec<NodeId> = tables
        .iter()
        .flat_map(|&t| doc.descendants(t).filter(|n| doc.get(*n).is_element_named(&W::tc())))
        .collect();

    if let Some(pid) = target_paragraph_id {
        for &cell in &cells {
            for p in doc.children_named(cell, &W::p()) {
                if doc.get(p).attr("paraId") == Some(pid) {
                    return Some(CellMatch { cell, paragraph: p });
                }
            }
        }
    }

    let trimmed_target = original_text.trim();
    let mut trimmed_match = None;
    for &cell in &cells {
        for ingested in ingest_paragraphs(doc, cell) {
            if ingested.info.text == original_text {
                return Some(CellMatch {
                    cell,
                    paragraph: ingested.info.paragraph,
                });
            }
            if trimmed_match.is_none() && !trimmed_target.is_empty() && ingested.info.text.trim() == trimmed_target {
                trimmed_match = Some(CellMatch {
                    cell,
                    paragraph: ingested.info.paragraph,
                });
            }
        }
    }
    trimmed_match
}

/// Serializes `target` on its own — the fragment the router recurses into.
pub fn isolate_paragraph(doc: &XmlDocument, target: NodeId) -> String {
    doc.serialize_subtree(target)
}

/// Splices the recursive call's result (one or more sibling `w:p` elements,
/// serialized as a fragment) into `cell`, replacing `old_paragraph`.
/// Returns the newly spliced-in nodes, in order.
pub fn splice_paragraph_result(
    doc: &mut XmlDocument,
    old_paragraph: NodeId,
    replacement_xml: &str,
) -> Result<Vec<NodeId>, XmlError> {
    let fragment = format!("<w:tc>{replacement_xml}</w:tc>");
    let parsed = XmlDocument::parse(&fragment)?;
    let children: Vec<NodeId> = parsed.children(parsed.root()).collect();

    let mut imported = Vec::with_capacity(children.len());
    for child in children {
        let node = doc.import_subtree(&parsed, child);
        doc.insert_before(node, old_paragraph);
        imported.push(node);
    }
    doc.remove_subtree(old_paragraph);
    Ok(imported)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_table() -> XmlDocument {
        XmlDocument::parse(
            r#"<w:tbl>
                <w:tr><w:tc><w:p w14:paraId="AAAA0001"><w:r><w:t>Header</w:t></w:r></w:p></w:tc></w:tr>
                <w:tr><w:tc><w:p w14:paraId="AAAA0002"><w:r><w:t>Target cell</w:t></w:r></w:p></w:tc></w:tr>
            </w:tbl>"#,
        )
        .unwrap()
    }

    #[test]
    fn para_id_match_wins_over_text_match() {
        let doc = doc_with_table();
        let root = doc.root();
        let found = find_table_cell_target(&doc, root, Some("AAAA0001"), "Target cell").unwrap();
        assert_eq!(doc.text_content(found.paragraph), "Header");
    }

    #[test]
    fn exact_text_match_when_no_paraid_given() {
        let doc = doc_with_table();
        let root = doc.root();
        let found = find_table_cell_target(&doc, root, None, "Target cell").unwrap();
        assert_eq!(doc.text_content(found.paragraph), "Target cell");
    }

    #[test]
    fn trimmed_text_match_is_the_fallback() {
        let doc = doc_with_table();
        let root = doc.root();
        let found = find_table_cell_target(&doc, root, None, "  Target cell  ").unwrap();
        assert_eq!(doc.text_content(found.paragraph), "Target cell");
    }

    #[test]
    fn no_table_in_scope_returns_none() {
        let doc = XmlDocument::parse("<w:p><w:r><w:t>plain</w:t></w:r></w:p>").unwrap();
        let root = doc.root();
        assert!(find_table_cell_target(&doc, root, None, "plain").is_none());
    }

    #[test]
    fn splice_replaces_the_old_paragraph_with_the_recursive_result() {
        let mut doc = doc_with_table();
        let target = find_table_cell_target(&doc, doc.root(), None, "Target cell").unwrap();
        let replaced = splice_paragraph_result(
            &mut doc,
            target.paragraph,
            r#"<w:p><w:r><w:t>Edited cell</w:t></w:r></w:p>"#,
        )
        .unwrap();
        assert_eq!(replaced.len(), 1);
        assert_eq!(doc.text_content(target.cell), "Edited cell");
    }

    #[test]
    fn splice_supports_a_recursive_result_that_splits_into_two_paragraphs() {
        let mut doc = doc_with_table();
        let target = find_table_cell_target(&doc, doc.root(), None, "Target cell").unwrap();
        let replaced = splice_paragraph_result(
            &mut doc,
            target.paragraph,
            r#"<w:p><w:r><w:t>First</w:t></w:r></w:p><w:p><w:r><w:t>Second</w:t></w:r></w:p>"#,
        )
        .unwrap();
        assert_eq!(replaced.len(), 2);
        assert_eq!(doc.text_content(target.cell), "FirstSecond");
    }
}
