//! List Generation (C10): converts a paragraph plus a markdown list target
//! into N paragraphs carrying numbering properties, triggered when the
//! modified clean text contains newlines and at least one line opens with
//! a recognized list marker.

use reconcile_format::builders::{create_formatted_runs, create_text_run, create_track_change, TrackChangeKind};
use reconcile_model::{ParagraphInfo, Revision};
use reconcile_text::list_marker::{detect_indent_step, detect_marker, ListMarkerKind};
use reconcile_text::markdown::preprocess_markdown;
use reconcile_xml::namespaces::W;
use reconcile_xml::{NodeId, XmlDocument, XmlNodeData};
use std::collections::HashMap;

/// Resolves `numId`s for the numbering formats a list-generation call
/// needs, reusing one already handed out (within this call) whenever the
/// format matches, and allocating a fresh `numId`/`abstractNumId` pair
/// otherwise. The engine has no access to a document's pre-existing
/// `numbering.xml` part — that part is external (§1 "does not manage the
/// external numbering part beyond emitting a companion fragment") — so
/// reuse here is scoped to one call, matching what the engine can actually
/// observe.
pub struct NumberingAllocator {
    next_num_id: u32,
    next_abstract_num_id: u32,
    by_format: HashMap<&'static str, (u32, u32)>,
    newly_allocated: Vec<(u32, u32, &'static str)>,
}

impl Default for NumberingAllocator {
    fn default() -> Self {
        NumberingAllocator {
            next_num_id: 100,
            next_abstract_num_id: 100,
            by_format: HashMap::new(),
            newly_allocated: Vec::new(),
        }
    }
}

impl NumberingAllocator {
    pub fn resolve(&mut self, format: &'static str) -> u32 {
        if let Some(&(num_id, _)) = self.by_format.get(format) {
            return num_id;
        }
        let num_id = self.next_num_id;
        let abstract_num_id = self.next_abstract_num_id;
        self.next_num_id += 1;
        self.next_abstract_num_id += 1;
        self.by_format.insert(format, (num_id, abstract_num_id));
        self.newly_allocated.push((num_id, abstract_num_id, format));
        num_id
    }

    /// Companion `numbering.xml`-shaped fragment describing every
    /// `numId`/`abstractNumId` pair newly allocated across this call's
    /// `resolve` calls, or `None` if every format resolved to a reused id.
    pub fn companion_fragment(&self) -> Option<String> {
        if self.newly_allocated.is_empty() {
            return None;
        }
        let mut out = String::new();
        out.push_str(&format!(r#"<w:numbering xmlns:w="{}">"#, W::NS));
        for (num_id, abstract_num_id, format) in &self.newly_allocated {
            out.push_str(&format!(
                r#"<w:abstractNum w:abstractNumId="{abstract_num_id}"><w:lvl w:ilvl="0"><w:numFmt w:val="{format}"/></w:lvl></w:abstractNum>"#,
            ));
        }
        for (num_id, abstract_num_id, _) in &self.newly_allocated {
            out.push_str(&format!(
                r#"<w:num w:numId="{num_id}"><w:abstractNumId w:val="{abstract_num_id}"/></w:num>"#,
            ));
        }
        out.push_str("</w:numbering>");
        Some(out)
    }
}

fn numbering_format_name(kind: ListMarkerKind, marker_text: &str) -> &'static str {
    let has_digit = marker_text.chars().any(|c| c.is_ascii_digit());
    let first_alpha = marker_text.chars().find(|c| c.is_alphabetic());
    match kind {
        ListMarkerKind::Decimal => "decimal",
        ListMarkerKind::Bullet => "bullet",
        ListMarkerKind::Parenthesized if has_digit => "decimal",
        ListMarkerKind::Letter | ListMarkerKind::Parenthesized => {
            if first_alpha.map(|c| c.is_uppercase()).unwrap_or(false) {
                "upperLetter"
            } else {
                "lowerLetter"
            }
        }
        ListMarkerKind::Roman => {
            if first_alpha.map(|c| c.is_uppercase()).unwrap_or(false) {
                "upperRoman"
            } else {
                "lowerRoman"
            }
        }
    }
}

pub struct ListGenerationResult {
    pub paragraphs: Vec<NodeId>,
    pub numbering_fragment: Option<String>,
}

fn build_p_pr(doc: &mut XmlDocument, ilvl: usize, num_id: u32) -> NodeId {
    let p_pr = doc.new_node(XmlNodeData::element("w:pPr"));
    let num_pr = doc.new_node(XmlNodeData::element("w:numPr"));
    let ilvl_node = doc.new_node(XmlNodeData::element_with_attrs(
        "w:ilvl",
        [("w:val".to_string(), ilvl.to_string())],
    ));
    let num_id_node = doc.new_node(XmlNodeData::element_with_attrs(
        "w:numId",
        [("w:val".to_string(), num_id.to_string())],
    ));
    doc.append_existing(num_pr, ilvl_node);
    doc.append_existing(num_pr, num_id_node);
    doc.append_existing(p_pr, num_pr);
    p_pr
}

fn font_base_rpr(doc: &mut XmlDocument, font: Option<&str>) -> Option<NodeId> {
    let font = font?;
    let rpr = doc.new_node(XmlNodeData::element("w:rPr"));
    let fonts = doc.new_node(XmlNodeData::element_with_attrs(
        "w:rFonts",
        [
            ("w:ascii".to_string(), font.to_string()),
            ("w:hAnsi".to_string(), font.to_string()),
        ],
    ));
    doc.append_existing(rpr, fonts);
    Some(rpr)
}

/// Converts `target`'s single paragraph into the list described by
/// `modified_text`. §4.10 steps 1-7; the trailing empty paragraph (step 6)
/// is always appended — the source's renderer-workaround behavior, per the
/// Open Question recorded in DESIGN.md.
pub fn generate_list_paragraphs(
    doc: &mut XmlDocument,
    target: &ParagraphInfo,
    modified_text: &str,
    font: Option<&str>,
    revision: Option<&Revision>,
    generate_redlines: bool,
    allocator: &mut NumberingAllocator,
) -> ListGenerationResult {
    let lines: Vec<&str> = modified_text.lines().collect();
    let indent_step = detect_indent_step(&lines);
    let base_rpr = font_base_rpr(doc, font);

    let mut paragraphs = Vec::new();
    let mut first_item = true;

    for line in &lines {
        if line.trim().is_empty() {
            continue;
        }
        let marker = detect_marker(line);
        let p = doc.new_node(XmlNodeData::element("w:p"));

        let remainder = match &marker {
            Some(m) => &line[m.marker_len.min(line.len())..],
            None => line,
        };
        let (clean, hints) = preprocess_markdown(remainder);

        if let Some(m) = &marker {
            let indent = line.len() - line.trim_start().len();
            let ilvl = m
                .outline_depth
                .unwrap_or(indent / indent_step.max(1))
                .min(8);
            let marker_text = &line[indent..m.marker_len.min(line.len())];
            let format = numbering_format_name(m.kind, marker_text);
            let num_id = allocator.resolve(format);
            let p_pr = build_p_pr(doc, ilvl, num_id);
            doc.append_existing(p, p_pr);
        }

        if first_item && generate_redlines {
            if let Some(revision) = revision {
                let del_run = create_text_run(doc, &target.text, None, true);
                let wrapper = create_track_change(doc, TrackChangeKind::Deletion, [del_run], revision);
                doc.append_existing(p, wrapper);
            }
        }

        let runs = create_formatted_runs(doc, &clean, base_rpr, &hints, 0, false);
        if generate_redlines {
            if let Some(revision) = revision {
                if !runs.is_empty() {
                    let wrapper = create_track_change(doc, TrackChangeKind::Insertion, runs, revision);
                    doc.append_existing(p, wrapper);
                }
                paragraphs.push(p);
                first_item = false;
                continue;
            }
        }
        for run in runs {
            doc.append_existing(p, run);
        }
        paragraphs.push(p);
        first_item = false;
    }

    // Step 6: trailing empty paragraph so the host renderer doesn't keep
    // extending the list past its intended end.
    paragraphs.push(doc.new_node(XmlNodeData::element("w:p")));

    ListGenerationResult {
        paragraphs,
        numbering_fragment: allocator.companion_fragment(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(text: &str) -> ParagraphInfo {
        let mut doc = XmlDocument::parse("<w:p/>").unwrap();
        ParagraphInfo {
            paragraph: doc.root(),
            spans: vec![],
            text: text.to_string(),
            normalized_text: text.to_string(),
            start_offset: 0,
            para_id: None,
        }
    }

    fn revision() -> Revision {
        Revision {
            id: 1000,
            author: "Reconciler".into(),
            date: "2026-07-28T00:00:00Z".into(),
        }
    }

    #[test]
    fn expands_three_lettered_items_plus_trailing_empty_paragraph() {
        let mut doc = XmlDocument::parse("<w:body/>").unwrap();
        let t = target("Original");
        let mut allocator = NumberingAllocator::default();
        let result = generate_list_paragraphs(
            &mut doc,
            &t,
            "A. One\nB. Two\nC. Three",
            None,
            Some(&revision()),
            true,
            &mut allocator,
        );
        assert_eq!(result.paragraphs.len(), 4); // 3 items + trailing empty
        assert_eq!(doc.text_content(result.paragraphs[3]), "");
    }

    #[test]
    fn first_item_carries_tracked_deletion_of_original_text() {
        let mut doc = XmlDocument::parse("<w:body/>").unwrap();
        let t = target("Original");
        let mut allocator = NumberingAllocator::default();
        let result = generate_list_paragraphs(
            &mut doc,
            &t,
            "A. One\nB. Two",
            None,
            Some(&revision()),
            true,
            &mut allocator,
        );
        let first_has_del = doc
            .descendants(result.paragraphs[0])
            .any(|n| doc.get(n).tag_name() == Some("w:del"));
        let second_has_del = doc
            .descendants(result.paragraphs[1])
            .any(|n| doc.get(n).tag_name() == Some("w:del"));
        assert!(first_has_del);
        assert!(!second_has_del);
    }

    #[test]
    fn new_num_id_produces_a_companion_numbering_fragment() {
        let mut doc = XmlDocument::parse("<w:body/>").unwrap();
        let t = target("Original");
        let mut allocator = NumberingAllocator::default();
        let result = generate_list_paragraphs(
            &mut doc,
            &t,
            "- One\n- Two",
            None,
            None,
            false,
            &mut allocator,
        );
        assert!(result.numbering_fragment.is_some());
        assert!(result.numbering_fragment.unwrap().contains("bullet"));
    }

    #[test]
    fn items_get_a_numpr_with_resolved_num_id() {
        let mut doc = XmlDocument::parse("<w:body/>").unwrap();
        let t = target("Original");
        let mut allocator = NumberingAllocator::default();
        let result = generate_list_paragraphs(
            &mut doc,
            &t,
            "1. One\n2. Two",
            None,
            None,
            false,
            &mut allocator,
        );
        let p_pr = doc.first_child_named(result.paragraphs[0], &W::pPr()).unwrap();
        let num_pr = doc.first_child_named(p_pr, &W::numPr()).unwrap();
        assert!(doc.first_child_named(num_pr, &W::numId()).is_some());
    }
}
