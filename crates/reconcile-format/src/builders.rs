//! Run and track-change builders (C6): the primitives every mode uses to
//! emit a `w:r`, a `w:ins`/`w:del` wrapper, or a hint-formatted run
//! sequence, instead of hand-assembling XML inline.

use crate::rpr::{snapshot_and_attach_rpr_change, write_synchronized_flags};
use reconcile_model::{Format, FormatHint, Revision};
use reconcile_xml::namespaces::{W, XML};
use reconcile_xml::{NodeId, XmlDocument, XmlNodeData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackChangeKind {
    Insertion,
    Deletion,
}

impl TrackChangeKind {
    fn tag(&self) -> &'static str {
        match self {
            TrackChangeKind::Insertion => "w:ins",
            TrackChangeKind::Deletion => "w:del",
        }
    }
}

/// `createTrackChange`: wraps `content` (already-built node(s), if any) in
/// a `w:ins`/`w:del` element carrying the revision's `w:id`/`w:author`/
/// `w:date`. Returns the wrapper, detached; the caller places it.
pub fn create_track_change(
    doc: &mut XmlDocument,
    kind: TrackChangeKind,
    content: impl IntoIterator<Item = NodeId>,
    revision: &Revision,
) -> NodeId {
    let wrapper = doc.new_node(XmlNodeData::element_with_attrs(
        kind.tag(),
        [
            ("w:id".to_string(), revision.id.to_string()),
            ("w:author".to_string(), revision.author.clone()),
            ("w:date".to_string(), revision.date.clone()),
        ],
    ));
    for child in content {
        doc.append_existing(wrapper, child);
    }
    wrapper
}

/// `createTextRun`: builds `<w:r>[rPr-clone]<w:t|w:delText xml:space="preserve">text</…></w:r>`.
/// `rpr_source`, if given, is deep-cloned into the new run so the original
/// stays usable by its current owner.
pub fn create_text_run(
    doc: &mut XmlDocument,
    text: &str,
    rpr_source: Option<NodeId>,
    is_delete: bool,
) -> NodeId {
    let run = doc.new_node(XmlNodeData::element("w:r"));
    if let Some(source) = rpr_source {
        let clone = doc.clone_subtree(source);
        if let XmlNodeData::Element { name, .. } = doc.get_mut(clone) {
            *name = "w:rPr".to_string();
        }
        doc.append_existing(run, clone);
    }
    let text_tag = if is_delete { "w:delText" } else { "w:t" };
    let text_node = doc.new_node(XmlNodeData::element_with_attrs(
        text_tag,
        [(XML::SPACE_ATTR.to_string(), XML::PRESERVE.to_string())],
    ));
    let content = doc.new_node(XmlNodeData::Text(text.to_string()));
    doc.append_existing(text_node, content);
    doc.append_existing(run, text_node);
    run
}

/// `injectFormattingToRPr`: returns a *new*, detached `w:rPr` synchronized
/// to `format`. Base children are copied except the managed formatting
/// children (`w:b`/`w:bCs`/`w:i`/`w:iCs`/`w:u`/`w:strike`) and any prior
/// `w:rPrChange`, which are replaced. When `generate_redlines` and an
/// author/revision are supplied, an `rPrChange` snapshot of `base` (as it
/// stood before this call) is attached.
pub fn inject_formatting_to_rpr(
    doc: &mut XmlDocument,
    base: Option<NodeId>,
    format: Format,
    revision: Option<&Revision>,
    generate_redlines: bool,
) -> NodeId {
    let new_rpr = doc.new_node(XmlNodeData::element("w:rPr"));

    if let Some(base) = base {
        let managed = [
            "b", "bCs", "i", "iCs", "u", "strike", "rPrChange",
        ];
        let children: Vec<NodeId> = doc.children(base).collect();
        for child in children {
            let is_managed = doc
                .get(child)
                .tag_name()
                .map(|t| {
                    let local = t.rsplit_once(':').map(|(_, l)| l).unwrap_or(t);
                    managed.contains(&local)
                })
                .unwrap_or(false);
            if !is_managed {
                let clone = doc.clone_subtree(child);
                doc.append_existing(new_rpr, clone);
            }
        }
    }

    if generate_redlines {
        if let Some(revision) = revision {
            let source = base.unwrap_or(new_rpr);
            snapshot_and_attach_rpr_change(
                doc,
                new_rpr,
                &revision.author,
                &revision.date,
                revision.id,
                source,
            );
        }
    }

    write_synchronized_flags(doc, new_rpr, format);
    new_rpr
}

/// `createFormattedRuns`: splits `text` at every hint boundary intersecting
/// `[base_offset, base_offset + text.chars().count())`, merges overlapping
/// hints (later hints' flags win over earlier ones on conflict — in
/// practice an OR merge since `Format` carries no explicit-off state), and
/// emits one run per segment with a `w:rPr` synchronized to that segment's
/// merged format. `base_rpr` seeds each segment's non-managed children
/// (font, language, etc.) so only the four managed flags vary per segment.
pub fn create_formatted_runs(
    doc: &mut XmlDocument,
    text: &str,
    base_rpr: Option<NodeId>,
    hints: &[FormatHint],
    base_offset: usize,
    is_delete: bool,
) -> Vec<NodeId> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    if len == 0 {
        return Vec::new();
    }

    let mut boundaries: Vec<usize> = vec![0, len];
    for hint in hints {
        if hint.overlaps(base_offset, base_offset + len) {
            let local_start = hint.start.saturating_sub(base_offset).min(len);
            let local_end = hint.end.saturating_sub(base_offset).min(len);
            boundaries.push(local_start);
            boundaries.push(local_end);
        }
    }
    boundaries.sort_unstable();
    boundaries.dedup();

    let mut runs = Vec::new();
    for window in boundaries.windows(2) {
        let (seg_start, seg_end) = (window[0], window[1]);
        if seg_start >= seg_end {
            continue;
        }
        let segment: String = chars[seg_start..seg_end].iter().collect();
        let abs_start = base_offset + seg_start;
        let abs_end = base_offset + seg_end;

        let mut merged = Format::default();
        for hint in hints {
            if hint.overlaps(abs_start, abs_end) {
                merged = merged.merged_with(&hint.format);
            }
        }

        let rpr = if merged.is_empty() && base_rpr.is_some() {
            let clone = doc.clone_subtree(base_rpr.unwrap());
            if let XmlNodeData::Element { name, .. } = doc.get_mut(clone) {
                *name = "w:rPr".to_string();
            }
            Some(clone)
        } else if merged.is_empty() {
            None
        } else {
            Some(inject_formatting_to_rpr(doc, base_rpr, merged, None, false))
        };

        runs.push(create_text_run(doc, &segment, rpr, is_delete));
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use reconcile_xml::namespaces::W;

    fn revision() -> Revision {
        Revision {
            id: 1000,
            author: "Reconciler".to_string(),
            date: "2026-07-28T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn create_text_run_wraps_text_with_preserve_space() {
        let mut doc = XmlDocument::parse("<root/>").unwrap();
        let run = create_text_run(&mut doc, "Hello", None, false);
        doc.append_existing(doc.root(), run);
        let out = doc.serialize();
        assert!(out.contains(r#"xml:space="preserve""#));
        assert!(out.contains("Hello"));
        assert!(out.contains("<w:t"));
    }

    #[test]
    fn create_text_run_uses_del_text_tag_for_deletions() {
        let mut doc = XmlDocument::parse("<root/>").unwrap();
        let run = create_text_run(&mut doc, "gone", None, true);
        doc.append_existing(doc.root(), run);
        let out = doc.serialize();
        assert!(out.contains("w:delText"));
        assert!(!out.contains("<w:t "));
    }

    #[test]
    fn create_track_change_carries_revision_metadata() {
        let mut doc = XmlDocument::parse("<root/>").unwrap();
        let run = create_text_run(&mut doc, "x", None, false);
        let wrapper = create_track_change(
            &mut doc,
            TrackChangeKind::Insertion,
            [run],
            &revision(),
        );
        doc.append_existing(doc.root(), wrapper);
        assert_eq!(doc.get(wrapper).tag_name(), Some("w:ins"));
        assert_eq!(doc.get(wrapper).attr("id"), Some("1000"));
        assert_eq!(doc.get(wrapper).attr("author"), Some("Reconciler"));
    }

    #[test]
    fn formatted_runs_split_at_hint_boundaries() {
        let mut doc = XmlDocument::parse("<root/>").unwrap();
        let hints = vec![FormatHint::new(
            6,
            11,
            Format {
                bold: true,
                ..Default::default()
            },
        )];
        let runs = create_formatted_runs(&mut doc, "Hello World", None, &hints, 0, false);
        assert_eq!(runs.len(), 2);
        let first_text = doc.text_content(runs[0]);
        let second_text = doc.text_content(runs[1]);
        assert_eq!(first_text, "Hello ");
        assert_eq!(second_text, "World");
        let rpr = doc.first_child_named(runs[1], &W::rPr()).unwrap();
        let b = doc.first_child_named(rpr, &W::b()).unwrap();
        assert_eq!(doc.get(b).attr("val"), Some("1"));
    }

    #[test]
    fn formatted_runs_with_no_hints_is_a_single_run() {
        let mut doc = XmlDocument::parse("<root/>").unwrap();
        let runs = create_formatted_runs(&mut doc, "plain", None, &[], 0, false);
        assert_eq!(runs.len(), 1);
    }

    #[test]
    fn inject_formatting_preserves_non_managed_children() {
        let mut doc =
            XmlDocument::parse(r#"<w:rPr><w:rFonts w:ascii="Calibri"/><w:b/></w:rPr>"#).unwrap();
        let base = doc.root();
        let new_rpr = inject_formatting_to_rpr(
            &mut doc,
            Some(base),
            Format {
                italic: true,
                ..Default::default()
            },
            Some(&revision()),
            true,
        );
        let fonts = doc.first_child_named(new_rpr, &W::rFonts());
        assert!(fonts.is_some());
        let b = doc.first_child_named(new_rpr, &W::b()).unwrap();
        assert_eq!(doc.get(b).attr("val"), Some("0"));
        let change = doc.first_child_named(new_rpr, &W::rPrChange());
        assert!(change.is_some());
    }
}
