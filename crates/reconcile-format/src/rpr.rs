//! Run property helpers (C5): schema-ordered insertion, format extraction,
//! and override emission shared by every mode that touches a run's `w:rPr`.

use reconcile_model::Format;
use reconcile_xml::namespaces::{W, RPR_SCHEMA_ORDER};
use reconcile_xml::{NodeId, XmlDocument, XmlNodeData};

fn local_name(tag: &str) -> &str {
    tag.rsplit_once(':').map(|(_, l)| l).unwrap_or(tag)
}

fn schema_rank(local: &str) -> usize {
    RPR_SCHEMA_ORDER
        .iter()
        .position(|t| *t == local)
        .unwrap_or(RPR_SCHEMA_ORDER.len())
}

/// Inserts `child` into `parent` (a `w:rPr`) at the position the schema
/// table dictates, rather than appending blindly. Existing children are
/// otherwise left exactly where they were.
pub fn insert_in_schema_order(doc: &mut XmlDocument, parent: NodeId, child: NodeId) {
    let child_local = doc
        .get(child)
        .tag_name()
        .map(|t| local_name(t).to_string())
        .unwrap_or_default();
    let child_rank = schema_rank(&child_local);

    let existing: Vec<NodeId> = doc.children(parent).collect();
    let insert_before = existing.into_iter().find(|&e| {
        doc.get(e)
            .tag_name()
            .map(|t| schema_rank(local_name(t)) > child_rank)
            .unwrap_or(false)
    });

    match insert_before {
        Some(before) => doc.insert_before(child, before),
        None => doc.append_existing(parent, child),
    }
}

fn remove_children_named(doc: &mut XmlDocument, parent: NodeId, local: &str) {
    let matches: Vec<NodeId> = doc
        .children(parent)
        .filter(|&c| {
            doc.get(c)
                .tag_name()
                .map(|t| local_name(t) == local)
                .unwrap_or(false)
        })
        .collect();
    for m in matches {
        doc.remove_subtree(m);
    }
}

fn is_explicitly_off(val: Option<&str>) -> bool {
    matches!(val, Some("0") | Some("false") | Some("off"))
}

/// Parses `w:b`, `w:i`, `w:u`, `w:strike` honoring explicit off values, and
/// inspects `w:rStyle`'s id for heuristic substring hints when the direct
/// formatting children are silent on a flag.
pub fn extract_format_from_rpr(doc: &XmlDocument, rpr: NodeId) -> Format {
    let mut format = Format::default();

    if let Some(b) = doc.first_child_named(rpr, &W::b()) {
        format.bold = !is_explicitly_off(doc.get(b).attr("val"));
    }
    if let Some(i) = doc.first_child_named(rpr, &W::i()) {
        format.italic = !is_explicitly_off(doc.get(i).attr("val"));
    }
    if let Some(strike) = doc.first_child_named(rpr, &W::strike()) {
        format.strikethrough = !is_explicitly_off(doc.get(strike).attr("val"));
    }
    if let Some(u) = doc.first_child_named(rpr, &W::u()) {
        let val = doc.get(u).attr("val");
        format.underline = !(val == Some("none") || is_explicitly_off(val));
    }

    if let Some(style) = doc.first_child_named(rpr, &W::rStyle()) {
        if let Some(id) = doc.get(style).attr("val") {
            let lower = id.to_lowercase();
            if lower.contains("bold") || lower.contains("strong") {
                format.bold = true;
            }
            if lower.contains("italic") || lower.contains("emphasis") {
                format.italic = true;
            }
            if lower.contains("underline") {
                format.underline = true;
            }
            if lower.contains("strike") {
                format.strikethrough = true;
            }
        }
    }

    format
}

fn set_formatting_child(doc: &mut XmlDocument, rpr: NodeId, local: &str, add: bool) {
    remove_children_named(doc, rpr, local);
    let (qualified, val): (&str, &str) = match local {
        "b" => ("w:b", if add { "1" } else { "0" }),
        "bCs" => ("w:bCs", if add { "1" } else { "0" }),
        "i" => ("w:i", if add { "1" } else { "0" }),
        "iCs" => ("w:iCs", if add { "1" } else { "0" }),
        "u" => ("w:u", if add { "single" } else { "none" }),
        "strike" => ("w:strike", if add { "1" } else { "0" }),
        _ => return,
    };
    let node = doc.new_node(XmlNodeData::element_with_attrs(
        qualified,
        [("w:val".to_string(), val.to_string())],
    ));
    insert_in_schema_order(doc, rpr, node);
}

/// Writes explicit on/off overrides for every flag set in `format`, into
/// `rpr`, in schema order. `add = true` emits the "add" form (`w:val="1"`,
/// `w:val="single"` for underline); `add = false` emits the "remove" form.
/// Either way the intent is unambiguous to downstream readers — no reliance
/// on the absence of a child to mean "off".
pub fn apply_format_flags(doc: &mut XmlDocument, rpr: NodeId, format: Format, add: bool) {
    if format.bold {
        set_formatting_child(doc, rpr, "b", add);
        set_formatting_child(doc, rpr, "bCs", add);
    }
    if format.italic {
        set_formatting_child(doc, rpr, "i", add);
        set_formatting_child(doc, rpr, "iCs", add);
    }
    if format.underline {
        set_formatting_child(doc, rpr, "u", add);
    }
    if format.strikethrough {
        set_formatting_child(doc, rpr, "strike", add);
    }
}

/// Writes an explicit on/off value for all four managed flags
/// (bold/italic/underline/strikethrough), not just the ones turned on —
/// the "each written with explicit on/off value to make the intent
/// unambiguous to downstream readers" rule from §4.6. Used wherever a run's
/// `w:rPr` is being fully synchronized to a target `Format` rather than
/// incrementally patched (C6 builders, C7 format swaps).
pub fn write_synchronized_flags(doc: &mut XmlDocument, rpr: NodeId, format: Format) {
    set_formatting_child(doc, rpr, "b", format.bold);
    set_formatting_child(doc, rpr, "bCs", format.bold);
    set_formatting_child(doc, rpr, "i", format.italic);
    set_formatting_child(doc, rpr, "iCs", format.italic);
    set_formatting_child(doc, rpr, "u", format.underline);
    set_formatting_child(doc, rpr, "strike", format.strikethrough);
}

/// Removes any pre-existing `w:rPrChange` from `rpr`, clones `source` (the
/// pre-edit state — usually `rpr` itself, captured before this call's other
/// mutations land) with its own prior `w:rPrChange` stripped, and attaches
/// it as the new snapshot.
pub fn snapshot_and_attach_rpr_change(
    doc: &mut XmlDocument,
    rpr: NodeId,
    author: &str,
    date: &str,
    id: u32,
    source: NodeId,
) {
    remove_children_named(doc, rpr, "rPrChange");

    let snapshot = doc.clone_subtree(source);
    if let XmlNodeData::Element { name, .. } = doc.get_mut(snapshot) {
        *name = "w:rPr".to_string();
    }
    remove_children_named(doc, snapshot, "rPrChange");

    let change = doc.new_node(XmlNodeData::element_with_attrs(
        "w:rPrChange",
        [
            ("w:id".to_string(), id.to_string()),
            ("w:author".to_string(), author.to_string()),
            ("w:date".to_string(), date.to_string()),
        ],
    ));
    doc.append_existing(change, snapshot);
    insert_in_schema_order(doc, rpr, change);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bold_from_direct_child() {
        let xml = r#"<w:rPr><w:b/></w:rPr>"#;
        let doc = XmlDocument::parse(xml).unwrap();
        let format = extract_format_from_rpr(&doc, doc.root());
        assert!(format.bold);
    }

    #[test]
    fn explicit_off_value_is_honored() {
        let xml = r#"<w:rPr><w:b w:val="0"/></w:rPr>"#;
        let doc = XmlDocument::parse(xml).unwrap();
        let format = extract_format_from_rpr(&doc, doc.root());
        assert!(!format.bold);
    }

    #[test]
    fn underline_none_counts_as_off() {
        let xml = r#"<w:rPr><w:u w:val="none"/></w:rPr>"#;
        let doc = XmlDocument::parse(xml).unwrap();
        let format = extract_format_from_rpr(&doc, doc.root());
        assert!(!format.underline);
    }

    #[test]
    fn rstyle_substring_hints_at_bold() {
        let xml = r#"<w:rPr><w:rStyle w:val="StrongEmphasis"/></w:rPr>"#;
        let doc = XmlDocument::parse(xml).unwrap();
        let format = extract_format_from_rpr(&doc, doc.root());
        assert!(format.bold);
    }

    #[test]
    fn schema_order_places_b_before_i_and_u() {
        let mut doc = XmlDocument::parse("<w:rPr/>").unwrap();
        let rpr = doc.root();
        let u = doc.new_node(XmlNodeData::element_with_attrs(
            "w:u",
            [("w:val".to_string(), "single".to_string())],
        ));
        insert_in_schema_order(&mut doc, rpr, u);
        let b = doc.new_node(XmlNodeData::element_with_attrs(
            "w:b",
            [("w:val".to_string(), "1".to_string())],
        ));
        insert_in_schema_order(&mut doc, rpr, b);
        let children: Vec<String> = doc
            .children(rpr)
            .map(|c| doc.get(c).tag_name().unwrap().to_string())
            .collect();
        assert_eq!(children, vec!["w:b", "w:u"]);
    }

    #[test]
    fn synchronized_flags_write_explicit_off_for_unset_flags() {
        let mut doc = XmlDocument::parse("<w:rPr/>").unwrap();
        let rpr = doc.root();
        write_synchronized_flags(
            &mut doc,
            rpr,
            Format {
                bold: true,
                italic: false,
                underline: false,
                strikethrough: false,
            },
        );
        let b = doc.first_child_named(rpr, &W::b()).unwrap();
        assert_eq!(doc.get(b).attr("val"), Some("1"));
        let i = doc.first_child_named(rpr, &W::i()).unwrap();
        assert_eq!(doc.get(i).attr("val"), Some("0"));
        let u = doc.first_child_named(rpr, &W::u()).unwrap();
        assert_eq!(doc.get(u).attr("val"), Some("none"));
    }

    #[test]
    fn rpr_change_is_appended_after_everything_else() {
        let mut doc = XmlDocument::parse(r#"<w:rPr><w:b w:val="1"/></w:rPr>"#).unwrap();
        let rpr = doc.root();
        snapshot_and_attach_rpr_change(&mut doc, rpr, "author", "2026-07-28T00:00:00Z", 1000, rpr);
        let children: Vec<String> = doc
            .children(rpr)
            .map(|c| doc.get(c).tag_name().unwrap().to_string())
            .collect();
        assert_eq!(children.last().unwrap(), "w:rPrChange");
    }
}
