//! Ingestion (C2): walks a paragraph's children in document order and
//! produces a [`RunEntry`] stream plus recovered accepted text, honoring
//! the paragraph-boundary policy so later stages never have to re-derive
//! it.

use reconcile_model::{
    join_paragraphs, normalize_for_comparison, ParagraphInfo, PrivateUseAllocator, RunEntry, RunKind,
    TextSpan, OBJECT_REPLACEMENT,
};
use reconcile_xml::namespaces::W;
use reconcile_xml::{NodeId, XmlDocument};

/// Everything one paragraph walk accumulates.
pub struct ParagraphIngest {
    pub info: ParagraphInfo,
    pub entries: Vec<RunEntry>,
}

/// Ingests every direct `w:p` child of `container` (a `w:body`, a bare
/// fragment root, or a `w:tc`), skipping any `w:tbl` children — tables are
/// ingested separately by `reconcile-tables` into a `VirtualGrid`.
pub fn ingest_paragraphs(doc: &XmlDocument, container: NodeId) -> Vec<ParagraphIngest> {
    let mut out = Vec::new();
    let mut cumulative_offset = 0usize;
    for child in doc.children(container) {
        if doc.get(child).is_element_named(&W::p()) {
            let ingested = ingest_one_paragraph(doc, child, container, cumulative_offset);
            cumulative_offset = ingested.info.end_offset() + 1; // + the boundary '\n'
            out.push(ingested);
        }
    }
    out
}

/// The joined accepted-text view across all ingested paragraphs, honoring
/// the paragraph-boundary policy (single `\n`, none trailing).
pub fn joined_text(paragraphs: &[ParagraphIngest]) -> String {
    join_paragraphs(paragraphs.iter().map(|p| p.info.text.as_str()))
}

fn ingest_one_paragraph(
    doc: &XmlDocument,
    paragraph: NodeId,
    container: NodeId,
    start_offset: usize,
) -> ParagraphIngest {
    let mut ctx = WalkCtx {
        doc,
        container,
        paragraph,
        offset: start_offset,
        text: String::new(),
        entries: Vec::new(),
        spans: Vec::new(),
        reference_chars: PrivateUseAllocator::default(),
    };
    walk_children(&mut ctx, paragraph, false);

    let para_id = doc.get(paragraph).attr("paraId").map(|s| s.to_string());

    let info = ParagraphInfo {
        paragraph,
        spans: ctx.spans,
        normalized_text: normalize_for_comparison(&ctx.text),
        text: ctx.text,
        start_offset,
        para_id,
    };
    ParagraphIngest {
        info,
        entries: ctx.entries,
    }
}

struct WalkCtx<'a> {
    doc: &'a XmlDocument,
    container: NodeId,
    paragraph: NodeId,
    offset: usize,
    text: String,
    entries: Vec<RunEntry>,
    spans: Vec<TextSpan>,
    /// Hands out a distinct private-use code point per footnote/endnote
    /// reference (§3 "Sentinel"), so each stays individually addressable
    /// in the accepted-text stream rather than collapsing onto the shared
    /// generic object-replacement placeholder.
    reference_chars: PrivateUseAllocator,
}

fn walk_children(ctx: &mut WalkCtx, parent: NodeId, in_deletion: bool) {
    let children: Vec<NodeId> = ctx.doc.children(parent).collect();
    for child in children {
        walk_node(ctx, child, in_deletion);
    }
}

fn walk_node(ctx: &mut WalkCtx, node: NodeId, in_deletion: bool) {
    let data = ctx.doc.get(node);
    if data.tag_name().is_none() {
        return; // text/comment nodes at this level carry no meaning of their own
    }

    if data.is_element_named(&W::pPr()) || data.is_element_named(&W::proofErr()) {
        return;
    }
    if data.is_element_named(&W::r()) {
        walk_run(ctx, node, in_deletion);
        return;
    }
    if data.is_element_named(&W::ins()) {
        walk_children(ctx, node, false);
        return;
    }
    if data.is_element_named(&W::del()) {
        walk_children(ctx, node, true);
        return;
    }
    if data.is_element_named(&W::hyperlink()) {
        let relationship_id = ctx.doc.get(node).attr("id").map(|s| s.to_string());
        let anchor = ctx.doc.get(node).attr("anchor").map(|s| s.to_string());
        ctx.entries.push(RunEntry {
            kind: RunKind::Hyperlink,
            text: String::new(),
            run_properties_xml: None,
            start_offset: ctx.offset,
            end_offset: ctx.offset,
            author: None,
            node_xml: Some(node),
            relationship_id,
            anchor,
        });
        walk_children(ctx, node, in_deletion);
        return;
    }
    if is_reference_container(ctx.doc, node) {
        push_reference_char(ctx, node);
        return;
    }
    if is_sentinel_container(ctx.doc, node) {
        push_sentinel_char(ctx, node);
        return;
    }
    if is_zero_width_sentinel(ctx.doc, node) {
        ctx.entries.push(RunEntry {
            kind: RunKind::ContainerStart,
            text: String::new(),
            run_properties_xml: None,
            start_offset: ctx.offset,
            end_offset: ctx.offset,
            author: None,
            node_xml: Some(node),
            relationship_id: None,
            anchor: None,
        });
        return;
    }
    // Unrecognized container: walk its children so text nested arbitrarily
    // deep (e.g. inside a future schema extension) still contributes,
    // rather than silently vanishing.
    walk_children(ctx, node, in_deletion);
}

fn is_sentinel_container(doc: &XmlDocument, node: NodeId) -> bool {
    let d = doc.get(node);
    d.is_element_named(&W::bookmarkStart())
        || d.is_element_named(&W::bookmarkEnd())
        || d.is_element_named(&W::sdt())
        || d.is_element_named(&W::oMath())
        || d.is_element_named(&W::smartTag())
        || d.is_element_named(&W::fldSimple())
        || d.is_element_named(&W::drawing())
        || d.is_element_named(&W::pict())
}

fn is_reference_container(doc: &XmlDocument, node: NodeId) -> bool {
    let d = doc.get(node);
    d.is_element_named(&W::footnoteReference()) || d.is_element_named(&W::endnoteReference())
}

fn is_zero_width_sentinel(doc: &XmlDocument, node: NodeId) -> bool {
    let d = doc.get(node);
    d.is_element_named(&W::commentRangeStart())
        || d.is_element_named(&W::commentRangeEnd())
        || d.is_element_named(&W::commentReference())
        || d.is_element_named(&W::fldChar())
        || d.is_element_named(&W::instrText())
}

fn push_sentinel_char(ctx: &mut WalkCtx, node: NodeId) {
    let start = ctx.offset;
    ctx.text.push(OBJECT_REPLACEMENT);
    ctx.offset += 1;
    ctx.entries.push(RunEntry {
        kind: RunKind::ContainerStart,
        text: OBJECT_REPLACEMENT.to_string(),
        run_properties_xml: None,
        start_offset: start,
        end_offset: ctx.offset,
        author: None,
        node_xml: Some(node),
        relationship_id: None,
        anchor: None,
    });
    ctx.spans.push(TextSpan {
        char_start: start,
        char_end: ctx.offset,
        text_node: node,
        run: node,
        paragraph: ctx.paragraph,
        container: ctx.container,
        run_properties: None,
    });
}

fn push_reference_char(ctx: &mut WalkCtx, node: NodeId) {
    let start = ctx.offset;
    let c = ctx.reference_chars.allocate();
    ctx.text.push(c);
    ctx.offset += 1;
    ctx.entries.push(RunEntry {
        kind: RunKind::ContainerStart,
        text: c.to_string(),
        run_properties_xml: None,
        start_offset: start,
        end_offset: ctx.offset,
        author: None,
        node_xml: Some(node),
        relationship_id: None,
        anchor: None,
    });
    ctx.spans.push(TextSpan {
        char_start: start,
        char_end: ctx.offset,
        text_node: node,
        run: node,
        paragraph: ctx.paragraph,
        container: ctx.container,
        run_properties: None,
    });
}

fn walk_run(ctx: &mut WalkCtx, run: NodeId, in_deletion: bool) {
    let rpr = ctx.doc.first_child_named(run, &W::rPr());
    let rpr_xml = rpr.map(|n| serialize_node(ctx.doc, n));

    let children: Vec<NodeId> = ctx.doc.children(run).collect();
    for child in children {
        let d = ctx.doc.get(child);
        if d.is_element_named(&W::rPr()) {
            continue;
        }
        let piece = if in_deletion {
            if d.is_element_named(&W::delText()) {
                Some(ctx.doc.text_content(child))
            } else {
                None
            }
        } else if d.is_element_named(&W::t()) {
            Some(ctx.doc.text_content(child))
        } else if d.is_element_named(&W::tab()) {
            Some("\t".to_string())
        } else if d.is_element_named(&W::br()) || d.is_element_named(&W::cr()) {
            Some("\n".to_string())
        } else if d.is_element_named(&W::noBreakHyphen()) {
            Some("\u{2011}".to_string())
        } else {
            None
        };

        let Some(text) = piece else { continue };
        let char_len = text.chars().count();

        if in_deletion {
            let mut entry = RunEntry::deletion(text, ctx.offset);
            entry.run_properties_xml = rpr_xml.clone();
            ctx.entries.push(entry);
        } else {
            let start = ctx.offset;
            ctx.text.push_str(&text);
            ctx.offset += char_len;
            let mut entry = RunEntry::text(text, start, ctx.offset);
            entry.run_properties_xml = rpr_xml.clone();
            ctx.entries.push(entry);
            ctx.spans.push(TextSpan {
                char_start: start,
                char_end: ctx.offset,
                text_node: child,
                run,
                paragraph: ctx.paragraph,
                container: ctx.container,
                run_properties: rpr,
            });
        }
    }
}

fn serialize_node(doc: &XmlDocument, node: NodeId) -> String {
    // Whitespace-normalized: the arena never stores insignificant
    // whitespace between elements (quick-xml events don't synthesize any),
    // so a direct recursive dump is already normalized.
    match doc.get(node) {
        reconcile_xml::XmlNodeData::Element { name, attributes } => {
            let attrs: String = attributes
                .iter()
                .map(|(k, v)| format!(" {}=\"{}\"", k, reconcile_xml::document::escape_attr(v)))
                .collect();
            let children: Vec<NodeId> = doc.children(node).collect();
            if children.is_empty() {
                format!("<{name}{attrs}/>")
            } else {
                let inner: String = children.iter().map(|c| serialize_node(doc, *c)).collect();
                format!("<{name}{attrs}>{inner}</{name}>")
            }
        }
        reconcile_xml::XmlNodeData::Text(t) => reconcile_xml::document::escape_text(t),
        _ => String::new(),
    }
}
