//! An owned arena over an OOXML tree.
//!
//! Nodes are [`indextree::NodeId`] indices into one [`indextree::Arena`],
//! never raw pointers: every edit goes through the arena's own
//! append/detach/insert primitives, so two spans can both hold a `NodeId`
//! for the same node without an aliasing hazard. This is the structural
//! choice the rest of the crate leans on — see the module docs on
//! `reconcile-modes` for why that matters once surgical edits start
//! splitting runs in place.

use crate::error::XmlError;
use crate::xname::XName;
use indextree::{Arena, NodeId};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use std::io::Cursor;

/// One XML node. Attribute order is preserved because OOXML readers in the
/// wild sometimes care (and because round-trip identity, property 1, is
/// cheapest to guarantee by never reordering anything we don't have to).
#[derive(Debug, Clone)]
pub enum XmlNodeData {
    /// `name` is the qualified name exactly as written in the source
    /// (`"w:r"`, not `"r"`) so re-serialization doesn't need a namespace
    /// resolver to reconstruct prefixes.
    Element {
        name: String,
        attributes: Vec<(String, String)>,
    },
    /// Already-unescaped text content.
    Text(String),
    Comment(String),
    ProcessingInstruction(String),
}

impl XmlNodeData {
    pub fn element(name: impl Into<String>) -> Self {
        XmlNodeData::Element {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn element_with_attrs(
        name: impl Into<String>,
        attrs: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        XmlNodeData::Element {
            name: name.into(),
            attributes: attrs.into_iter().collect(),
        }
    }

    pub fn is_element_named(&self, name: &XName) -> bool {
        match self {
            XmlNodeData::Element { name: tag, .. } => name.matches_prefixed(tag),
            _ => false,
        }
    }

    pub fn tag_name(&self) -> Option<&str> {
        match self {
            XmlNodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn attr(&self, local_name: &str) -> Option<&str> {
        match self {
            XmlNodeData::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k.rsplit_once(':').map(|(_, l)| l).unwrap_or(k) == local_name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn set_attr(&mut self, qualified_name: impl Into<String>, value: impl Into<String>) {
        if let XmlNodeData::Element { attributes, .. } = self {
            let name = qualified_name.into();
            let value = value.into();
            let local = name.rsplit_once(':').map(|(_, l)| l.to_string()).unwrap_or_else(|| name.clone());
            if let Some(existing) = attributes
                .iter_mut()
                .find(|(k, _)| k.rsplit_once(':').map(|(_, l)| l.to_string()).unwrap_or_else(|| k.clone()) == local)
            {
                existing.1 = value;
            } else {
                attributes.push((name, value));
            }
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            XmlNodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// An owned OOXML (or any well-formed XML) document tree.
pub struct XmlDocument {
    arena: Arena<XmlNodeData>,
    root: NodeId,
    /// Namespace `xmlns:*` declarations observed on the root, re-emitted
    /// verbatim on serialization even though the arena only tracks the
    /// `prefix:local` string form for every other element.
    pub declaration: Option<String>,
}

impl XmlDocument {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn arena(&self) -> &Arena<XmlNodeData> {
        &self.arena
    }

    pub fn get(&self, node: NodeId) -> &XmlNodeData {
        self.arena[node].get()
    }

    pub fn get_mut(&mut self, node: NodeId) -> &mut XmlNodeData {
        self.arena[node].get_mut()
    }

    pub fn new_node(&mut self, data: XmlNodeData) -> NodeId {
        self.arena.new_node(data)
    }

    pub fn append_child(&mut self, parent: NodeId, data: XmlNodeData) -> NodeId {
        let node = self.arena.new_node(data);
        parent.append(node, &mut self.arena);
        node
    }

    pub fn append_existing(&mut self, parent: NodeId, child: NodeId) {
        parent.append(child, &mut self.arena);
    }

    pub fn insert_before(&mut self, new_sibling: NodeId, reference: NodeId) {
        reference.insert_before(new_sibling, &mut self.arena);
    }

    pub fn insert_after(&mut self, new_sibling: NodeId, reference: NodeId) {
        reference.insert_after(new_sibling, &mut self.arena);
    }

    pub fn detach(&mut self, node: NodeId) {
        node.detach(&mut self.arena);
    }

    pub fn remove_subtree(&mut self, node: NodeId) {
        node.remove_subtree(&mut self.arena);
    }

    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        parent.children(&self.arena)
    }

    pub fn children_named<'a>(
        &'a self,
        parent: NodeId,
        name: &'a XName,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(parent)
            .filter(move |n| self.get(*n).is_element_named(name))
    }

    pub fn first_child_named(&self, parent: NodeId, name: &XName) -> Option<NodeId> {
        self.children_named(parent, name).next()
    }

    pub fn descendants(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.descendants(&self.arena)
    }

    /// Deep-clones a subtree, detached, ready to be appended elsewhere.
    pub fn clone_subtree(&mut self, node: NodeId) -> NodeId {
        let data = self.get(node).clone();
        let clone = self.arena.new_node(data);
        let children: Vec<NodeId> = self.children(node).collect();
        for child in children {
            let child_clone = self.clone_subtree(child);
            clone.append(child_clone, &mut self.arena);
        }
        clone
    }

    /// Concatenation of every `Text` descendant, in document order. Used for
    /// paragraph text recovery fallbacks and test assertions, not the main
    /// ingestion walk (which needs per-run offsets, not just the joined
    /// string).
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        for d in self.descendants(node) {
            if let XmlNodeData::Text(t) = self.get(d) {
                out.push_str(t);
            }
        }
        out
    }

    pub fn parse(xml: &str) -> Result<XmlDocument, XmlError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);
        let mut arena: Arena<XmlNodeData> = Arena::new();
        let mut root: Option<NodeId> = None;
        let mut stack: Vec<NodeId> = Vec::new();
        let mut buf = Vec::new();
        let mut declaration = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let node = arena.new_node(start_to_data(e));
                    attach(&mut arena, &mut stack, &mut root, node);
                    stack.push(node);
                }
                Ok(Event::Empty(ref e)) => {
                    let node = arena.new_node(start_to_data(e));
                    attach(&mut arena, &mut stack, &mut root, node);
                }
                Ok(Event::End(_)) => {
                    stack.pop();
                }
                Ok(Event::Text(ref e)) => {
                    let text = e
                        .unescape()
                        .map_err(|err| XmlError::NotWellFormed(err.to_string()))?
                        .into_owned();
                    if !text.is_empty() {
                        let node = arena.new_node(XmlNodeData::Text(text));
                        attach(&mut arena, &mut stack, &mut root, node);
                    }
                }
                Ok(Event::CData(ref e)) => {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    let node = arena.new_node(XmlNodeData::Text(text));
                    attach(&mut arena, &mut stack, &mut root, node);
                }
                Ok(Event::Comment(ref e)) => {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    let node = arena.new_node(XmlNodeData::Comment(text));
                    attach(&mut arena, &mut stack, &mut root, node);
                }
                Ok(Event::Decl(ref e)) => {
                    declaration = Some(format!(
                        "<?xml {}?>",
                        String::from_utf8_lossy(&e.to_vec()[4..]).trim_end_matches("?>").trim()
                    ));
                }
                Ok(Event::PI(ref e)) => {
                    let node = arena.new_node(XmlNodeData::ProcessingInstruction(
                        String::from_utf8_lossy(e.as_ref()).into_owned(),
                    ));
                    attach(&mut arena, &mut stack, &mut root, node);
                }
                Ok(Event::Eof) => break,
                Err(err) => return Err(XmlError::NotWellFormed(err.to_string())),
                _ => {}
            }
            buf.clear();
        }

        let root = root.ok_or(XmlError::NoRoot)?;
        Ok(XmlDocument {
            arena,
            root,
            declaration,
        })
    }

    pub fn serialize(&self) -> String {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        if let Some(decl) = &self.declaration {
            let _ = writer.get_mut().write_all(decl.as_bytes());
        }
        self.write_node(&mut writer, self.root);
        String::from_utf8(writer.into_inner().into_inner()).unwrap_or_default()
    }

    /// Serializes `node` on its own, without the document's declaration —
    /// used to isolate a single paragraph into a standalone fragment (the
    /// table-cell-context recursion).
    pub fn serialize_subtree(&self, node: NodeId) -> String {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        self.write_node(&mut writer, node);
        String::from_utf8(writer.into_inner().into_inner()).unwrap_or_default()
    }

    /// Deep-copies `node` (from `other`'s arena, which may be a different
    /// document entirely) into this document's arena, detached.
    pub fn import_subtree(&mut self, other: &XmlDocument, node: NodeId) -> NodeId {
        let data = other.get(node).clone();
        let clone = self.arena.new_node(data);
        for child in other.children(node) {
            let child_clone = self.import_subtree(other, child);
            clone.append(child_clone, &mut self.arena);
        }
        clone
    }

    fn write_node(&self, writer: &mut Writer<Cursor<Vec<u8>>>, node: NodeId) {
        match self.get(node) {
            XmlNodeData::Element { name, attributes } => {
                let mut start = BytesStart::new(name.as_str());
                for (k, v) in attributes {
                    start.push_attribute((k.as_str(), escape_attr(v).as_str()));
                }
                let children: Vec<NodeId> = self.children(node).collect();
                if children.is_empty() {
                    let _ = writer.write_event(Event::Empty(start));
                } else {
                    let _ = writer.write_event(Event::Start(start));
                    for child in children {
                        self.write_node(writer, child);
                    }
                    let _ = writer.write_event(Event::End(quick_xml::events::BytesEnd::new(
                        name.as_str(),
                    )));
                }
            }
            XmlNodeData::Text(text) => {
                let escaped = escape_text(text);
                let _ = writer.write_event(Event::Text(BytesText::from_escaped(escaped)));
            }
            XmlNodeData::Comment(text) => {
                let _ = writer.write_event(Event::Comment(
                    quick_xml::events::BytesText::from_escaped(text.clone()),
                ));
            }
            XmlNodeData::ProcessingInstruction(text) => {
                let _ = writer.write_event(Event::PI(quick_xml::events::BytesText::from_escaped(
                    text.clone(),
                )));
            }
        }
    }
}

fn attach(
    arena: &mut Arena<XmlNodeData>,
    stack: &mut Vec<NodeId>,
    root: &mut Option<NodeId>,
    node: NodeId,
) {
    if let Some(&parent) = stack.last() {
        parent.append(node, arena);
    } else if root.is_none() {
        *root = Some(node);
    }
}

fn start_to_data(e: &BytesStart) -> XmlNodeData {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let attrs = e
        .attributes()
        .filter_map(|a| a.ok())
        .map(|a| {
            let key = String::from_utf8_lossy(a.key.as_ref()).into_owned();
            let value = a
                .unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_default();
            (key, value)
        })
        .collect();
    XmlNodeData::Element {
        name,
        attributes: attrs,
    }
}

/// Per wire invariants: `<`, `>`, `&`, `"` are escaped wherever the engine
/// writes text content. Quotes are escaped too even though strictly only
/// required inside attribute values, matching the source behavior this was
/// ported from.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_attr(s: &str) -> String {
    escape_text(s)
}

#[allow(unused_imports)]
use std::io::Write as _;
