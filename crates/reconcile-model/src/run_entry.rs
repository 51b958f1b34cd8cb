use reconcile_xml::NodeId;

/// The kind of content one [`RunEntry`] contributes to the linear run model.
/// See the ingestion rules this enum is built from (`reconcile-ingest`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Text,
    Deletion,
    Insertion,
    Hyperlink,
    Bookmark,
    Field,
    ContainerStart,
    ContainerEnd,
    ParagraphStart,
}

/// One element of the linear run model produced by ingestion (C2).
///
/// Invariant: `end_offset - start_offset == text.chars().count()` for kinds
/// that contribute to accepted text; for `Deletion`, `start_offset ==
/// end_offset` (deletions never advance accepted-text offsets).
#[derive(Debug, Clone)]
pub struct RunEntry {
    pub kind: RunKind,
    pub text: String,
    /// Serialized, whitespace-normalized `w:rPr`, if the run carries one.
    pub run_properties_xml: Option<String>,
    pub start_offset: usize,
    pub end_offset: usize,
    /// Author recorded on a pre-existing tracked change this entry passes
    /// through (not the author of edits the engine is about to make).
    pub author: Option<String>,
    /// For pass-through sentinels: the original node, cloned verbatim on
    /// reconstruction rather than re-synthesized.
    pub node_xml: Option<NodeId>,
    pub relationship_id: Option<String>,
    pub anchor: Option<String>,
}

impl RunEntry {
    pub fn text(text: impl Into<String>, start_offset: usize, end_offset: usize) -> Self {
        RunEntry {
            kind: RunKind::Text,
            text: text.into(),
            run_properties_xml: None,
            start_offset,
            end_offset,
            author: None,
            node_xml: None,
            relationship_id: None,
            anchor: None,
        }
    }

    pub fn deletion(text: impl Into<String>, offset: usize) -> Self {
        RunEntry {
            kind: RunKind::Deletion,
            text: text.into(),
            run_properties_xml: None,
            start_offset: offset,
            end_offset: offset,
            author: None,
            node_xml: None,
            relationship_id: None,
            anchor: None,
        }
    }

    pub fn with_run_properties(mut self, rpr_xml: impl Into<String>) -> Self {
        self.run_properties_xml = Some(rpr_xml.into());
        self
    }

    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0 && self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_entry_offset_span_matches_its_length() {
        let entry = RunEntry::text("hi", 3, 5);
        assert_eq!(entry.len(), 2);
    }

    #[test]
    fn deletion_entry_does_not_advance_offsets() {
        let entry = RunEntry::deletion("gone", 10);
        assert_eq!(entry.start_offset, entry.end_offset);
    }
}
