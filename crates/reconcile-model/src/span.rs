use reconcile_xml::NodeId;

/// A span discovered during in-place processing (surgical mode, format
/// application). `[char_start, char_end)` indexes the engine's reconstructed
/// plain-text stream.
///
/// Invariant: spans within one document are disjoint and sorted by
/// `char_start`; for each non-deletion text-like child (`w:t`, `w:br`,
/// `w:cr`, `w:tab`, `w:noBreakHyphen`) exactly one span is emitted.
#[derive(Debug, Clone, Copy)]
pub struct TextSpan {
    pub char_start: usize,
    pub char_end: usize,
    /// The text node itself (a `w:t`/`w:tab`/etc. element, or its textual
    /// content node for `w:t`).
    pub text_node: NodeId,
    pub run: NodeId,
    pub paragraph: NodeId,
    pub container: NodeId,
    pub run_properties: Option<NodeId>,
}

impl TextSpan {
    pub fn len(&self) -> usize {
        self.char_end - self.char_start
    }

    pub fn is_empty(&self) -> bool {
        self.char_start == self.char_end
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.char_start && offset < self.char_end
    }

    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.char_start < end && start < self.char_end
    }
}

/// Binary-search index over a sorted span list, giving O(log n) lookup by
/// character offset (C8 surgical mode's span lookup).
pub struct SpanIndex {
    starts: Vec<usize>,
    ends: Vec<usize>,
}

impl SpanIndex {
    pub fn build(spans: &[TextSpan]) -> Self {
        SpanIndex {
            starts: spans.iter().map(|s| s.char_start).collect(),
            ends: spans.iter().map(|s| s.char_end).collect(),
        }
    }

    /// Index of the span containing `offset`, if any.
    pub fn span_containing(&self, offset: usize) -> Option<usize> {
        match self.starts.binary_search(&offset) {
            Ok(i) => Some(i),
            Err(insertion_point) => {
                if insertion_point == 0 {
                    return None;
                }
                let candidate = insertion_point - 1;
                if offset < self.ends[candidate] {
                    Some(candidate)
                } else {
                    None
                }
            }
        }
    }

    /// Index of the span ending exactly at `offset`, if any.
    pub fn span_ending_at(&self, offset: usize) -> Option<usize> {
        self.ends.iter().position(|&e| e == offset)
    }

    /// Index of the last span starting before `offset`.
    pub fn last_span_before(&self, offset: usize) -> Option<usize> {
        match self.starts.binary_search(&offset) {
            Ok(0) => None,
            Ok(i) => Some(i - 1),
            Err(0) => None,
            Err(i) => Some(i - 1),
        }
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}
