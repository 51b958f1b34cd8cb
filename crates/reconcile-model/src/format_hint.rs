/// Boolean formatting flags recognized by the markdown preprocessor and the
/// run property helpers. Extendable: a new flag is a new field plus a new
/// schema-ordered child in `reconcile-xml::namespaces::RPR_SCHEMA_ORDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Format {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
}

impl Format {
    pub fn is_empty(&self) -> bool {
        *self == Format::default()
    }

    /// Later flags override earlier ones only where they're explicitly set;
    /// `false` in `other` does not clear a `true` already present in `self`.
    /// Callers that want an authoritative replacement should construct the
    /// merged value directly instead of calling this twice.
    pub fn merged_with(&self, other: &Format) -> Format {
        Format {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            underline: self.underline || other.underline,
            strikethrough: self.strikethrough || other.strikethrough,
        }
    }

    pub fn differs_from(&self, other: &Format) -> bool {
        self != other
    }
}

/// A positional format record discovered while preprocessing markdown.
/// Offsets index the *clean* text (markers already stripped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatHint {
    pub start: usize,
    pub end: usize,
    pub format: Format,
}

impl FormatHint {
    pub fn new(start: usize, end: usize, format: Format) -> Self {
        FormatHint { start, end, format }
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}
