//! Placeholder code points that protect non-text OOXML children from being
//! diffed as text (§3 "Sentinel"). Most embedded objects get the Unicode
//! object-replacement character; footnote/endnote references get a
//! private-use code point so each one stays individually addressable.

/// Generic embedded-object placeholder (drawings, `w:sdt`, `w:oMath`,
/// smart tags, complex fields, bookmarks treated as opaque, comment range
/// markers).
pub const OBJECT_REPLACEMENT: char = '\u{FFFC}';

/// Start of the private-use range this engine allocates footnote/endnote
/// reference sentinels from. Each reference gets one code point; the
/// mapping back to its source node lives in `ReferenceMap` in
/// `reconcile-modes`.
pub const PRIVATE_USE_BASE: u32 = 0xE000;
pub const PRIVATE_USE_END: u32 = 0xF8FF;

/// Allocates sequential private-use sentinels, wrapping (with a warning from
/// the caller, not here) if the reference count ever exceeds the range —
/// in practice no single fragment has anywhere near 6400 footnotes.
pub struct PrivateUseAllocator {
    next: u32,
}

impl Default for PrivateUseAllocator {
    fn default() -> Self {
        PrivateUseAllocator {
            next: PRIVATE_USE_BASE,
        }
    }
}

impl PrivateUseAllocator {
    pub fn allocate(&mut self) -> char {
        let cp = self.next;
        if self.next < PRIVATE_USE_END {
            self.next += 1;
        }
        char::from_u32(cp).unwrap_or(OBJECT_REPLACEMENT)
    }
}

pub fn is_sentinel(c: char) -> bool {
    c == OBJECT_REPLACEMENT || (c as u32) >= PRIVATE_USE_BASE && (c as u32) <= PRIVATE_USE_END
}
