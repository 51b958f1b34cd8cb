//! Recognizes list markers at the start of a line: decimal (`1.`,
//! `1.2.3.`), parenthesized (`(1)`, `(a)`, `(ii)`), letter (`a.`), roman
//! (`ivx`-style `.`), and bullet (`-`, `*`, `•`). Used both by the router's
//! "is the modified text a list target" test and by list generation's
//! per-line marker classification (C10).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListMarkerKind {
    Decimal,
    Parenthesized,
    Letter,
    Roman,
    Bullet,
}

#[derive(Debug, Clone)]
pub struct ListMarker {
    pub kind: ListMarkerKind,
    /// Byte width of the marker plus its trailing whitespace in the source
    /// line — what gets sliced off before running the markdown preprocessor
    /// on the remainder of the line.
    pub marker_len: usize,
    /// Outline depth the marker's own notation implies (`1.2.3.` => 2),
    /// `None` when the marker carries no inherent depth.
    pub outline_depth: Option<usize>,
}

const BULLET_CHARS: &[char] = &['-', '*', '•'];
const ROMAN_CHARS: &[char] = &['i', 'v', 'x', 'I', 'V', 'X'];

/// Detects and classifies the marker at the start of `line`, if any. `line`
/// should already have leading whitespace measured separately (indent
/// detection is the caller's job — see `detect_indent_step`).
pub fn detect_marker(line: &str) -> Option<ListMarker> {
    let trimmed = line.trim_start();
    let indent = line.len() - trimmed.len();

    if let Some(c) = trimmed.chars().next() {
        if BULLET_CHARS.contains(&c) && trimmed[c.len_utf8()..].starts_with(char::is_whitespace) {
            return Some(ListMarker {
                kind: ListMarkerKind::Bullet,
                marker_len: indent + c.len_utf8() + 1, // marker char + one trailing whitespace byte
                outline_depth: None,
            });
        }
    }

    // Parenthesized: "(1)", "(a)", "(ii)"
    if let Some(rest) = trimmed.strip_prefix('(') {
        if let Some(close) = rest.find(')') {
            let inner = &rest[..close];
            if !inner.is_empty() {
                let kind = classify_ordinal(inner);
                if let Some(kind) = kind {
                    let after = close + 2; // '(' + inner + ')'
                    let ws = rest[close + 1..].chars().take_while(|c| c.is_whitespace()).count();
                    return Some(ListMarker {
                        kind: ListMarkerKind::Parenthesized,
                        marker_len: indent + after + ws,
                        outline_depth: None,
                    });
                }
            }
        }
    }

    // Decimal / outline / letter / roman, dot-terminated: "1.", "1.2.3.", "a.", "iv."
    if let Some(dot) = trimmed.find('.') {
        let head = &trimmed[..dot];
        if !head.is_empty() && head.chars().all(|c| c.is_ascii_digit() || c == '.') {
            let segments = head.split('.').filter(|s| !s.is_empty()).count();
            let depth = segments.saturating_sub(1);
            let ws = trimmed[dot + 1..].chars().take_while(|c| c.is_whitespace()).count();
            return Some(ListMarker {
                kind: ListMarkerKind::Decimal,
                marker_len: indent + dot + 1 + ws,
                outline_depth: if depth > 0 { Some(depth) } else { None },
            });
        }
        if head.chars().all(|c| ROMAN_CHARS.contains(&c)) && !head.is_empty() {
            let ws = trimmed[dot + 1..].chars().take_while(|c| c.is_whitespace()).count();
            return Some(ListMarker {
                kind: ListMarkerKind::Roman,
                marker_len: indent + dot + 1 + ws,
                outline_depth: None,
            });
        }
        if head.chars().count() == 1 && head.chars().next().unwrap().is_ascii_alphabetic() {
            let ws = trimmed[dot + 1..].chars().take_while(|c| c.is_whitespace()).count();
            return Some(ListMarker {
                kind: ListMarkerKind::Letter,
                marker_len: indent + dot + 1 + ws,
                outline_depth: None,
            });
        }
    }

    None
}

fn classify_ordinal(inner: &str) -> Option<ListMarkerKind> {
    if inner.chars().all(|c| c.is_ascii_digit()) {
        Some(ListMarkerKind::Decimal)
    } else if inner.chars().all(|c| ROMAN_CHARS.contains(&c)) {
        Some(ListMarkerKind::Roman)
    } else if inner.chars().count() == 1 && inner.chars().next().unwrap().is_ascii_alphabetic() {
        Some(ListMarkerKind::Letter)
    } else {
        None
    }
}

/// True when `text` should be routed through list generation: it contains a
/// newline and at least one line begins (after optional whitespace) with a
/// recognized marker.
pub fn is_list_target(text: &str) -> bool {
    text.contains('\n') && text.lines().any(|l| detect_marker(l).is_some())
}

/// Smallest non-zero difference between sorted indent widths on list
/// lines; defaults to 2 when fewer than two distinct indents are present.
pub fn detect_indent_step(lines: &[&str]) -> usize {
    let mut indents: Vec<usize> = lines
        .iter()
        .filter(|l| detect_marker(l).is_some())
        .map(|l| l.len() - l.trim_start().len())
        .collect();
    indents.sort_unstable();
    indents.dedup();
    let min_step = indents
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|&d| d > 0)
        .min();
    min_step.unwrap_or(2)
}
