//! The markdown preprocessor (C3): a single-pass deterministic state
//! machine, not a regex cascade — rewritten this way so offsets into
//! `cleanText` never depend on backtracking behavior the way a regex
//! engine's would.
//!
//! Markers are tried longest/most-specific first at every position; once a
//! position has been consumed by a match it is never re-examined, so
//! overlapping candidate markers resolve left-to-right, earliest wins.

use reconcile_model::{Format, FormatHint};

struct MarkerDef {
    open: &'static str,
    close: &'static str,
    format: Format,
    /// HTML-style markers (literal `<b>` or entity-escaped `&lt;b&gt;`)
    /// scope entity decoding of their *content* — see `preprocess_markdown`.
    is_html: bool,
}

const BOLD: Format = Format {
    bold: true,
    italic: false,
    underline: false,
    strikethrough: false,
};
const ITALIC: Format = Format {
    bold: false,
    italic: true,
    underline: false,
    strikethrough: false,
};
const UNDERLINE: Format = Format {
    bold: false,
    italic: false,
    underline: true,
    strikethrough: false,
};
const STRIKE: Format = Format {
    bold: false,
    italic: false,
    underline: false,
    strikethrough: true,
};
const BOLD_ITALIC: Format = Format {
    bold: true,
    italic: true,
    underline: false,
    strikethrough: false,
};
const BOLD_UNDERLINE: Format = Format {
    bold: true,
    italic: false,
    underline: true,
    strikethrough: false,
};

/// Longest/most-specific markers first. Composite markers (`**++`/`++**`,
/// `***`) must precede their component markers or the component would win
/// first and leave the composite's other half dangling.
const MARKERS: &[MarkerDef] = &[
    MarkerDef {
        open: "**++",
        close: "++**",
        format: BOLD_UNDERLINE,
        is_html: false,
    },
    MarkerDef {
        open: "***",
        close: "***",
        format: BOLD_ITALIC,
        is_html: false,
    },
    MarkerDef {
        open: "**",
        close: "**",
        format: BOLD,
        is_html: false,
    },
    MarkerDef {
        open: "__",
        close: "__",
        format: BOLD,
        is_html: false,
    },
    MarkerDef {
        open: "++",
        close: "++",
        format: UNDERLINE,
        is_html: false,
    },
    MarkerDef {
        open: "~~",
        close: "~~",
        format: STRIKE,
        is_html: false,
    },
    MarkerDef {
        open: "<strong>",
        close: "</strong>",
        format: BOLD,
        is_html: true,
    },
    MarkerDef {
        open: "&lt;strong&gt;",
        close: "&lt;/strong&gt;",
        format: BOLD,
        is_html: true,
    },
    MarkerDef {
        open: "<b>",
        close: "</b>",
        format: BOLD,
        is_html: true,
    },
    MarkerDef {
        open: "&lt;b&gt;",
        close: "&lt;/b&gt;",
        format: BOLD,
        is_html: true,
    },
    MarkerDef {
        open: "<em>",
        close: "</em>",
        format: ITALIC,
        is_html: true,
    },
    MarkerDef {
        open: "&lt;em&gt;",
        close: "&lt;/em&gt;",
        format: ITALIC,
        is_html: true,
    },
    MarkerDef {
        open: "<i>",
        close: "</i>",
        format: ITALIC,
        is_html: true,
    },
    MarkerDef {
        open: "&lt;i&gt;",
        close: "&lt;/i&gt;",
        format: ITALIC,
        is_html: true,
    },
    MarkerDef {
        open: "<u>",
        close: "</u>",
        format: UNDERLINE,
        is_html: true,
    },
    MarkerDef {
        open: "&lt;u&gt;",
        close: "&lt;/u&gt;",
        format: UNDERLINE,
        is_html: true,
    },
    MarkerDef {
        open: "<strike>",
        close: "</strike>",
        format: STRIKE,
        is_html: true,
    },
    MarkerDef {
        open: "&lt;strike&gt;",
        close: "&lt;/strike&gt;",
        format: STRIKE,
        is_html: true,
    },
    MarkerDef {
        open: "<del>",
        close: "</del>",
        format: STRIKE,
        is_html: true,
    },
    MarkerDef {
        open: "&lt;del&gt;",
        close: "&lt;/del&gt;",
        format: STRIKE,
        is_html: true,
    },
    MarkerDef {
        open: "<s>",
        close: "</s>",
        format: STRIKE,
        is_html: true,
    },
    MarkerDef {
        open: "&lt;s&gt;",
        close: "&lt;/s&gt;",
        format: STRIKE,
        is_html: true,
    },
    // Italic single markers last and guarded by the lookahead check below,
    // so a lone `*` in prose (a bullet, a footnote marker) that never finds
    // a partner is left as a literal character rather than opening a span
    // that swallows the rest of the paragraph.
    MarkerDef {
        open: "*",
        close: "*",
        format: ITALIC,
        is_html: false,
    },
    MarkerDef {
        open: "_",
        close: "_",
        format: ITALIC,
        is_html: false,
    },
];

/// Decodes a single entity at the start of `s`, returning the decoded
/// character and the byte length consumed, or `None` if `s` doesn't start
/// with one of the handful of entities markdown sources actually use.
fn decode_entity_at(s: &str) -> Option<(char, usize)> {
    const ENTITIES: &[(&str, char)] = &[
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&apos;", '\''),
        ("&#39;", '\''),
    ];
    ENTITIES
        .iter()
        .find(|(entity, _)| s.starts_with(entity))
        .map(|&(entity, ch)| (ch, entity.len()))
}

/// Runs the preprocessor, returning clean text (markers stripped) and the
/// format hints discovered, offsets relative to the clean text. Never
/// fails: an opening marker with no matching close anywhere ahead is left
/// as a literal run of characters.
///
/// Entity decoding is scoped to the content of an HTML-style match (§4.4:
/// "Escaped entities inside HTML-style matches are decoded"), not applied
/// globally up front — the delimiters themselves are recognized either in
/// their literal (`<b>`) or entity-escaped (`&lt;b&gt;`) form by the marker
/// table directly, and only text found inside such a match has its
/// entities decoded. Text outside any HTML-style match is passed through
/// byte-for-byte, so a literal `&amp;` appearing in ordinary prose is never
/// rewritten — required for round-trip identity against a document whose
/// accepted text already contains an escaped ampersand.
pub fn preprocess_markdown(input: &str) -> (String, Vec<FormatHint>) {
    let len = input.len();

    let mut clean = String::new();
    let mut hints = Vec::new();
    let mut stack: Vec<(&'static MarkerDef, usize)> = Vec::new();
    let mut i = 0usize;

    while i < len {
        let rest = &input[i..];

        if let Some(&(def, start)) = stack.last() {
            if rest.starts_with(def.close) {
                stack.pop();
                let end = clean.chars().count();
                if end > start {
                    hints.push(FormatHint::new(start, end, def.format));
                }
                i += def.close.len();
                continue;
            }
        }

        let opened = MARKERS.iter().find(|def| {
            rest.starts_with(def.open) && rest[def.open.len()..].contains(def.close)
        });
        if let Some(def) = opened {
            stack.push((def, clean.chars().count()));
            i += def.open.len();
            continue;
        }

        let in_html = stack.iter().any(|(def, _)| def.is_html);
        if in_html {
            if let Some((ch, consumed)) = decode_entity_at(rest) {
                clean.push(ch);
                i += consumed;
                continue;
            }
        }

        let ch = rest.chars().next().expect("i < len implies a char remains");
        clean.push(ch);
        i += ch.len_utf8();
    }

    (clean, hints)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_marker_strips_and_emits_hint() {
        let (clean, hints) = preprocess_markdown("Hello **World**");
        assert_eq!(clean, "Hello World");
        assert_eq!(hints.len(), 1);
        assert!(hints[0].format.bold);
        assert_eq!(hints[0].start, 6);
        assert_eq!(hints[0].end, 11);
    }

    #[test]
    fn underscore_bold_is_equivalent_to_star_bold() {
        let (clean, hints) = preprocess_markdown("__Strong__");
        assert_eq!(clean, "Strong");
        assert!(hints[0].format.bold);
    }

    #[test]
    fn triple_star_is_bold_and_italic() {
        let (clean, hints) = preprocess_markdown("***x***");
        assert_eq!(clean, "x");
        assert!(hints[0].format.bold && hints[0].format.italic);
    }

    #[test]
    fn nested_bold_underline_combo_marker() {
        let (clean, hints) = preprocess_markdown("**++x++**");
        assert_eq!(clean, "x");
        assert!(hints[0].format.bold && hints[0].format.underline);
    }

    #[test]
    fn single_star_italic_not_confused_with_bold() {
        let (clean, hints) = preprocess_markdown("*alone*");
        assert_eq!(clean, "alone");
        assert!(hints[0].format.italic && !hints[0].format.bold);
    }

    #[test]
    fn strikethrough_marker() {
        let (clean, hints) = preprocess_markdown("~~gone~~");
        assert_eq!(clean, "gone");
        assert!(hints[0].format.strikethrough);
    }

    #[test]
    fn html_style_tags_map_to_flags() {
        let (clean, hints) = preprocess_markdown("<strong>x</strong> and <em>y</em>");
        assert_eq!(clean, "x and y");
        assert!(hints.iter().any(|h| h.format.bold));
        assert!(hints.iter().any(|h| h.format.italic));
    }

    #[test]
    fn escaped_entity_tags_are_decoded_before_matching() {
        let (clean, hints) = preprocess_markdown("&lt;b&gt;bold&lt;/b&gt;");
        assert_eq!(clean, "bold");
        assert!(hints[0].format.bold);
    }

    #[test]
    fn unmatched_marker_is_left_as_a_literal() {
        let (clean, hints) = preprocess_markdown("price is *5 each");
        assert_eq!(clean, "price is *5 each");
        assert!(hints.is_empty());
    }

    #[test]
    fn plain_text_with_no_markers_is_unchanged() {
        let (clean, hints) = preprocess_markdown("just plain text");
        assert_eq!(clean, "just plain text");
        assert!(hints.is_empty());
    }

    #[test]
    fn a_literal_escaped_ampersand_outside_any_html_match_is_left_alone() {
        // Round-trip identity (spec.md §8 property 1) needs this: text
        // recovered from an already-escaped `w:t` must not decode
        // differently than the identical string fed back in as the
        // "modified" side.
        let (clean, hints) = preprocess_markdown("a &amp; b");
        assert_eq!(clean, "a &amp; b");
        assert!(hints.is_empty());
    }

    #[test]
    fn entities_inside_an_html_style_match_are_decoded() {
        let (clean, hints) = preprocess_markdown("<b>a &amp; b</b>");
        assert_eq!(clean, "a & b");
        assert!(hints[0].format.bold);
    }
}
