use crate::span::TextSpan;
use reconcile_xml::NodeId;

/// Per-body-paragraph aggregate produced by ingestion.
#[derive(Debug, Clone)]
pub struct ParagraphInfo {
    pub paragraph: NodeId,
    pub spans: Vec<TextSpan>,
    pub text: String,
    /// CR→LF, NBSP→space normalized form, used for equality comparisons
    /// that should ignore those distinctions (`find_target_paragraph_info`).
    pub normalized_text: String,
    /// Cumulative character offset of this paragraph's first character in
    /// the whole reconstructed document text (after the paragraph-boundary
    /// policy has inserted separating `\n`s).
    pub start_offset: usize,
    pub para_id: Option<String>,
}

impl ParagraphInfo {
    pub fn end_offset(&self) -> usize {
        self.start_offset + self.text.chars().count()
    }
}

/// CR→LF, NBSP→space normalization shared by paragraph comparison and
/// `find_target_paragraph_info`'s equality/substring fallbacks.
pub fn normalize_for_comparison(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\r' => '\n',
            '\u{00A0}' => ' ',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_maps_cr_to_lf_and_nbsp_to_space() {
        let input = "a\rb\u{00A0}c";
        assert_eq!(normalize_for_comparison(input), "a\nb c");
    }
}
