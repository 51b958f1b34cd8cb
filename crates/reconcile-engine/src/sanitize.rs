//! Modified-text sanitization, §4.13 step 3: strips artifacts that leak in
//! ahead of the engine when the modified text came out of an AI assistant's
//! response rather than a clean host adapter.

use reconcile_model::is_sentinel;
use std::collections::HashSet;

/// Preamble lines a chat-style caller sometimes forgets to strip before
/// handing the engine its "modified text".
const AI_PREFIXES: &[&str] = &[
    "Sure, here's the revised text:",
    "Sure, here is the revised text:",
    "Here's the revised text:",
    "Here is the revised text:",
    "Here's the updated text:",
    "Here is the updated text:",
    "Here's the updated version:",
];

/// Strips a recognized assistant preamble, a `$\text{…}$` LaTeX-style
/// wrapper some math-mode-aware models wrap plain prose in, and literal
/// `\n` escapes that should have been real newlines.
pub fn sanitize_modified_text(text: &str) -> String {
    let trimmed = text.trim();
    let without_prefix = strip_ai_prefix(trimmed);
    let without_latex = strip_latex_text_wrapper(without_prefix);
    without_latex.replace("\\n", "\n")
}

fn strip_ai_prefix(text: &str) -> &str {
    for prefix in AI_PREFIXES {
        if let Some(rest) = text.strip_prefix(prefix) {
            return rest.trim_start();
        }
    }
    text
}

fn strip_latex_text_wrapper(text: &str) -> &str {
    text.strip_prefix("$\\text{")
        .and_then(|rest| rest.strip_suffix("}$"))
        .unwrap_or(text)
}
