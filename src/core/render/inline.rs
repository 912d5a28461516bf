//! Inline markdown subset: bold, italic, strikethrough and inline code.

use std::sync::LazyLock;

use super::rules::{Rule, apply_all};

/// Double delimiters go first so `**x**` is not read as two italic spans.
/// Spans are shortest-match and never cross a line break; CRLF mode (`R`) keeps
/// `.` from matching a bare `\r` as well as `\n`.
static INLINE_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(r"(?R)\*\*(.*?)\*\*", "<strong>$1</strong>"),
        Rule::new(r"(?R)\*(.*?)\*", "<em>$1</em>"),
        Rule::new(r"(?R)__(.*?)__", "<strong>$1</strong>"),
        Rule::new(r"(?R)_(.*?)_", "<em>$1</em>"),
        Rule::new(r"(?R)~~(.*?)~~", "<del>$1</del>"),
        Rule::new(r"(?R)`(.*?)`", "<code>$1</code>"),
    ]
});

/// Render decoded text to markup and trim surrounding whitespace. Never fails.
pub fn render(decoded: &str) -> String {
    apply_all(&INLINE_RULES, decoded.to_string()).trim().to_string()
}
