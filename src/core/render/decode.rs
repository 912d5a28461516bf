//! Decoder stage: escapes, entities and HTML structure to plain text.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::DEFAULT_FALLBACK;
use super::rules::{Rule, apply_all};

/// Backslash escapes as they arrive from a doubly-encoded JSON payload.
/// `\r\n` must run before the lone `\r` and `\n` forms.
static ESCAPE_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(r"\\r\\n", "\n"),
        Rule::new(r"\\r", "\n"),
        Rule::new(r"\\n", "\n"),
        Rule::new(r"\\t", "\t"),
        Rule::new(r#"\\""#, "\""),
        Rule::new(r"\\'", "'"),
    ]
});

/// Whitelisted entities, matched in a single scan so `&amp;lt;` yields `&lt;`.
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(lt|gt|amp|quot|#39|nbsp);").expect("ENTITY: hardcoded regex is valid")
});

/// Structural tags that become line breaks. Tag spans never cross a newline.
static BLOCK_TAG_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(r"(?i)<br\s*/?>", "\n"),
        Rule::new(r"(?i)<p[^>\n]*>", "\n"),
        Rule::new(r"(?i)</p>", "\n"),
        Rule::new(r"(?i)<div[^>\n]*>", "\n"),
        Rule::new(r"(?i)</div>", "\n"),
    ]
});

static LEFTOVER_TAG: LazyLock<Rule> = LazyLock::new(|| Rule::new(r"<[^>\n]*>", ""));

/// Three or more line breaks, possibly padded with whitespace, keep one blank line.
static BLANK_LINES: LazyLock<Rule> = LazyLock::new(|| Rule::new(r"\n\s*\n\s*\n", "\n\n"));

fn decode_entities(text: String) -> String {
    let out = ENTITY.replace_all(&text, |caps: &Captures| match &caps[1] {
        "lt" => "<",
        "gt" => ">",
        "amp" => "&",
        "quot" => "\"",
        "#39" => "'",
        _ => " ",
    });
    out.into_owned()
}

/// Decode a raw reply into plain text. Never fails.
///
/// An empty reply decodes as [`DEFAULT_FALLBACK`]. Entities are decoded before
/// tags are stripped, so `&lt;b&gt;` becomes a real `<b>` and is then removed.
pub fn decode(raw: &str) -> String {
    let raw = if raw.is_empty() { DEFAULT_FALLBACK } else { raw };
    let text = apply_all(&ESCAPE_RULES, raw.to_string());
    let text = decode_entities(text);
    let text = apply_all(&BLOCK_TAG_RULES, text);
    let text = LEFTOVER_TAG.apply(text);
    BLANK_LINES.apply(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_decode_once() {
        assert_eq!(decode_entities("&amp;lt;".to_string()), "&lt;");
        assert_eq!(decode_entities("&amp;quot;".to_string()), "&quot;");
    }

    #[test]
    fn entities_outside_whitelist_are_kept() {
        assert_eq!(decode_entities("&copy; &#40;".to_string()), "&copy; &#40;");
    }

    #[test]
    fn nbsp_becomes_plain_space() {
        assert_eq!(decode_entities("a&nbsp;b".to_string()), "a b");
    }
}
