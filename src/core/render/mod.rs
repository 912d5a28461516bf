//! Reply normalization: turns a raw assistant reply into a small markup fragment.
//!
//! Two stages run in a fixed order:
//! 1. [`decode`] literalizes escape sequences and entities, turns structural HTML into
//!    line breaks, strips the remaining tags and collapses blank lines.
//! 2. [`render`] maps the inline markdown subset to `<strong>`, `<em>`, `<del>` and `<code>`.
//!
//! The output is not reentrant: feeding it back through [`decode`] strips the emitted tags.

mod decode;
mod inline;
mod rules;

pub use decode::decode;
pub use inline::render;

/// Text shown when the service replies without any content.
pub const DEFAULT_FALLBACK: &str =
    "Thank you for your message. I'm here to help you find the perfect products!";

/// Normalize a reply, substituting [`DEFAULT_FALLBACK`] when it is absent or empty.
pub fn normalize_response(raw: Option<&str>) -> String {
    normalize_with_fallback(raw, DEFAULT_FALLBACK)
}

/// Same as [`normalize_response`] with a caller-chosen fallback text.
pub fn normalize_with_fallback(raw: Option<&str>, fallback: &str) -> String {
    let raw = match raw {
        Some(s) if !s.is_empty() => s,
        _ => fallback,
    };
    render(&decode(raw))
}
