//! Terminal presentation of chat records.

use crate::core::message::Message;

/// Default column width when the terminal size is unknown.
pub const DEFAULT_WIDTH: usize = 80;

/// Break one paragraph at word boundaries so no line exceeds `width` columns; 0 disables wrapping.
fn wrap_text(s: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![s.to_string()];
    }
    textwrap::wrap(s, width)
        .into_iter()
        .map(|cow| cow.into_owned())
        .collect()
}

/// Split a message into display lines respecting its newlines, then wrap to `width`.
pub fn wrap_message(msg: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in msg.split('\n') {
        if line.trim().is_empty() {
            out.push(String::new());
        } else {
            out.extend(wrap_text(line, width));
        }
    }
    out
}

/// Header line, optional attachment line, then the wrapped body indented by two spaces.
pub fn format_message(msg: &Message, width: usize) -> String {
    let mut out = format!("{} [{}]", msg.role().label(), msg.timestamp());
    if msg.is_error() {
        out.push_str(" (error)");
    }
    if let Some(image) = msg.attachment() {
        out.push_str(&format!("\n  [image: {}]", image.file_name));
    }
    for line in wrap_message(msg.display_text(), width.saturating_sub(2)) {
        out.push('\n');
        if !line.is_empty() {
            out.push_str("  ");
            out.push_str(&line);
        }
    }
    out
}

/// Terminal width from `COLUMNS`, falling back to [`DEFAULT_WIDTH`].
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse().ok())
        .filter(|w: &usize| *w > 10)
        .unwrap_or(DEFAULT_WIDTH)
}
