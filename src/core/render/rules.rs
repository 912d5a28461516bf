//! Ordered string-rewrite rules shared by the decode and inline passes.

use std::borrow::Cow;

use regex::Regex;

/// One rewrite pass: every non-overlapping match of `re` becomes `replacement`.
/// The replacement may reference capture groups (`$1`).
pub(super) struct Rule {
    re: Regex,
    replacement: &'static str,
}

impl Rule {
    /// Build a rule from a hardcoded pattern.
    pub(super) fn new(pattern: &str, replacement: &'static str) -> Self {
        let re = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("rewrite rule {:?} is invalid: {}", pattern, e));
        Self { re, replacement }
    }

    pub(super) fn apply(&self, text: String) -> String {
        let rewritten = match self.re.replace_all(&text, self.replacement) {
            Cow::Borrowed(_) => None,
            Cow::Owned(out) => Some(out),
        };
        rewritten.unwrap_or(text)
    }
}

/// Run `rules` over `text` in order; each rule sees the output of the previous one.
pub(super) fn apply_all(rules: &[Rule], text: String) -> String {
    rules.iter().fold(text, |acc, rule| rule.apply(acc))
}
