//! Field text normalization.

use std::sync::LazyLock;

use regex::Regex;

static GROUP_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.,]").expect("Failed to compile price separator regex"));

/// Strip `.` and `,` from a price.
///
/// Source prices use both as thousands separators, so they are removed rather
/// than interpreted as decimals.
pub fn normalize_price(text: &str) -> String {
    GROUP_SEPARATORS.replace_all(text, "").into_owned()
}

/// Collapse every run of whitespace into a single space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
