//! Page title extraction.

use std::sync::LazyLock;

use regex::Regex;
use tildegen_shared::PLACEHOLDER_TITLE;

/// Matches the first `<title>...</title>`, case-sensitive and non-greedy.
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<title>(.*?)</title>").expect("title regex"));

/// Extract the first page title, or the placeholder when there is none.
///
/// The tag may appear anywhere in the document. An empty title counts as
/// missing.
pub fn extract_title(html: &str) -> String {
    TITLE_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|title| !title.is_empty())
        .unwrap_or(PLACEHOLDER_TITLE)
        .to_string()
}
