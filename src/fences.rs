//! Removal of the outermost fenced code block around a backend document.

const FENCE: &str = "```";

/// Strips a leading ```` ```lang ```` line and a trailing ```` ``` ```` line.
///
/// Only the outermost fence is removed; fenced blocks inside the document are
/// left alone. Text without a fence is returned unchanged.
pub fn strip_fences(s: &str) -> &str {
    let body = strip_opening(s).unwrap_or(s);
    strip_closing(body).unwrap_or(body)
}

/// Same as [`strip_fences`] for a field that may be missing.
pub fn strip_fences_opt(s: Option<&str>) -> &str {
    s.map(strip_fences).unwrap_or("")
}

fn strip_opening(s: &str) -> Option<&str> {
    let rest = s.strip_prefix(FENCE)?;
    let tag_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(rest.len());
    let after_tag = &rest[tag_len..];
    after_tag
        .strip_prefix('\n')
        .or_else(|| after_tag.strip_prefix("\r\n"))
}

fn strip_closing(s: &str) -> Option<&str> {
    let trimmed = s.trim_end();
    let before = trimmed.strip_suffix(FENCE)?;
    before
        .strip_suffix("\r\n")
        .or_else(|| before.strip_suffix('\n'))
}
