//! Field and section lookup in the markdown documents the backend returns.
//!
//! The backend's formatting is not fixed: emphasis, punctuation and spacing
//! vary between versions. Fields are therefore looked up with three
//! progressively looser patterns, and the first one that produces a value wins.

use regex::Regex;
use std::sync::LazyLock;

/// Whitespace that does not cross a line break; values run to end of line.
const HSPACE: &str = r"[^\S\r\n]*";

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{2,3}\s+(.*)$").expect("valid heading regex"));

/// Which pattern produced a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// `**Label:** value` and friends.
    Emphasized,
    /// `Label: value` at the start of a line, emphasis removed.
    Line,
    /// `Label value` anywhere; value is a number or a single word.
    Loose,
}

/// The three lookup patterns for one label, compiled once.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    emphasized: Regex,
    line: Regex,
    loose: Regex,
}

impl FieldPattern {
    /// `label` is matched case-insensitively as literal text.
    pub fn new(label: &str) -> Result<Self, regex::Error> {
        let label = regex::escape(label.trim());
        Ok(Self {
            emphasized: Regex::new(&format!(
                r"(?i)\*+\s*{label}\s*\*+[:：]?{HSPACE}([^\n\r]+)"
            ))?,
            line: Regex::new(&format!(
                r"(?im)^{HSPACE}{label}{HSPACE}[:：]{HSPACE}([^\n\r]+)"
            ))?,
            loose: Regex::new(&format!(r"(?i){label}\s*[:：]?\s*([0-9.]+|\w+)"))?,
        })
    }

    /// Trimmed value of the field in `doc`.
    pub fn find(&self, doc: &str) -> Option<String> {
        self.find_with_tier(doc).map(|(value, _)| value)
    }

    pub fn find_with_tier(&self, doc: &str) -> Option<(String, MatchTier)> {
        if doc.is_empty() {
            return None;
        }
        if let Some(v) = first_capture(&self.emphasized, doc) {
            return Some((v, MatchTier::Emphasized));
        }
        let plain = doc.replace('*', "");
        if let Some(v) = first_capture(&self.line, &plain) {
            return Some((v, MatchTier::Line));
        }
        first_capture(&self.loose, doc).map(|v| (v, MatchTier::Loose))
    }
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures_iter(text).find_map(|caps| {
        let value = caps.get(1)?.as_str().trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Body of the first `## Summary` / `### Summary` section, lines joined by a space.
pub fn extract_summary(doc: &str) -> Option<String> {
    let mut lines = doc.lines();
    lines.by_ref().find(|l| is_summary_heading(l))?;

    let body = lines
        .take_while(|l| heading_text(l).is_none())
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    (!body.is_empty()).then_some(body)
}

/// Text of a level-2 or level-3 heading.
fn heading_text(line: &str) -> Option<&str> {
    HEADING
        .captures(line.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

fn is_summary_heading(line: &str) -> bool {
    heading_text(line).is_some_and(|t| t.eq_ignore_ascii_case("summary"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(doc: &str, label: &str) -> Option<String> {
        FieldPattern::new(label).unwrap().find(doc)
    }

    fn field_with_tier(doc: &str, label: &str) -> Option<(String, MatchTier)> {
        FieldPattern::new(label).unwrap().find_with_tier(doc)
    }

    #[test]
    fn emphasized_label_with_trailing_colon() {
        let doc = "**Verdict**: Mostly True\n**Confidence**: 0.8";
        assert_eq!(
            field_with_tier(doc, "Verdict"),
            Some(("Mostly True".to_string(), MatchTier::Emphasized))
        );
    }

    #[test]
    fn bold_label_with_colon_inside_falls_to_line_tier() {
        let doc = "**Verdict:** False\n";
        assert_eq!(
            field_with_tier(doc, "verdict"),
            Some(("False".to_string(), MatchTier::Line))
        );
    }

    #[test]
    fn fullwidth_colon_is_accepted() {
        assert_eq!(field("Verdict： True", "Verdict").as_deref(), Some("True"));
    }

    #[test]
    fn loose_form_takes_number_or_word() {
        assert_eq!(
            field_with_tier("Confidence 73 percent", "Confidence"),
            Some(("73".to_string(), MatchTier::Loose))
        );
        assert_eq!(
            field("The verdict false was reached", "Verdict").as_deref(),
            Some("false")
        );
    }

    #[test]
    fn label_is_matched_literally() {
        assert_eq!(field("Score (0-1): 0.4", "Score (0-1)").as_deref(), Some("0.4"));
        assert_eq!(field("Verdict: yes", "V.rdict"), None);
    }

    #[test]
    fn missing_label_is_none() {
        assert_eq!(field("nothing to see", "Verdict"), None);
        assert_eq!(field("", "Verdict"), None);
    }

    #[test]
    fn empty_emphasized_value_falls_through() {
        let doc = "**Verdict**:   \nVerdict: True";
        assert_eq!(field("**Verdict**:\u{20}\u{20}", "Verdict"), None);
        assert_eq!(field(doc, "Verdict").as_deref(), Some("True"));
    }

    #[test]
    fn one_pattern_serves_many_documents() {
        let verdict = FieldPattern::new("Verdict").unwrap();
        assert_eq!(verdict.find("**Verdict**: True").as_deref(), Some("True"));
        assert_eq!(verdict.find("Verdict: False").as_deref(), Some("False"));
        assert_eq!(verdict.find("no label here"), None);
    }

    #[test]
    fn summary_stops_at_next_heading() {
        let doc = "### Summary\nLine one.\nLine two.\n### Evidence\n- a\n- b";
        assert_eq!(extract_summary(doc).as_deref(), Some("Line one. Line two."));
    }

    #[test]
    fn summary_heading_is_case_insensitive_and_level_two_works() {
        let doc = "# Report\n  ## SUMMARY  \n\n  spaced   \n\nmore\n## Next\nignored";
        assert_eq!(extract_summary(doc).as_deref(), Some("spaced more"));
    }

    #[test]
    fn summary_requires_exact_heading_text() {
        assert_eq!(extract_summary("### Summary of findings\nbody"), None);
        assert_eq!(extract_summary("#### Summary\nbody"), None);
        assert_eq!(extract_summary("Summary\nbody"), None);
    }

    #[test]
    fn empty_summary_section_is_none() {
        assert_eq!(extract_summary("## Summary\n\n## Evidence\nx"), None);
    }

    #[test]
    fn deeper_headings_do_not_end_the_summary() {
        let doc = "## Summary\nfirst\n#### detail\nsecond";
        assert_eq!(extract_summary(doc).as_deref(), Some("first #### detail second"));
    }
}
