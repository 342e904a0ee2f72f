//! Turns any backend response into a [`Normalized`] result.
//!
//! Precedence: markdown fields beat structured fields for verdict and
//! confidence; structured fields beat markdown for the summary; evidence only
//! ever comes from the structured source.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

use crate::fences::strip_fences_opt;
use crate::markdown::{extract_summary, FieldPattern};
use crate::types::{Normalized, NormalizedVerdict, RawVerificationResponse, VerdictClass};

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?|\.\d+").expect("valid number regex"));

static VERDICT_FIELD: LazyLock<FieldPattern> =
    LazyLock::new(|| FieldPattern::new("Verdict").expect("valid verdict pattern"));
static CONFIDENCE_FIELD: LazyLock<FieldPattern> =
    LazyLock::new(|| FieldPattern::new("Confidence").expect("valid confidence pattern"));
static CONFIDENCE_SCORE_FIELD: LazyLock<FieldPattern> = LazyLock::new(|| {
    FieldPattern::new("Confidence Score").expect("valid confidence score pattern")
});

/// Normalizes one backend response. Never fails; missing or malformed fields
/// degrade to their absent/default values.
pub fn normalize(raw: &Value) -> Normalized {
    let raw = RawVerificationResponse::new(raw);
    if let Some(message) = raw.error() {
        debug!(%message, "backend reported an error");
        return Normalized::error(message);
    }
    Normalized::Verdict(resolve(&raw))
}

fn resolve(raw: &RawVerificationResponse<'_>) -> NormalizedVerdict {
    let doc = strip_fences_opt(raw.markdown());

    let verdict = resolve_verdict(raw, doc);
    let verdict_class = VerdictClass::classify(&verdict);
    let confidence = resolve_confidence(raw, doc);
    let summary = resolve_summary(raw, doc);
    let evidence = resolve_evidence(raw);

    NormalizedVerdict {
        verdict,
        verdict_class,
        confidence,
        summary,
        evidence,
        full_report_text: doc.to_string(),
    }
}

fn resolve_verdict(raw: &RawVerificationResponse<'_>, doc: &str) -> String {
    if let Some(v) = VERDICT_FIELD.find(doc) {
        debug!(verdict = %v, "verdict from markdown");
        return v.to_lowercase();
    }
    match raw.structured_field("verdict").and_then(scalar_text) {
        Some(v) => {
            debug!(verdict = %v, "verdict from structured field");
            v.to_lowercase()
        }
        None => NormalizedVerdict::UNVERIFIED.to_string(),
    }
}

fn resolve_confidence(raw: &RawVerificationResponse<'_>, doc: &str) -> Option<u8> {
    // "Confidence Score" only counts when "Confidence" is not found at all.
    let markdown = CONFIDENCE_FIELD
        .find(doc)
        .or_else(|| CONFIDENCE_SCORE_FIELD.find(doc));
    if let Some(text) = markdown {
        let pct = parse_confidence(&text);
        debug!(raw = %text, confidence = ?pct, "confidence from markdown");
        return pct;
    }
    let pct = match raw.structured_field("confidence")? {
        Value::Number(n) => n.as_f64().map(to_percent),
        Value::String(s) => parse_confidence(s),
        _ => None,
    };
    if let Some(pct) = pct {
        debug!(confidence = pct, "confidence from structured field");
    }
    pct
}

fn resolve_summary(raw: &RawVerificationResponse<'_>, doc: &str) -> Option<String> {
    raw.structured_field("summary")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| extract_summary(doc))
}

fn resolve_evidence(raw: &RawVerificationResponse<'_>) -> Vec<String> {
    match raw.structured_field("evidence") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// First decimal number in `s` as a 0–100 percentage.
pub fn parse_confidence(s: &str) -> Option<u8> {
    let token = NUMBER.find(s)?.as_str();
    token.parse::<f64>().ok().map(to_percent)
}

/// Values up to 1 are fractions, anything larger is already a percentage.
pub fn to_percent(value: f64) -> u8 {
    let pct = if value <= 1.0 { value * 100.0 } else { value };
    pct.round().clamp(0.0, 100.0) as u8
}

fn scalar_text(v: &Value) -> Option<String> {
    let text = match v {
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
