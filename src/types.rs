use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Borrowing view over a backend response. The backend's shape has drifted
/// over time, so every accessor tolerates missing fields and wrong types.
#[derive(Debug, Clone, Copy)]
pub struct RawVerificationResponse<'a> {
    root: &'a Value,
}

impl<'a> RawVerificationResponse<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }

    /// Top-level `error`, only when it is a non-empty string.
    pub fn error(&self) -> Option<&'a str> {
        self.root
            .get("error")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// `result` when it is an object, otherwise the top-level object.
    /// Non-object roots (null, arrays, scalars) have no structured fields.
    pub fn structured(&self) -> Option<&'a Map<String, Value>> {
        match self.root.get("result") {
            Some(Value::Object(inner)) => Some(inner),
            _ => self.root.as_object(),
        }
    }

    /// `formatted_response` when non-empty, else `raw_final` on the structured source.
    pub fn markdown(&self) -> Option<&'a str> {
        let formatted = self
            .root
            .get("formatted_response")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty());
        formatted.or_else(|| self.structured_field("raw_final").and_then(Value::as_str))
    }

    pub fn structured_field(&self, name: &str) -> Option<&'a Value> {
        self.structured().and_then(|m| m.get(name))
    }
}

/// Coarse reading of a verdict label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictClass {
    #[serde(rename = "true-leaning")]
    TrueLeaning,
    #[serde(rename = "false-leaning")]
    FalseLeaning,
    #[serde(rename = "uncertain")]
    Uncertain,
}

impl VerdictClass {
    /// `"true"` is checked before `"false"`, so "not false, mostly true" is true-leaning.
    pub fn classify(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("true") {
            VerdictClass::TrueLeaning
        } else if lower.contains("false") {
            VerdictClass::FalseLeaning
        } else {
            VerdictClass::Uncertain
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            VerdictClass::TrueLeaning => "✅",
            VerdictClass::FalseLeaning => "❌",
            VerdictClass::Uncertain => "⚠️",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedVerdict {
    pub verdict: String,
    pub verdict_class: VerdictClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub evidence: Vec<String>,
    #[serde(default)]
    pub full_report_text: String,
}

impl NormalizedVerdict {
    pub const UNVERIFIED: &'static str = "unverified";

    pub fn unverified() -> Self {
        Self {
            verdict: Self::UNVERIFIED.to_string(),
            verdict_class: VerdictClass::Uncertain,
            confidence: None,
            summary: None,
            evidence: Vec::new(),
            full_report_text: String::new(),
        }
    }
}

/// Result of normalizing one backend response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Normalized {
    Error { error: String },
    Verdict(NormalizedVerdict),
}

impl Normalized {
    pub fn error(message: impl Into<String>) -> Self {
        Normalized::Error { error: message.into() }
    }

    pub fn verdict(&self) -> Option<&NormalizedVerdict> {
        match self {
            Normalized::Verdict(v) => Some(v),
            Normalized::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Normalized::Error { error } => Some(error),
            Normalized::Verdict(_) => None,
        }
    }
}

/// Request body for the verification backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRequest {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classify_prefers_true_over_false() {
        assert_eq!(VerdictClass::classify("Mostly TRUE"), VerdictClass::TrueLeaning);
        assert_eq!(VerdictClass::classify("false"), VerdictClass::FalseLeaning);
        assert_eq!(VerdictClass::classify("not false, true"), VerdictClass::TrueLeaning);
        assert_eq!(VerdictClass::classify("misleading"), VerdictClass::Uncertain);
    }

    #[test]
    fn structured_source_falls_back_to_top_level() {
        let wrapped = json!({"result": {"verdict": "true"}, "verdict": "false"});
        let raw = RawVerificationResponse::new(&wrapped);
        assert_eq!(raw.structured_field("verdict"), Some(&json!("true")));

        let flat = json!({"result": "not an object", "verdict": "false"});
        let raw = RawVerificationResponse::new(&flat);
        assert_eq!(raw.structured_field("verdict"), Some(&json!("false")));

        let null = Value::Null;
        assert!(RawVerificationResponse::new(&null).structured().is_none());
    }

    #[test]
    fn markdown_prefers_formatted_response() {
        let v = json!({"formatted_response": "a", "result": {"raw_final": "b"}});
        assert_eq!(RawVerificationResponse::new(&v).markdown(), Some("a"));

        let v = json!({"formatted_response": "", "result": {"raw_final": "b"}});
        assert_eq!(RawVerificationResponse::new(&v).markdown(), Some("b"));

        let v = json!({"formatted_response": 42});
        assert_eq!(RawVerificationResponse::new(&v).markdown(), None);
    }

    #[test]
    fn error_variant_serializes_as_bare_object() {
        let out = serde_json::to_value(Normalized::error("rate limited")).unwrap();
        assert_eq!(out, json!({"error": "rate limited"}));
    }

    #[test]
    fn verdict_serializes_camel_case_and_omits_absent() {
        let out = serde_json::to_value(Normalized::Verdict(NormalizedVerdict::unverified())).unwrap();
        assert_eq!(
            out,
            json!({
                "verdict": "unverified",
                "verdictClass": "uncertain",
                "evidence": [],
                "fullReportText": ""
            })
        );
    }
}
