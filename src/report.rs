//! Plain-text and markdown exports of a normalized verdict.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use unicode_segmentation::UnicodeSegmentation;

use crate::types::NormalizedVerdict;

/// Evidence items shown in compact views. Exports always carry the full list.
pub const SUMMARY_EVIDENCE_LIMIT: usize = 3;
pub const CONTENT_PREVIEW_GRAPHEMES: usize = 1000;
const FOOTER: &str = "Generated by TruthGuard";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    #[default]
    Full,
    Selection,
}

impl ScanMode {
    pub fn label(&self) -> &'static str {
        match self {
            ScanMode::Full => "Full Page Scan",
            ScanMode::Selection => "Selection Scan",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Markdown,
}

/// Where the checked text came from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportContext {
    pub title: String,
    pub page_title: Option<String>,
    pub url: Option<String>,
    pub scanned_at: String,
    pub mode: ScanMode,
    pub content: Option<String>,
}

impl ReportContext {
    pub fn new(mode: ScanMode) -> Self {
        let title = match mode {
            ScanMode::Full => "TruthGuard Fact Check Report".to_string(),
            ScanMode::Selection => "TruthGuard Fact Check Report (Selection)".to_string(),
        };
        Self {
            title,
            scanned_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            mode,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn of(confidence: u8) -> Self {
        match confidence {
            80.. => ConfidenceBand::High,
            50..=79 => ConfidenceBand::Medium,
            _ => ConfidenceBand::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceBand::High => "high",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::Low => "low",
        }
    }
}

/// Compact projection used by cards and overlays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidenceView<'a> {
    pub items: &'a [String],
    pub hidden: usize,
}

impl<'a> EvidenceView<'a> {
    pub fn summarized(verdict: &'a NormalizedVerdict) -> Self {
        let shown = verdict.evidence.len().min(SUMMARY_EVIDENCE_LIMIT);
        Self {
            items: &verdict.evidence[..shown],
            hidden: verdict.evidence.len() - shown,
        }
    }
}

pub fn render(format: ReportFormat, ctx: &ReportContext, verdict: &NormalizedVerdict) -> String {
    match format {
        ReportFormat::Text => render_text(ctx, verdict),
        ReportFormat::Markdown => render_markdown(ctx, verdict),
    }
}

pub fn render_text(ctx: &ReportContext, verdict: &NormalizedVerdict) -> String {
    let mut out = String::new();
    let rule = "=".repeat(ctx.title.chars().count());
    let _ = writeln!(out, "{}\n{rule}\n", ctx.title.to_uppercase());

    let _ = writeln!(out, "Article Information:");
    let _ = writeln!(out, "- Title: {}", ctx.page_title.as_deref().unwrap_or("Untitled"));
    let _ = writeln!(out, "- URL: {}", ctx.url.as_deref().unwrap_or("n/a"));
    let _ = writeln!(out, "- Scanned at: {}", ctx.scanned_at);
    let _ = writeln!(out, "- Mode: {}\n", ctx.mode.label());

    let _ = writeln!(out, "Verification Result:");
    let _ = writeln!(out, "- Verdict: {}", verdict.verdict.to_uppercase());
    let _ = writeln!(out, "- Confidence: {}\n", confidence_display(verdict.confidence));

    if let Some(summary) = &verdict.summary {
        let _ = writeln!(out, "Summary:\n{summary}\n");
    }
    if !verdict.evidence.is_empty() {
        let _ = writeln!(out, "Evidence:");
        for (i, item) in verdict.evidence.iter().enumerate() {
            let _ = writeln!(out, "{}. {item}", i + 1);
        }
        out.push('\n');
    }
    if let Some(content) = ctx.content.as_deref().filter(|c| !c.is_empty()) {
        let _ = writeln!(out, "Content Preview:\n{}\n", preview(content, CONTENT_PREVIEW_GRAPHEMES));
    }
    if !verdict.full_report_text.is_empty() {
        let _ = writeln!(out, "Full Analysis Report:\n{}\n", verdict.full_report_text);
    }
    let _ = writeln!(out, "---\n{FOOTER}");
    out
}

pub fn render_markdown(ctx: &ReportContext, verdict: &NormalizedVerdict) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", ctx.title);

    let _ = writeln!(out, "## Article Information");
    let _ = writeln!(out, "- **Title:** {}", ctx.page_title.as_deref().unwrap_or("Untitled"));
    let _ = writeln!(out, "- **URL:** {}", ctx.url.as_deref().unwrap_or("n/a"));
    let _ = writeln!(out, "- **Scanned at:** {}", ctx.scanned_at);
    let _ = writeln!(out, "- **Mode:** {}\n", ctx.mode.label());

    if let Some(content) = ctx.content.as_deref().filter(|c| !c.is_empty()) {
        let _ = writeln!(out, "## Content\n\n{}\n\n---\n", preview(content, CONTENT_PREVIEW_GRAPHEMES));
    }

    let _ = writeln!(out, "## Verification Result\n");
    let _ = writeln!(
        out,
        "- **Verdict:** {} {}",
        verdict.verdict_class.icon(),
        verdict.verdict.to_uppercase()
    );
    let _ = writeln!(out, "- **Confidence:** {}", confidence_display(verdict.confidence));
    if let Some(summary) = &verdict.summary {
        let _ = writeln!(out, "- **Summary:** {summary}");
    }
    out.push('\n');

    if !verdict.evidence.is_empty() {
        let _ = writeln!(out, "## Evidence\n");
        for (i, item) in verdict.evidence.iter().enumerate() {
            let _ = writeln!(out, "{}. {item}", i + 1);
        }
        out.push('\n');
    }
    if !verdict.full_report_text.is_empty() {
        let _ = writeln!(out, "## Full Analysis Report\n\n{}\n", verdict.full_report_text);
    }
    let _ = writeln!(out, "---\n\n*{FOOTER} ({})*", ctx.mode.label());
    out
}

/// Absent confidence is shown as unknown, never as 0%.
pub fn confidence_display(confidence: Option<u8>) -> String {
    match confidence {
        Some(c) => format!("{c}% ({})", ConfidenceBand::of(c).label()),
        None => "unknown".to_string(),
    }
}

/// First `limit` graphemes of `text`, with `...` appended when cut.
pub fn preview(text: &str, limit: usize) -> String {
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(limit).collect();
    if graphemes.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
