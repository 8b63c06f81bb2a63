//! Deterministic Markdown report formatting.
//!
//! Renders an intelligence brief into one of two fixed report variants.
//! No randomness, no network: the same brief and date always produce
//! byte-identical Markdown. The output is handed to an external
//! Markdown-to-PDF renderer; this crate knows nothing about PDF.

mod templates;

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use dealbrief_shared::{DealBriefError, IntelligenceBrief, Result};

/// Date format stamped into report headers.
const DATE_FORMAT: &str = "%B %d, %Y";

// ---------------------------------------------------------------------------
// ReportType
// ---------------------------------------------------------------------------

/// The two fixed report variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    /// Compact single-page summary.
    OnePager,
    /// Full research report.
    DeepDive,
}

impl ReportType {
    /// Stable string tag (`one_pager` / `deep_dive`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnePager => "one_pager",
            Self::DeepDive => "deep_dive",
        }
    }

    /// Both variants, in generation order.
    pub const ALL: [ReportType; 2] = [Self::OnePager, Self::DeepDive];
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = DealBriefError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "one_pager" => Ok(Self::OnePager),
            "deep_dive" => Ok(Self::DeepDive),
            other => Err(DealBriefError::InvalidReportType(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// RenderedReport
// ---------------------------------------------------------------------------

/// A rendered report: Markdown text plus its variant tag. Immutable once
/// produced; handed to the external renderer as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedReport {
    /// Which variant this is.
    pub report_type: ReportType,
    /// The Markdown document.
    pub markdown: String,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render a brief into the given report variant, stamped with today's date.
pub fn render(brief: &IntelligenceBrief, report_type: ReportType) -> RenderedReport {
    let generated_on = chrono::Local::now().format(DATE_FORMAT).to_string();
    render_dated(brief, report_type, &generated_on)
}

/// Render a brief with an explicit generation date. Deterministic: the same
/// brief, variant, and date yield byte-identical Markdown.
pub fn render_dated(
    brief: &IntelligenceBrief,
    report_type: ReportType,
    generated_on: &str,
) -> RenderedReport {
    let raw = match report_type {
        ReportType::OnePager => templates::one_pager(brief, generated_on),
        ReportType::DeepDive => templates::deep_dive(brief, generated_on),
    };

    let markdown = tidy(&raw);

    debug!(
        company = %brief.company_name,
        report_type = %report_type,
        len = markdown.len(),
        "report rendered"
    );

    RenderedReport {
        report_type,
        markdown,
    }
}

/// String-typed entry point for callers holding an untyped report type.
///
/// An unknown tag is a caller bug: it raises [`DealBriefError::InvalidReportType`]
/// immediately and must not be swallowed by per-stage isolation.
pub fn format_report(brief: &IntelligenceBrief, report_type: &str) -> Result<RenderedReport> {
    let report_type = ReportType::from_str(report_type)?;
    Ok(render(brief, report_type))
}

// ---------------------------------------------------------------------------
// Cleanup
// ---------------------------------------------------------------------------

/// Collapse the blank runs that empty brief fields leave behind and ensure a
/// single trailing newline.
fn tidy(md: &str) -> String {
    static MULTI_BLANK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

    let collapsed = MULTI_BLANK_RE.replace_all(md, "\n\n");
    let mut result = collapsed.trim().to_string();
    result.push('\n');
    result
}
