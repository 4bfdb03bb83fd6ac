//! Output formatters for `mdpage check` reports.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Output format of a check report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CheckFormat {
    #[default]
    Plain,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        f.write_str(label)
    }
}

/// Single problem found in a page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    /// Position in the page, e.g. `group(1).entry(0)`.
    pub location: String,
    pub message: String,
}

/// Findings for one page file.
#[derive(Clone, Debug, Serialize)]
pub struct CheckReport {
    pub page: PathBuf,
    pub findings: Vec<Finding>,
    pub error_count: usize,
    pub warning_count: usize,
}

impl CheckReport {
    pub fn new(page: impl Into<PathBuf>, findings: Vec<Finding>) -> Self {
        let error_count = findings
            .iter()
            .filter(|finding| finding.severity == Severity::Error)
            .count();
        let warning_count = findings.len() - error_count;
        CheckReport {
            page: page.into(),
            findings,
            error_count,
            warning_count,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

pub fn render_report(report: &CheckReport, format: CheckFormat) -> serde_json::Result<String> {
    match format {
        CheckFormat::Plain => Ok(render_plain(report)),
        CheckFormat::Json => serde_json::to_string_pretty(report),
    }
}

fn render_plain(report: &CheckReport) -> String {
    let page = report.page.display();
    let mut out = String::new();
    for finding in &report.findings {
        out.push_str(&format!(
            "{page}: {}: {}: {}\n",
            finding.severity, finding.location, finding.message
        ));
    }
    if report.findings.is_empty() {
        out.push_str(&format!("{page}: ok\n"));
    } else {
        out.push_str(&format!(
            "{page}: {} error(s), {} warning(s)\n",
            report.error_count, report.warning_count
        ));
    }
    out
}
