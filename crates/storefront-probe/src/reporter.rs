//! Suite reports for CI: JSON and JUnit XML.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::harness::{ScenarioStatus, SuiteResults};
use crate::result::{ProbeError, ProbeResult};

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Pretty-printed JSON of the suite results
    #[default]
    Json,
    /// JUnit XML
    Junit,
}

impl FromStr for ReportFormat {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "junit" | "xml" => Ok(Self::Junit),
            other => Err(ProbeError::Config {
                message: format!("unknown report format: {other}"),
            }),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Junit => f.write_str("junit"),
        }
    }
}

/// Render results in `format`
pub fn render(results: &SuiteResults, format: ReportFormat) -> ProbeResult<String> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(results)?),
        ReportFormat::Junit => Ok(render_junit(results)),
    }
}

/// Render and write to `path`
///
/// # Errors
///
/// Returns error if serialization or file writing fails
pub fn write_report(results: &SuiteResults, format: ReportFormat, path: &Path) -> ProbeResult<()> {
    let content = render(results, format)?;
    std::fs::write(path, content)?;
    tracing::info!(path = %path.display(), %format, "report written");
    Ok(())
}

/// Render JUnit XML content
#[must_use]
pub fn render_junit(results: &SuiteResults) -> String {
    let mut xml = String::new();

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<testsuite name="{}" tests="{}" failures="{}" skipped="{}" time="{:.3}">"#,
        escape_xml(&results.suite_name),
        results.total(),
        results.failed_count(),
        results.skipped_count(),
        secs(results.duration_ms)
    ));
    xml.push('\n');
    xml.push_str(&format!(
        "  <properties>\n    <property name=\"seed\" value=\"{}\"/>\n  </properties>\n",
        results.seed
    ));

    for result in &results.results {
        xml.push_str(&format!(
            r#"  <testcase name="{}" classname="{}" time="{:.3}">"#,
            escape_xml(&result.name),
            escape_xml(&result.id),
            secs(result.duration_ms)
        ));
        xml.push('\n');

        match result.status {
            ScenarioStatus::Passed => {}
            ScenarioStatus::Skipped => xml.push_str("    <skipped/>\n"),
            ScenarioStatus::Failed => {
                let message = result.error.as_deref().unwrap_or("failed");
                let kind = result.error_kind.as_deref().unwrap_or("Error");
                xml.push_str(&format!(
                    r#"    <failure type="{}" message="{}">{}</failure>"#,
                    escape_xml(kind),
                    escape_xml(message),
                    escape_xml(message)
                ));
                xml.push('\n');
            }
        }

        xml.push_str("  </testcase>\n");
    }

    xml.push_str("</testsuite>\n");
    xml
}

#[allow(clippy::cast_precision_loss)]
fn secs(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
