//! JSON output formatting

use crate::error::HeaderLensError;
use serde::Serialize;

use super::ReportRenderer;
use crate::report::{LimitViolation, RunReport};

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    version: &'static str,
    #[serde(flatten)]
    report: &'a RunReport,
    unapproved: Vec<&'a str>,
    passed: bool,
    violations: Vec<LimitViolation>,
}

impl ReportRenderer for JsonOutput {
    fn render_report(&self, report: &RunReport) -> Result<String, HeaderLensError> {
        let output = ReportOutput {
            version: env!("CARGO_PKG_VERSION"),
            report,
            unapproved: report.unapproved().map(|claim| claim.document()).collect(),
            passed: report.passed(),
            violations: report.violations(),
        };
        Ok(serde_json::to_string_pretty(&output)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::output::fixtures;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_json() {
        let rendered = JsonOutput::new().render_report(&fixtures::report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(value["root"], "/work/project");
        assert_eq!(value["header_lines"], 50);
        assert_eq!(value["approved_families"], serde_json::json!(["AL", "MIT"]));
        assert_eq!(value["statistic"]["unapproved"], 2);
        assert_eq!(value["statistic"]["by_document_type"]["generated"], 1);
        assert_eq!(value["unapproved"], serde_json::json!(["src/gpl.c", "src/main.rs"]));
        assert_eq!(value["claims"].as_array().unwrap().len(), 5);
        assert_eq!(value["claims"][2]["sample"], "use std::io;\n\nfn main() {}");
        assert!(value["started_at"].is_string());
        assert!(value.get("failures").is_none());
        assert_eq!(value["passed"], false);
        assert_eq!(
            value["violations"],
            serde_json::json!([{ "counter": "unapproved", "count": 2, "limit": { "max": 0 } }])
        );
    }
}
