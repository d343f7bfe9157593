//! Markdown report formatting

use crate::error::HeaderLensError;

use super::{excerpt, ReportRenderer};
use crate::report::{Bound, DocumentType, RunReport};

/// Sample lines quoted under an unknown document
const EXCERPT_LINES: usize = 5;

pub struct MarkdownReport {
    list_unapproved: bool,
}

impl MarkdownReport {
    pub fn new(list_unapproved: bool) -> Self {
        Self { list_unapproved }
    }

    fn format_summary(&self, report: &RunReport, output: &mut String) {
        let stats = &report.statistic;
        output.push_str("## Summary\n\n");
        output.push_str("| Metric | Count |\n|--------|-------|\n");
        let rows = [
            ("Documents", stats.documents),
            ("Approved", stats.approved),
            ("Unapproved", stats.unapproved),
            ("Unknown", stats.unknown),
            ("Generated", stats.generated),
            ("Notice", stats.count(DocumentType::Notice)),
            ("Archive", stats.count(DocumentType::Archive)),
            ("Binary", stats.count(DocumentType::Binary)),
            ("Failed", stats.failed),
        ];
        for (label, count) in rows {
            output.push_str(&format!("| {} | {} |\n", label, count));
        }
        output.push('\n');

        if !stats.by_family_name.is_empty() {
            output.push_str("## Families\n\n| Family | Documents |\n|--------|-----------|\n");
            for (name, count) in &stats.by_family_name {
                output.push_str(&format!("| {} | {} |\n", name, count));
            }
            output.push('\n');
        }
    }

    fn format_verdict(&self, report: &RunReport, output: &mut String) {
        let violations = report.violations();
        if violations.is_empty() {
            output.push_str("**Result:** passed\n\n");
            return;
        }

        output.push_str("**Result:** failed\n\n| Counter | Count | Limit |\n|---------|-------|-------|\n");
        for violation in violations {
            let limit = match violation.limit {
                Bound::Max(max) => format!("at most {}", max),
                Bound::Min(min) => format!("at least {}", min),
            };
            output.push_str(&format!("| {} | {} | {} |\n", violation.counter, violation.count, limit));
        }
        output.push('\n');
    }

    fn format_unapproved(&self, report: &RunReport, output: &mut String) {
        let unapproved: Vec<_> = report.unapproved().collect();
        if unapproved.is_empty() {
            return;
        }

        output.push_str("## Unapproved documents\n\n");
        for claim in unapproved {
            match claim.license() {
                Some(license) => output.push_str(&format!(
                    "- `{}`: {} ({})\n",
                    claim.document(),
                    license.family_name,
                    license.family
                )),
                None => {
                    output.push_str(&format!("- `{}`: no recognised license\n", claim.document()));
                    if let Some(sample) = claim.sample() {
                        output.push_str("\n  ```\n");
                        for line in excerpt(sample, EXCERPT_LINES) {
                            output.push_str(&format!("  {}\n", line));
                        }
                        output.push_str("  ```\n\n");
                    }
                }
            }
        }
        output.push('\n');
    }
}

impl ReportRenderer for MarkdownReport {
    fn render_report(&self, report: &RunReport) -> Result<String, HeaderLensError> {
        let mut output = String::from("# License Header Audit\n\n");
        output.push_str(&format!(
            "**Root:** `{}`  \n**Date:** {}  \n**Approved families:** {}\n\n",
            report.root,
            report.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.approved_families.join(", ")
        ));

        self.format_summary(report, &mut output);
        self.format_verdict(report, &mut output);
        if self.list_unapproved {
            self.format_unapproved(report, &mut output);
        }

        if !report.failures.is_empty() {
            output.push_str("## Failures\n\n");
            for failure in &report.failures {
                output.push_str(&format!("- `{}`: {}\n", failure.document, failure.message));
            }
            output.push('\n');
        }

        output.push_str(&format!(
            "---\n*Generated by headerlens v{}*\n",
            env!("CARGO_PKG_VERSION")
        ));
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::output::fixtures;
    use crate::report::{Counter, CounterLimits};

    #[test]
    fn test_summary_table() {
        let output = MarkdownReport::new(false).render_report(&fixtures::report()).unwrap();
        assert!(output.starts_with("# License Header Audit"));
        assert!(output.contains("| Unapproved | 2 |"));
        assert!(output.contains("| The MIT License | 1 |"));
        assert!(!output.contains("## Unapproved documents"));
        assert!(output.contains("**Result:** failed"));
        assert!(output.contains("| unapproved | 2 | at most 0 |"));
    }

    #[test]
    fn test_result_passes_within_raised_limit() {
        let mut limits = CounterLimits::new();
        limits.set_max(Counter::Unapproved, 2);
        let report = fixtures::report().with_limits(limits);
        let output = MarkdownReport::new(false).render_report(&report).unwrap();
        assert!(output.contains("**Result:** passed"));
    }

    #[test]
    fn test_unapproved_section() {
        let output = MarkdownReport::new(true).render_report(&fixtures::report()).unwrap();
        assert!(output.contains("- `src/gpl.c`: GNU General Public License, version 3 (GPL3)"));
        assert!(output.contains("- `src/main.rs`: no recognised license"));
        assert!(output.contains("  use std::io;\n  fn main() {}\n"));
    }
}
