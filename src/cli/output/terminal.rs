//! Terminal output formatting with colors

use crate::error::HeaderLensError;
use colored::Colorize;

use super::{excerpt, ReportRenderer};
use crate::report::{Claim, DocumentType, RunReport};

/// Sample lines shown under an unknown document
const EXCERPT_LINES: usize = 3;

pub struct TerminalOutput {
    list_unapproved: bool,
}

impl TerminalOutput {
    pub fn new(list_unapproved: bool) -> Self {
        Self { list_unapproved }
    }

    fn format_header(&self, report: &RunReport) -> String {
        format!(
            r#"
{} v{}

{} {}
{} {}
{} {}
"#,
            "headerlens".cyan().bold(),
            env!("CARGO_PKG_VERSION"),
            "Root:".dimmed(),
            report.root.white().bold(),
            "Approved families:".dimmed(),
            join_or_none(&report.approved_families).yellow(),
            "Approved licenses:".dimmed(),
            join_or_none(&report.approved_licenses).yellow()
        )
    }

    fn format_summary(&self, report: &RunReport) -> String {
        let stats = &report.statistic;
        let mut output = format!(
            "\n{}\n{}\n\n",
            "━".repeat(50).dimmed(),
            "  SUMMARY".bold()
        );

        output.push_str(&format!("  {:<12} {}\n", "Documents", stats.documents));
        output.push_str(&format!(
            "  {:<12} {}\n",
            "Approved",
            stats.approved.to_string().green()
        ));
        let unapproved = stats.unapproved.to_string();
        output.push_str(&format!(
            "  {:<12} {}\n",
            "Unapproved",
            if stats.unapproved > 0 { unapproved.red().bold() } else { unapproved.normal() }
        ));
        output.push_str(&format!("  {:<12} {}\n", "Unknown", stats.unknown));
        output.push_str(&format!("  {:<12} {}\n", "Generated", stats.generated));
        for document_type in [DocumentType::Notice, DocumentType::Archive, DocumentType::Binary] {
            let label = format!("{}{}", &document_type.as_str()[..1].to_uppercase(), &document_type.as_str()[1..]);
            output.push_str(&format!("  {:<12} {}\n", label, stats.count(document_type)));
        }
        if stats.failed > 0 {
            output.push_str(&format!("  {:<12} {}\n", "Failed", stats.failed.to_string().yellow()));
        }

        if !stats.by_family_category.is_empty() {
            output.push_str(&format!("\n  {}\n", "By family".bold()));
            for (category, count) in &stats.by_family_category {
                output.push_str(&format!("  {:<12} {}\n", category.cyan(), count));
            }
        }
        output
    }

    fn format_unapproved(&self, report: &RunReport) -> String {
        let unapproved: Vec<&Claim> = report.unapproved().collect();
        if unapproved.is_empty() {
            return String::new();
        }

        let mut output = format!(
            "\n{}\n{}\n\n",
            "━".repeat(50).dimmed(),
            "  UNAPPROVED DOCUMENTS".bold()
        );
        for claim in unapproved {
            output.push_str(&format!(
                "  {} [{}] {}\n",
                "•".dimmed(),
                claim.license_id().red(),
                claim.document()
            ));
            if let Some(sample) = claim.sample() {
                for line in excerpt(sample, EXCERPT_LINES) {
                    output.push_str(&format!("    {} {}\n", "│".dimmed(), line.dimmed()));
                }
            }
        }
        output
    }

    fn format_failures(&self, report: &RunReport) -> String {
        let mut output = String::new();
        for failure in &report.failures {
            output.push_str(&format!(
                "  {} {}: {}\n",
                "!".yellow().bold(),
                failure.document,
                failure.message.dimmed()
            ));
        }
        output
    }

    fn format_verdict(&self, report: &RunReport) -> String {
        let stats = &report.statistic;
        let violations = report.violations();
        if violations.is_empty() {
            if stats.unapproved == 0 {
                return format!("\n{} {}\n", "✓".green(), "All documents approved.".green());
            }
            return format!(
                "\n{} {} unapproved document(s), within the configured limits.\n",
                "✓".green(),
                stats.unapproved.to_string().yellow()
            );
        }

        let mut output = String::new();
        if stats.unapproved > 0 {
            output.push_str(&format!(
                "\n{} {} unapproved document(s), {} without a recognised license.\n",
                "✗".red(),
                stats.unapproved.to_string().red().bold(),
                stats.unknown
            ));
            if !self.list_unapproved {
                output.push_str(&format!(
                    "  Run with {} to see them.\n",
                    "--list-unapproved".cyan()
                ));
            }
        }
        output.push_str(&format!("\n{} {}\n", "✗".red(), "Counter limits exceeded:".red().bold()));
        for violation in violations {
            output.push_str(&format!("  {} {}\n", "•".dimmed(), violation));
        }
        output
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

impl ReportRenderer for TerminalOutput {
    fn render_report(&self, report: &RunReport) -> Result<String, HeaderLensError> {
        let mut output = self.format_header(report);
        output.push_str(&self.format_summary(report));
        if self.list_unapproved {
            output.push_str(&self.format_unapproved(report));
        }
        output.push_str(&self.format_failures(report));
        output.push_str(&self.format_verdict(report));
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::output::fixtures;
    use crate::report::{Counter, CounterLimits};

    #[test]
    fn test_summary_counts() {
        colored::control::set_override(false);
        let output = TerminalOutput::new(false).render_report(&fixtures::report()).unwrap();
        assert!(output.contains("Documents    5"));
        assert!(output.contains("Unapproved   2"));
        assert!(output.contains("Generated    1"));
        assert!(output.contains("Notice       1"));
        assert!(output.contains("Approved families: AL, MIT"));
        assert!(output.contains("--list-unapproved"));
        assert!(!output.contains("src/gpl.c"));
        assert!(output.contains("unapproved is 2, maximum is 0"));
    }

    #[test]
    fn test_verdict_follows_limits() {
        colored::control::set_override(false);
        let mut limits = CounterLimits::new();
        limits.set_max(Counter::Unapproved, 2);
        let output = TerminalOutput::new(false)
            .render_report(&fixtures::report().with_limits(limits.clone()))
            .unwrap();
        assert!(output.contains("2 unapproved document(s), within the configured limits."));
        assert!(!output.contains("Counter limits exceeded"));

        limits.set_min(Counter::Generated, 2);
        let output = TerminalOutput::new(false)
            .render_report(&fixtures::report().with_limits(limits))
            .unwrap();
        assert!(output.contains("Counter limits exceeded:"));
        assert!(output.contains("generated is 1, minimum is 2"));
    }

    #[test]
    fn test_lists_unapproved_with_excerpt() {
        colored::control::set_override(false);
        let output = TerminalOutput::new(true).render_report(&fixtures::report()).unwrap();
        assert!(output.contains("[GPL3] src/gpl.c"));
        assert!(output.contains("[unknown] src/main.rs"));
        assert!(output.contains("│ use std::io;"));
        assert!(!output.contains("src/lib.rs"));
    }
}
