//! Output formatting module for CLI

pub mod json;
mod markdown;
mod terminal;

pub use json::JsonOutput;
pub use markdown::MarkdownReport;
pub use terminal::TerminalOutput;

use crate::error::HeaderLensError;
use crate::report::RunReport;

/// Trait for rendering a run report
pub trait ReportRenderer {
    fn render_report(&self, report: &RunReport) -> Result<String, HeaderLensError>;
}

/// At most `limit` lines of an unknown document's sample
fn excerpt(sample: &str, limit: usize) -> Vec<&str> {
    sample.lines().filter(|line| !line.trim().is_empty()).take(limit).collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::license::{License, LicenseFamily};
    use crate::matchers::{MatcherArena, TextBuilder};
    use crate::report::{Claim, ClaimSink, DocumentType, RunReport};

    fn license(id: &str, category: &str, family_name: &str) -> License {
        let mut arena = MatcherArena::new();
        let root = TextBuilder::new().text(id).build(&mut arena).unwrap();
        License::new(id, id, LicenseFamily::new(category, family_name), root)
    }

    /// A report with one document of each outcome
    pub fn report() -> RunReport {
        let mit = license("MIT", "MIT", "The MIT License");
        let gpl = license("GPL3", "GPL3", "GNU General Public License, version 3");
        let gen = license("generated", "GEN", "Generated files");

        let mut report = RunReport::new("/work/project", 50).with_approvals(["AL   ", "MIT  "], []);
        report.report(Claim::licensed("src/lib.rs", &mit, true));
        report.report(Claim::licensed("src/gpl.c", &gpl, false));
        report.report(Claim::unknown("src/main.rs", "use std::io;\n\nfn main() {}"));
        report.report(Claim::generated("src/parser.rs", &gen));
        report.report(Claim::bypass("NOTICE", DocumentType::Notice));
        report
    }
}
