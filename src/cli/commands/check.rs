//! Check command - Audit the license headers of a source tree
//!
//! Loads the configuration, walks the tree, classifies every document and renders
//! the run report.

use colored::Colorize;
use std::io::IsTerminal;
use std::path::Path;
use tracing::{info, warn};

use super::{CheckArgs, OutputFormat};
use crate::analysis::{AuditEngine, HeaderCheck};
use crate::cli::exit_codes;
use crate::cli::output::{JsonOutput, MarkdownReport, ReportRenderer, TerminalOutput};
use crate::cli::GlobalOptions;
use crate::config::Config;
use crate::error::{HeaderLensError, ReportError};
use crate::report::RunReport;
use crate::scanner::{build_excludes, Scanner};

/// Below this many documents no progress bar is drawn
const PROGRESS_THRESHOLD: usize = 200;

/// Execute the check command
///
/// # Returns
///
/// An exit code: 0 when every counter is within its limits, 1 otherwise, 4 for
/// invalid arguments
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the tree cannot be walked
pub fn execute(args: CheckArgs, global: &GlobalOptions) -> Result<i32, HeaderLensError> {
    if args.header_lines == Some(0) {
        eprintln!("{} --header-lines must be at least 1", "Error:".red().bold());
        return Ok(exit_codes::INVALID_ARGS);
    }

    let root = global.resolve(&args.path);
    let mut config = global.load_config(&root)?;
    apply_overrides(&mut config, &args)?;

    let limits = config.counter_limits()?;
    let licenses = config.build_license_set()?;
    let excludes = build_excludes(&config.exclude)?;
    let documents = Scanner::new(&root).with_excludes(excludes).documents()?;
    info!(root = %root.display(), documents = documents.len(), "tree walked");

    let progress = args.format == OutputFormat::Terminal
        && documents.len() >= PROGRESS_THRESHOLD
        && std::io::stderr().is_terminal();
    let engine = AuditEngine::new(licenses, HeaderCheck::new(config.header_lines))
        .with_jobs(args.jobs)
        .with_progress(progress);

    let mut report = RunReport::new(root.display().to_string(), config.header_lines)
        .with_approvals(
            engine.licenses().approved_categories(),
            engine.licenses().approved_ids(),
        )
        .with_limits(limits);
    engine.run(&documents, &mut report)?;

    let renderer: Box<dyn ReportRenderer> = match args.format {
        OutputFormat::Terminal => Box::new(TerminalOutput::new(args.list_unapproved)),
        OutputFormat::Json => Box::new(JsonOutput::new()),
        OutputFormat::Markdown => Box::new(MarkdownReport::new(args.list_unapproved)),
    };
    let rendered = renderer.render_report(&report)?;
    write_output(args.output.as_deref(), &rendered)?;

    let violations = report.violations();
    for violation in &violations {
        warn!(counter = %violation.counter, count = violation.count, "counter limit exceeded");
    }
    Ok(if violations.is_empty() {
        exit_codes::SUCCESS
    } else {
        exit_codes::UNAPPROVED
    })
}

/// Fold the command line approvals, excludes, limits and header cap into the configuration
fn apply_overrides(config: &mut Config, args: &CheckArgs) -> Result<(), HeaderLensError> {
    if let Some(lines) = args.header_lines {
        config.header_lines = lines;
    }
    if !args.approve_family.is_empty() {
        let mut families = config.effective_approved_families()?;
        families.extend(args.approve_family.iter().cloned());
        config.approved_families = Some(families);
    }
    config.approved_licenses.extend(args.approve_license.iter().cloned());
    config.exclude.extend(args.exclude.iter().cloned());
    for (counter, value) in &args.counter_max {
        config.limits.set_max(*counter, *value);
    }
    for (counter, value) in &args.counter_min {
        config.limits.set_min(*counter, *value);
    }
    Ok(())
}

/// Write to `path`, or stdout when none is given
pub(crate) fn write_output(path: Option<&Path>, rendered: &str) -> Result<(), HeaderLensError> {
    match path {
        Some(path) => {
            std::fs::write(path, rendered).map_err(|e| {
                HeaderLensError::Report(ReportError::FileWrite {
                    path: path.display().to_string(),
                    source: e,
                })
            })?;
            eprintln!("Report written to: {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
