//! Run driver: analyses every document and reports to a sink

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn};

use super::analyser::DocumentAnalyser;
use super::header::HeaderCheck;
use crate::error::HeaderLensError;
use crate::license::LicenseSet;
use crate::report::{Claim, ClaimSink};
use crate::scanner::Document;

/// Runs the analysis over a list of documents.
///
/// Document read failures are reported to the sink and the run goes on; any other
/// error (an unresolved matcher reference, say) aborts the run.
#[derive(Debug, Clone)]
pub struct AuditEngine {
    licenses: LicenseSet,
    check: HeaderCheck,
    jobs: usize,
    progress: bool,
}

impl AuditEngine {
    pub fn new(licenses: LicenseSet, check: HeaderCheck) -> Self {
        Self {
            licenses,
            check,
            jobs: 1,
            progress: false,
        }
    }

    /// Number of worker threads; each gets its own copy of the license set
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Show a progress bar on stderr
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn licenses(&self) -> &LicenseSet {
        &self.licenses
    }

    /// Analyse `documents` in order, reporting each claim to `sink`
    pub fn run<D>(&self, documents: &[D], sink: &mut dyn ClaimSink) -> Result<(), HeaderLensError>
    where
        D: Document + Sync,
    {
        info!(documents = documents.len(), jobs = self.jobs, "starting header audit");
        let bar = self.progress_bar(documents.len());

        let results = if self.jobs > 1 {
            self.run_parallel(documents, &bar)
        } else {
            let mut analyser = DocumentAnalyser::new(self.licenses.clone(), self.check);
            documents
                .iter()
                .map(|document| {
                    let result = analyser.analyse(document);
                    bar.inc(1);
                    result
                })
                .collect()
        };
        bar.finish_and_clear();

        for (document, result) in documents.iter().zip(results) {
            deliver(document.name(), result, sink)?;
        }
        Ok(())
    }

    fn run_parallel<D>(&self, documents: &[D], bar: &ProgressBar) -> Vec<Result<Claim, HeaderLensError>>
    where
        D: Document + Sync,
    {
        let analyse_all = || {
            documents
                .par_iter()
                .map_init(
                    || DocumentAnalyser::new(self.licenses.clone(), self.check),
                    |analyser, document| {
                        let result = analyser.analyse(document);
                        bar.inc(1);
                        result
                    },
                )
                .collect()
        };

        match rayon::ThreadPoolBuilder::new().num_threads(self.jobs).build() {
            Ok(pool) => pool.install(analyse_all),
            Err(e) => {
                warn!(error = %e, "could not start worker pool, using the global one");
                analyse_all()
            }
        }
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .map(|style| style.progress_chars("█▓▒░ "))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar
    }
}

fn deliver(
    document: &str,
    result: Result<Claim, HeaderLensError>,
    sink: &mut dyn ClaimSink,
) -> Result<(), HeaderLensError> {
    match result {
        Ok(claim) => {
            sink.report(claim);
            Ok(())
        }
        Err(e) if e.is_document_failure() => {
            warn!(document, error = %e, "document analysis failed");
            sink.failure(document, &e);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::{License, LicenseFamily};
    use crate::matchers::{BuilderRegistry, MatcherArena, MatcherDefinition};
    use crate::report::RunReport;
    use crate::scanner::{FileDocument, TextDocument};
    use tempfile::tempdir;

    fn licenses(definition: MatcherDefinition) -> LicenseSet {
        let mut set = LicenseSet::new(MatcherArena::new());
        set.add_family(LicenseFamily::new("MIT", "The MIT License"));
        let root = BuilderRegistry::default()
            .build(&definition, set.arena_mut())
            .unwrap();
        let family = set.family("MIT").unwrap().clone();
        set.add_license(License::new("MIT", "MIT", family, root)).unwrap();
        set.approve_family("MIT");
        set
    }

    fn documents() -> Vec<TextDocument> {
        (0..40)
            .map(|i| {
                let header = if i % 3 == 0 { "// no header" } else { "// SPDX-License-Identifier: MIT" };
                TextDocument::new(format!("src/file{:02}.rs", i), format!("{}\nfn f() {{}}\n", header))
            })
            .collect()
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let set = licenses(MatcherDefinition::new("spdx").with_param("name", "MIT"));
        let documents = documents();

        let mut sequential = RunReport::new(".", 50);
        AuditEngine::new(set.clone(), HeaderCheck::default())
            .run(&documents, &mut sequential)
            .unwrap();

        let mut parallel = RunReport::new(".", 50);
        AuditEngine::new(set, HeaderCheck::default())
            .with_jobs(4)
            .run(&documents, &mut parallel)
            .unwrap();

        assert_eq!(sequential.claims, parallel.claims);
        assert_eq!(sequential.statistic, parallel.statistic);
        assert_eq!(parallel.statistic.unknown, 14);
    }

    #[test]
    fn test_read_failure_does_not_stop_run() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("ok.rs"), "// SPDX-License-Identifier: MIT\n").unwrap();
        let documents = vec![
            FileDocument::new(dir.path(), dir.path().join("missing.rs")),
            FileDocument::new(dir.path(), dir.path().join("ok.rs")),
        ];

        let mut report = RunReport::new(".", 50);
        AuditEngine::new(
            licenses(MatcherDefinition::new("spdx").with_param("name", "MIT")),
            HeaderCheck::default(),
        )
        .run(&documents, &mut report)
        .unwrap();

        assert_eq!(report.statistic.failed, 1);
        assert_eq!(report.failures[0].document, "missing.rs");
        assert_eq!(report.claims.len(), 1);
        assert!(report.passed());
    }

    #[test]
    fn test_unresolved_reference_aborts_run() {
        let set = licenses(MatcherDefinition::new("matcherRef").with_param("refId", "nonexistent"));
        let mut report = RunReport::new(".", 50);
        let err = AuditEngine::new(set, HeaderCheck::default())
            .run(&documents(), &mut report)
            .unwrap_err();
        assert!(err.to_string().contains("nonexistent"));
    }
}
