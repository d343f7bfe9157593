//! # Reporting
//!
//! Claims produced by the analyser flow into a [`ClaimSink`], one event per
//! document. [`RunReport`] is the sink the CLI uses: it keeps every claim and the
//! aggregated [`ClaimStatistic`] for rendering. Whether a run passes is decided by
//! the [`CounterLimits`] it carries.

mod claim;
pub mod limits;
mod statistic;

pub use claim::{Claim, DocumentType, LicenseClaim, UNKNOWN_CATEGORY, UNKNOWN_LICENSE};
pub use limits::{Bound, Counter, CounterLimits, LimitViolation};
pub use statistic::ClaimStatistic;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::HeaderLensError;

/// Receiver of per-document results
pub trait ClaimSink {
    /// A document was classified
    fn report(&mut self, claim: Claim);

    /// A document could not be analysed; the run continues
    fn failure(&mut self, document: &str, error: &HeaderLensError) {
        let _ = (document, error);
    }
}

/// A document that could not be analysed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    pub document: String,
    pub message: String,
}

/// Everything a run produced, in document order
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub root: String,
    pub started_at: DateTime<Utc>,
    pub header_lines: usize,
    pub approved_families: Vec<String>,
    pub approved_licenses: Vec<String>,
    pub statistic: ClaimStatistic,
    pub claims: Vec<Claim>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<DocumentFailure>,
    #[serde(skip)]
    pub limits: CounterLimits,
}

impl RunReport {
    pub fn new(root: impl Into<String>, header_lines: usize) -> Self {
        Self {
            root: root.into(),
            started_at: Utc::now(),
            header_lines,
            approved_families: Vec::new(),
            approved_licenses: Vec::new(),
            statistic: ClaimStatistic::new(),
            claims: Vec::new(),
            failures: Vec::new(),
            limits: CounterLimits::default(),
        }
    }

    /// Decide the verdict with `limits` in place of the defaults
    pub fn with_limits(mut self, limits: CounterLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Record the approvals the run was made with
    pub fn with_approvals<'a>(
        mut self,
        families: impl IntoIterator<Item = &'a str>,
        licenses: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.approved_families = families.into_iter().map(|c| c.trim_end().to_string()).collect();
        self.approved_licenses = licenses.into_iter().map(str::to_string).collect();
        self
    }

    /// Standard documents that are not approved, unknown ones included
    pub fn unapproved(&self) -> impl Iterator<Item = &Claim> {
        self.claims
            .iter()
            .filter(|claim| claim.document_type().is_standard() && !claim.is_approved())
    }

    /// Counters outside their limits
    pub fn violations(&self) -> Vec<LimitViolation> {
        self.limits.violations(&self.statistic)
    }

    /// Whether every counter is within its limits
    pub fn passed(&self) -> bool {
        self.violations().is_empty()
    }
}

impl ClaimSink for RunReport {
    fn report(&mut self, claim: Claim) {
        self.statistic.record(&claim);
        self.claims.push(claim);
    }

    fn failure(&mut self, document: &str, error: &HeaderLensError) {
        self.statistic.record_failure();
        self.failures.push(DocumentFailure {
            document: document.to_string(),
            message: error.to_string(),
        });
    }
}
