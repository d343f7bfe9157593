//! Per-document analysis

use tracing::{debug, debug_span};

use super::guesser;
use super::header::{HeaderCheck, HeaderOutcome};
use crate::error::HeaderLensError;
use crate::license::LicenseSet;
use crate::report::Claim;
use crate::scanner::Document;

/// Classifies documents and checks the headers of standard ones against a license set.
///
/// An analyser owns its license set, and with it the matcher state; use one analyser
/// per thread.
#[derive(Debug, Clone)]
pub struct DocumentAnalyser {
    licenses: LicenseSet,
    check: HeaderCheck,
}

impl DocumentAnalyser {
    pub fn new(licenses: LicenseSet, check: HeaderCheck) -> Self {
        Self { licenses, check }
    }

    pub fn licenses(&self) -> &LicenseSet {
        &self.licenses
    }

    /// Produce the claim for one document
    pub fn analyse(&mut self, document: &dyn Document) -> Result<Claim, HeaderLensError> {
        let name = document.name();
        let _span = debug_span!("analyse", document = name).entered();

        let document_type = guesser::guess(document)?;
        if !document_type.is_standard() {
            debug!(%document_type, "header check skipped");
            return Ok(Claim::bypass(name, document_type));
        }

        let reader = document.reader()?;
        let report = self.check.run(name, reader, &mut self.licenses)?;

        let claim = match report.outcome {
            HeaderOutcome::Matched {
                license_id: Some(id),
            } => match self.licenses.get(&id) {
                Some(license) if license.family().is_generated() => Claim::generated(name, license),
                Some(license) => Claim::licensed(name, license, self.licenses.is_approved(license)),
                None => Claim::unknown(name, String::new()),
            },
            HeaderOutcome::Matched { license_id: None } => Claim::unknown(name, String::new()),
            HeaderOutcome::Unknown { sample } => Claim::unknown(name, sample),
        };
        debug!(
            license = claim.license_id(),
            approved = claim.is_approved(),
            lines = report.lines_read,
            "document classified"
        );
        Ok(claim)
    }
}
