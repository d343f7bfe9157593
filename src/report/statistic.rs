//! Run counters

use serde::Serialize;
use std::collections::BTreeMap;

use super::claim::{Claim, DocumentType, UNKNOWN_CATEGORY};

/// Counters aggregated over every claim of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClaimStatistic {
    pub documents: usize,
    pub approved: usize,
    /// Standard documents not approved, unknown ones included
    pub unapproved: usize,
    pub unknown: usize,
    pub generated: usize,
    /// Documents that could not be analysed
    pub failed: usize,
    pub by_family_name: BTreeMap<String, usize>,
    pub by_family_category: BTreeMap<String, usize>,
    pub by_document_type: BTreeMap<DocumentType, usize>,
}

impl ClaimStatistic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one claim
    pub fn record(&mut self, claim: &Claim) {
        self.documents += 1;
        *self.by_document_type.entry(claim.document_type()).or_default() += 1;

        match claim.document_type() {
            DocumentType::Generated => self.generated += 1,
            DocumentType::Standard => {
                if claim.is_approved() {
                    self.approved += 1;
                } else {
                    self.unapproved += 1;
                }
                match claim.license() {
                    Some(license) => {
                        *self.by_family_name.entry(license.family_name.clone()).or_default() += 1;
                        *self.by_family_category.entry(license.family.clone()).or_default() += 1;
                    }
                    None => {
                        self.unknown += 1;
                        *self
                            .by_family_category
                            .entry(UNKNOWN_CATEGORY.to_string())
                            .or_default() += 1;
                    }
                }
            }
            DocumentType::Notice | DocumentType::Archive | DocumentType::Binary => {}
        }
    }

    /// Count a document that failed to analyse
    pub fn record_failure(&mut self) {
        self.documents += 1;
        self.failed += 1;
    }

    /// Distinct families that claimed at least one document
    pub fn license_categories(&self) -> usize {
        self.by_family_category
            .keys()
            .filter(|category| category.as_str() != UNKNOWN_CATEGORY)
            .count()
    }

    /// Count for one document type
    pub fn count(&self, document_type: DocumentType) -> usize {
        self.by_document_type.get(&document_type).copied().unwrap_or(0)
    }
}
