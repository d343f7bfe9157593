//! Per-document claims

use serde::Serialize;
use std::fmt;

use crate::license::License;

/// Id reported for documents no license matched
pub const UNKNOWN_LICENSE: &str = "unknown";

/// Category reported for documents no license matched
pub const UNKNOWN_CATEGORY: &str = "?????";

/// How a document was classified before (or instead of) a header check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Standard,
    Generated,
    Notice,
    Archive,
    Binary,
}

impl DocumentType {
    /// Whether the document goes through a header check
    pub fn is_standard(self) -> bool {
        self == DocumentType::Standard
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Standard => "standard",
            DocumentType::Generated => "generated",
            DocumentType::Notice => "notice",
            DocumentType::Archive => "archive",
            DocumentType::Binary => "binary",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The license a document was matched to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LicenseClaim {
    pub id: String,
    pub name: String,
    /// Family category without padding
    pub family: String,
    pub family_name: String,
}

impl From<&License> for LicenseClaim {
    fn from(license: &License) -> Self {
        Self {
            id: license.id().to_string(),
            name: license.name().to_string(),
            family: license.family().category().trim_end().to_string(),
            family_name: license.family().name().to_string(),
        }
    }
}

/// Immutable outcome of classifying one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claim {
    document: String,
    #[serde(rename = "type")]
    document_type: DocumentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    license: Option<LicenseClaim>,
    approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample: Option<String>,
}

impl Claim {
    /// A notice, archive or binary document; these are never checked and never flagged
    pub fn bypass(document: impl Into<String>, document_type: DocumentType) -> Self {
        Self {
            document: document.into(),
            document_type,
            license: None,
            approved: true,
            sample: None,
        }
    }

    /// A standard document whose header matched `license`
    pub fn licensed(document: impl Into<String>, license: &License, approved: bool) -> Self {
        Self {
            document: document.into(),
            document_type: DocumentType::Standard,
            license: Some(license.into()),
            approved,
            sample: None,
        }
    }

    /// A document recognized as generated by a license of the generated family
    pub fn generated(document: impl Into<String>, license: &License) -> Self {
        Self {
            document: document.into(),
            document_type: DocumentType::Generated,
            license: Some(license.into()),
            approved: true,
            sample: None,
        }
    }

    /// A standard document no license matched
    pub fn unknown(document: impl Into<String>, sample: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            document_type: DocumentType::Standard,
            license: None,
            approved: false,
            sample: Some(sample.into()),
        }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn license(&self) -> Option<&LicenseClaim> {
        self.license.as_ref()
    }

    /// Matched license id, or [`UNKNOWN_LICENSE`]
    pub fn license_id(&self) -> &str {
        self.license.as_ref().map_or(UNKNOWN_LICENSE, |l| l.id.as_str())
    }

    pub fn is_approved(&self) -> bool {
        self.approved
    }

    /// Standard document without a matching license
    pub fn is_unknown(&self) -> bool {
        self.document_type.is_standard() && self.license.is_none()
    }

    /// Retained header lines of an unknown document
    pub fn sample(&self) -> Option<&str> {
        self.sample.as_deref()
    }
}
