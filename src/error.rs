//! Error types for HeaderLens
//!
//! This module defines custom error types using `thiserror` for better error handling
//! and more descriptive error messages throughout the application.
//!
//! Errors fall into three groups:
//!
//! - [`ConfigError`] - fatal, reported before any document is touched
//! - [`ScanError`] - per-document failures, the run continues
//! - [`MatchError`] - matcher graph defects discovered while scanning, fatal

use thiserror::Error;

/// Main error type for HeaderLens
#[derive(Error, Debug)]
pub enum HeaderLensError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scan-related errors
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Matcher evaluation errors
    #[error("Matcher error: {0}")]
    Match(#[from] MatchError),

    /// Report output errors
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

impl HeaderLensError {
    /// Whether the error only concerns a single document.
    ///
    /// Document failures are recorded in the run summary; everything else aborts the run.
    pub fn is_document_failure(&self) -> bool {
        matches!(self, HeaderLensError::Scan(_))
    }
}

/// Errors raised while loading configuration or building the matcher graph
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        /// Path to the configuration file
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to parse the configuration
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parser message
        message: String,
    },

    /// Failed to serialize the configuration
    #[error("Failed to serialize config: {message}")]
    Serialize {
        /// Serializer message
        message: String,
    },

    /// A matcher definition used a type no builder is registered for
    #[error("Unknown matcher type '{kind}' (expected one of: {expected})")]
    UnknownMatcherType {
        /// The offending type token
        kind: String,
        /// Comma separated list of valid type names
        expected: String,
    },

    /// A required matcher parameter is absent
    #[error("Matcher '{kind}' requires parameter '{parameter}'")]
    MissingParameter {
        /// Matcher type
        kind: String,
        /// Name of the missing parameter
        parameter: String,
    },

    /// A matcher parameter is present but unusable
    #[error("Invalid value for parameter '{parameter}' of matcher '{kind}': {message}")]
    InvalidParameter {
        /// Matcher type
        kind: String,
        /// Name of the parameter
        parameter: String,
        /// Why the value was rejected
        message: String,
    },

    /// A regex matcher pattern does not compile
    #[error("Invalid regex '{pattern}': {source}")]
    InvalidRegex {
        /// The pattern as written in the configuration
        pattern: String,
        /// The regex compilation error
        source: regex::Error,
    },

    /// A combinator received the wrong number of children
    #[error("Matcher '{kind}' {message}")]
    InvalidChildren {
        /// Matcher type
        kind: String,
        /// Description of the constraint
        message: String,
    },

    /// Two matchers were registered under the same id
    #[error("Duplicate matcher id '{id}'")]
    DuplicateMatcherId {
        /// The repeated id
        id: String,
    },

    /// A matcherRef points at an id that was never defined
    #[error("Unresolved matcher reference '{id}'")]
    UnresolvedReference {
        /// The referenced id
        id: String,
    },

    /// A matcher reaches itself through `matcherRef` links
    #[error("Matcher '{id}' refers back to itself through matcherRef")]
    CyclicReference {
        /// Id of a matcher on the cycle
        id: String,
    },

    /// A license names a family that is not defined
    #[error("License '{license}' refers to unknown family '{family}'")]
    UnknownFamily {
        /// License id
        license: String,
        /// Family category as written
        family: String,
    },

    /// A license root is not a node of the set's matcher arena
    #[error("License '{license}' uses a matcher that is not part of its license set")]
    ForeignMatcher {
        /// License id
        license: String,
    },

    /// Two licenses were defined with the same id
    #[error("Duplicate license id '{id}'")]
    DuplicateLicense {
        /// The repeated id
        id: String,
    },

    /// Unknown preset name
    #[error("Unknown preset '{name}' (expected one of: default, strict, permissive)")]
    UnknownPreset {
        /// The name that was given
        name: String,
    },

    /// An exclude glob does not compile
    #[error("Invalid exclude pattern '{pattern}': {message}")]
    InvalidGlob {
        /// The glob as written
        pattern: String,
        /// Compilation message
        message: String,
    },

    /// A counter limit names a counter that does not exist
    #[error("Unknown counter '{name}' (expected one of: {expected})")]
    UnknownCounter {
        /// The name as written
        name: String,
        /// Comma separated list of counter names
        expected: String,
    },

    /// Header line cap must allow at least one line
    #[error("header_lines must be at least 1")]
    InvalidHeaderLines,
}

/// Errors that occur while reading a single document
#[derive(Error, Debug)]
pub enum ScanError {
    /// Failed to open or read a document
    #[error("Failed to read document '{document}': {source}")]
    DocumentRead {
        /// Name of the document that failed to read
        document: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to walk the source tree
    #[error("Failed to walk '{path}': {message}")]
    Walk {
        /// Root or entry being walked
        path: String,
        /// Walker message
        message: String,
    },
}

/// Errors raised while evaluating the matcher graph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// A matcherRef proxy was invoked before its target was registered
    #[error("Matcher reference '{id}' was never resolved")]
    UnresolvedReference {
        /// The referenced id
        id: String,
    },

    /// Finalizing reached a matcher that is already being finalized
    #[error("Matcher '{id}' refers back to itself")]
    CyclicReference {
        /// Id of a matcher on the cycle
        id: String,
    },
}

/// Errors that occur while rendering or writing reports
#[derive(Error, Debug)]
pub enum ReportError {
    /// Failed to serialize a report
    #[error("Failed to serialize report: {message}")]
    Serialize {
        /// Serializer message
        message: String,
    },

    /// Failed to write a report or generated file
    #[error("Failed to write '{path}': {source}")]
    FileWrite {
        /// Destination path
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },
}

impl From<toml::de::Error> for HeaderLensError {
    fn from(err: toml::de::Error) -> Self {
        HeaderLensError::Config(ConfigError::Parse {
            message: err.to_string(),
        })
    }
}

impl From<toml::ser::Error> for HeaderLensError {
    fn from(err: toml::ser::Error) -> Self {
        HeaderLensError::Config(ConfigError::Serialize {
            message: err.to_string(),
        })
    }
}

impl From<serde_json::Error> for HeaderLensError {
    fn from(err: serde_json::Error) -> Self {
        HeaderLensError::Report(ReportError::Serialize {
            message: err.to_string(),
        })
    }
}

// Allow conversion from std::io::Error for convenience
impl From<std::io::Error> for HeaderLensError {
    fn from(err: std::io::Error) -> Self {
        HeaderLensError::Scan(ScanError::DocumentRead {
            document: "unknown".to_string(),
            source: err,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_lists_token() {
        let err = ConfigError::UnknownMatcherType {
            kind: "txet".to_string(),
            expected: "all, any, text".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("txet"));
        assert!(message.contains("all, any, text"));
    }

    #[test]
    fn test_document_failure_classification() {
        let scan: HeaderLensError = std::io::Error::other("boom").into();
        assert!(scan.is_document_failure());

        let fatal: HeaderLensError = MatchError::UnresolvedReference {
            id: "nonexistent".to_string(),
        }
        .into();
        assert!(!fatal.is_document_failure());
        assert!(fatal.to_string().contains("nonexistent"));
    }
}
