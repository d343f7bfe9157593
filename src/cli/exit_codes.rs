//! Exit codes for the CLI
//!
//! Standard exit codes used by the HeaderLens CLI for CI/CD integration.
//!
//! # Exit Code Reference
//!
//! | Code | Constant | Meaning | Example |
//! |------|----------|---------|---------|
//! | 0 | `SUCCESS` | Success | Every document carries an approved header |
//! | 1 | `UNAPPROVED` | Unapproved documents | Unknown header, GPL file in an MIT tree |
//! | 3 | `ERROR` | Runtime error | Invalid configuration, unresolved matcher reference |
//! | 4 | `INVALID_ARGS` | Invalid arguments | Unknown preset, zero header lines |
//!
//! # Usage
//!
//! ```rust,ignore
//! use headerlens::cli::exit_codes;
//!
//! std::process::exit(exit_codes::UNAPPROVED);
//! ```

/// Success - the audit passed or the command completed normally.
pub const SUCCESS: i32 = 0;

/// Unapproved documents detected.
///
/// Used when:
/// - A standard document carries a license outside the approved families and ids
/// - A standard document has no recognisable license header
pub const UNAPPROVED: i32 = 1;

/// Runtime error (invalid configuration, walk failure, etc.).
///
/// Used when:
/// - Configuration file not readable or invalid
/// - A matcher definition is rejected
/// - A matcher reference is still unresolved when evaluated
/// - The report cannot be written
pub const ERROR: i32 = 3;

/// Invalid arguments (unknown preset, etc.).
///
/// Used when:
/// - Unknown preset name provided
/// - `--header-lines 0`
pub const INVALID_ARGS: i32 = 4;
