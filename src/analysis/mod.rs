//! # Header Analysis
//!
//! The streaming side of an audit:
//!
//! - [`guesser`] - file type pre-classification (notice, archive, binary)
//! - [`LineReader`] / [`HeaderCheck`] - feed a document line by line through a matcher
//! - [`DocumentAnalyser`] - classify one document into a [`Claim`](crate::report::Claim)
//! - [`AuditEngine`] - run the analyser over many documents, optionally in parallel

mod analyser;
mod engine;
pub mod guesser;
mod header;

pub use analyser::DocumentAnalyser;
pub use engine::AuditEngine;
pub use header::{HeaderCheck, HeaderOutcome, HeaderReport, LineReader, DEFAULT_HEADER_LINES};
