//! HeaderLens Library
//!
//! This crate audits source trees for license and copyright headers. Declarative
//! matcher trees recognise license texts, SPDX tags and copyright notices in the
//! first lines of each document; every document is then classified against the
//! approved license families.
//!
//! ```rust
//! use headerlens::analysis::{DocumentAnalyser, HeaderCheck};
//! use headerlens::config::Config;
//! use headerlens::scanner::TextDocument;
//!
//! let licenses = Config::default().build_license_set().unwrap();
//! let mut analyser = DocumentAnalyser::new(licenses, HeaderCheck::default());
//!
//! let document = TextDocument::new("lib.rs", "// SPDX-License-Identifier: MIT\n");
//! let claim = analyser.analyse(&document).unwrap();
//! assert_eq!(claim.license_id(), "MIT");
//! assert!(claim.is_approved());
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod license;
pub mod matchers;
pub mod report;
pub mod scanner;

pub use error::HeaderLensError;
