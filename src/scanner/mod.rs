//! Scanner module - document sources and directory walking

mod document;
mod filesystem;

use globset::GlobSet;
use std::path::{Path, PathBuf};

pub use document::{Document, FileDocument, TextDocument};
pub use filesystem::build_excludes;

use crate::error::ScanError;

/// Collects the documents of a source tree
pub struct Scanner {
    root: PathBuf,
    excludes: GlobSet,
}

impl Scanner {
    /// Create a scanner for the given root directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excludes: GlobSet::empty(),
        }
    }

    /// Leave out documents whose relative path matches one of these globs
    pub fn with_excludes(mut self, excludes: GlobSet) -> Self {
        self.excludes = excludes;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All documents below the root, sorted by name
    pub fn documents(&self) -> Result<Vec<FileDocument>, ScanError> {
        filesystem::walk(&self.root, &self.excludes)
    }
}
