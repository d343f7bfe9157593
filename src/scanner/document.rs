//! Documents handed to the analyser

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use crate::error::ScanError;

/// A named byte stream that can be classified and checked for a license header.
///
/// `reader` may be called more than once (once to taste, once to read the header);
/// each call starts from the beginning of the content. The returned reader is
/// closed when dropped.
pub trait Document {
    /// Name reported in claims, `/` separated
    fn name(&self) -> &str;

    /// Fresh reader over the whole content
    fn reader(&self) -> Result<Box<dyn BufRead + '_>, ScanError>;

    /// Whether the document contains other documents (e.g. an archive)
    fn is_composite(&self) -> bool {
        false
    }

    /// Up to `len` bytes from the start of the content
    fn taste(&self, len: usize) -> Result<Vec<u8>, ScanError> {
        let mut buffer = Vec::with_capacity(len);
        self.reader()?
            .take(len as u64)
            .read_to_end(&mut buffer)
            .map_err(|source| ScanError::DocumentRead {
                document: self.name().to_string(),
                source,
            })?;
        Ok(buffer)
    }
}

/// A document backed by a file on disk
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
    name: String,
}

impl FileDocument {
    /// Document for `path`, named relative to `root`
    pub fn new(root: &Path, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let relative = path.strip_prefix(root).unwrap_or(&path);
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Self { path, name }
    }

    /// Location on disk
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Document for FileDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn reader(&self) -> Result<Box<dyn BufRead + '_>, ScanError> {
        let file = File::open(&self.path).map_err(|source| ScanError::DocumentRead {
            document: self.name.clone(),
            source,
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// An in-memory document
#[derive(Debug, Clone)]
pub struct TextDocument {
    name: String,
    content: Vec<u8>,
}

impl TextDocument {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

impl Document for TextDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn reader(&self) -> Result<Box<dyn BufRead + '_>, ScanError> {
        Ok(Box::new(Cursor::new(self.content.as_slice())))
    }
}
