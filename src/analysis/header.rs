//! Streaming header check

use std::io::{self, BufRead};

use tracing::trace;

use crate::error::{HeaderLensError, ScanError};
use crate::matchers::{HeaderMatcher, MatchState};

/// Number of header lines retained for display by default
pub const DEFAULT_HEADER_LINES: usize = 50;

/// Splits a byte stream into lines on `\n`, `\r\n` or a lone `\r`.
///
/// A final line without terminator still counts as a line. Invalid UTF-8 is replaced
/// with U+FFFD.
pub struct LineReader<R> {
    inner: R,
    skip_lf: bool,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            skip_lf: false,
        }
    }

    /// Next line without its terminator, `None` at end of input
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = Vec::new();
        let mut read_any = false;

        loop {
            let (used, terminated) = {
                let buffer = self.inner.fill_buf()?;
                if buffer.is_empty() {
                    return Ok(read_any.then(|| String::from_utf8_lossy(&line).into_owned()));
                }
                if self.skip_lf {
                    self.skip_lf = false;
                    if buffer[0] == b'\n' {
                        (1, false)
                    } else {
                        (0, false)
                    }
                } else {
                    read_any = true;
                    match buffer.iter().position(|&b| b == b'\n' || b == b'\r') {
                        Some(end) => {
                            line.extend_from_slice(&buffer[..end]);
                            self.skip_lf = buffer[end] == b'\r';
                            (end + 1, true)
                        }
                        None => {
                            line.extend_from_slice(buffer);
                            (buffer.len(), false)
                        }
                    }
                }
            };
            self.inner.consume(used);
            if terminated {
                return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
            }
        }
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}

/// Outcome of checking one document header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderOutcome {
    /// A matcher claimed the document
    Matched {
        /// Id reported by the matcher, if it names one
        license_id: Option<String>,
    },
    /// Input ran out without a match
    Unknown {
        /// The retained header lines joined by `\n`
        sample: String,
    },
}

/// Result of a header check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderReport {
    pub outcome: HeaderOutcome,
    /// Lines fed to the matcher
    pub lines_read: usize,
}

/// Feeds a document line by line through a matcher until it matches or input ends
#[derive(Debug, Clone, Copy)]
pub struct HeaderCheck {
    header_lines: usize,
}

impl Default for HeaderCheck {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_LINES)
    }
}

impl HeaderCheck {
    /// Check retaining at most `header_lines` lines as sample
    pub fn new(header_lines: usize) -> Self {
        Self { header_lines }
    }

    /// Lines retained as sample
    pub fn header_lines(&self) -> usize {
        self.header_lines
    }

    /// Run the check; the matcher is reset afterwards whatever the outcome.
    ///
    /// Every line is fed to the matcher, the cap only bounds the retained sample.
    pub fn run<M, R>(&self, document: &str, reader: R, matcher: &mut M) -> Result<HeaderReport, HeaderLensError>
    where
        M: HeaderMatcher + ?Sized,
        R: BufRead,
    {
        let report = self.feed(document, reader, matcher);
        matcher.reset();
        report
    }

    fn feed<M, R>(&self, document: &str, reader: R, matcher: &mut M) -> Result<HeaderReport, HeaderLensError>
    where
        M: HeaderMatcher + ?Sized,
        R: BufRead,
    {
        let mut lines = LineReader::new(reader);
        let mut sample: Vec<String> = Vec::new();
        let mut lines_read = 0;

        while let Some(line) = lines.next_line().map_err(|source| ScanError::DocumentRead {
            document: document.to_string(),
            source,
        })? {
            lines_read += 1;
            if matcher.matches(&line)? == MatchState::Matched {
                trace!(document, line = lines_read, "header matched");
                return Ok(HeaderReport {
                    outcome: HeaderOutcome::Matched {
                        license_id: matcher.matched_id(),
                    },
                    lines_read,
                });
            }
            if sample.len() < self.header_lines {
                sample.push(line);
            }
        }

        let outcome = match matcher.finalize_state()? {
            MatchState::Matched => HeaderOutcome::Matched {
                license_id: matcher.matched_id(),
            },
            _ => HeaderOutcome::Unknown {
                sample: sample.join("\n"),
            },
        };
        Ok(HeaderReport { outcome, lines_read })
    }
}
