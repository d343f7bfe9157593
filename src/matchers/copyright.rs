//! Copyright statement matcher

use lazy_static::lazy_static;
use regex::Regex;

use super::MatchState;
use crate::error::ConfigError;

lazy_static! {
    /// First copyright marker on a line
    static ref COPYRIGHT_MARKER: Regex = Regex::new(r"copyright\b|\(c\)|©").unwrap();
    /// Run of markers and separators following the first one, e.g. `Copyright (c):`
    static ref MARKER_RUN: Regex =
        Regex::new(r"^(?:\s*(?:copyright\b|\(c\)|©|:))*\s*").unwrap();
    /// Separators allowed between the year and the owner
    static ref SEPARATORS: Regex = Regex::new(r"^[\s,.;:]*").unwrap();
}

const ANY_YEAR: &str = r"\d{4}";

/// Recognizes `Copyright <start>[-<end>] <owner>` statements.
///
/// Both "date owner" and "owner date" orders are accepted. Fields left unset act as
/// wildcards: a missing year accepts any four digit year, a start year without an end
/// accepts an optional `-<year>` range. Without an owner the statement must carry a
/// year. Comparison is case-insensitive throughout.
#[derive(Debug, Clone)]
pub struct CopyrightMatcher {
    start: Option<String>,
    end: Option<String>,
    owner: Option<String>,
    owner_lower: Option<String>,
    date: Regex,
}

impl CopyrightMatcher {
    /// Create a matcher; `start` and `end` must be numeric years when present
    pub fn new(
        start: Option<String>,
        end: Option<String>,
        owner: Option<String>,
    ) -> Result<Self, ConfigError> {
        for (parameter, value) in [("start", &start), ("end", &end)] {
            if let Some(year) = value {
                if year.is_empty() || !year.chars().all(|c| c.is_ascii_digit()) {
                    return Err(ConfigError::InvalidParameter {
                        kind: super::kinds::COPYRIGHT.to_string(),
                        parameter: parameter.to_string(),
                        message: format!("'{}' is not a year", year),
                    });
                }
            }
        }

        let owner = owner.filter(|o| !o.trim().is_empty());
        let date = date_pattern(start.as_deref(), end.as_deref());
        let date = Regex::new(&date).map_err(|source| ConfigError::InvalidRegex {
            pattern: date,
            source,
        })?;

        Ok(Self {
            owner_lower: owner.as_ref().map(|o| o.trim().to_lowercase()),
            start,
            end,
            owner,
            date,
        })
    }

    /// Configured start year
    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    /// Configured end year
    pub fn end(&self) -> Option<&str> {
        self.end.as_deref()
    }

    /// Configured owner
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub(crate) fn process(&mut self, line: &str) -> MatchState {
        if self.matches_line(line) {
            MatchState::Matched
        } else {
            MatchState::Pending
        }
    }

    fn matches_line(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        let Some(marker) = COPYRIGHT_MARKER.find(&lower) else {
            return false;
        };
        let after_marker = &lower[marker.start()..];
        let statement = match MARKER_RUN.find(after_marker) {
            Some(run) => &after_marker[run.end()..],
            None => after_marker,
        };

        self.date_then_owner(statement) || self.owner_then_date(statement)
    }

    fn date_then_owner(&self, statement: &str) -> bool {
        let Some(date) = self.date.find(statement) else {
            return false;
        };
        match &self.owner_lower {
            None => true,
            Some(owner) => skip_separators(&statement[date.end()..]).starts_with(owner.as_str()),
        }
    }

    fn owner_then_date(&self, statement: &str) -> bool {
        let Some(owner) = &self.owner_lower else {
            return false;
        };
        let Some(rest) = statement.strip_prefix(owner.as_str()) else {
            return false;
        };
        if self.start.is_none() && self.end.is_none() {
            return true;
        }
        self.date.is_match(skip_separators(rest))
    }
}

fn skip_separators(text: &str) -> &str {
    match SEPARATORS.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// Year pattern anchored at the start of the statement
fn date_pattern(start: Option<&str>, end: Option<&str>) -> String {
    match (start, end) {
        (Some(start), Some(end)) => format!(r"^{}\s*-\s*{}\b", start, end),
        (Some(start), None) => format!(r"^{}(?:\s*-\s*{})?\b", start, ANY_YEAR),
        (None, Some(end)) => format!(r"^{}\s*-\s*{}\b", ANY_YEAR, end),
        (None, None) => format!(r"^{}(?:\s*-\s*{})?\b", ANY_YEAR, ANY_YEAR),
    }
}
