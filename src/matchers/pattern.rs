//! Regular expression matcher

use regex::Regex;
use std::collections::VecDeque;

use super::MatchState;

/// Searches a sliding window of recent lines for a regular expression.
///
/// The window holds the last `window` lines joined by `\n`; with the default of one
/// line this is a plain per-line search. Memory stays bounded by the window size
/// regardless of document length.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    regex: Regex,
    window: usize,
    recent: VecDeque<String>,
}

impl RegexMatcher {
    /// Create a matcher over a compiled pattern; `window` is clamped to at least 1
    pub fn new(regex: Regex, window: usize) -> Self {
        let window = window.max(1);
        Self {
            regex,
            window,
            recent: VecDeque::with_capacity(window),
        }
    }

    /// The pattern source
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Number of lines searched together
    pub fn window(&self) -> usize {
        self.window
    }

    pub(crate) fn process(&mut self, line: &str) -> MatchState {
        let found = if self.window == 1 {
            self.regex.is_match(line)
        } else {
            if self.recent.len() == self.window {
                self.recent.pop_front();
            }
            self.recent.push_back(line.to_string());
            let joined = self.recent.iter().map(String::as_str).collect::<Vec<_>>().join("\n");
            self.regex.is_match(&joined)
        };

        if found {
            MatchState::Matched
        } else {
            MatchState::Pending
        }
    }

    pub(crate) fn reset(&mut self) {
        self.recent.clear();
    }
}
