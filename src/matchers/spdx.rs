//! SPDX license identifier matcher

use lazy_static::lazy_static;
use regex::Regex;

use super::MatchState;

/// Marker introducing an SPDX license expression
pub const SPDX_LICENSE_IDENTIFIER: &str = "SPDX-License-Identifier:";

lazy_static! {
    static ref SPDX_TAG: Regex =
        Regex::new(r"SPDX-License-Identifier:\s*(?P<expr>.*)$").unwrap();
    static ref SPDX_TOKEN: Regex = Regex::new(r"^[A-Za-z0-9.\-+]+$").unwrap();
}

/// Matches an `SPDX-License-Identifier:` line naming a given short id.
///
/// Unlike the other leaf matchers, this one gives up on its own: once `budget` lines
/// went by without a matching tag it reports `Failed` without waiting for finalize.
#[derive(Debug, Clone)]
pub struct SpdxMatcher {
    name: String,
    budget: usize,
    lines_seen: usize,
}

impl SpdxMatcher {
    /// Create a matcher for the SPDX short id `name`
    pub fn new(name: impl Into<String>, budget: usize) -> Self {
        Self {
            name: name.into(),
            budget: budget.max(1),
            lines_seen: 0,
        }
    }

    /// The SPDX short id
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of lines inspected before giving up
    pub fn budget(&self) -> usize {
        self.budget
    }

    pub(crate) fn process(&mut self, line: &str) -> MatchState {
        self.lines_seen += 1;

        if line.contains(SPDX_LICENSE_IDENTIFIER) {
            if let Some(captures) = SPDX_TAG.captures(line) {
                let expression = captures.name("expr").map_or("", |m| m.as_str());
                if expression_ids(expression).any(|id| id.eq_ignore_ascii_case(&self.name)) {
                    return MatchState::Matched;
                }
            }
        }

        if self.lines_seen >= self.budget {
            MatchState::Failed
        } else {
            MatchState::Pending
        }
    }

    pub(crate) fn reset(&mut self) {
        self.lines_seen = 0;
    }
}

/// License ids named by an SPDX expression, skipping operators and exceptions
fn expression_ids(expression: &str) -> impl Iterator<Item = &str> {
    let mut skip_next = false;
    expression
        .split(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .filter(|token| !token.is_empty())
        .take_while(|token| SPDX_TOKEN.is_match(token) || is_operator(token))
        .filter(move |token| {
            if skip_next {
                skip_next = false;
                return false;
            }
            if token.eq_ignore_ascii_case("WITH") {
                skip_next = true;
                return false;
            }
            !is_operator(token)
        })
}

fn is_operator(token: &str) -> bool {
    ["AND", "OR", "WITH"]
        .iter()
        .any(|op| token.eq_ignore_ascii_case(op))
}
