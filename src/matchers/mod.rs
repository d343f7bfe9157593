//! # Header Matchers
//!
//! Composable, stateful predicates evaluated line by line over a document header.
//!
//! ## Overview
//!
//! - Leaf matchers: [`TextMatcher`], [`RegexMatcher`], [`SpdxMatcher`], [`CopyrightMatcher`]
//! - Combinators: `all`, `any`, `not` and `matcherRef`, stored as nodes of a [`MatcherArena`]
//! - [`BuilderRegistry`] turns declarative [`MatcherDefinition`]s into arena nodes
//!
//! Every matcher follows the same state machine:
//!
//! ```text
//! Unstarted --match(line)--> Pending | Matched | Failed
//! Pending   --finalize-----> Failed (leaf default) | Matched
//! any       --reset--------> Unstarted
//! ```
//!
//! `Matched` is sticky until the next reset. Matcher state is per document, so one
//! arena must never process two documents at the same time.
//!
//! ## Examples
//!
//! ```rust
//! use headerlens::matchers::{BuilderRegistry, HeaderMatcher, MatchState, MatcherArena, MatcherDefinition};
//!
//! let definition = MatcherDefinition::new("text").with_param("text", "Apache License");
//! let mut arena = MatcherArena::new();
//! let root = BuilderRegistry::default().build(&definition, &mut arena).unwrap();
//!
//! let mut matcher = arena.rooted(root);
//! assert_eq!(matcher.matches("Licensed under the apache   LICENSE").unwrap(), MatchState::Matched);
//! ```

mod arena;
mod builder;
mod copyright;
mod describe;
mod pattern;
mod spdx;
mod text;

pub use arena::{MatcherArena, NodeIndex, RootedMatcher};
pub use builder::{
    BuildContext, BuilderFactory, BuilderRegistry, ContainerBuilder, CopyrightBuilder,
    MatcherBuilder, NotBuilder, ReferenceBuilder, RegexBuilder, SpdxBuilder, TextBuilder,
};
pub use copyright::CopyrightMatcher;
pub use describe::MatcherDefinition;
pub use pattern::RegexMatcher;
pub use spdx::{SpdxMatcher, SPDX_LICENSE_IDENTIFIER};
pub use text::{TextMatcher, TextMode};

use crate::error::MatchError;
use serde::Serialize;

/// Matcher type names understood by the default [`BuilderRegistry`].
pub mod kinds {
    pub const TEXT: &str = "text";
    pub const REGEX: &str = "regex";
    pub const SPDX: &str = "spdx";
    pub const COPYRIGHT: &str = "copyright";
    pub const ALL: &str = "all";
    pub const ANY: &str = "any";
    pub const NOT: &str = "not";
    pub const MATCHER_REF: &str = "matcherRef";
}

/// Current verdict of a matcher for the document being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchState {
    /// No line has been evaluated since the last reset
    Unstarted,
    /// Lines were evaluated but no verdict is reached yet
    Pending,
    /// The matcher succeeded; stays matched until reset
    Matched,
    /// The matcher can no longer succeed for this document
    Failed,
}

impl MatchState {
    /// Whether the state is `Matched`
    pub fn is_matched(self) -> bool {
        self == MatchState::Matched
    }

    /// Whether the state is `Matched` or `Failed`
    pub fn is_terminal(self) -> bool {
        matches!(self, MatchState::Matched | MatchState::Failed)
    }

    /// The state a leaf settles in once input is exhausted
    pub(crate) fn finalized(self) -> Self {
        match self {
            MatchState::Unstarted | MatchState::Pending => MatchState::Failed,
            terminal => terminal,
        }
    }
}

impl std::fmt::Display for MatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MatchState::Unstarted => "unstarted",
            MatchState::Pending => "pending",
            MatchState::Matched => "matched",
            MatchState::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Contract shared by everything that can be fed a document header line by line.
///
/// Implemented by [`RootedMatcher`] (a single matcher tree) and by
/// [`LicenseSet`](crate::license::LicenseSet) (every license at once).
pub trait HeaderMatcher {
    /// Identity of the matcher
    fn id(&self) -> &str;

    /// Clear all per-document state
    fn reset(&mut self);

    /// Evaluate one more line; returns the cumulative verdict
    fn matches(&mut self, line: &str) -> Result<MatchState, MatchError>;

    /// Force a verdict once the input is exhausted
    fn finalize_state(&mut self) -> Result<MatchState, MatchError>;

    /// Id to report once the matcher has matched.
    ///
    /// Defaults to [`HeaderMatcher::id`]; matchers that select between several
    /// candidates report the candidate that won.
    fn matched_id(&self) -> Option<String> {
        Some(self.id().to_string())
    }
}
