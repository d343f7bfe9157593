//! License definitions

use serde::Serialize;

use super::LicenseFamily;
use crate::matchers::{MatcherArena, MatcherDefinition, NodeIndex, RootedMatcher};

/// A known license: identity, family and the root of its matcher tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct License {
    id: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    derived_from: Option<String>,
    family: LicenseFamily,
    #[serde(skip)]
    root: NodeIndex,
}

impl License {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        family: LicenseFamily,
        root: NodeIndex,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            notes: None,
            derived_from: None,
            family,
            root,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Record the license this one was adapted from (informational only)
    pub fn with_derived_from(mut self, derived_from: impl Into<String>) -> Self {
        self.derived_from = Some(derived_from.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn derived_from(&self) -> Option<&str> {
        self.derived_from.as_deref()
    }

    pub fn family(&self) -> &LicenseFamily {
        &self.family
    }

    /// Root of the matcher tree in the owning arena
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Drive this license's matcher directly
    pub fn matcher<'a>(&self, arena: &'a mut MatcherArena) -> RootedMatcher<'a> {
        arena.rooted(self.root)
    }

    /// Declarative form of this license's matcher tree
    pub fn describe(&self, arena: &MatcherArena) -> MatcherDefinition {
        arena.describe(self.root)
    }

    /// Sort key: family category, then id
    pub(crate) fn sort_key(&self) -> (&str, &str) {
        (self.family.category(), &self.id)
    }
}
