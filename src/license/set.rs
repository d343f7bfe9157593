//! The license registry of a run

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::{make_category, License, LicenseFamily};
use crate::error::{ConfigError, MatchError};
use crate::matchers::{HeaderMatcher, MatchState, MatcherArena};

/// Which licenses a view of the set includes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LicenseFilter {
    /// Every defined license
    #[default]
    All,
    /// Licenses that are currently approved
    Approved,
    /// No license at all
    None,
}

/// All licenses known to a run, with the matcher arena they share.
///
/// Licenses are kept in (family category, id) order, which is also the order in which
/// they compete for a document: when several match on the same line, the first wins.
///
/// The set is itself a [`HeaderMatcher`]; after a match, [`HeaderMatcher::matched_id`]
/// names the license that claimed the document.
#[derive(Debug, Clone)]
pub struct LicenseSet {
    arena: MatcherArena,
    licenses: Vec<License>,
    families: BTreeMap<String, LicenseFamily>,
    approved_categories: BTreeSet<String>,
    approved_ids: BTreeSet<String>,
    matched: Option<usize>,
}

impl LicenseSet {
    /// Create an empty set over an arena holding the matcher trees
    pub fn new(arena: MatcherArena) -> Self {
        Self {
            arena,
            licenses: Vec::new(),
            families: BTreeMap::new(),
            approved_categories: BTreeSet::new(),
            approved_ids: BTreeSet::new(),
            matched: None,
        }
    }

    /// The shared matcher arena
    pub fn arena(&self) -> &MatcherArena {
        &self.arena
    }

    /// Mutable access to the arena, to build further matchers into it
    pub fn arena_mut(&mut self) -> &mut MatcherArena {
        &mut self.arena
    }

    /// Register a family; a later family with the same category replaces the name
    pub fn add_family(&mut self, family: LicenseFamily) {
        self.families.insert(family.category().to_string(), family);
    }

    /// Look up a family by (unpadded or padded) category
    pub fn family(&self, category: &str) -> Option<&LicenseFamily> {
        self.families.get(&make_category(category))
    }

    /// Register a license; its family must be registered, its id unused and its
    /// matcher built into this set's arena
    pub fn add_license(&mut self, license: License) -> Result<(), ConfigError> {
        if license.root().index() >= self.arena.len() {
            return Err(ConfigError::ForeignMatcher {
                license: license.id().to_string(),
            });
        }
        if !self.families.contains_key(license.family().category()) {
            return Err(ConfigError::UnknownFamily {
                license: license.id().to_string(),
                family: license.family().category().trim_end().to_string(),
            });
        }
        if self.get(license.id()).is_some() {
            return Err(ConfigError::DuplicateLicense {
                id: license.id().to_string(),
            });
        }

        let position = self
            .licenses
            .partition_point(|existing| existing.sort_key() < license.sort_key());
        debug!(license = %license.id(), family = %license.family().category(), "license registered");
        self.licenses.insert(position, license);
        Ok(())
    }

    /// Finish construction: every `matcherRef` must point at a registered matcher
    pub fn resolve(&mut self) -> Result<(), ConfigError> {
        self.arena.resolve_references()
    }

    /// Look up a license by id
    pub fn get(&self, id: &str) -> Option<&License> {
        self.licenses.iter().find(|license| license.id() == id)
    }

    /// Number of defined licenses
    pub fn len(&self) -> usize {
        self.licenses.len()
    }

    /// Whether no license is defined
    pub fn is_empty(&self) -> bool {
        self.licenses.is_empty()
    }

    /// Licenses selected by `filter`, in set order
    pub fn licenses(&self, filter: LicenseFilter) -> Vec<&License> {
        match filter {
            LicenseFilter::All => self.licenses.iter().collect(),
            LicenseFilter::Approved => self
                .licenses
                .iter()
                .filter(|license| self.is_approved(license))
                .collect(),
            LicenseFilter::None => Vec::new(),
        }
    }

    /// Distinct families of the licenses selected by `filter`, by category
    pub fn families(&self, filter: LicenseFilter) -> Vec<&LicenseFamily> {
        self.licenses(filter)
            .into_iter()
            .map(License::family)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Approve every license of a family category
    pub fn approve_family(&mut self, category: &str) {
        self.approved_categories.insert(make_category(category));
    }

    /// Withdraw a family approval
    pub fn remove_family(&mut self, category: &str) {
        self.approved_categories.remove(&make_category(category));
    }

    /// Approve a single license by id
    pub fn approve_license(&mut self, id: impl Into<String>) {
        self.approved_ids.insert(id.into());
    }

    /// Withdraw an individual license approval
    pub fn remove_license(&mut self, id: &str) {
        self.approved_ids.remove(id);
    }

    /// Approved family categories (padded)
    pub fn approved_categories(&self) -> impl Iterator<Item = &str> {
        self.approved_categories.iter().map(String::as_str)
    }

    /// Individually approved license ids
    pub fn approved_ids(&self) -> impl Iterator<Item = &str> {
        self.approved_ids.iter().map(String::as_str)
    }

    /// Whether a license is approved, by family or by id
    pub fn is_approved(&self, license: &License) -> bool {
        self.approved_categories.contains(license.family().category())
            || self.approved_ids.contains(license.id())
    }

    /// Approval of a license id; unknown ids are never approved
    pub fn is_approved_id(&self, id: &str) -> bool {
        self.get(id).is_some_and(|license| self.is_approved(license))
    }

    /// License that claimed the current document, if any
    pub fn matched_license(&self) -> Option<&License> {
        self.matched.map(|position| &self.licenses[position])
    }

    fn claim(&mut self, position: usize) -> MatchState {
        self.matched = Some(position);
        MatchState::Matched
    }
}

impl HeaderMatcher for LicenseSet {
    fn id(&self) -> &str {
        "license-set"
    }

    fn reset(&mut self) {
        self.arena.reset_all();
        self.matched = None;
    }

    fn matches(&mut self, line: &str) -> Result<MatchState, MatchError> {
        if self.matched.is_some() {
            return Ok(MatchState::Matched);
        }

        self.arena.begin_line();
        let mut all_failed = true;
        for position in 0..self.licenses.len() {
            let root = self.licenses[position].root();
            match self.arena.evaluate(root, line)? {
                MatchState::Matched => return Ok(self.claim(position)),
                MatchState::Failed => {}
                _ => all_failed = false,
            }
        }

        if all_failed && !self.licenses.is_empty() {
            Ok(MatchState::Failed)
        } else {
            Ok(MatchState::Pending)
        }
    }

    fn finalize_state(&mut self) -> Result<MatchState, MatchError> {
        if self.matched.is_some() {
            return Ok(MatchState::Matched);
        }

        for position in 0..self.licenses.len() {
            let root = self.licenses[position].root();
            if self.arena.finalize(root)?.is_matched() {
                return Ok(self.claim(position));
            }
        }
        Ok(MatchState::Failed)
    }

    fn matched_id(&self) -> Option<String> {
        self.matched_license().map(|license| license.id().to_string())
    }
}
