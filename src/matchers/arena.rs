//! Matcher arena
//!
//! All matcher nodes of a configuration live in one [`MatcherArena`] and refer to
//! each other by [`NodeIndex`]. Sharing a subtree (through `matcherRef`) therefore
//! never duplicates it: every parent points at the same node, and the arena makes
//! sure a shared node is evaluated at most once per input line.

use std::collections::{BTreeSet, HashMap};

use tracing::trace;

use super::{
    CopyrightMatcher, HeaderMatcher, MatchState, RegexMatcher, SpdxMatcher, TextMatcher,
};
use crate::error::{ConfigError, MatchError};

/// Handle to a node of a [`MatcherArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Position of the node in its arena
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Text(TextMatcher),
    Regex(RegexMatcher),
    Spdx(SpdxMatcher),
    Copyright(CopyrightMatcher),
    All(Vec<NodeIndex>),
    Any {
        children: Vec<NodeIndex>,
        matched: Option<NodeIndex>,
    },
    Not(NodeIndex),
    Reference {
        target: String,
        resolved: Option<NodeIndex>,
    },
}

impl NodeKind {
    pub(crate) fn kind_name(&self) -> &'static str {
        use super::kinds;
        match self {
            NodeKind::Text(_) => kinds::TEXT,
            NodeKind::Regex(_) => kinds::REGEX,
            NodeKind::Spdx(_) => kinds::SPDX,
            NodeKind::Copyright(_) => kinds::COPYRIGHT,
            NodeKind::All(_) => kinds::ALL,
            NodeKind::Any { .. } => kinds::ANY,
            NodeKind::Not(_) => kinds::NOT,
            NodeKind::Reference { .. } => kinds::MATCHER_REF,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) id: String,
    pub(crate) kind: NodeKind,
    state: MatchState,
    /// Line generation this node was last evaluated for
    seen: u64,
}

/// Owner of every matcher node of a configuration.
///
/// Cloning an arena deep-copies all nodes and their per-document state, which is
/// how parallel workers get a tree of their own.
#[derive(Debug, Clone, Default)]
pub struct MatcherArena {
    nodes: Vec<Node>,
    ids: HashMap<String, NodeIndex>,
    generation: u64,
    generated: usize,
}

impl MatcherArena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by matcher id
    pub fn lookup(&self, id: &str) -> Option<NodeIndex> {
        self.ids.get(id).copied()
    }

    /// Id of a node
    pub fn id_of(&self, idx: NodeIndex) -> &str {
        &self.nodes[idx.0].id
    }

    /// Type name of a node
    pub fn kind_of(&self, idx: NodeIndex) -> &'static str {
        self.nodes[idx.0].kind.kind_name()
    }

    /// Current state of a node
    pub fn state(&self, idx: NodeIndex) -> MatchState {
        self.nodes[idx.0].state
    }

    /// Direct children of a node; a resolved reference reports its target
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        match &self.nodes[idx.0].kind {
            NodeKind::All(children) | NodeKind::Any { children, .. } => children.clone(),
            NodeKind::Not(child) => vec![*child],
            NodeKind::Reference {
                resolved: Some(target),
                ..
            } => vec![*target],
            _ => Vec::new(),
        }
    }

    /// First child of an `any` node that matched, if it matched
    pub fn matched_branch(&self, idx: NodeIndex) -> Option<NodeIndex> {
        match &self.nodes[idx.0].kind {
            NodeKind::Any { matched, .. } => *matched,
            _ => None,
        }
    }

    /// Produce an id for a node built without one
    pub(crate) fn generate_id(&mut self, kind: &str) -> String {
        loop {
            self.generated += 1;
            let candidate = format!("{}-{}", kind, self.generated);
            if !self.ids.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Register a new node under a unique id
    pub(crate) fn insert(&mut self, id: String, kind: NodeKind) -> Result<NodeIndex, ConfigError> {
        if self.ids.contains_key(&id) {
            return Err(ConfigError::DuplicateMatcherId { id });
        }
        let idx = NodeIndex(self.nodes.len());
        self.ids.insert(id.clone(), idx);
        self.nodes.push(Node {
            id,
            kind,
            state: MatchState::Unstarted,
            seen: 0,
        });
        Ok(idx)
    }

    pub(crate) fn node(&self, idx: NodeIndex) -> &Node {
        &self.nodes[idx.0]
    }

    /// Targets of `matcherRef` nodes that are not registered, in id order
    pub fn unresolved_references(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter_map(|node| match &node.kind {
                NodeKind::Reference {
                    target,
                    resolved: None,
                } if !self.ids.contains_key(target) => Some(target.clone()),
                _ => None,
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Bind every `matcherRef` whose target is now registered.
    ///
    /// Fails with the first target that is still unknown.
    pub fn resolve_references(&mut self) -> Result<(), ConfigError> {
        if let Some(id) = self.unresolved_references().into_iter().next() {
            return Err(ConfigError::UnresolvedReference { id });
        }
        let ids = &self.ids;
        for node in &mut self.nodes {
            if let NodeKind::Reference { target, resolved } = &mut node.kind {
                if resolved.is_none() {
                    *resolved = ids.get(target.as_str()).copied();
                }
            }
        }
        self.check_cycles()
    }

    /// Fail with the id of a node that can reach itself through its children.
    ///
    /// Only bound references are followed.
    pub fn check_cycles(&self) -> Result<(), ConfigError> {
        let mut marks = vec![Mark::Unvisited; self.nodes.len()];
        for start in 0..self.nodes.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            marks[start] = Mark::Open;
            let mut stack = vec![(NodeIndex(start), self.children(NodeIndex(start)))];
            while let Some((node, pending)) = stack.last_mut() {
                match pending.pop() {
                    Some(child) => match marks[child.0] {
                        Mark::Open => {
                            return Err(ConfigError::CyclicReference {
                                id: self.cycle_name(&stack, child),
                            })
                        }
                        Mark::Unvisited => {
                            marks[child.0] = Mark::Open;
                            stack.push((child, self.children(child)));
                        }
                        Mark::Done => {}
                    },
                    None => {
                        marks[node.0] = Mark::Done;
                        stack.pop();
                    }
                }
            }
        }
        Ok(())
    }

    /// Name a cycle by the target of its first reference
    fn cycle_name(&self, path: &[(NodeIndex, Vec<NodeIndex>)], closing: NodeIndex) -> String {
        let start = path.iter().position(|(node, _)| *node == closing).unwrap_or(0);
        path[start..]
            .iter()
            .find_map(|(node, _)| match &self.nodes[node.0].kind {
                NodeKind::Reference { target, .. } => Some(target.clone()),
                _ => None,
            })
            .unwrap_or_else(|| self.nodes[closing.0].id.clone())
    }

    /// View one node as a standalone [`HeaderMatcher`]
    pub fn rooted(&mut self, root: NodeIndex) -> RootedMatcher<'_> {
        RootedMatcher { arena: self, root }
    }

    /// Start evaluating a new input line.
    ///
    /// Must be called once per line before [`MatcherArena::evaluate`] is used on any
    /// root for that line.
    pub fn begin_line(&mut self) {
        self.generation += 1;
    }

    /// Evaluate the current line against the subtree rooted at `idx`
    pub fn evaluate(&mut self, idx: NodeIndex, line: &str) -> Result<MatchState, MatchError> {
        let generation = self.generation;
        {
            let node = &mut self.nodes[idx.0];
            if node.seen == generation || node.state.is_terminal() {
                node.seen = generation;
                return Ok(node.state);
            }
            node.seen = generation;
        }

        let state = match &mut self.nodes[idx.0].kind {
            NodeKind::Text(m) => m.process(line),
            NodeKind::Regex(m) => m.process(line),
            NodeKind::Spdx(m) => m.process(line),
            NodeKind::Copyright(m) => m.process(line),
            NodeKind::All(_) => self.evaluate_all(idx, line)?,
            NodeKind::Any { .. } => self.evaluate_any(idx, line)?,
            NodeKind::Not(child) => {
                let child = *child;
                negate(self.evaluate(child, line)?)
            }
            NodeKind::Reference { .. } => {
                let target = self.resolve(idx)?;
                self.evaluate(target, line)?
            }
        };

        self.nodes[idx.0].state = state;
        Ok(state)
    }

    fn evaluate_all(&mut self, idx: NodeIndex, line: &str) -> Result<MatchState, MatchError> {
        let mut all_matched = true;
        let mut any_failed = false;
        let mut position = 0;
        while let Some(child) = self.child_at(idx, position) {
            match self.evaluate(child, line)? {
                MatchState::Matched => {}
                MatchState::Failed => {
                    any_failed = true;
                    all_matched = false;
                }
                _ => all_matched = false,
            }
            position += 1;
        }
        Ok(combine_all(all_matched, any_failed))
    }

    fn evaluate_any(&mut self, idx: NodeIndex, line: &str) -> Result<MatchState, MatchError> {
        let mut first_match = None;
        let mut all_failed = true;
        let mut position = 0;
        while let Some(child) = self.child_at(idx, position) {
            match self.evaluate(child, line)? {
                MatchState::Matched => {
                    all_failed = false;
                    first_match.get_or_insert(child);
                }
                MatchState::Failed => {}
                _ => all_failed = false,
            }
            position += 1;
        }
        Ok(self.settle_any(idx, first_match, all_failed))
    }

    fn settle_any(&mut self, idx: NodeIndex, first_match: Option<NodeIndex>, all_failed: bool) -> MatchState {
        if let Some(branch) = first_match {
            if let NodeKind::Any { matched, .. } = &mut self.nodes[idx.0].kind {
                *matched = Some(branch);
            }
            trace!(matcher = %self.nodes[idx.0].id, branch = %self.nodes[branch.0].id, "any matched");
            MatchState::Matched
        } else if all_failed {
            MatchState::Failed
        } else {
            MatchState::Pending
        }
    }

    fn child_at(&self, idx: NodeIndex, position: usize) -> Option<NodeIndex> {
        match &self.nodes[idx.0].kind {
            NodeKind::All(children) | NodeKind::Any { children, .. } => {
                children.get(position).copied()
            }
            _ => None,
        }
    }

    /// Resolve a reference node, binding it lazily on first use
    fn resolve(&mut self, idx: NodeIndex) -> Result<NodeIndex, MatchError> {
        let found = match &self.nodes[idx.0].kind {
            NodeKind::Reference {
                resolved: Some(target),
                ..
            } => return Ok(*target),
            NodeKind::Reference { target, .. } => self
                .ids
                .get(target)
                .copied()
                .ok_or_else(|| MatchError::UnresolvedReference { id: target.clone() })?,
            _ => return Ok(idx),
        };
        if let NodeKind::Reference { resolved, .. } = &mut self.nodes[idx.0].kind {
            *resolved = Some(found);
        }
        Ok(found)
    }

    /// Force a verdict for the subtree rooted at `idx` once input is exhausted
    pub fn finalize(&mut self, idx: NodeIndex) -> Result<MatchState, MatchError> {
        self.finalize_node(idx, &mut BTreeSet::new())
    }

    fn finalize_node(
        &mut self,
        idx: NodeIndex,
        open: &mut BTreeSet<NodeIndex>,
    ) -> Result<MatchState, MatchError> {
        let current = self.nodes[idx.0].state;
        if current.is_terminal() {
            return Ok(current);
        }
        if !open.insert(idx) {
            return Err(MatchError::CyclicReference {
                id: self.nodes[idx.0].id.clone(),
            });
        }

        let state = match &self.nodes[idx.0].kind {
            NodeKind::Text(_) | NodeKind::Regex(_) | NodeKind::Spdx(_) | NodeKind::Copyright(_) => {
                current.finalized()
            }
            NodeKind::All(children) => {
                let children = children.clone();
                let mut all_matched = true;
                for child in children {
                    if !self.finalize_node(child, open)?.is_matched() {
                        all_matched = false;
                    }
                }
                // Every child is terminal now, so anything short of all matched fails
                combine_all(all_matched, !all_matched)
            }
            NodeKind::Any { children, .. } => {
                let children = children.clone();
                let mut first_match = None;
                for child in children {
                    if self.finalize_node(child, open)?.is_matched() {
                        first_match.get_or_insert(child);
                    }
                }
                self.settle_any(idx, first_match, true)
            }
            NodeKind::Not(child) => {
                let child = *child;
                negate(self.finalize_node(child, open)?)
            }
            NodeKind::Reference { .. } => {
                let target = self.resolve(idx)?;
                self.finalize_node(target, open)?
            }
        };

        open.remove(&idx);
        self.nodes[idx.0].state = state;
        Ok(state)
    }

    /// Return the subtree rooted at `idx` to `Unstarted`
    pub fn reset(&mut self, idx: NodeIndex) {
        let mut stack = vec![idx];
        let mut visited = BTreeSet::new();
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            self.reset_node(current);
            stack.extend(self.children(current));
        }
    }

    /// Return every node of the arena to `Unstarted`
    pub fn reset_all(&mut self) {
        for position in 0..self.nodes.len() {
            self.reset_node(NodeIndex(position));
        }
    }

    fn reset_node(&mut self, idx: NodeIndex) {
        let node = &mut self.nodes[idx.0];
        node.state = MatchState::Unstarted;
        node.seen = 0;
        match &mut node.kind {
            NodeKind::Text(m) => m.reset(),
            NodeKind::Regex(m) => m.reset(),
            NodeKind::Spdx(m) => m.reset(),
            NodeKind::Any { matched, .. } => *matched = None,
            NodeKind::Copyright(_) | NodeKind::All(_) | NodeKind::Not(_) | NodeKind::Reference { .. } => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Open,
    Done,
}

fn combine_all(all_matched: bool, any_failed: bool) -> MatchState {
    if any_failed {
        MatchState::Failed
    } else if all_matched {
        MatchState::Matched
    } else {
        MatchState::Pending
    }
}

fn negate(state: MatchState) -> MatchState {
    match state {
        MatchState::Matched => MatchState::Failed,
        MatchState::Failed => MatchState::Matched,
        other => other,
    }
}

/// A single matcher tree of an arena, driven as a [`HeaderMatcher`]
pub struct RootedMatcher<'a> {
    arena: &'a mut MatcherArena,
    root: NodeIndex,
}

impl RootedMatcher<'_> {
    /// The root node
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// The arena behind this matcher
    pub fn arena(&self) -> &MatcherArena {
        self.arena
    }
}

impl HeaderMatcher for RootedMatcher<'_> {
    fn id(&self) -> &str {
        self.arena.id_of(self.root)
    }

    fn reset(&mut self) {
        self.arena.reset(self.root);
    }

    fn matches(&mut self, line: &str) -> Result<MatchState, MatchError> {
        self.arena.begin_line();
        self.arena.evaluate(self.root, line)
    }

    fn finalize_state(&mut self) -> Result<MatchState, MatchError> {
        self.arena.finalize(self.root)
    }
}
