//! Matcher builders and the type registry
//!
//! Builders are plain structs consumed by [`MatcherBuilder::build`]; each validates
//! its parameters and inserts the resulting node (children first) into an arena.
//! The [`BuilderRegistry`] maps the type names used in configuration to factories
//! producing those builders from a [`MatcherDefinition`].

use std::collections::BTreeMap;

use regex::Regex;
use tracing::{debug, warn};

use super::arena::NodeKind;
use super::describe::known_params;
use super::{
    kinds, CopyrightMatcher, MatcherArena, MatcherDefinition, NodeIndex, RegexMatcher,
    SpdxMatcher, TextMatcher,
};
use crate::analysis::DEFAULT_HEADER_LINES;
use crate::error::ConfigError;

/// Settings shared by every builder of a configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildContext {
    /// Line budget handed to matchers that give up on their own
    pub header_lines: usize,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self {
            header_lines: DEFAULT_HEADER_LINES,
        }
    }
}

/// Factory turning a definition into a builder
pub type BuilderFactory =
    fn(&BuilderRegistry, &MatcherDefinition, &BuildContext) -> Result<MatcherBuilder, ConfigError>;

/// Builder for a literal [`TextMatcher`]
#[derive(Debug, Clone, Default)]
pub struct TextBuilder {
    id: Option<String>,
    text: Option<String>,
}

impl TextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn build(self, arena: &mut MatcherArena) -> Result<NodeIndex, ConfigError> {
        let text = required(kinds::TEXT, "text", self.text)?;
        let matcher = TextMatcher::new(text);
        if matcher.is_empty() {
            return Err(ConfigError::InvalidParameter {
                kind: kinds::TEXT.to_string(),
                parameter: "text".to_string(),
                message: "multi-line text must contain letters or digits".to_string(),
            });
        }
        let id = assign_id(arena, kinds::TEXT, self.id);
        arena.insert(id, NodeKind::Text(matcher))
    }
}

/// Builder for a [`RegexMatcher`]
#[derive(Debug, Clone, Default)]
pub struct RegexBuilder {
    id: Option<String>,
    expr: Option<String>,
    window: Option<usize>,
}

impl RegexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn expr(mut self, expr: impl Into<String>) -> Self {
        self.expr = Some(expr.into());
        self
    }

    /// Number of consecutive lines searched together
    pub fn window(mut self, window: usize) -> Self {
        self.window = Some(window);
        self
    }

    pub fn build(self, arena: &mut MatcherArena) -> Result<NodeIndex, ConfigError> {
        let expr = required(kinds::REGEX, "expr", self.expr)?;
        let window = match self.window {
            Some(0) => {
                return Err(ConfigError::InvalidParameter {
                    kind: kinds::REGEX.to_string(),
                    parameter: "window".to_string(),
                    message: "must be at least 1".to_string(),
                })
            }
            Some(window) => window,
            None => 1,
        };
        let regex = Regex::new(&expr).map_err(|source| ConfigError::InvalidRegex {
            pattern: expr.clone(),
            source,
        })?;
        let id = assign_id(arena, kinds::REGEX, self.id);
        arena.insert(id, NodeKind::Regex(RegexMatcher::new(regex, window)))
    }
}

/// Builder for an [`SpdxMatcher`]
#[derive(Debug, Clone, Default)]
pub struct SpdxBuilder {
    id: Option<String>,
    name: Option<String>,
    budget: Option<usize>,
}

impl SpdxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// SPDX short id, e.g. `Apache-2.0`
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Lines inspected before the matcher fails on its own
    pub fn budget(mut self, budget: usize) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn build(self, arena: &mut MatcherArena) -> Result<NodeIndex, ConfigError> {
        let name = required(kinds::SPDX, "name", self.name)?;
        let budget = self.budget.unwrap_or(DEFAULT_HEADER_LINES);
        let id = assign_id(arena, kinds::SPDX, self.id);
        arena.insert(id, NodeKind::Spdx(SpdxMatcher::new(name.trim(), budget)))
    }
}

/// Builder for a [`CopyrightMatcher`]; every field is optional
#[derive(Debug, Clone, Default)]
pub struct CopyrightBuilder {
    id: Option<String>,
    start: Option<String>,
    end: Option<String>,
    owner: Option<String>,
}

impl CopyrightBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn start(mut self, year: impl Into<String>) -> Self {
        self.start = Some(year.into());
        self
    }

    pub fn end(mut self, year: impl Into<String>) -> Self {
        self.end = Some(year.into());
        self
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn build(self, arena: &mut MatcherArena) -> Result<NodeIndex, ConfigError> {
        let matcher = CopyrightMatcher::new(self.start, self.end, self.owner)?;
        let id = assign_id(arena, kinds::COPYRIGHT, self.id);
        arena.insert(id, NodeKind::Copyright(matcher))
    }
}

/// Which boolean combinator a [`ContainerBuilder`] produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    All,
    Any,
}

/// Builder for `all` and `any` nodes
#[derive(Debug, Clone)]
pub struct ContainerBuilder {
    container: Container,
    id: Option<String>,
    children: Vec<MatcherBuilder>,
}

impl ContainerBuilder {
    pub fn all() -> Self {
        Self::with_container(Container::All)
    }

    pub fn any() -> Self {
        Self::with_container(Container::Any)
    }

    fn with_container(container: Container) -> Self {
        Self {
            container,
            id: None,
            children: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn child(mut self, child: impl Into<MatcherBuilder>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn build(self, arena: &mut MatcherArena) -> Result<NodeIndex, ConfigError> {
        let kind = match self.container {
            Container::All => kinds::ALL,
            Container::Any => kinds::ANY,
        };
        if self.children.is_empty() {
            return Err(ConfigError::InvalidChildren {
                kind: kind.to_string(),
                message: "requires at least one child".to_string(),
            });
        }

        let children = self
            .children
            .into_iter()
            .map(|child| child.build(arena))
            .collect::<Result<Vec<_>, _>>()?;
        let id = assign_id(arena, kind, self.id);
        let node = match self.container {
            Container::All => NodeKind::All(children),
            Container::Any => NodeKind::Any {
                children,
                matched: None,
            },
        };
        arena.insert(id, node)
    }
}

/// Builder for a `not` node
#[derive(Debug, Clone, Default)]
pub struct NotBuilder {
    id: Option<String>,
    children: Vec<MatcherBuilder>,
}

impl NotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn child(mut self, child: impl Into<MatcherBuilder>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn build(mut self, arena: &mut MatcherArena) -> Result<NodeIndex, ConfigError> {
        let child = match (self.children.pop(), self.children.is_empty()) {
            (Some(child), true) => child.build(arena)?,
            _ => {
                return Err(ConfigError::InvalidChildren {
                    kind: kinds::NOT.to_string(),
                    message: "requires exactly one child".to_string(),
                })
            }
        };
        let id = assign_id(arena, kinds::NOT, self.id);
        arena.insert(id, NodeKind::Not(child))
    }
}

/// Builder for a `matcherRef` proxy
#[derive(Debug, Clone, Default)]
pub struct ReferenceBuilder {
    id: Option<String>,
    ref_id: Option<String>,
}

impl ReferenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Id of the referenced matcher
    pub fn ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = Some(ref_id.into());
        self
    }

    /// Insert the proxy; the target is bound now if it is already registered
    pub fn build(self, arena: &mut MatcherArena) -> Result<NodeIndex, ConfigError> {
        let target = required(kinds::MATCHER_REF, "refId", self.ref_id)?;
        let resolved = arena.lookup(&target);
        if resolved.is_none() {
            debug!(target = %target, "forward matcher reference");
        }
        let id = assign_id(arena, kinds::MATCHER_REF, self.id);
        arena.insert(id, NodeKind::Reference { target, resolved })
    }
}

/// Any builder, as produced by a [`BuilderFactory`]
#[derive(Debug, Clone)]
pub enum MatcherBuilder {
    Text(TextBuilder),
    Regex(RegexBuilder),
    Spdx(SpdxBuilder),
    Copyright(CopyrightBuilder),
    Container(ContainerBuilder),
    Not(NotBuilder),
    Reference(ReferenceBuilder),
}

impl MatcherBuilder {
    /// Validate and insert the matcher (and its children) into `arena`
    pub fn build(self, arena: &mut MatcherArena) -> Result<NodeIndex, ConfigError> {
        match self {
            MatcherBuilder::Text(b) => b.build(arena),
            MatcherBuilder::Regex(b) => b.build(arena),
            MatcherBuilder::Spdx(b) => b.build(arena),
            MatcherBuilder::Copyright(b) => b.build(arena),
            MatcherBuilder::Container(b) => b.build(arena),
            MatcherBuilder::Not(b) => b.build(arena),
            MatcherBuilder::Reference(b) => b.build(arena),
        }
    }
}

macro_rules! impl_from_builder {
    ($($variant:ident => $builder:ty),* $(,)?) => {
        $(
            impl From<$builder> for MatcherBuilder {
                fn from(builder: $builder) -> Self {
                    MatcherBuilder::$variant(builder)
                }
            }
        )*
    };
}

impl_from_builder! {
    Text => TextBuilder,
    Regex => RegexBuilder,
    Spdx => SpdxBuilder,
    Copyright => CopyrightBuilder,
    Container => ContainerBuilder,
    Not => NotBuilder,
    Reference => ReferenceBuilder,
}

/// Maps matcher type names to builder factories
#[derive(Clone)]
pub struct BuilderRegistry {
    factories: BTreeMap<String, BuilderFactory>,
    context: BuildContext,
}

impl std::fmt::Debug for BuilderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuilderRegistry")
            .field("types", &self.names())
            .field("context", &self.context)
            .finish()
    }
}

impl Default for BuilderRegistry {
    fn default() -> Self {
        Self::new(BuildContext::default())
    }
}

impl BuilderRegistry {
    /// Registry with every built-in matcher type
    pub fn new(context: BuildContext) -> Self {
        let mut registry = Self {
            factories: BTreeMap::new(),
            context,
        };
        registry.register(kinds::TEXT, text_factory);
        registry.register(kinds::REGEX, regex_factory);
        registry.register(kinds::SPDX, spdx_factory);
        registry.register(kinds::COPYRIGHT, copyright_factory);
        registry.register(kinds::ALL, all_factory);
        registry.register(kinds::ANY, any_factory);
        registry.register(kinds::NOT, not_factory);
        registry.register(kinds::MATCHER_REF, reference_factory);
        registry
    }

    /// Register (or replace) the factory for a type name
    pub fn register(&mut self, kind: impl Into<String>, factory: BuilderFactory) {
        self.factories.insert(kind.into(), factory);
    }

    /// Registered type names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// The context handed to factories
    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    /// Produce the builder for a definition, recursively for its children
    pub fn builder_for(&self, definition: &MatcherDefinition) -> Result<MatcherBuilder, ConfigError> {
        let factory = self
            .factories
            .get(&definition.kind)
            .ok_or_else(|| ConfigError::UnknownMatcherType {
                kind: definition.kind.clone(),
                expected: self.names().join(", "),
            })?;

        for name in definition.params.keys() {
            if !known_params(&definition.kind).contains(&name.as_str()) {
                warn!(matcher = %definition.kind, parameter = %name, "ignoring unknown matcher parameter");
            }
        }

        factory(self, definition, &self.context)
    }

    /// Build a definition into `arena`, returning the root node.
    ///
    /// References to matchers that are not registered yet stay unresolved; call
    /// [`MatcherArena::resolve_references`] once every definition is built.
    pub fn build(
        &self,
        definition: &MatcherDefinition,
        arena: &mut MatcherArena,
    ) -> Result<NodeIndex, ConfigError> {
        self.builder_for(definition)?.build(arena)
    }

    fn children(&self, definition: &MatcherDefinition) -> Result<Vec<MatcherBuilder>, ConfigError> {
        definition
            .children
            .iter()
            .map(|child| self.builder_for(child))
            .collect()
    }
}

fn text_factory(
    _: &BuilderRegistry,
    definition: &MatcherDefinition,
    _: &BuildContext,
) -> Result<MatcherBuilder, ConfigError> {
    let mut builder = TextBuilder::new().text(definition.require_str("text")?);
    if let Some(id) = &definition.id {
        builder = builder.id(id);
    }
    Ok(builder.into())
}

fn regex_factory(
    _: &BuilderRegistry,
    definition: &MatcherDefinition,
    _: &BuildContext,
) -> Result<MatcherBuilder, ConfigError> {
    let mut builder = RegexBuilder::new().expr(definition.require_str("expr")?);
    if let Some(window) = definition.param_usize("window")? {
        builder = builder.window(window);
    }
    if let Some(id) = &definition.id {
        builder = builder.id(id);
    }
    Ok(builder.into())
}

fn spdx_factory(
    _: &BuilderRegistry,
    definition: &MatcherDefinition,
    context: &BuildContext,
) -> Result<MatcherBuilder, ConfigError> {
    let budget = definition
        .param_usize("budget")?
        .unwrap_or(context.header_lines);
    let mut builder = SpdxBuilder::new()
        .name(definition.require_str("name")?)
        .budget(budget);
    if let Some(id) = &definition.id {
        builder = builder.id(id);
    }
    Ok(builder.into())
}

fn copyright_factory(
    _: &BuilderRegistry,
    definition: &MatcherDefinition,
    _: &BuildContext,
) -> Result<MatcherBuilder, ConfigError> {
    let mut builder = CopyrightBuilder::new();
    if let Some(start) = definition.param_str("start")? {
        builder = builder.start(start);
    }
    if let Some(end) = definition.param_str("end")? {
        builder = builder.end(end);
    }
    if let Some(owner) = definition.param_str("owner")? {
        builder = builder.owner(owner);
    }
    if let Some(id) = &definition.id {
        builder = builder.id(id);
    }
    Ok(builder.into())
}

fn container_factory(
    registry: &BuilderRegistry,
    definition: &MatcherDefinition,
    mut builder: ContainerBuilder,
) -> Result<MatcherBuilder, ConfigError> {
    for child in registry.children(definition)? {
        builder = builder.child(child);
    }
    if let Some(id) = &definition.id {
        builder = builder.id(id);
    }
    Ok(builder.into())
}

fn all_factory(
    registry: &BuilderRegistry,
    definition: &MatcherDefinition,
    _: &BuildContext,
) -> Result<MatcherBuilder, ConfigError> {
    container_factory(registry, definition, ContainerBuilder::all())
}

fn any_factory(
    registry: &BuilderRegistry,
    definition: &MatcherDefinition,
    _: &BuildContext,
) -> Result<MatcherBuilder, ConfigError> {
    container_factory(registry, definition, ContainerBuilder::any())
}

fn not_factory(
    registry: &BuilderRegistry,
    definition: &MatcherDefinition,
    _: &BuildContext,
) -> Result<MatcherBuilder, ConfigError> {
    let mut builder = NotBuilder::new();
    for child in registry.children(definition)? {
        builder = builder.child(child);
    }
    if let Some(id) = &definition.id {
        builder = builder.id(id);
    }
    Ok(builder.into())
}

fn reference_factory(
    _: &BuilderRegistry,
    definition: &MatcherDefinition,
    _: &BuildContext,
) -> Result<MatcherBuilder, ConfigError> {
    let mut builder = ReferenceBuilder::new().ref_id(definition.require_str("refId")?);
    if let Some(id) = &definition.id {
        builder = builder.id(id);
    }
    Ok(builder.into())
}

fn required(kind: &str, parameter: &str, value: Option<String>) -> Result<String, ConfigError> {
    match value {
        None => Err(ConfigError::MissingParameter {
            kind: kind.to_string(),
            parameter: parameter.to_string(),
        }),
        Some(value) if value.trim().is_empty() => Err(ConfigError::InvalidParameter {
            kind: kind.to_string(),
            parameter: parameter.to_string(),
            message: "must not be blank".to_string(),
        }),
        Some(value) => Ok(value),
    }
}

fn assign_id(arena: &mut MatcherArena, kind: &str, id: Option<String>) -> String {
    match id {
        Some(id) => id,
        None => arena.generate_id(kind),
    }
}
