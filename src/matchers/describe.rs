//! Declarative matcher definitions
//!
//! A [`MatcherDefinition`] is both the configuration format of a matcher tree and the
//! result of describing a built one back, so `describe` followed by a rebuild yields
//! a tree with the same ids, types, parameters and children.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::arena::NodeKind;
use super::{kinds, MatcherArena, NodeIndex};
use crate::error::ConfigError;

/// Declarative form of a matcher tree.
///
/// In TOML a definition reads like:
///
/// ```toml
/// type = "any"
/// id = "apache-text"
/// children = [
///     { type = "text", text = "Apache License" },
///     { type = "spdx", name = "Apache-2.0" },
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherDefinition {
    /// Matcher type name
    #[serde(rename = "type")]
    pub kind: String,

    /// Explicit id; generated when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Type specific parameters
    #[serde(flatten)]
    pub params: BTreeMap<String, toml::Value>,

    /// Child definitions of combinators
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MatcherDefinition>,
}

impl MatcherDefinition {
    /// Create an empty definition of the given type
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: None,
            params: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Set the explicit id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Append a child definition
    pub fn with_child(mut self, child: MatcherDefinition) -> Self {
        self.children.push(child);
        self
    }

    /// String parameter; integers are accepted and rendered as text
    pub fn param_str(&self, name: &str) -> Result<Option<String>, ConfigError> {
        match self.params.get(name) {
            None => Ok(None),
            Some(toml::Value::String(s)) => Ok(Some(s.clone())),
            Some(toml::Value::Integer(i)) => Ok(Some(i.to_string())),
            Some(other) => Err(self.invalid(name, format!("expected a string, got {}", other.type_str()))),
        }
    }

    /// Non-negative integer parameter
    pub fn param_usize(&self, name: &str) -> Result<Option<usize>, ConfigError> {
        match self.params.get(name) {
            None => Ok(None),
            Some(toml::Value::Integer(i)) => usize::try_from(*i)
                .map(Some)
                .map_err(|_| self.invalid(name, format!("{} is negative", i))),
            Some(other) => Err(self.invalid(name, format!("expected an integer, got {}", other.type_str()))),
        }
    }

    /// String parameter that must be present
    pub fn require_str(&self, name: &str) -> Result<String, ConfigError> {
        self.param_str(name)?
            .ok_or_else(|| ConfigError::MissingParameter {
                kind: self.kind.clone(),
                parameter: name.to_string(),
            })
    }

    fn invalid(&self, name: &str, message: String) -> ConfigError {
        ConfigError::InvalidParameter {
            kind: self.kind.clone(),
            parameter: name.to_string(),
            message,
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{}", "", self.kind, indent = depth * 2)?;
        if let Some(id) = &self.id {
            write!(f, " [{}]", id)?;
        }
        for (name, value) in &self.params {
            match value {
                toml::Value::String(s) => write!(f, " {}={:?}", name, s)?,
                other => write!(f, " {}={}", name, other)?,
            }
        }
        writeln!(f)?;
        for child in &self.children {
            child.render(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for MatcherDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}

impl MatcherArena {
    /// Describe the tree rooted at `idx` as a declarative definition.
    ///
    /// References are described as references, not expanded, so shared subtrees
    /// appear once in a full configuration.
    pub fn describe(&self, idx: NodeIndex) -> MatcherDefinition {
        let node = self.node(idx);
        let definition = MatcherDefinition::new(node.kind.kind_name()).with_id(node.id.clone());

        match &node.kind {
            NodeKind::Text(m) => definition.with_param("text", m.text()),
            NodeKind::Regex(m) => {
                let definition = definition.with_param("expr", m.pattern());
                if m.window() > 1 {
                    definition.with_param("window", m.window() as i64)
                } else {
                    definition
                }
            }
            NodeKind::Spdx(m) => definition
                .with_param("name", m.name())
                .with_param("budget", m.budget() as i64),
            NodeKind::Copyright(m) => {
                let mut definition = definition;
                for (name, value) in [("start", m.start()), ("end", m.end()), ("owner", m.owner())] {
                    if let Some(value) = value {
                        definition = definition.with_param(name, value);
                    }
                }
                definition
            }
            NodeKind::All(children) | NodeKind::Any { children, .. } => children
                .iter()
                .fold(definition, |d, child| d.with_child(self.describe(*child))),
            NodeKind::Not(child) => definition.with_child(self.describe(*child)),
            NodeKind::Reference { target, .. } => definition.with_param("refId", target.as_str()),
        }
    }
}

/// Names of all parameters a matcher type understands
pub(crate) fn known_params(kind: &str) -> &'static [&'static str] {
    match kind {
        kinds::TEXT => &["text"],
        kinds::REGEX => &["expr", "window"],
        kinds::SPDX => &["name", "budget"],
        kinds::COPYRIGHT => &["start", "end", "owner"],
        kinds::MATCHER_REF => &["refId"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_toml_definition() {
        let definition: MatcherDefinition = toml::from_str(
            r#"
            type = "any"
            id = "apache"
            children = [
                { type = "text", text = "Apache License" },
                { type = "copyright", start = 2020, owner = "ExampleOrg" },
            ]
            "#,
        )
        .unwrap();

        assert_eq!(definition.kind, "any");
        assert_eq!(definition.id.as_deref(), Some("apache"));
        assert_eq!(definition.children.len(), 2);
        assert_eq!(
            definition.children[1].param_str("start").unwrap(),
            Some("2020".to_string())
        );
    }

    #[test]
    fn test_missing_parameter_is_named() {
        let err = MatcherDefinition::new("text").require_str("text").unwrap_err();
        assert!(err.to_string().contains("'text'"));
    }

    #[test]
    fn test_wrong_parameter_type() {
        let definition = MatcherDefinition::new("regex").with_param("window", "two");
        assert!(definition.param_usize("window").is_err());
        let negative = MatcherDefinition::new("regex").with_param("window", -1_i64);
        assert!(negative.param_usize("window").is_err());
    }

    #[test]
    fn test_display_renders_tree() {
        let definition = MatcherDefinition::new("all")
            .with_id("both")
            .with_child(MatcherDefinition::new("text").with_param("text", "alpha"))
            .with_child(MatcherDefinition::new("matcherRef").with_param("refId", "shared"));

        assert_eq!(
            definition.to_string(),
            "all [both]\n  text text=\"alpha\"\n  matcherRef refId=\"shared\"\n"
        );
    }

    #[test]
    fn test_known_params() {
        assert!(known_params("spdx").contains(&"budget"));
        assert!(known_params("all").is_empty());
    }
}
