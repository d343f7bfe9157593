//! Configuration loader

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::analysis::DEFAULT_HEADER_LINES;
use crate::error::{ConfigError, HeaderLensError};
use crate::license::{License, LicenseSet};
use crate::matchers::{BuildContext, BuilderRegistry, MatcherArena, MatcherDefinition};
use crate::report::limits::limits_from_names;
use crate::report::{Counter, CounterLimits};

use super::presets::Preset;
use super::{FamilyConfig, LicenseConfig};

/// Default configuration file name, looked up in the scanned directory
pub const CONFIG_FILENAME: &str = ".headerlens.toml";

const DEFAULT_CATALOGUE: &str = include_str!("defaults.toml");

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Preset name (default, strict, permissive)
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Header lines retained per unknown document, also the SPDX line budget
    #[serde(default = "default_header_lines")]
    pub header_lines: usize,

    /// Merge the built-in license catalogue
    #[serde(default = "default_true")]
    pub include_defaults: bool,

    /// Approved family categories; the preset decides when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_families: Option<Vec<String>>,

    /// Individually approved license ids
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub approved_licenses: Vec<String>,

    /// Globs of paths to leave out of the scan
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    /// Counter limits deciding whether a run passes
    #[serde(default, skip_serializing_if = "LimitsConfig::is_empty")]
    pub limits: LimitsConfig,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub families: Vec<FamilyConfig>,

    /// Named matchers that licenses can share through `matcherRef`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matchers: Vec<MatcherDefinition>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub licenses: Vec<LicenseConfig>,
}

/// The `[limits]` table, keyed by counter name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Largest accepted value; a negative value removes the limit
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub max: BTreeMap<String, i64>,

    /// Smallest accepted value
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub min: BTreeMap<String, usize>,
}

impl LimitsConfig {
    pub fn is_empty(&self) -> bool {
        self.max.is_empty() && self.min.is_empty()
    }

    pub fn set_max(&mut self, counter: Counter, value: i64) {
        self.max.insert(counter.name().to_string(), value);
    }

    pub fn set_min(&mut self, counter: Counter, value: usize) {
        self.min.insert(counter.name().to_string(), value);
    }
}

/// Families, matchers and licenses of a configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalogue {
    #[serde(default)]
    pub families: Vec<FamilyConfig>,
    #[serde(default)]
    pub matchers: Vec<MatcherDefinition>,
    #[serde(default)]
    pub licenses: Vec<LicenseConfig>,
}

fn default_preset() -> String {
    Preset::Default.name().to_string()
}

fn default_header_lines() -> usize {
    DEFAULT_HEADER_LINES
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            header_lines: DEFAULT_HEADER_LINES,
            include_defaults: true,
            approved_families: None,
            approved_licenses: Vec::new(),
            exclude: Vec::new(),
            limits: LimitsConfig::default(),
            families: Vec::new(),
            matchers: Vec::new(),
            licenses: Vec::new(),
        }
    }
}

impl Config {
    /// Load `.headerlens.toml` from `directory`, or return the default
    pub fn load_or_default(directory: &Path) -> Result<Self, HeaderLensError> {
        let config_path = directory.join(CONFIG_FILENAME);

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            debug!(directory = %directory.display(), "no configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, HeaderLensError> {
        let content = fs::read_to_string(path).map_err(|e| {
            HeaderLensError::Config(ConfigError::FileRead {
                path: path.display().to_string(),
                source: e,
            })
        })?;

        let config: Self = toml::from_str(&content)?;
        debug!(path = %path.display(), licenses = config.licenses.len(), "configuration loaded");
        Ok(config)
    }

    /// Create a new configuration from a preset
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            preset: preset.name().to_string(),
            approved_families: Some(
                preset
                    .approved_families()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            ),
            ..Default::default()
        }
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, HeaderLensError> {
        toml::to_string_pretty(self).map_err(Into::into)
    }

    /// The preset named by this configuration
    pub fn preset(&self) -> Result<Preset, ConfigError> {
        Preset::from_name(&self.preset).ok_or_else(|| ConfigError::UnknownPreset {
            name: self.preset.clone(),
        })
    }

    /// Approved family categories after applying the preset
    pub fn effective_approved_families(&self) -> Result<Vec<String>, ConfigError> {
        match &self.approved_families {
            Some(families) => Ok(families.clone()),
            None => Ok(self
                .preset()?
                .approved_families()
                .into_iter()
                .map(str::to_string)
                .collect()),
        }
    }

    /// Counter limits of the run; unknown counter names are rejected
    pub fn counter_limits(&self) -> Result<CounterLimits, ConfigError> {
        limits_from_names(&self.limits.max, &self.limits.min)
    }

    /// The built-in license catalogue
    pub fn default_catalogue() -> Result<Catalogue, ConfigError> {
        toml::from_str(DEFAULT_CATALOGUE).map_err(|e| ConfigError::Parse {
            message: format!("built-in catalogue: {}", e),
        })
    }

    /// Catalogue of this configuration merged over the built-in one.
    ///
    /// A family, named matcher or license defined here replaces the built-in entry
    /// with the same category or id.
    pub fn catalogue(&self) -> Result<Catalogue, ConfigError> {
        let mut merged = if self.include_defaults {
            Self::default_catalogue()?
        } else {
            Catalogue::default()
        };

        let categories: HashSet<String> = self
            .families
            .iter()
            .map(|f| crate::license::make_category(&f.category))
            .collect();
        merged
            .families
            .retain(|f| !categories.contains(&crate::license::make_category(&f.category)));
        merged.families.extend(self.families.iter().cloned());

        let matcher_ids: HashSet<&str> = self.matchers.iter().filter_map(|m| m.id.as_deref()).collect();
        merged
            .matchers
            .retain(|m| !m.id.as_deref().is_some_and(|id| matcher_ids.contains(id)));
        merged.matchers.extend(self.matchers.iter().cloned());

        let license_ids: HashSet<&str> = self.licenses.iter().map(|l| l.id.as_str()).collect();
        merged.licenses.retain(|l| !license_ids.contains(l.id.as_str()));
        merged.licenses.extend(self.licenses.iter().cloned());

        Ok(merged)
    }

    /// Build the license set of a run, approvals applied
    pub fn build_license_set(&self) -> Result<LicenseSet, ConfigError> {
        if self.header_lines == 0 {
            return Err(ConfigError::InvalidHeaderLines);
        }

        let catalogue = self.catalogue()?;
        let registry = BuilderRegistry::new(BuildContext {
            header_lines: self.header_lines,
        });
        let mut set = LicenseSet::new(MatcherArena::new());

        for family in &catalogue.families {
            set.add_family(crate::license::LicenseFamily::new(&family.category, family.name.clone()));
        }

        for definition in &catalogue.matchers {
            if definition.id.is_none() {
                return Err(ConfigError::MissingParameter {
                    kind: definition.kind.clone(),
                    parameter: "id".to_string(),
                });
            }
            registry.build(definition, set.arena_mut())?;
        }

        for config in &catalogue.licenses {
            let family = set
                .family(&config.family)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownFamily {
                    license: config.id.clone(),
                    family: config.family.clone(),
                })?;
            let root = registry.build(&config.matcher, set.arena_mut())?;

            let mut license = License::new(
                config.id.clone(),
                config.name.clone().unwrap_or_else(|| config.id.clone()),
                family,
                root,
            );
            if let Some(notes) = &config.notes {
                license = license.with_notes(notes.clone());
            }
            if let Some(derived_from) = &config.derived_from {
                license = license.with_derived_from(derived_from.clone());
            }
            set.add_license(license)?;
        }

        set.resolve()?;

        for category in self.effective_approved_families()? {
            if set.family(&category).is_none() {
                warn!(family = %category, "approved family is not defined");
            }
            set.approve_family(&category);
        }
        for id in &self.approved_licenses {
            if set.get(id).is_none() {
                warn!(license = %id, "approved license is not defined");
            }
            set.approve_license(id.clone());
        }

        debug!(licenses = set.len(), "license set built");
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::LicenseFilter;
    use crate::matchers::{HeaderMatcher, MatchState};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.preset, "default");
        assert_eq!(config.header_lines, 50);
        assert!(config.include_defaults);
    }

    #[test]
    fn test_default_catalogue_builds() {
        let set = Config::default().build_license_set().unwrap();
        for id in ["AL2.0", "ASL", "MIT", "BSD-3", "GPL1", "GPL2", "GPL3", "CDDL1", "OASIS", "W3C", "W3CD", "generated"] {
            assert!(set.get(id).is_some(), "missing {}", id);
        }
        assert!(set.is_approved_id("MIT"));
        assert!(!set.is_approved_id("GPL3"));
    }

    #[test]
    fn test_from_preset() {
        let set = Config::from_preset(Preset::Strict).build_license_set().unwrap();
        let approved: Vec<_> = set.licenses(LicenseFilter::Approved).iter().map(|l| l.id()).collect();
        assert_eq!(approved, vec!["AL2.0", "ASL"]);
    }

    #[test]
    fn test_unknown_preset() {
        let config = Config {
            preset: "bogus".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.build_license_set().unwrap_err(),
            ConfigError::UnknownPreset { .. }
        ));
    }

    #[test]
    fn test_custom_license_with_shared_matcher() {
        let config: Config = toml::from_str(
            r#"
include_defaults = false
approved_families = ["ACME"]

[[families]]
category = "ACME"
name = "Acme Corp"

[[licenses]]
id = "acme"
family = "ACME"
matcher = { type = "all", children = [
    { type = "matcherRef", refId = "acme-copyright" },
    { type = "text", text = "All rights reserved" },
] }

[[matchers]]
id = "acme-copyright"
type = "copyright"
owner = "Acme Corp"
start = 2020
"#,
        )
        .unwrap();

        let mut set = config.build_license_set().unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.is_approved_id("acme"));

        set.matches("Copyright 2020-2023 Acme Corp").unwrap();
        let state = set.matches("All rights reserved.").unwrap();
        assert_eq!(state, MatchState::Matched);
        assert_eq!(set.matched_id().as_deref(), Some("acme"));
    }

    #[test]
    fn test_user_license_replaces_builtin() {
        let config: Config = toml::from_str(
            r#"
[[licenses]]
id = "MIT"
family = "MIT"
name = "MIT (SPDX only)"
matcher = { type = "spdx", name = "MIT" }
"#,
        )
        .unwrap();
        let set = config.build_license_set().unwrap();
        assert_eq!(set.get("MIT").unwrap().name(), "MIT (SPDX only)");
    }

    #[test]
    fn test_unresolved_reference_is_config_error() {
        let config: Config = toml::from_str(
            r#"
include_defaults = false
[[families]]
category = "X"
name = "X"
[[licenses]]
id = "x"
family = "X"
matcher = { type = "matcherRef", refId = "nonexistent" }
"#,
        )
        .unwrap();
        let err = config.build_license_set().unwrap_err();
        assert!(matches!(err, ConfigError::UnresolvedReference { ref id } if id == "nonexistent"));
    }

    #[test]
    fn test_reference_cycle_is_config_error() {
        let config: Config = toml::from_str(
            r#"
[[matchers]]
id = "loop"
type = "any"
children = [{ type = "matcherRef", refId = "loop" }]
"#,
        )
        .unwrap();
        let err = config.build_license_set().unwrap_err();
        assert!(matches!(err, ConfigError::CyclicReference { ref id } if id == "loop"));
    }

    #[test]
    fn test_license_with_unknown_family() {
        let config: Config = toml::from_str(
            r#"
include_defaults = false
[[licenses]]
id = "x"
family = "NOPE"
matcher = { type = "text", text = "x" }
"#,
        )
        .unwrap();
        assert!(matches!(
            config.build_license_set().unwrap_err(),
            ConfigError::UnknownFamily { .. }
        ));
    }

    #[test]
    fn test_unknown_matcher_type() {
        let config: Config = toml::from_str(
            r#"
[[matchers]]
id = "bad"
type = "txet"
"#,
        )
        .unwrap();
        let err = config.build_license_set().unwrap_err();
        assert!(err.to_string().contains("txet"));
    }

    #[test]
    fn test_zero_header_lines_rejected() {
        let config = Config {
            header_lines: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.build_license_set().unwrap_err(),
            ConfigError::InvalidHeaderLines
        ));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempdir().unwrap();
        assert_eq!(Config::load_or_default(dir.path()).unwrap().preset, "default");

        fs::write(
            dir.path().join(CONFIG_FILENAME),
            "preset = \"strict\"\nexclude = [\"vendor/**\"]\n",
        )
        .unwrap();
        let config = Config::load_or_default(dir.path()).unwrap();
        assert_eq!(config.preset, "strict");
        assert_eq!(config.exclude, vec!["vendor/**".to_string()]);
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "header_lines = \"many\"").unwrap();
        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(err, HeaderLensError::Config(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_limits_table() {
        let config: Config = toml::from_str(
            r#"
[limits.max]
unapproved = 3
unknown = -1

[limits.min]
approved = 1
"#,
        )
        .unwrap();
        let limits = config.counter_limits().unwrap();
        assert_eq!(limits.max(Counter::Unapproved), Some(3));
        assert_eq!(limits.max(Counter::Unknown), None);
        assert_eq!(limits.min(Counter::Approved), 1);

        let parsed: Config = toml::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.limits, config.limits);
    }

    #[test]
    fn test_unknown_counter_in_limits() {
        let config: Config = toml::from_str("[limits.max]
unaproved = 1
").unwrap();
        let err = config.counter_limits().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownCounter { ref name, .. } if name == "unaproved"));
        assert!(Config::default().counter_limits().unwrap().violations(&Default::default()).is_empty());
    }

    #[test]
    fn test_preset_config_round_trips() {
        let config = Config::from_preset(Preset::Permissive);
        let parsed: Config = toml::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.preset, "permissive");
        assert_eq!(parsed.approved_families, config.approved_families);
    }
}
