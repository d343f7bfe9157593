//! Configuration module
//!
//! A run is configured by `.headerlens.toml`:
//!
//! ```toml
//! preset = "default"
//! header_lines = 50
//! approved_families = ["AL", "MIT"]
//! approved_licenses = ["GPL3"]
//! exclude = ["vendor/**", "*.min.js"]
//!
//! [[families]]
//! category = "ACME"
//! name = "Acme Corp Proprietary"
//!
//! [[matchers]]
//! id = "acme-copyright"
//! type = "copyright"
//! owner = "Acme Corp"
//!
//! [[licenses]]
//! id = "acme"
//! family = "ACME"
//! name = "Acme internal"
//! matcher = { type = "matcherRef", refId = "acme-copyright" }
//!
//! [limits.max]
//! unapproved = 2
//! ```

pub mod loader;
pub mod presets;

pub use loader::{Config, LimitsConfig, CONFIG_FILENAME};
pub use presets::Preset;

use serde::{Deserialize, Serialize};

use crate::license::{License, LicenseFamily};
use crate::matchers::{MatcherArena, MatcherDefinition};

/// A license family definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyConfig {
    /// Category code, padded or truncated to five characters
    pub category: String,

    /// Human readable name
    pub name: String,
}

impl From<&LicenseFamily> for FamilyConfig {
    fn from(family: &LicenseFamily) -> Self {
        Self {
            category: family.category().trim_end().to_string(),
            name: family.name().to_string(),
        }
    }
}

/// A license definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseConfig {
    /// Unique license id
    pub id: String,

    /// Category of the owning family
    pub family: String,

    /// Display name (defaults to the id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// License this one was adapted from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<String>,

    /// Matcher tree deciding whether a header carries this license
    pub matcher: MatcherDefinition,
}

impl LicenseConfig {
    /// Describe a built license back into its configuration form
    pub fn describe(license: &License, arena: &MatcherArena) -> Self {
        Self {
            id: license.id().to_string(),
            family: license.family().category().trim_end().to_string(),
            name: Some(license.name().to_string()),
            notes: license.notes().map(str::to_string),
            derived_from: license.derived_from().map(str::to_string),
            matcher: license.describe(arena),
        }
    }
}
