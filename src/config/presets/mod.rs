//! Preset approval policies

/// Available presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Approve the permissive and weak copyleft families of the built-in catalogue
    Default,
    /// Only the Apache License is approved
    Strict,
    /// Every family of the built-in catalogue is approved, GPL included
    Permissive,
}

impl Preset {
    /// Get preset from name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" | "standard" => Some(Self::Default),
            "strict" | "apache" | "asf" => Some(Self::Strict),
            "permissive" | "lenient" | "all" => Some(Self::Permissive),
            _ => None,
        }
    }

    /// Get the name of the preset
    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Strict => "strict",
            Self::Permissive => "permissive",
        }
    }

    /// Get a description of the preset
    pub fn description(&self) -> &'static str {
        match self {
            Self::Default => "Approve Apache, MIT, BSD, CDDL, OASIS and W3C licensed files",
            Self::Strict => "Approve Apache licensed files only",
            Self::Permissive => "Approve every license of the built-in catalogue",
        }
    }

    /// Family categories approved by this preset
    pub fn approved_families(&self) -> Vec<&'static str> {
        match self {
            Self::Default => vec!["AL", "BSD-3", "CDDL1", "MIT", "OASIS", "W3C", "W3CD"],
            Self::Strict => vec!["AL"],
            Self::Permissive => vec![
                "AL", "BSD-3", "CDDL1", "GPL1", "GPL2", "GPL3", "MIT", "OASIS", "W3C", "W3CD",
            ],
        }
    }

    /// Every preset, in display order
    pub fn all() -> [Preset; 3] {
        [Self::Default, Self::Strict, Self::Permissive]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_from_name() {
        assert_eq!(Preset::from_name("default").unwrap(), Preset::Default);
        assert_eq!(Preset::from_name("STRICT").unwrap(), Preset::Strict);
        assert_eq!(Preset::from_name("lenient").unwrap(), Preset::Permissive);
        assert!(Preset::from_name("invalid").is_none());
    }

    #[test]
    fn test_preset_name_round_trips() {
        for preset in Preset::all() {
            assert_eq!(Preset::from_name(preset.name()), Some(preset));
        }
    }

    #[test]
    fn test_strict_is_subset_of_default() {
        let default = Preset::Default.approved_families();
        assert!(Preset::Strict
            .approved_families()
            .iter()
            .all(|family| default.contains(family)));
        assert!(!default.contains(&"GPL3"));
        assert!(Preset::Permissive.approved_families().contains(&"GPL3"));
    }
}
