//! License families

use serde::Serialize;
use std::fmt;

/// Width of a family category code
pub const CATEGORY_WIDTH: usize = 5;

/// Category of the reserved family for generated documents
pub const GENERATED_CATEGORY: &str = "GEN  ";

/// Normalize a category code to exactly [`CATEGORY_WIDTH`] characters.
///
/// Shorter codes are padded with spaces, longer ones truncated.
///
/// ```
/// use headerlens::license::make_category;
///
/// assert_eq!(make_category("AL"), "AL   ");
/// assert_eq!(make_category("BSD-3-Clause"), "BSD-3");
/// ```
pub fn make_category(code: &str) -> String {
    let mut category: String = code.chars().take(CATEGORY_WIDTH).collect();
    let width = category.chars().count();
    category.extend(std::iter::repeat(' ').take(CATEGORY_WIDTH - width));
    category
}

/// A coded grouping of legally similar licenses, ordered by category
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LicenseFamily {
    category: String,
    name: String,
}

impl LicenseFamily {
    /// Create a family; the category is normalized with [`make_category`]
    pub fn new(category: &str, name: impl Into<String>) -> Self {
        Self {
            category: make_category(category),
            name: name.into(),
        }
    }

    /// Padded category code
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Human readable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the generated-document family
    pub fn is_generated(&self) -> bool {
        self.category == GENERATED_CATEGORY
    }
}

impl fmt::Display for LicenseFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.category.trim_end(), self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_category_pads_and_truncates() {
        assert_eq!(make_category("MIT"), "MIT  ");
        assert_eq!(make_category("CDDL1"), "CDDL1");
        assert_eq!(make_category("W3CDOCS"), "W3CDO");
        assert_eq!(make_category(""), "     ");
    }

    #[test]
    fn test_families_order_by_category() {
        let mut families = vec![
            LicenseFamily::new("MIT", "MIT"),
            LicenseFamily::new("AL", "Apache License"),
            LicenseFamily::new("GPL3", "GNU GPL 3"),
        ];
        families.sort();
        let categories: Vec<_> = families.iter().map(|f| f.category()).collect();
        assert_eq!(categories, vec!["AL   ", "GPL3 ", "MIT  "]);
    }

    #[test]
    fn test_generated_family() {
        assert!(LicenseFamily::new("GEN", "Generated").is_generated());
        assert!(!LicenseFamily::new("AL", "Apache").is_generated());
    }
}
