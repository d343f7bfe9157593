//! # Licenses
//!
//! Known licenses, the families they belong to, and the [`LicenseSet`] that binds
//! them to matcher trees and tracks which of them are approved for a run.

mod family;
#[allow(clippy::module_inception)]
mod license;
mod set;

pub use family::{make_category, LicenseFamily, CATEGORY_WIDTH, GENERATED_CATEGORY};
pub use license::License;
pub use set::{LicenseFilter, LicenseSet};
