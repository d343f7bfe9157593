//! Licenses command - List configured licenses and their matchers

use colored::Colorize;
use std::collections::BTreeSet;

use super::{LicensesArgs, LicensesFormat};
use crate::cli::exit_codes;
use crate::cli::GlobalOptions;
use crate::config::loader::Catalogue;
use crate::config::{FamilyConfig, LicenseConfig};
use crate::error::HeaderLensError;
use crate::license::{LicenseFilter, LicenseSet};
use crate::matchers::{kinds, MatcherArena, MatcherDefinition};

pub fn execute(args: LicensesArgs, global: &GlobalOptions) -> Result<i32, HeaderLensError> {
    let config = global.load_config(&global.directory)?;
    let set = config.build_license_set()?;
    let filter = LicenseFilter::from(args.filter);

    let rendered = match args.format {
        LicensesFormat::Terminal => render_terminal(&set, filter, args.describe),
        LicensesFormat::Toml => toml::to_string_pretty(&catalogue(&set, filter))?,
    };
    print!("{rendered}");

    Ok(exit_codes::SUCCESS)
}

fn render_terminal(set: &LicenseSet, filter: LicenseFilter, describe: bool) -> String {
    let mut output = String::new();
    for license in set.licenses(filter) {
        let status = if set.is_approved(license) {
            "approved".green()
        } else {
            "not approved".dimmed()
        };
        output.push_str(&format!(
            "[{}] {:<10} {} ({})\n",
            license.family().category().cyan(),
            license.id().bold(),
            license.name(),
            status
        ));
        if let Some(notes) = license.notes() {
            output.push_str(&format!("        {}\n", notes.dimmed()));
        }
        if describe {
            for line in license.describe(set.arena()).to_string().lines() {
                output.push_str(&format!("        {}\n", line));
            }
        }
    }
    output
}

/// The licenses as a configuration fragment, with the named matchers they reference
fn catalogue(set: &LicenseSet, filter: LicenseFilter) -> Catalogue {
    let licenses: Vec<LicenseConfig> = set
        .licenses(filter)
        .into_iter()
        .map(|license| LicenseConfig::describe(license, set.arena()))
        .collect();
    let families: BTreeSet<&str> = licenses.iter().map(|l| l.family.as_str()).collect();

    Catalogue {
        families: set
            .families(LicenseFilter::All)
            .into_iter()
            .map(FamilyConfig::from)
            .filter(|family| families.contains(family.category.as_str()))
            .collect(),
        matchers: referenced_matchers(set.arena(), licenses.iter().map(|l| &l.matcher)),
        licenses,
    }
}

/// Describe every node reached through `matcherRef`, transitively
fn referenced_matchers<'a>(
    arena: &MatcherArena,
    roots: impl Iterator<Item = &'a MatcherDefinition>,
) -> Vec<MatcherDefinition> {
    let mut pending: Vec<MatcherDefinition> = roots.cloned().collect();
    let mut seen = BTreeSet::new();
    let mut described = Vec::new();

    while let Some(definition) = pending.pop() {
        if definition.kind == kinds::MATCHER_REF {
            if let Ok(Some(target)) = definition.param_str("refId") {
                if let Some(idx) = arena.lookup(&target) {
                    if seen.insert(target) {
                        let target_definition = arena.describe(idx);
                        pending.push(target_definition.clone());
                        described.push(target_definition);
                    }
                }
            }
        }
        pending.extend(definition.children);
    }
    described
}
