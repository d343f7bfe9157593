//! Init command - Initialize a new configuration file

use colored::Colorize;
use std::fs;

use super::InitArgs;
use crate::cli::exit_codes;
use crate::cli::GlobalOptions;
use crate::config::{Config, Preset, CONFIG_FILENAME};
use crate::error::{HeaderLensError, ReportError};

pub fn execute(args: InitArgs, global: &GlobalOptions) -> Result<i32, HeaderLensError> {
    let config_path = global.directory.join(CONFIG_FILENAME);

    if config_path.exists() && !args.force {
        eprintln!(
            "{} Configuration file already exists. Use --force to overwrite.",
            "Error:".red().bold()
        );
        return Ok(exit_codes::ERROR);
    }

    let preset = match args.preset.as_deref() {
        None => Preset::Default,
        Some(name) => match Preset::from_name(name) {
            Some(preset) => preset,
            None => {
                let expected: Vec<_> = Preset::all().iter().map(|p| p.name()).collect();
                eprintln!(
                    "{} Unknown preset '{}' (expected one of: {})",
                    "Error:".red().bold(),
                    name,
                    expected.join(", ")
                );
                return Ok(exit_codes::INVALID_ARGS);
            }
        },
    };

    let config = Config::from_preset(preset);
    let config_content = format!(
        "# {}\n# Run `headerlens licenses` to list the built-in licenses.\n\n{}",
        preset.description(),
        config.to_toml()?
    );
    fs::write(&config_path, &config_content).map_err(|e| {
        HeaderLensError::Report(ReportError::FileWrite {
            path: config_path.display().to_string(),
            source: e,
        })
    })?;

    println!(
        "{} Created {} with preset '{}'",
        "Success:".green().bold(),
        CONFIG_FILENAME.cyan(),
        preset.name().yellow()
    );

    println!("\nNext steps:");
    println!("  1. Review and customize {}", CONFIG_FILENAME.cyan());
    println!("  2. Run {} to audit the tree", "headerlens check".cyan());
    println!("  3. Run {} to list unapproved files", "headerlens check --list-unapproved".cyan());

    Ok(exit_codes::SUCCESS)
}
