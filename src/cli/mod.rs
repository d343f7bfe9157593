//! # CLI Module
//!
//! This module defines the command-line interface for HeaderLens using `clap`.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `check` | Audit the license headers of a source tree |
//! | `licenses` | List the configured licenses and their matchers |
//! | `init` | Initialize a new configuration file |
//!
//! ## Submodules
//!
//! - [`commands`] - Command implementations
//! - [`exit_codes`] - Standardized exit codes
//! - [`output`] - Report output formatters (JSON, Markdown, Terminal)
//!
//! ## Global Options
//!
//! All commands support these global options:
//!
//! - `-v, --verbose` - Increase verbosity level (use multiple times: -v, -vv, -vvv)
//! - `-c, --config <FILE>` - Path to configuration file
//! - `-C, --directory <DIR>` - Working directory (defaults to current directory)
//!
//! ## Examples
//!
//! ```bash
//! # Initialize configuration
//! headerlens init --preset strict
//!
//! # Audit the current directory
//! headerlens check
//!
//! # JSON report of another tree, four workers
//! headerlens check ../project --format json --jobs 4 -o report.json
//!
//! # Show how the Apache license is recognised
//! headerlens licenses --describe
//! ```

pub mod commands;
pub mod exit_codes;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use commands::{CheckArgs, GenerateManArgs, InitArgs, LicensesArgs};
use crate::config::Config;
use crate::error::HeaderLensError;

/// HeaderLens - Audit source trees for license and copyright headers
#[derive(Parser, Debug)]
#[command(name = "headerlens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Working directory (defaults to current directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit the license headers of a source tree
    Check(CheckArgs),

    /// List configured licenses
    Licenses(LicensesArgs),

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Generate man page (hidden, for packaging)
    #[command(hide = true)]
    GenerateMan(GenerateManArgs),
}

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Explicit configuration file
    pub config: Option<PathBuf>,
    /// Directory relative paths are resolved against
    pub directory: PathBuf,
}

impl GlobalOptions {
    /// Resolve `path` against the working directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.directory.join(path)
    }

    /// Load the configuration: `--config` when given, else `.headerlens.toml` in `lookup`
    pub fn load_config(&self, lookup: &Path) -> Result<Config, HeaderLensError> {
        match &self.config {
            Some(path) => Config::load_from_file(&self.resolve(path)),
            None => Config::load_or_default(lookup),
        }
    }
}

impl Cli {
    pub fn global_options(&self) -> GlobalOptions {
        GlobalOptions {
            config: self.config.clone(),
            directory: self.directory.clone().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["headerlens", "check", "src", "-vv", "-C", "/tmp"]);
        assert_eq!(cli.verbose, 2);
        let global = cli.global_options();
        assert_eq!(global.directory, PathBuf::from("/tmp"));
        assert_eq!(global.resolve(Path::new("src")), PathBuf::from("/tmp/src"));
    }

    #[test]
    fn test_absolute_path_ignores_directory() {
        let global = GlobalOptions {
            config: None,
            directory: PathBuf::from("/work"),
        };
        assert_eq!(global.resolve(Path::new("/abs")), PathBuf::from("/abs"));
    }
}
