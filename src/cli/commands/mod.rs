//! CLI commands module

pub mod check;
pub mod generate_man;
pub mod init;
pub mod licenses;

use clap::Args;
use std::path::PathBuf;

use crate::report::limits::parse_counter_value;
use crate::report::Counter;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Directory to audit (defaults to the working directory)
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Output format (terminal, json, markdown)
    #[arg(short, long, default_value = "terminal")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Header lines kept for unknown documents, also the SPDX line budget
    #[arg(long, value_name = "N")]
    pub header_lines: Option<usize>,

    /// Approve an additional license family by category
    #[arg(long = "approve-family", value_name = "CATEGORY")]
    pub approve_family: Vec<String>,

    /// Approve an additional license by id
    #[arg(long = "approve-license", value_name = "ID")]
    pub approve_license: Vec<String>,

    /// Exclude paths matching a glob
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Number of worker threads
    #[arg(short, long, default_value_t = 1, value_name = "N")]
    pub jobs: usize,

    /// List every unapproved document in the summary
    #[arg(long)]
    pub list_unapproved: bool,

    /// Highest accepted value of a counter, e.g. unapproved:5 (negative: no limit)
    #[arg(long = "counter-max", value_name = "NAME:N", value_parser = parse_counter_value::<i64>)]
    pub counter_max: Vec<(Counter, i64)>,

    /// Lowest accepted value of a counter, e.g. approved:1
    #[arg(long = "counter-min", value_name = "NAME:N", value_parser = parse_counter_value::<usize>)]
    pub counter_min: Vec<(Counter, usize)>,
}

/// Arguments for the licenses command
#[derive(Args, Debug)]
pub struct LicensesArgs {
    /// Which licenses to list
    #[arg(long, default_value = "all")]
    pub filter: LicenseFilterArg,

    /// Print the matcher tree of each license
    #[arg(long)]
    pub describe: bool,

    /// Output format (terminal, toml)
    #[arg(short, long, default_value = "terminal")]
    pub format: LicensesFormat,
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Preset to use (default, strict, permissive)
    #[arg(short, long, value_name = "PRESET")]
    pub preset: Option<String>,

    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the generate-man command
#[derive(Args, Debug)]
pub struct GenerateManArgs {
    /// Output directory for the man page
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

/// Output format for check command
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
    Markdown,
}

/// License filter for licenses command
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LicenseFilterArg {
    All,
    Approved,
    None,
}

impl From<LicenseFilterArg> for crate::license::LicenseFilter {
    fn from(arg: LicenseFilterArg) -> Self {
        match arg {
            LicenseFilterArg::All => Self::All,
            LicenseFilterArg::Approved => Self::Approved,
            LicenseFilterArg::None => Self::None,
        }
    }
}

/// Output format for licenses command
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LicensesFormat {
    Terminal,
    Toml,
}
