//! HeaderLens - A CLI tool to audit source trees for license and copyright headers
//!
//! This is the main entry point for the CLI application.

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use headerlens::cli::commands::{check, generate_man, init, licenses};
use headerlens::cli::exit_codes;
use headerlens::cli::{Cli, Commands};

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    let global = cli.global_options();

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Check(args) => check::execute(args, &global),
        Commands::Licenses(args) => licenses::execute(args, &global),
        Commands::Init(args) => init::execute(args, &global),
        Commands::GenerateMan(args) => generate_man::execute(args, &global),
    };

    // Handle exit codes for CI integration
    match result {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}
