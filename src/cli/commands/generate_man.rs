//! Generate man page command

use crate::cli::exit_codes;
use crate::cli::{Cli, GlobalOptions};
use crate::error::{HeaderLensError, ReportError};
use clap::CommandFactory;
use std::fs;

use super::GenerateManArgs;

/// Execute the generate-man command
pub fn execute(args: GenerateManArgs, global: &GlobalOptions) -> Result<i32, HeaderLensError> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);

    let output_path = global.resolve(&args.output).join("headerlens.1");

    let mut buffer: Vec<u8> = Vec::new();
    man.render(&mut buffer).map_err(|e| {
        HeaderLensError::Report(ReportError::Serialize {
            message: format!("Failed to generate man page: {}", e),
        })
    })?;

    fs::write(&output_path, buffer).map_err(|e| {
        HeaderLensError::Report(ReportError::FileWrite {
            path: output_path.display().to_string(),
            source: e,
        })
    })?;

    println!("Man page generated: {}", output_path.display());

    Ok(exit_codes::SUCCESS)
}
