// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface
//!
//! Bootstrap-layer CLI handling with a parse-then-validate split:
//!
//! ```text
//! 1. Cli::parse()        -- clap parsing
//! 2. validate_cli()      -- path/argument validation
//! 3. ValidatedCli         -- safe, ready for the orchestrator
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

const MAX_ARG_LENGTH: usize = 4096;
const DANGEROUS_PATTERNS: &[&str] = &["\0", "\n", "\r", "`", ";", "|"];

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("argument too long (max {MAX_ARG_LENGTH} characters): {0}")]
    ArgumentTooLong(String),

    #[error("dangerous pattern '{pattern}' detected in argument: {arg}")]
    DangerousPattern { pattern: String, arg: String },

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("invalid path {path}: {reason}")]
    InvalidPath { path: String, reason: String },
}

/// Validates a single argument for length and shell-injection patterns.
fn validate_argument(arg: &str) -> Result<(), ParseError> {
    if arg.len() > MAX_ARG_LENGTH {
        return Err(ParseError::ArgumentTooLong(arg.chars().take(50).collect::<String>() + "..."));
    }
    for pattern in DANGEROUS_PATTERNS {
        if arg.contains(pattern) {
            return Err(ParseError::DangerousPattern {
                pattern: pattern.to_string(),
                arg: arg.to_string(),
            });
        }
    }
    Ok(())
}

/// Validates and canonicalizes a path that must already exist (an upload
/// source, or the `--config` file).
fn validate_existing_path(path: &str) -> Result<PathBuf, ParseError> {
    validate_argument(path)?;
    let path_obj = Path::new(path);
    path_obj.canonicalize().map_err(|e| {
        if !path_obj.exists() {
            ParseError::PathNotFound(path.to_string())
        } else {
            ParseError::InvalidPath {
                path: path.to_string(),
                reason: e.to_string(),
            }
        }
    })
}

#[derive(Debug, clap::Parser)]
#[command(name = "storagex", version, about = "A file-chunking storage gateway")]
pub struct Cli {
    /// Path to the JSON config file.
    #[arg(long, global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Print the version string.
    Version,
    /// Chunk and upload a local file.
    Upload {
        /// Local file path to upload.
        path: PathBuf,
    },
    /// Download and reassemble a previously uploaded file.
    Download {
        /// The catalog file name (the basename used at upload time).
        name: String,
        /// Local path to write the reassembled file to.
        out_path: PathBuf,
    },
    /// Print the active config file path.
    Configfile,
}

#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub config: PathBuf,
    pub command: ValidatedCommand,
}

#[derive(Debug, Clone)]
pub enum ValidatedCommand {
    Version,
    Upload { path: PathBuf },
    Download { name: String, out_path: PathBuf },
    Configfile,
}

/// Parses `std::env::args()` with clap, then validates the result.
pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    use clap::Parser;
    validate_cli(Cli::parse())
}

fn validate_cli(cli: Cli) -> Result<ValidatedCli, ParseError> {
    let config = validate_existing_path(&cli.config.to_string_lossy())?;

    let command = match cli.command {
        Commands::Version => ValidatedCommand::Version,
        Commands::Upload { path } => {
            let validated_path = validate_existing_path(&path.to_string_lossy())?;
            ValidatedCommand::Upload { path: validated_path }
        }
        Commands::Download { name, out_path } => {
            validate_argument(&name)?;
            validate_argument(&out_path.to_string_lossy())?;
            ValidatedCommand::Download { name, out_path }
        }
        Commands::Configfile => ValidatedCommand::Configfile,
    };

    Ok(ValidatedCli { config, command })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_dangerous_pattern() {
        let err = validate_argument("a;rm -rf /").unwrap_err();
        assert!(matches!(err, ParseError::DangerousPattern { .. }));
    }

    #[test]
    fn rejects_missing_path() {
        let err = validate_existing_path("/no/such/path/should/exist").unwrap_err();
        assert!(matches!(err, ParseError::PathNotFound(_)));
    }
}
