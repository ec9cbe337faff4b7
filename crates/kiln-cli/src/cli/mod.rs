//! Command-line interface definition for kiln.
//!
//! This module defines the complete CLI structure using clap v4's derive macros.
//!
//! # Command Structure
//!
//! - `kiln build` - Emit the production/testing pipeline description
//! - `kiln dev` - Bootstrap the dev server on a free port
//! - `kiln check` - Validate configuration

mod commands;
pub mod enums;
mod validation;

use clap::Parser;
use std::path::PathBuf;

pub use commands::{BuildArgs, CheckArgs, Command, DevArgs};
pub use enums::*;
pub use validation::{parse_host, parse_port};

/// kiln - compose bundler pipelines
#[derive(Parser, Debug)]
#[command(
    name = "kiln",
    version,
    about = "Compose webpack-style build pipelines",
    long_about = "kiln turns a small project configuration into a complete bundler pipeline\n\
                  description: style loader chains for every dialect, environment-specific\n\
                  plugin lists and output templates, plus a dev server bound to a free port."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Shows every composition step: chains built, fragments merged, ports probed.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project directory (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Configuration file to load instead of discovering one
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
