use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::enums::*;
use crate::cli::validation::{parse_host, parse_port};

/// Available kiln subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compose the optimized pipeline and emit it as JSON
    ///
    /// Assembles the production (or testing) pipeline description: style
    /// loader chains with extraction, hashed output names, minification,
    /// chunk splitting and optional gzip and bundle analysis.
    Build(BuildArgs),

    /// Compose the development pipeline and serve the project
    ///
    /// Probes for a free port starting at the configured one, writes it into
    /// the pipeline and serves static assets until Ctrl+C.
    Dev(DevArgs),

    /// Validate configuration
    ///
    /// Loads kiln.toml (or the `kiln` field of package.json), applies
    /// environment overrides and checks the result.
    Check(CheckArgs),
}

/// Arguments for the build command
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Environment to compose for
    #[arg(short, long, value_enum, default_value = "production")]
    pub mode: BuildMode,

    /// Append the bundle analyzer plugin
    ///
    /// Same as setting `build.bundle_analyzer_report = true`.
    #[arg(long)]
    pub report: bool,

    /// Skip gzip compression of emitted assets
    #[arg(long)]
    pub no_gzip: bool,

    /// Disable production source maps
    ///
    /// Sets `devtool` to false and drops `sourceMap` from every style step.
    #[arg(long)]
    pub no_source_map: bool,

    /// Write the pipeline to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the dev command
#[derive(Args, Debug, Clone)]
pub struct DevArgs {
    /// Port to start probing from
    ///
    /// Defaults to `dev.port` from the configuration. When the port is taken
    /// the next free one is used.
    #[arg(short, long, value_name = "PORT", value_parser = parse_port)]
    pub port: Option<u16>,

    /// Host to bind
    #[arg(long, value_name = "HOST", value_parser = parse_host)]
    pub host: Option<String>,

    /// Disable compile-error notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Open the browser once the server is up
    #[arg(long)]
    pub open: bool,
}

/// Arguments for the check command
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// What to print after validation
    #[arg(long, value_enum, default_value = "summary")]
    pub show: CheckOutput,

    /// Print the JSON Schema for kiln.toml and exit
    #[arg(long, conflicts_with = "show")]
    pub schema: bool,

    /// Also check that the project root, static directory and template exist
    #[arg(long)]
    pub fs: bool,
}
