//! Miette diagnostic conversion for CLI errors.

use crate::error::CliError;
use kiln_config::ConfigError;
use kiln_pipeline::{PipelineError, PortProbeError};
use miette::Report;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        CliError::Pipeline(e) => pipeline_error_to_miette(e),
        CliError::FileNotFound(path) => miette::miette!(
            help = "Check the path, or pass --cwd to run from another directory",
            "File not found: {}",
            path.display()
        ),
        _ => miette::miette!("{}", err),
    }
}

/// Convert ConfigError to miette Report
pub fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::SchemaValidation {
            message,
            hint: Some(hint),
        } => miette::miette!(help = hint, "Invalid configuration: {}", message),
        ConfigError::InvalidValue {
            field,
            hint: Some(hint),
        } => miette::miette!(help = hint, "Invalid configuration value for `{}`", field),
        ConfigError::UnknownMode { value } => miette::miette!(
            help = "Use one of: development, production, testing",
            "Unknown mode `{}`",
            value
        ),
        ConfigError::NotFound => miette::miette!(
            help = "Create a kiln.toml in the project root or pass --config",
            "No kiln configuration found"
        ),
        ConfigError::StaticDirNotFound { path } => miette::miette!(
            help = "Create the directory or point `static_dir` at an existing one",
            "Static assets directory not found: {}",
            path.display()
        ),
        ConfigError::TemplateNotFound { path } => miette::miette!(
            help = "Point `template` at the HTML entry page of the app",
            "HTML template not found: {}",
            path.display()
        ),
        other => miette::miette!("Configuration error: {}", other),
    }
}

/// Convert PipelineError to miette Report
pub fn pipeline_error_to_miette(err: PipelineError) -> Report {
    match err {
        PipelineError::ConfigConflict {
            path,
            base,
            incoming,
        } => miette::miette!(
            help = "Fragments may only deep-merge mappings, concatenate sequences or replace scalars",
            "Conflicting values at `{}`: cannot merge {} into {}",
            path,
            incoming,
            base
        ),
        PipelineError::PortProbe(PortProbeError::Exhausted { host, from, to }) => miette::miette!(
            help = "Stop the process holding these ports or pass --port",
            "No free port on {} between {} and {}",
            host,
            from,
            to
        ),
        PipelineError::Config(e) => config_error_to_miette(e),
        other => miette::miette!("Pipeline error: {}", other),
    }
}
