//! Command implementations for the kiln CLI.
//!
//! - [`build`] - Emit the production or testing pipeline description
//! - [`dev`] - Bootstrap and run the development server
//! - [`check`] - Validate configuration
//!
//! Each command provides an `execute` function taking the shared [`Context`]
//! and its parsed arguments.

pub mod build;
pub mod check;
pub mod dev;
pub(crate) mod utils;

use std::path::PathBuf;

pub use build::execute as build_execute;
pub use check::execute as check_execute;
pub use dev::execute as dev_execute;

/// Global options every command needs.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// `--cwd`; the process working directory when absent
    pub cwd: Option<PathBuf>,
    /// `--config`; discovery in the working directory when absent
    pub config_path: Option<PathBuf>,
}
