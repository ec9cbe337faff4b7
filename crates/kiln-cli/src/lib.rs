//! kiln CLI - compose webpack-style build pipelines and run the dev server.
//!
//! The heavy lifting lives in `kiln-config` (settings, discovery, validation)
//! and `kiln-pipeline` (composition, merging, dev-server bootstrap). This
//! crate wires them to the command line:
//!
//! - [`cli`] - clap definitions
//! - [`commands`] - `build`, `dev` and `check`
//! - [`server`] - the axum dev server
//! - [`error`] - CLI errors and their miette rendering
//! - [`logger`] / [`ui`] - tracing setup and terminal output
//!
//! ```rust
//! use kiln_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, true, true);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod notifier;
pub mod server;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
