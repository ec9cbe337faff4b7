//! Logging setup for the kiln CLI.
//!
//! Everything goes through `tracing`. The library crates (`kiln-config`,
//! `kiln-pipeline`) only emit events; this module installs the subscriber.
//!
//! # Example
//!
//! ```rust,no_run
//! use kiln_cli::logger::init_logger;
//! use tracing::info;
//!
//! init_logger(false, false, false);
//! info!("composing production pipeline");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "kiln_cli=debug,kiln_pipeline=debug,kiln_config=debug";
const QUIET_FILTER: &str = "kiln_cli=error,kiln_pipeline=error,kiln_config=error";
const DEFAULT_FILTER: &str = "kiln_cli=info,kiln_pipeline=info,kiln_config=info";

/// Pick the filter for the given verbosity flags.
///
/// The order is `--verbose`, then `--quiet`, then `RUST_LOG`, then INFO for
/// the kiln crates.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the tracing subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Initialize the logger with a custom filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
