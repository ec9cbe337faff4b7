//! Terminal output helpers: status lines, the dev-server banner and the
//! build summary.
//!
//! ```no_run
//! use kiln_cli::ui;
//!
//! ui::init_colors();
//! ui::success("Pipeline written to dist/pipeline.json");
//! ```

mod format;
mod messages;

pub use format::{format_duration, format_size, print_build_summary, print_dev_banner};
pub use messages::{error, info, success, warning};

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
}

/// Check if color output should be enabled.
///
/// `NO_COLOR` wins over `FORCE_COLOR`; otherwise stderr must be a terminal.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::user_attended_stderr()
}

/// Initialize color support based on environment.
pub fn init_colors() {
    owo_colors::set_override(should_use_color());
}

/// Force colors off (`--no-color`).
pub fn disable_colors() {
    owo_colors::set_override(false);
}
