//! Formatting for sizes, durations, the build summary and the dev banner.

use std::path::Path;
use std::time::Duration;

use console::Term;
use kiln_config::Mode;
use kiln_pipeline::{PipelineDescription, PortBinding};
use owo_colors::OwoColorize;

/// Format file size in human-readable format.
///
/// ```
/// use kiln_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Format duration in human-readable format.
///
/// ```
/// use std::time::Duration;
/// use kiln_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

fn rule_width() -> usize {
    (Term::stderr().size().1 as usize).min(80)
}

/// Print what a composed pipeline contains, to stderr.
///
/// `written` is the output file and its size when the JSON went to disk.
pub fn print_build_summary(
    mode: Mode,
    pipeline: &PipelineDescription,
    written: Option<(&Path, u64)>,
    elapsed: Duration,
) {
    let width = rule_width();

    eprintln!("\n{}", format!("Pipeline ({mode})").bold().underline());
    eprintln!("{}", "─".repeat(width));

    eprintln!(
        "  {} {} {}",
        "▸".blue(),
        "rules".bright_white().bold(),
        pipeline.module.rules.len().to_string().dimmed()
    );
    eprintln!(
        "  {} {} {}",
        "▸".blue(),
        "devtool".bright_white().bold(),
        serde_json::to_string(&pipeline.devtool)
            .unwrap_or_default()
            .dimmed()
    );
    for plugin in &pipeline.plugins {
        eprintln!("  {} {}", "▸".blue(), plugin.name.bright_white());
    }

    eprintln!("{}", "─".repeat(width));

    match written {
        Some((path, size)) => eprintln!(
            "  {} {} ({}) in {}",
            "Wrote".bold(),
            path.display().green(),
            format_size(size).green(),
            format_duration(elapsed).green()
        ),
        None => eprintln!(
            "  {} in {}",
            "Composed".bold(),
            format_duration(elapsed).green()
        ),
    }
}

/// Print the dev server banner after the port is bound.
pub fn print_dev_banner(url: &str, binding: &PortBinding) {
    eprintln!(
        "\n  {} {}",
        "Your application is running here:".bold(),
        url.cyan().underline()
    );
    if binding.reassigned() {
        eprintln!(
            "  {}",
            format!(
                "port {} was busy, using {}",
                binding.requested_port, binding.bound_port
            )
            .yellow()
        );
    }
    eprintln!();
}
