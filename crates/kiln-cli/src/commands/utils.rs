//! Shared utilities for command implementations.

use std::fs;
use std::path::{Path, PathBuf};

use kiln_config::{ConfigDiscovery, KilnConfig};
use tracing::debug;

use crate::commands::Context;
use crate::error::{CliError, Result, ResultExt};

/// Resolve a path relative to a working directory.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Working directory for the command: `--cwd` resolved against the process
/// directory, or the process directory itself.
pub fn get_cwd(ctx: &Context) -> Result<PathBuf> {
    let process_cwd = std::env::current_dir()?;
    let cwd = match &ctx.cwd {
        Some(dir) => resolve_path(dir, &process_cwd),
        None => process_cwd,
    };

    if !cwd.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "Working directory does not exist: {}",
            cwd.display()
        )));
    }
    Ok(cwd)
}

/// Load the project configuration (defaults, file, then `KILN_*` overrides).
pub fn load_config(ctx: &Context) -> Result<KilnConfig> {
    let cwd = get_cwd(ctx)?;
    let discovery = ConfigDiscovery::new(&cwd);

    let config = match &ctx.config_path {
        Some(path) => {
            let path = resolve_path(path, &cwd);
            if !path.exists() {
                return Err(CliError::FileNotFound(path));
            }
            discovery.load_from(&path)?
        }
        None => discovery.load()?,
    };

    debug!(root = %config.project.root.display(), "configuration loaded");
    Ok(config)
}

/// Write `contents` to `path`, creating parent directories. Returns the
/// number of bytes written.
pub fn write_output(path: &Path, contents: &str) -> Result<u64> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_hint("Pass --output a path inside a writable directory")?;
    }
    fs::write(path, contents).context(format!("Failed to write {}", path.display()))?;
    Ok(contents.len() as u64)
}
