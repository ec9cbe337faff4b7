//! Asset path resolution.
//!
//! Every emitted file name is placed under the mode's assets sub-directory.
//! Joins always use `/` regardless of the host platform because the result is
//! consumed as a URL fragment by the bundler.

use std::path::Path;

use kiln_config::{KilnConfig, Mode};
use path_clean::PathClean;

/// Join `base` and `name` with posix semantics, collapsing `.`, `..` and
/// duplicate separators.
///
/// ```
/// use kiln_pipeline::paths::posix_join;
///
/// assert_eq!(posix_join("static", "js/[name].js"), "static/js/[name].js");
/// assert_eq!(posix_join("static/", "../img//logo.png"), "img/logo.png");
/// assert_eq!(posix_join("/", "index.html"), "/index.html");
/// ```
pub fn posix_join(base: &str, name: &str) -> String {
    let joined = if base.is_empty() {
        name.to_string()
    } else {
        format!("{base}/{name}")
    };
    Path::new(&joined)
        .clean()
        .to_string_lossy()
        .replace('\\', "/")
}

/// Resolves mode-dependent asset locations from the project configuration.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    config: &'a KilnConfig,
}

impl<'a> PathResolver<'a> {
    pub fn new(config: &'a KilnConfig) -> Self {
        Self { config }
    }

    /// `name` placed under the assets sub-directory for `mode`.
    pub fn assets_path(&self, mode: Mode, name: &str) -> String {
        posix_join(self.config.assets_sub_directory(mode), name)
    }

    /// Snapshot of every location the plugin list needs for `mode`.
    pub fn asset_paths(&self, mode: Mode) -> AssetPaths {
        let project = &self.config.project;
        let html_filename = match mode {
            Mode::Production => self.config.build.index.to_string_lossy().replace('\\', "/"),
            Mode::Development | Mode::Testing => "index.html".to_string(),
        };

        AssetPaths {
            mode,
            sub_directory: self.config.assets_sub_directory(mode).to_string(),
            public_path: self.config.assets_public_path(mode).to_string(),
            html_filename,
            template: project.template.clone(),
            static_dir: project
                .resolve(&project.static_dir)
                .to_string_lossy()
                .replace('\\', "/"),
        }
    }
}

/// Resolved locations for one mode, detached from the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub mode: Mode,
    pub sub_directory: String,
    pub public_path: String,
    /// Output name of the generated HTML page
    pub html_filename: String,
    pub template: String,
    /// Source directory copied verbatim into `sub_directory`
    pub static_dir: String,
}

impl AssetPaths {
    pub fn assets_path(&self, name: &str) -> String {
        posix_join(&self.sub_directory, name)
    }
}
