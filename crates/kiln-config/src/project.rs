//! Project-wide settings shared by every mode.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::helpers::{
    default_entry, default_icon, default_project_name, default_root, default_src_dir,
    default_static_dir, default_template, default_test_dir,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectSettings {
    /// Application name, used as the title of error notifications
    #[serde(default = "default_project_name")]
    pub name: String,

    /// Project root; relative paths below are resolved against it
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Main entry module (bundler-style specifier)
    #[serde(default = "default_entry")]
    pub entry: String,

    #[serde(default = "default_src_dir")]
    pub src_dir: PathBuf,

    #[serde(default = "default_test_dir")]
    pub test_dir: PathBuf,

    /// Directory copied verbatim into the assets sub-directory
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// HTML template the bundler renders `index.html` from
    #[serde(default = "default_template")]
    pub template: String,

    /// Icon attached to desktop notifications
    #[serde(default = "default_icon")]
    pub icon: PathBuf,
}

impl ProjectSettings {
    /// Resolve a project-relative path against [`ProjectSettings::root`].
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            name: default_project_name(),
            root: default_root(),
            entry: default_entry(),
            src_dir: default_src_dir(),
            test_dir: default_test_dir(),
            static_dir: default_static_dir(),
            template: default_template(),
            icon: default_icon(),
        }
    }
}
