//! Production/testing build configuration types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::helpers::{
    default_assets_public_path, default_assets_root, default_assets_sub_directory,
    default_build_devtool, default_gzip_extensions, default_index, default_true,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BuildSettings {
    /// Where the generated `index.html` is written
    #[serde(default = "default_index")]
    pub index: PathBuf,

    /// Output root for all emitted files
    #[serde(default = "default_assets_root")]
    pub assets_root: PathBuf,

    #[serde(default = "default_assets_sub_directory")]
    pub assets_sub_directory: String,

    /// Public URL prefix; point this at a CDN when assets are hosted elsewhere
    #[serde(default = "default_assets_public_path")]
    pub assets_public_path: String,

    #[serde(default = "default_true")]
    pub production_source_map: bool,

    #[serde(default = "default_build_devtool")]
    pub devtool: String,

    /// Emit `.gz` companions for matching assets
    #[serde(default = "default_true")]
    pub production_gzip: bool,

    #[serde(default = "default_gzip_extensions")]
    pub production_gzip_extensions: Vec<String>,

    /// Append the bundle-size analyzer after the build
    #[serde(default)]
    pub bundle_analyzer_report: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            index: default_index(),
            assets_root: default_assets_root(),
            assets_sub_directory: default_assets_sub_directory(),
            assets_public_path: default_assets_public_path(),
            production_source_map: true,
            devtool: default_build_devtool(),
            production_gzip: true,
            production_gzip_extensions: default_gzip_extensions(),
            bundle_analyzer_report: false,
        }
    }
}
