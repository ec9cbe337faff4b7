//! Development server configuration types.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::helpers::{
    default_assets_public_path, default_assets_sub_directory, default_dev_devtool, default_host,
    default_port, default_true,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DevSettings {
    /// Sub-directory of the output that holds static assets
    #[serde(default = "default_assets_sub_directory")]
    pub assets_sub_directory: String,

    /// Public URL prefix assets are served under
    #[serde(default = "default_assets_public_path")]
    pub assets_public_path: String,

    /// Context path → proxy target, forwarded to the dev server untouched
    #[serde(default)]
    pub proxy_table: IndexMap<String, ProxyConfig>,

    #[serde(default = "default_host")]
    pub host: String,

    /// Port probing starts here; a free port above it is used on conflict
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub auto_open_browser: bool,

    /// Show a full-screen overlay in the browser on compile errors
    #[serde(default = "default_true")]
    pub error_overlay: bool,

    /// Raise a desktop notification when compilation fails
    #[serde(default = "default_true")]
    pub notify_on_errors: bool,

    /// Poll the filesystem instead of relying on native watchers
    #[serde(default)]
    pub poll: bool,

    #[serde(default = "default_dev_devtool")]
    pub devtool: String,

    #[serde(default = "default_true")]
    pub cache_busting: bool,

    #[serde(default = "default_true")]
    pub css_source_map: bool,
}

impl Default for DevSettings {
    fn default() -> Self {
        Self {
            assets_sub_directory: default_assets_sub_directory(),
            assets_public_path: default_assets_public_path(),
            proxy_table: IndexMap::new(),
            host: default_host(),
            port: default_port(),
            auto_open_browser: false,
            error_overlay: true,
            notify_on_errors: true,
            poll: false,
            devtool: default_dev_devtool(),
            cache_busting: true,
            css_source_map: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, JsonSchema)]
pub struct ProxyConfig {
    pub target: String,

    #[serde(default)]
    pub change_origin: bool,

    #[serde(default)]
    pub ws: bool,

    /// Regex source → replacement, applied to the request path
    #[serde(default)]
    pub path_rewrite: IndexMap<String, String>,
}
