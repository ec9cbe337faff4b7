//! Environment-conditional plugin lists.
//!
//! Plugins are assembled with [`PluginList`], an append-only builder, so the
//! order a list is written in is exactly the order the bundler runs it in.
//! Two orderings carry meaning and are checked by tests:
//! - chunk splitting runs vendor → manifest → async-commons, which keeps the
//!   vendor hash stable when only application code changes
//! - gzip compression comes after the HTML page and the static copy, so
//!   every emitted file exists before it is compressed

use std::fmt;

use kiln_config::{EnvironmentToggles, Mode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::paths::AssetPaths;

/// Every plugin kiln knows how to describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PluginKind {
    Define,
    UglifyJs,
    ExtractText,
    OptimizeCssAssets,
    Html,
    HashedModuleIds,
    ModuleConcatenation,
    VendorChunk,
    ManifestChunk,
    AsyncCommonsChunk,
    HotModuleReplacement,
    NamedModules,
    NoEmitOnErrors,
    CopyStatic,
    Compression,
    BundleAnalyzer,
    FriendlyErrors,
}

impl PluginKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluginKind::Define => "define",
            PluginKind::UglifyJs => "uglify-js",
            PluginKind::ExtractText => "extract-text",
            PluginKind::OptimizeCssAssets => "optimize-css-assets",
            PluginKind::Html => "html",
            PluginKind::HashedModuleIds => "hashed-module-ids",
            PluginKind::ModuleConcatenation => "module-concatenation",
            PluginKind::VendorChunk => "vendor-chunk",
            PluginKind::ManifestChunk => "manifest-chunk",
            PluginKind::AsyncCommonsChunk => "async-commons-chunk",
            PluginKind::HotModuleReplacement => "hot-module-replacement",
            PluginKind::NamedModules => "named-modules",
            PluginKind::NoEmitOnErrors => "no-emit-on-errors",
            PluginKind::CopyStatic => "copy-static",
            PluginKind::Compression => "compression",
            PluginKind::BundleAnalyzer => "bundle-analyzer",
            PluginKind::FriendlyErrors => "friendly-errors",
        }
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A plugin and the options it is constructed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    pub name: String,
    #[serde(default)]
    pub config: Map<String, Value>,
}

impl PluginDescriptor {
    pub fn new(kind: PluginKind) -> Self {
        Self {
            name: kind.as_str().to_string(),
            config: Map::new(),
        }
    }

    /// Descriptor with `config`; non-object values leave the config empty.
    pub fn with_config(kind: PluginKind, config: Value) -> Self {
        let config = match config {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            name: kind.as_str().to_string(),
            config,
        }
    }

    pub fn is(&self, kind: PluginKind) -> bool {
        self.name == kind.as_str()
    }
}

/// Ordered, append-only plugin list builder.
///
/// ```
/// use kiln_pipeline::plugins::{PluginDescriptor, PluginKind, PluginList};
///
/// let plugins = PluginList::new()
///     .push(PluginDescriptor::new(PluginKind::Define))
///     .push_if(false, || PluginDescriptor::new(PluginKind::BundleAnalyzer))
///     .build();
/// assert_eq!(plugins.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PluginList {
    plugins: Vec<PluginDescriptor>,
}

impl PluginList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, plugin: PluginDescriptor) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Append the plugin produced by `make` when `condition` holds.
    pub fn push_if(self, condition: bool, make: impl FnOnce() -> PluginDescriptor) -> Self {
        if condition { self.push(make()) } else { self }
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn build(self) -> Vec<PluginDescriptor> {
        self.plugins
    }
}

/// Composes the plugin list for a set of toggles.
pub struct PluginComposer;

impl PluginComposer {
    pub fn compose(toggles: &EnvironmentToggles, paths: &AssetPaths) -> Vec<PluginDescriptor> {
        let mode = toggles.mode();
        let list = PluginList::new().push(define(mode));

        let list = match mode {
            Mode::Production | Mode::Testing => optimized(list, toggles, paths),
            Mode::Development => development(list, paths),
        };

        let production = mode == Mode::Production;
        let plugins = list
            .push(copy_static(paths))
            .push_if(production && toggles.compress(), || {
                compression(toggles.compress_extensions())
            })
            .push_if(production && toggles.analyze(), || {
                PluginDescriptor::new(PluginKind::BundleAnalyzer)
            })
            .build();

        debug!(
            mode = %mode,
            plugins = plugins.len(),
            "composed plugin list"
        );
        plugins
    }
}

fn define(mode: Mode) -> PluginDescriptor {
    PluginDescriptor::with_config(
        PluginKind::Define,
        json!({ "process.env": { "NODE_ENV": format!("\"{mode}\"") } }),
    )
}

fn optimized(list: PluginList, toggles: &EnvironmentToggles, paths: &AssetPaths) -> PluginList {
    let source_map = toggles.source_map();
    let css_processor_options = if source_map {
        json!({ "safe": true, "map": { "inline": false } })
    } else {
        json!({ "safe": true })
    };

    list.push(PluginDescriptor::with_config(
        PluginKind::UglifyJs,
        json!({
            "uglifyOptions": { "compress": { "warnings": false } },
            "sourceMap": source_map,
            "parallel": true
        }),
    ))
    .push_if(toggles.extract(), || {
        PluginDescriptor::with_config(
            PluginKind::ExtractText,
            json!({
                "filename": paths.assets_path("css/[name].[contenthash].css"),
                "allChunks": true
            }),
        )
    })
    .push_if(toggles.extract(), || {
        PluginDescriptor::with_config(
            PluginKind::OptimizeCssAssets,
            json!({ "cssProcessorOptions": css_processor_options }),
        )
    })
    .push(PluginDescriptor::with_config(
        PluginKind::Html,
        json!({
            "filename": paths.html_filename,
            "template": paths.template,
            "inject": true,
            "minify": {
                "removeComments": true,
                "collapseWhitespace": true,
                "removeAttributeQuotes": true
            },
            "chunksSortMode": "dependency"
        }),
    ))
    .push(PluginDescriptor::new(PluginKind::HashedModuleIds))
    .push(PluginDescriptor::new(PluginKind::ModuleConcatenation))
    .push(PluginDescriptor::with_config(
        PluginKind::VendorChunk,
        json!({
            "name": "vendor",
            "minChunks": { "resourceTest": r"\.js$", "resourceWithin": "node_modules" }
        }),
    ))
    .push(PluginDescriptor::with_config(
        PluginKind::ManifestChunk,
        json!({ "name": "manifest", "minChunks": "Infinity" }),
    ))
    .push(PluginDescriptor::with_config(
        PluginKind::AsyncCommonsChunk,
        json!({
            "name": "app",
            "async": "vendor-async",
            "children": true,
            "minChunks": 3
        }),
    ))
}

fn development(list: PluginList, paths: &AssetPaths) -> PluginList {
    list.push(PluginDescriptor::new(PluginKind::HotModuleReplacement))
        .push(PluginDescriptor::new(PluginKind::NamedModules))
        .push(PluginDescriptor::new(PluginKind::NoEmitOnErrors))
        .push(PluginDescriptor::with_config(
            PluginKind::Html,
            json!({
                "filename": paths.html_filename,
                "template": paths.template,
                "inject": true
            }),
        ))
}

fn copy_static(paths: &AssetPaths) -> PluginDescriptor {
    PluginDescriptor::with_config(
        PluginKind::CopyStatic,
        json!({
            "patterns": [{
                "from": paths.static_dir,
                "to": paths.sub_directory,
                "ignore": [".*"]
            }]
        }),
    )
}

/// Extension filter for the compressor, e.g. `\.(js|css)$`.
pub fn compression_test(extensions: &[String]) -> String {
    format!(r"\.({})$", extensions.join("|"))
}

fn compression(extensions: &[String]) -> PluginDescriptor {
    PluginDescriptor::with_config(
        PluginKind::Compression,
        json!({
            "filename": "[path].gz[query]",
            "algorithm": "gzip",
            "test": compression_test(extensions),
            "threshold": 10240,
            "minRatio": 0.8
        }),
    )
}
