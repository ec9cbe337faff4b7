//! Environment assembly: the base pipeline merged with a mode-specific
//! fragment.

use kiln_config::{ConfigError, EnvironmentToggles, KilnConfig, Mode};
use serde_json::{Map, Value, json};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::merge::{PipelineFragment, merge};
use crate::paths::{PathResolver, posix_join};
use crate::pipeline::{
    DevServerOptions, Devtool, PipelineDescription, WatchOptions, base_pipeline,
};
use crate::plugins::PluginComposer;
use crate::rules::StyleRuleSet;

/// Command-line overrides for the development server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Development pipeline: inline styles, eval source maps, hot reloading and a
/// dev server section.
#[instrument(skip_all, fields(mode = "development"))]
pub fn development(config: &KilnConfig, overrides: &DevOverrides) -> Result<PipelineDescription> {
    let toggles = config.toggles(Mode::Development)?;
    let base = base_pipeline(config, &toggles);
    let paths = PathResolver::new(config).asset_paths(Mode::Development);
    let dev = &config.dev;

    let dev_server = DevServerOptions {
        client_log_level: "warning".to_string(),
        history_api_fallback: json!({
            "rewrites": [{ "from": ".*", "to": posix_join(&dev.assets_public_path, "index.html") }]
        }),
        hot: true,
        content_base: false,
        compress: true,
        host: overrides.host.clone().unwrap_or_else(|| dev.host.clone()),
        port: overrides.port.unwrap_or(dev.port),
        inline: true,
        open: dev.auto_open_browser,
        overlay: if dev.error_overlay {
            json!({ "warnings": false, "errors": true })
        } else {
            Value::Bool(false)
        },
        public_path: dev.assets_public_path.clone(),
        proxy: proxy_table(config)?,
        quiet: true,
        watch_options: WatchOptions { poll: dev.poll },
    };

    let fragment = PipelineFragment::new()
        .set("module.rules", StyleRuleSet::build_all(&toggles))?
        .set("devtool", Devtool::Named(dev.devtool.clone()))?
        .set("devServer", dev_server)?
        .set("plugins", PluginComposer::compose(&toggles, &paths))?;

    let pipeline = merge(&base, &fragment)?;
    debug!(
        rules = pipeline.module.rules.len(),
        plugins = pipeline.plugins.len(),
        "assembled development pipeline"
    );
    Ok(pipeline)
}

/// Optimized pipeline for `production` or `testing`.
#[instrument(skip(config))]
pub fn production(config: &KilnConfig, mode: Mode) -> Result<PipelineDescription> {
    if !mode.is_optimized() {
        return Err(ConfigError::InvalidValue {
            field: "mode".to_string(),
            hint: Some(format!(
                "optimized pipelines are built for production or testing, not {mode}"
            )),
        }
        .into());
    }

    let toggles = config.toggles(mode)?;
    production_with(config, &toggles)
}

/// Optimized pipeline for explicit toggles.
pub fn production_with(
    config: &KilnConfig,
    toggles: &EnvironmentToggles,
) -> Result<PipelineDescription> {
    let mode = toggles.mode();
    let base = base_pipeline(config, toggles);
    let resolver = PathResolver::new(config);
    let paths = resolver.asset_paths(mode);

    let devtool = if toggles.source_map() {
        Devtool::Named(config.build.devtool.clone())
    } else {
        Devtool::disabled()
    };

    let fragment = PipelineFragment::new()
        .set("module.rules", StyleRuleSet::build_all(toggles))?
        .set("devtool", devtool)?
        .set("output.filename", resolver.assets_path(mode, "js/[name].[chunkhash].js"))?
        .set(
            "output.chunkFilename",
            resolver.assets_path(mode, "js/[id].[chunkhash].js"),
        )?
        .set("plugins", PluginComposer::compose(toggles, &paths))?;

    let pipeline = merge(&base, &fragment)?;
    debug!(
        mode = %mode,
        rules = pipeline.module.rules.len(),
        plugins = pipeline.plugins.len(),
        "assembled optimized pipeline"
    );
    Ok(pipeline)
}

fn proxy_table(config: &KilnConfig) -> Result<Map<String, Value>> {
    let mut proxy = Map::new();
    for (context, target) in &config.dev.proxy_table {
        let mut entry = Map::new();
        entry.insert("target".to_string(), Value::String(target.target.clone()));
        entry.insert("changeOrigin".to_string(), Value::Bool(target.change_origin));
        entry.insert("ws".to_string(), Value::Bool(target.ws));
        if !target.path_rewrite.is_empty() {
            entry.insert(
                "pathRewrite".to_string(),
                serde_json::to_value(&target.path_rewrite)?,
            );
        }
        proxy.insert(context.clone(), Value::Object(entry));
    }
    Ok(proxy)
}
