//! The pipeline description handed to the bundler, and the base pipeline
//! every environment builds on.

use indexmap::IndexMap;
use kiln_config::{EnvironmentToggles, KilnConfig};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::loaders::StepDescriptor;
use crate::paths::{PathResolver, posix_join};
use crate::plugins::PluginDescriptor;
use crate::rules::{Rule, RuleUse, StyleRuleSet};

/// A complete, bundler-ready pipeline description.
///
/// Serialized in the camelCase shape webpack-style bundlers accept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDescription {
    pub context: String,
    pub entry: IndexMap<String, String>,
    pub output: OutputTemplates,
    pub resolve: ResolveOptions,
    pub module: ModuleOptions,
    #[serde(default)]
    pub devtool: Devtool,
    #[serde(default)]
    pub plugins: Vec<PluginDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_server: Option<DevServerOptions>,
    /// Keys outside the modelled fields, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PipelineDescription {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Host and port the dev server will listen on, when configured.
    pub fn dev_server_address(&self) -> Option<(&str, u16)> {
        self.dev_server
            .as_ref()
            .map(|server| (server.host.as_str(), server.port))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputTemplates {
    pub path: String,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_filename: Option<String>,
    pub public_path: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveOptions {
    pub extensions: Vec<String>,
    #[serde(default)]
    pub alias: IndexMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModuleOptions {
    #[serde(default)]
    pub rules: Vec<Rule>,
    /// `noParse` and friends
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Source-map style: a devtool name, or `false` for none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Devtool {
    Named(String),
    Disabled(bool),
}

impl Devtool {
    pub fn disabled() -> Self {
        Devtool::Disabled(false)
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Devtool::Named(_))
    }
}

impl Default for Devtool {
    fn default() -> Self {
        Devtool::disabled()
    }
}

/// Options for the development server, mirrored into the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevServerOptions {
    pub client_log_level: String,
    pub history_api_fallback: Value,
    pub hot: bool,
    pub content_base: bool,
    pub compress: bool,
    pub host: String,
    pub port: u16,
    pub inline: bool,
    pub open: bool,
    /// `{warnings, errors}` when enabled, `false` otherwise
    pub overlay: Value,
    pub public_path: String,
    #[serde(default)]
    pub proxy: Map<String, Value>,
    pub quiet: bool,
    pub watch_options: WatchOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchOptions {
    pub poll: bool,
}

/// Extensions resolved without being spelled out in imports.
pub const RESOLVE_EXTENSIONS: [&str; 3] = [".js", ".vue", ".json"];

/// Inline limit for images, media and fonts, in bytes.
pub const URL_LOADER_LIMIT: u64 = 10_000;

/// Base pipeline shared by every mode: entry, output, resolution and the
/// rules for components, scripts and static assets.
pub fn base_pipeline(config: &KilnConfig, toggles: &EnvironmentToggles) -> PipelineDescription {
    let mode = toggles.mode();
    let project = &config.project;
    let resolver = PathResolver::new(config);
    let root = project.root.to_string_lossy().replace('\\', "/");
    let src = path_string(&project.resolve(&project.src_dir));
    let test = path_string(&project.resolve(&project.test_dir));

    let mut entry = IndexMap::new();
    entry.insert("app".to_string(), project.entry.clone());

    let mut alias = IndexMap::new();
    alias.insert("vue$".to_string(), "vue/dist/vue.esm.js".to_string());
    alias.insert("@".to_string(), src.clone());

    let vue_options = vue_loader_options(config, toggles);

    let rules = vec![
        Rule::new(
            r"\.vue$",
            RuleUse::Step(StepDescriptor::with_options("vue-loader", vue_options)),
        ),
        Rule::new(r"\.js$", RuleUse::Step(StepDescriptor::new("babel-loader")))
            .include([src, test]),
        url_rule(
            r"\.(png|jpe?g|gif|svg)(\?.*)?$",
            resolver.assets_path(mode, "img/[name].[hash:7].[ext]"),
        ),
        url_rule(
            r"\.(mp4|webm|ogg|mp3|wav|flac|aac)(\?.*)?$",
            resolver.assets_path(mode, "media/[name].[hash:7].[ext]"),
        ),
        url_rule(
            r"\.(woff2?|eot|ttf|otf)(\?.*)?$",
            resolver.assets_path(mode, "fonts/[name].[hash:7].[ext]"),
        ),
    ];

    PipelineDescription {
        context: root,
        entry,
        output: OutputTemplates {
            path: path_string(&project.resolve(&config.build.assets_root)),
            filename: "[name].js".to_string(),
            chunk_filename: None,
            public_path: config.assets_public_path(mode).to_string(),
            extra: Map::new(),
        },
        resolve: ResolveOptions {
            extensions: RESOLVE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            alias,
            extra: Map::new(),
        },
        module: ModuleOptions {
            rules,
            extra: Map::new(),
        },
        devtool: Devtool::disabled(),
        plugins: Vec::new(),
        dev_server: None,
        extra: Map::new(),
    }
}

/// Options for the single-file-component loader: it gets the same style
/// chains as standalone style files, keyed by dialect.
fn vue_loader_options(config: &KilnConfig, toggles: &EnvironmentToggles) -> Map<String, Value> {
    let css_source_map = toggles.source_map();
    let cache_busting = !toggles.mode().is_optimized() && config.dev.cache_busting;

    let loaders = StyleRuleSet::dialect_chains(toggles);

    let options = json!({
        "loaders": loaders,
        "cssSourceMap": css_source_map,
        "cacheBusting": cache_busting,
        "transformToRequire": {
            "video": ["src", "poster"],
            "source": "src",
            "img": "src",
            "image": "xlink:href"
        }
    });

    match options {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn url_rule(test: &str, name: String) -> Rule {
    Rule::new(
        test,
        RuleUse::Step(
            StepDescriptor::new("url-loader")
                .option("limit", URL_LOADER_LIMIT)
                .option("name", name),
        ),
    )
}

fn path_string(path: &std::path::Path) -> String {
    posix_join("", &path.to_string_lossy().replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_config::Mode;
    use std::path::PathBuf;

    fn config() -> KilnConfig {
        let mut config = KilnConfig::default();
        config.project.root = PathBuf::from("/srv/app");
        config
    }

    fn toggles(mode: Mode) -> EnvironmentToggles {
        config().toggles(mode).unwrap()
    }

    #[test]
    fn base_has_component_script_and_asset_rules() {
        let pipeline = base_pipeline(&config(), &toggles(Mode::Development));
        let tests: Vec<_> = pipeline.module.rules.iter().map(|r| r.test.as_str()).collect();
        assert_eq!(tests[0], r"\.vue$");
        assert_eq!(tests[1], r"\.js$");
        assert_eq!(pipeline.module.rules.len(), 5);
        assert_eq!(
            pipeline.module.rules[1].include,
            vec!["/srv/app/src", "/srv/app/test"]
        );
    }

    #[test]
    fn base_output_and_resolution() {
        let pipeline = base_pipeline(&config(), &toggles(Mode::Production));
        assert_eq!(pipeline.context, "/srv/app");
        assert_eq!(pipeline.entry["app"], "./src/main.js");
        assert_eq!(pipeline.output.path, "/srv/app/dist");
        assert_eq!(pipeline.output.filename, "[name].js");
        assert_eq!(pipeline.output.public_path, "/");
        assert_eq!(pipeline.resolve.alias["@"], "/srv/app/src");
        assert!(pipeline.plugins.is_empty());
        assert!(pipeline.dev_server.is_none());
    }

    #[test]
    fn asset_names_use_the_mode_sub_directory() {
        let mut config = config();
        config.dev.assets_sub_directory = "assets".to_string();
        let pipeline = base_pipeline(&config, &toggles(Mode::Development));
        let RuleUse::Step(step) = &pipeline.module.rules[2].uses else {
            panic!("url rule should be a single step");
        };
        assert_eq!(step.options["name"], "assets/img/[name].[hash:7].[ext]");
        assert_eq!(step.options["limit"], 10_000);
    }

    #[test]
    fn vue_loader_receives_every_dialect_chain() {
        let pipeline = base_pipeline(&config(), &toggles(Mode::Production));
        let RuleUse::Step(step) = &pipeline.module.rules[0].uses else {
            panic!("vue rule should be a single step");
        };
        let loaders = step.options["loaders"].as_object().unwrap();
        assert_eq!(loaders.len(), 7);
        assert_eq!(loaders["scss"]["fallback"], "vue-style-loader");
        assert_eq!(step.options["cacheBusting"], false);
    }

    #[test]
    fn devtool_serializes_as_false_or_name() {
        assert_eq!(serde_json::to_value(Devtool::disabled()).unwrap(), json!(false));
        assert_eq!(
            serde_json::to_value(Devtool::Named("eval".to_string())).unwrap(),
            json!("eval")
        );
    }

    #[test]
    fn description_roundtrips_through_json() {
        let pipeline = base_pipeline(&config(), &toggles(Mode::Development));
        let json = pipeline.to_json().unwrap();
        let back: PipelineDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pipeline);
    }
}
