//! High-level configuration structure for kiln.
//!
//! This module provides the main `KilnConfig` struct and the derivation of
//! [`EnvironmentToggles`] for a [`Mode`]. For file discovery and layering, see
//! the `discovery` module.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::build::BuildSettings;
use crate::dev::DevSettings;
use crate::error::{ConfigError, Result as ConfigResult};
use crate::mode::Mode;
use crate::project::ProjectSettings;
use crate::toggles::EnvironmentToggles;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KilnConfig {
    #[serde(default)]
    pub project: ProjectSettings,

    #[serde(default)]
    pub dev: DevSettings,

    #[serde(default)]
    pub build: BuildSettings,
}

impl KilnConfig {
    /// Create from serde_json::Value (for programmatic config)
    ///
    /// # Example
    ///
    /// ```
    /// use kiln_config::KilnConfig;
    /// use serde_json::json;
    ///
    /// let value = json!({
    ///     "dev": { "port": 3000 },
    ///     "build": { "production_gzip": false }
    /// });
    ///
    /// let config = KilnConfig::from_value(value).unwrap();
    /// assert_eq!(config.dev.port, 3000);
    /// assert!(!config.build.production_gzip);
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// JSON Schema for `kiln.toml` (and the `kiln` field of package.json).
    pub fn json_schema() -> ConfigResult<Value> {
        let schema = schemars::schema_for!(KilnConfig);
        serde_json::to_value(schema).map_err(|e| ConfigError::InvalidValue {
            field: "schema".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Assets sub-directory for a mode.
    pub fn assets_sub_directory(&self, mode: Mode) -> &str {
        if mode.is_optimized() {
            &self.build.assets_sub_directory
        } else {
            &self.dev.assets_sub_directory
        }
    }

    /// Public path for a mode.
    pub fn assets_public_path(&self, mode: Mode) -> &str {
        if mode.is_optimized() {
            &self.build.assets_public_path
        } else {
            &self.dev.assets_public_path
        }
    }

    /// Derive the toggles a build in `mode` runs with.
    ///
    /// Development keeps styles inline and follows `dev.css_source_map`;
    /// production and testing extract styles and follow the `build` section.
    pub fn toggles(&self, mode: Mode) -> ConfigResult<EnvironmentToggles> {
        let builder = EnvironmentToggles::builder(mode).use_postcss(true);

        let builder = match mode {
            Mode::Development => builder
                .source_map(self.dev.css_source_map)
                .extract(false)
                .notify_on_errors(self.dev.notify_on_errors),
            Mode::Production | Mode::Testing => builder
                .source_map(self.build.production_source_map)
                .extract(true)
                .compress(
                    self.build.production_gzip,
                    self.build.production_gzip_extensions.iter().cloned(),
                )
                .analyze(self.build.bundle_analyzer_report),
        };

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_creates_config() {
        let value = json!({
            "project": { "name": "shop" },
            "dev": { "host": "0.0.0.0" }
        });

        let config = KilnConfig::from_value(value).unwrap();
        assert_eq!(config.project.name, "shop");
        assert_eq!(config.dev.host, "0.0.0.0");
        assert_eq!(config.dev.port, 8080);
    }

    #[test]
    fn from_value_rejects_wrong_types() {
        let value = json!({ "dev": { "port": "eighty" } });
        assert!(KilnConfig::from_value(value).is_err());
    }

    #[test]
    fn to_value_serializes_config() {
        let config = KilnConfig::default();
        let value = config.to_value().unwrap();
        assert_eq!(value["build"]["devtool"], json!("#source-map"));
        assert_eq!(value["dev"]["port"], json!(8080));
    }

    #[test]
    fn development_toggles_keep_styles_inline() {
        let config = KilnConfig::default();
        let toggles = config.toggles(Mode::Development).unwrap();
        assert!(!toggles.extract());
        assert!(toggles.use_postcss());
        assert!(toggles.source_map());
        assert!(toggles.notify_on_errors());
        assert!(!toggles.compress());
    }

    #[test]
    fn production_toggles_follow_build_section() {
        let mut config = KilnConfig::default();
        config.build.production_source_map = false;
        config.build.bundle_analyzer_report = true;

        let toggles = config.toggles(Mode::Production).unwrap();
        assert!(toggles.extract());
        assert!(!toggles.source_map());
        assert!(toggles.compress());
        assert_eq!(toggles.compress_extensions(), ["js", "css"]);
        assert!(toggles.analyze());
        assert!(!toggles.notify_on_errors());
    }

    #[test]
    fn gzip_without_extensions_is_rejected() {
        let mut config = KilnConfig::default();
        config.build.production_gzip_extensions.clear();
        assert!(config.toggles(Mode::Production).is_err());
        // development never compresses, so the same config is fine there
        assert!(config.toggles(Mode::Development).is_ok());
    }

    #[test]
    fn sub_directory_depends_on_mode() {
        let mut config = KilnConfig::default();
        config.dev.assets_sub_directory = "dev-static".to_string();
        assert_eq!(config.assets_sub_directory(Mode::Development), "dev-static");
        assert_eq!(config.assets_sub_directory(Mode::Testing), "static");
    }

    #[test]
    fn json_schema_describes_sections() {
        let schema = KilnConfig::json_schema().unwrap();
        let text = schema.to_string();
        assert!(text.contains("assets_sub_directory"));
        assert!(text.contains("production_gzip_extensions"));
    }
}
