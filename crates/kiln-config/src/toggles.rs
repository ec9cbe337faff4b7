//! Environment toggles that fully determine a composed pipeline.
//!
//! Toggles are immutable once built. The only way to obtain an
//! [`EnvironmentToggles`] is through [`TogglesBuilder::build`] or
//! [`EnvironmentToggles::from_value`], both of which validate the input, so
//! downstream composition never has to deal with an unknown mode or a
//! compression filter without extensions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::mode::Mode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentToggles {
    mode: Mode,
    source_map: bool,
    extract: bool,
    #[serde(rename = "usePostCSS")]
    use_postcss: bool,
    compress: bool,
    compress_extensions: Vec<String>,
    analyze: bool,
    notify_on_errors: bool,
}

impl EnvironmentToggles {
    pub fn builder(mode: Mode) -> TogglesBuilder {
        TogglesBuilder::new(mode)
    }

    /// Build toggles from the loose input object accepted on the wire.
    ///
    /// ```
    /// use kiln_config::{EnvironmentToggles, Mode};
    /// use serde_json::json;
    ///
    /// let toggles = EnvironmentToggles::from_value(json!({
    ///     "mode": "production",
    ///     "sourceMap": true,
    ///     "extract": true,
    ///     "usePostCSS": true
    /// }))
    /// .unwrap();
    /// assert_eq!(toggles.mode(), Mode::Production);
    /// assert!(toggles.extract());
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawToggles =
            serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
                field: "toggles".to_string(),
                hint: Some(e.to_string()),
            })?;
        Self::try_from(raw)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn source_map(&self) -> bool {
        self.source_map
    }

    pub fn extract(&self) -> bool {
        self.extract
    }

    pub fn use_postcss(&self) -> bool {
        self.use_postcss
    }

    /// Gzip compression of emitted assets (production only)
    pub fn compress(&self) -> bool {
        self.compress
    }

    pub fn compress_extensions(&self) -> &[String] {
        &self.compress_extensions
    }

    /// Bundle-size analysis report (production only)
    pub fn analyze(&self) -> bool {
        self.analyze
    }

    pub fn notify_on_errors(&self) -> bool {
        self.notify_on_errors
    }
}

/// Builder for [`EnvironmentToggles`]. Every flag defaults to off.
#[derive(Debug, Clone)]
pub struct TogglesBuilder {
    mode: Mode,
    source_map: bool,
    extract: bool,
    use_postcss: bool,
    compress: bool,
    compress_extensions: Vec<String>,
    analyze: bool,
    notify_on_errors: bool,
}

impl TogglesBuilder {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            source_map: false,
            extract: false,
            use_postcss: false,
            compress: false,
            compress_extensions: Vec::new(),
            analyze: false,
            notify_on_errors: false,
        }
    }

    pub fn source_map(mut self, enabled: bool) -> Self {
        self.source_map = enabled;
        self
    }

    pub fn extract(mut self, enabled: bool) -> Self {
        self.extract = enabled;
        self
    }

    pub fn use_postcss(mut self, enabled: bool) -> Self {
        self.use_postcss = enabled;
        self
    }

    pub fn compress<I, S>(mut self, enabled: bool, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.compress = enabled;
        self.compress_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn analyze(mut self, enabled: bool) -> Self {
        self.analyze = enabled;
        self
    }

    pub fn notify_on_errors(mut self, enabled: bool) -> Self {
        self.notify_on_errors = enabled;
        self
    }

    pub fn build(self) -> Result<EnvironmentToggles> {
        if self.compress && self.compress_extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "productionGzipExtensions".to_string(),
                hint: Some("gzip compression needs at least one file extension".to_string()),
            });
        }

        for ext in &self.compress_extensions {
            if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ConfigError::InvalidValue {
                    field: "productionGzipExtensions".to_string(),
                    hint: Some(format!(
                        "`{ext}` is not a bare file extension (use `js`, not `.js`)"
                    )),
                });
            }
        }

        Ok(EnvironmentToggles {
            mode: self.mode,
            source_map: self.source_map,
            extract: self.extract,
            use_postcss: self.use_postcss,
            compress: self.compress,
            compress_extensions: self.compress_extensions,
            analyze: self.analyze,
            notify_on_errors: self.notify_on_errors,
        })
    }
}

/// Wire shape of the toggle object. `mode` stays a string until validated.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawToggles {
    mode: String,
    #[serde(default)]
    source_map: bool,
    #[serde(default)]
    extract: bool,
    #[serde(default, rename = "usePostCSS")]
    use_postcss: bool,
    #[serde(default)]
    notify_on_errors: bool,
    #[serde(default)]
    production_gzip: bool,
    #[serde(default)]
    production_gzip_extensions: Vec<String>,
    #[serde(default)]
    bundle_analyzer_report: bool,
}

impl TryFrom<RawToggles> for EnvironmentToggles {
    type Error = ConfigError;

    fn try_from(raw: RawToggles) -> Result<Self> {
        let mode: Mode = raw.mode.parse()?;
        TogglesBuilder::new(mode)
            .source_map(raw.source_map)
            .extract(raw.extract)
            .use_postcss(raw.use_postcss)
            .notify_on_errors(raw.notify_on_errors)
            .compress(raw.production_gzip, raw.production_gzip_extensions)
            .analyze(raw.bundle_analyzer_report)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_defaults_everything_off() {
        let toggles = EnvironmentToggles::builder(Mode::Development).build().unwrap();
        assert_eq!(toggles.mode(), Mode::Development);
        assert!(!toggles.source_map());
        assert!(!toggles.extract());
        assert!(!toggles.use_postcss());
        assert!(!toggles.compress());
        assert!(!toggles.analyze());
        assert!(!toggles.notify_on_errors());
    }

    #[test]
    fn compress_requires_extensions() {
        let err = EnvironmentToggles::builder(Mode::Production)
            .compress(true, Vec::<String>::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "productionGzipExtensions"));
    }

    #[test]
    fn compress_rejects_dotted_extensions() {
        let result = EnvironmentToggles::builder(Mode::Production)
            .compress(true, [".js"])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn from_value_rejects_unknown_mode() {
        let err = EnvironmentToggles::from_value(json!({ "mode": "staging" })).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMode { .. }));
    }

    #[test]
    fn from_value_requires_mode() {
        let err = EnvironmentToggles::from_value(json!({ "sourceMap": true })).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn from_value_reads_wire_keys() {
        let toggles = EnvironmentToggles::from_value(json!({
            "mode": "production",
            "sourceMap": true,
            "extract": true,
            "usePostCSS": true,
            "notifyOnErrors": true,
            "productionGzip": true,
            "productionGzipExtensions": ["js", "css"],
            "bundleAnalyzerReport": true
        }))
        .unwrap();

        assert!(toggles.source_map());
        assert!(toggles.extract());
        assert!(toggles.use_postcss());
        assert!(toggles.notify_on_errors());
        assert!(toggles.compress());
        assert_eq!(toggles.compress_extensions(), ["js", "css"]);
        assert!(toggles.analyze());
    }

    #[test]
    fn serializes_with_wire_names() {
        let toggles = EnvironmentToggles::builder(Mode::Testing)
            .use_postcss(true)
            .build()
            .unwrap();
        let value = serde_json::to_value(&toggles).unwrap();
        assert_eq!(value["mode"], json!("testing"));
        assert_eq!(value["usePostCSS"], json!(true));
    }
}
