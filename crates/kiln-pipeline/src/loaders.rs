//! Transformation chains for style sheets.
//!
//! A chain lists loader steps in the order the bundler expects them: the
//! last-listed step runs first on the raw source. Every style chain starts
//! from the CSS interpreter, optionally followed by the vendor-prefix
//! normalizer and a dialect compiler, and is then either extracted into its
//! own file or prefixed with the runtime style-injection step.

use kiln_config::EnvironmentToggles;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

/// Interprets CSS imports and `url()` references.
pub const CSS_LOADER: &str = "css-loader";

/// Adds vendor prefixes.
pub const POSTCSS_LOADER: &str = "postcss-loader";

/// Injects styles into the document at runtime.
pub const STYLE_INJECTION_LOADER: &str = "vue-style-loader";

/// One loader invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDescriptor {
    pub loader: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl StepDescriptor {
    pub fn new(loader: impl Into<String>) -> Self {
        Self {
            loader: loader.into(),
            options: Map::new(),
        }
    }

    pub fn with_options(loader: impl Into<String>, options: Map<String, Value>) -> Self {
        Self {
            loader: loader.into(),
            options,
        }
    }

    /// Set a single option, replacing any previous value.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// Ordered loader steps for one style dialect.
///
/// Serializes as a plain array when inline and as `{ "use": [..],
/// "fallback": ".." }` when extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransformationChain {
    /// Styles injected at runtime; the first step is the injection step.
    Inline(Vec<StepDescriptor>),
    /// Styles written to a standalone file, with a runtime fallback.
    Extracted {
        #[serde(rename = "use")]
        chain: Vec<StepDescriptor>,
        fallback: String,
    },
}

impl TransformationChain {
    pub fn is_extracted(&self) -> bool {
        matches!(self, TransformationChain::Extracted { .. })
    }

    /// All steps as listed, including the injection step of inline chains.
    pub fn steps(&self) -> &[StepDescriptor] {
        match self {
            TransformationChain::Inline(steps) => steps,
            TransformationChain::Extracted { chain, .. } => chain,
        }
    }

    /// Steps that actually transform the source, without the injection step.
    pub fn processing_steps(&self) -> &[StepDescriptor] {
        match self {
            TransformationChain::Inline(steps) => steps.get(1..).unwrap_or_default(),
            TransformationChain::Extracted { chain, .. } => chain,
        }
    }

    pub fn loader_names(&self) -> Vec<&str> {
        self.steps().iter().map(|s| s.loader.as_str()).collect()
    }
}

/// Dialect-specific compile step, e.g. `("sass", {indentedSyntax: true})`.
#[derive(Debug, Clone, PartialEq)]
pub struct DialectTransform {
    pub id: String,
    pub options: Map<String, Value>,
}

impl DialectTransform {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            options: Map::new(),
        }
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Loader identifier derived from the transform id (`less` → `less-loader`).
    pub fn loader(&self) -> String {
        format!("{}-loader", self.id)
    }
}

/// Builds style chains for one set of toggles.
#[derive(Debug, Clone, Copy)]
pub struct LoaderChainBuilder<'a> {
    toggles: &'a EnvironmentToggles,
}

impl<'a> LoaderChainBuilder<'a> {
    pub fn new(toggles: &'a EnvironmentToggles) -> Self {
        Self { toggles }
    }

    pub fn build(&self, dialect: Option<&DialectTransform>) -> TransformationChain {
        let source_map = self.toggles.source_map();

        let mut steps = vec![StepDescriptor::new(CSS_LOADER).option("sourceMap", source_map)];

        if self.toggles.use_postcss() {
            steps.push(StepDescriptor::new(POSTCSS_LOADER).option("sourceMap", source_map));
        }

        if let Some(dialect) = dialect {
            // the build-wide source map flag wins over a dialect default
            let mut options = dialect.options.clone();
            options.insert("sourceMap".to_string(), Value::Bool(source_map));
            steps.push(StepDescriptor::with_options(dialect.loader(), options));
        }

        trace!(
            dialect = dialect.map(|d| d.id.as_str()).unwrap_or("css"),
            steps = steps.len(),
            extract = self.toggles.extract(),
            "built style chain"
        );

        if self.toggles.extract() {
            TransformationChain::Extracted {
                chain: steps,
                fallback: STYLE_INJECTION_LOADER.to_string(),
            }
        } else {
            let mut inline = Vec::with_capacity(steps.len() + 1);
            inline.push(StepDescriptor::new(STYLE_INJECTION_LOADER));
            inline.extend(steps);
            TransformationChain::Inline(inline)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_config::Mode;
    use serde_json::json;

    fn toggles(source_map: bool, extract: bool, use_postcss: bool) -> EnvironmentToggles {
        EnvironmentToggles::builder(Mode::Development)
            .source_map(source_map)
            .extract(extract)
            .use_postcss(use_postcss)
            .build()
            .unwrap()
    }

    #[test]
    fn degenerate_chain_is_injection_plus_css() {
        let toggles = toggles(false, false, false);
        let chain = LoaderChainBuilder::new(&toggles).build(None);
        assert_eq!(chain.loader_names(), vec![STYLE_INJECTION_LOADER, CSS_LOADER]);
        assert_eq!(chain.steps()[1].options["sourceMap"], json!(false));
    }

    #[test]
    fn postcss_follows_css_loader() {
        let toggles = toggles(true, false, true);
        let less = DialectTransform::new("less");
        let chain = LoaderChainBuilder::new(&toggles).build(Some(&less));
        assert_eq!(
            chain.loader_names(),
            vec![STYLE_INJECTION_LOADER, CSS_LOADER, POSTCSS_LOADER, "less-loader"]
        );
    }

    #[test]
    fn extracted_chain_has_fallback() {
        let toggles = toggles(true, true, true);
        let chain = LoaderChainBuilder::new(&toggles).build(None);
        match &chain {
            TransformationChain::Extracted { chain, fallback } => {
                assert_eq!(fallback, STYLE_INJECTION_LOADER);
                assert_eq!(chain[0].loader, CSS_LOADER);
                assert_eq!(chain[1].loader, POSTCSS_LOADER);
            }
            other => panic!("expected extracted chain, got {other:?}"),
        }
    }

    #[test]
    fn injected_source_map_wins_over_dialect_options() {
        let toggles = toggles(true, false, false);
        let sass = DialectTransform::new("sass")
            .option("indentedSyntax", true)
            .option("sourceMap", false);
        let chain = LoaderChainBuilder::new(&toggles).build(Some(&sass));
        let step = chain.steps().last().unwrap();
        assert_eq!(step.loader, "sass-loader");
        assert_eq!(
            Value::Object(step.options.clone()),
            json!({ "indentedSyntax": true, "sourceMap": true })
        );
    }

    #[test]
    fn serializes_in_bundler_shape() {
        let toggles = toggles(false, true, false);
        let extracted = LoaderChainBuilder::new(&toggles).build(None);
        assert_eq!(
            serde_json::to_value(&extracted).unwrap(),
            json!({
                "use": [{ "loader": "css-loader", "options": { "sourceMap": false } }],
                "fallback": "vue-style-loader"
            })
        );

        let toggles = self::toggles(false, false, false);
        let inline = LoaderChainBuilder::new(&toggles).build(None);
        let value = serde_json::to_value(&inline).unwrap();
        assert_eq!(value[0], json!({ "loader": "vue-style-loader" }));
        let back: TransformationChain = serde_json::from_value(value).unwrap();
        assert_eq!(back, inline);
    }

    #[test]
    fn building_does_not_touch_the_dialect() {
        let toggles = toggles(true, true, true);
        let stylus = DialectTransform::new("stylus");
        let before = stylus.clone();
        let _ = LoaderChainBuilder::new(&toggles).build(Some(&stylus));
        assert_eq!(stylus, before);
    }
}
