//! Module rules and the fixed style dialect table.

use indexmap::IndexMap;
use kiln_config::EnvironmentToggles;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::loaders::{DialectTransform, LoaderChainBuilder, StepDescriptor, TransformationChain};

/// Loaders applied to files matching a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleUse {
    Chain(TransformationChain),
    Step(StepDescriptor),
}

/// One entry of `module.rules`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Regex source matched against the file name
    pub test: String,
    #[serde(rename = "use")]
    pub uses: RuleUse,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    /// `exclude`, `enforce`, ... passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Rule {
    /// Rule matching files ending in `.<extension>`.
    pub fn for_extension(extension: &str, uses: RuleUse) -> Self {
        Self {
            test: format!(r"\.{extension}$"),
            uses,
            include: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn new(test: impl Into<String>, uses: RuleUse) -> Self {
        Self {
            test: test.into(),
            uses,
            include: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn include(mut self, paths: impl IntoIterator<Item = String>) -> Self {
        self.include.extend(paths);
        self
    }

    pub fn chain(&self) -> Option<&TransformationChain> {
        match &self.uses {
            RuleUse::Chain(chain) => Some(chain),
            RuleUse::Step(_) => None,
        }
    }
}

/// Style dialects in emission order, with their compile step.
pub const DIALECTS: [&str; 7] = ["css", "postcss", "less", "sass", "scss", "stylus", "styl"];

/// Dialect compile step for a file extension, `None` for plain CSS.
pub fn dialect_transform(extension: &str) -> Option<DialectTransform> {
    match extension {
        "less" => Some(DialectTransform::new("less")),
        "sass" => Some(DialectTransform::new("sass").option("indentedSyntax", Value::Bool(true))),
        "scss" => Some(DialectTransform::new("sass")),
        "stylus" | "styl" => Some(DialectTransform::new("stylus")),
        _ => None,
    }
}

/// Produces one rule per style dialect.
pub struct StyleRuleSet;

impl StyleRuleSet {
    /// Chain for every dialect, keyed by extension in table order.
    pub fn dialect_chains(toggles: &EnvironmentToggles) -> IndexMap<String, TransformationChain> {
        let builder = LoaderChainBuilder::new(toggles);
        DIALECTS
            .iter()
            .map(|ext| {
                let dialect = dialect_transform(ext);
                (ext.to_string(), builder.build(dialect.as_ref()))
            })
            .collect()
    }

    /// Exactly one rule per dialect, matching `\.<ext>$`.
    pub fn build_all(toggles: &EnvironmentToggles) -> Vec<Rule> {
        let rules: Vec<Rule> = Self::dialect_chains(toggles)
            .into_iter()
            .map(|(ext, chain)| Rule::for_extension(&ext, RuleUse::Chain(chain)))
            .collect();

        debug!(
            mode = %toggles.mode(),
            extract = toggles.extract(),
            rules = rules.len(),
            "built style rules"
        );
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_config::Mode;
    use serde_json::json;

    fn toggles(extract: bool) -> EnvironmentToggles {
        EnvironmentToggles::builder(Mode::Production)
            .source_map(true)
            .extract(extract)
            .use_postcss(true)
            .build()
            .unwrap()
    }

    #[test]
    fn one_rule_per_dialect_in_table_order() {
        let rules = StyleRuleSet::build_all(&toggles(false));
        let tests: Vec<_> = rules.iter().map(|r| r.test.as_str()).collect();
        assert_eq!(
            tests,
            vec![
                r"\.css$",
                r"\.postcss$",
                r"\.less$",
                r"\.sass$",
                r"\.scss$",
                r"\.stylus$",
                r"\.styl$"
            ]
        );
    }

    #[test]
    fn sass_is_indented_and_scss_is_not() {
        let chains = StyleRuleSet::dialect_chains(&toggles(true));
        let sass = chains["sass"].steps().last().unwrap();
        let scss = chains["scss"].steps().last().unwrap();
        assert_eq!(sass.loader, "sass-loader");
        assert_eq!(sass.options["indentedSyntax"], json!(true));
        assert_eq!(scss.loader, "sass-loader");
        assert!(!scss.options.contains_key("indentedSyntax"));
    }

    #[test]
    fn stylus_aliases_share_a_chain() {
        let chains = StyleRuleSet::dialect_chains(&toggles(false));
        assert_eq!(chains["stylus"], chains["styl"]);
        assert_eq!(chains["css"], chains["postcss"]);
    }

    #[test]
    fn rule_serializes_use_key() {
        let rule = &StyleRuleSet::build_all(&toggles(true))[0];
        let value = serde_json::to_value(rule).unwrap();
        assert_eq!(value["test"], json!(r"\.css$"));
        assert_eq!(value["use"]["fallback"], json!("vue-style-loader"));
        assert!(value.get("include").is_none());
    }

    #[test]
    fn step_rule_roundtrips_through_untagged_use() {
        let rule = Rule::new(r"\.js$", RuleUse::Step(StepDescriptor::new("babel-loader")))
            .include(["src".to_string()]);
        let value = serde_json::to_value(&rule).unwrap();
        let back: Rule = serde_json::from_value(value).unwrap();
        assert_eq!(back, rule);
    }
}
