//! Error types for pipeline composition and dev-server bootstrap.

use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Two configuration fragments disagree on the shape of a value.
    #[error("conflicting values at `{path}`: cannot merge {incoming} into {base}")]
    ConfigConflict {
        path: String,
        base: &'static str,
        incoming: &'static str,
    },

    #[error("config error: {0}")]
    Config(#[from] kiln_config::ConfigError),

    #[error("pipeline (de)serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("pipeline has no devServer section to bootstrap")]
    MissingDevServer,

    #[error(transparent)]
    PortProbe(#[from] PortProbeError),
}

impl PipelineError {
    pub(crate) fn conflict(path: &str, base: &Value, incoming: &Value) -> Self {
        PipelineError::ConfigConflict {
            path: if path.is_empty() {
                "<root>".to_string()
            } else {
                path.to_string()
            },
            base: shape_name(base),
            incoming: shape_name(incoming),
        }
    }
}

pub(crate) fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) | Value::Number(_) | Value::String(_) => "a scalar",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// Failure to find a free port for the dev server.
#[derive(Debug, Error)]
pub enum PortProbeError {
    #[error("no free port on {host} between {from} and {to}")]
    Exhausted { host: String, from: u16, to: u16 },

    #[error("cannot resolve dev server host `{host}`: {source}")]
    InvalidHost {
        host: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn conflict_names_both_shapes() {
        let err = PipelineError::conflict("module.rules", &json!([]), &json!({}));
        assert_eq!(
            err.to_string(),
            "conflicting values at `module.rules`: cannot merge a mapping into a sequence"
        );
    }

    #[test]
    fn conflict_at_root_has_a_readable_path() {
        let err = PipelineError::conflict("", &json!({}), &json!(1));
        assert!(err.to_string().contains("<root>"));
    }

    #[test]
    fn exhausted_mentions_the_window() {
        let err = PortProbeError::Exhausted {
            host: "localhost".to_string(),
            from: 8080,
            to: 8090,
        };
        assert_eq!(err.to_string(), "no free port on localhost between 8080 and 8090");
    }
}
