//! Deep merge of pipeline descriptions.
//!
//! Merging follows the usual bundler-config conventions:
//! - mappings merge key by key, the incoming side wins on scalar keys
//! - sequences concatenate, base entries first
//! - scalars replace scalars
//! - `null` on either side is replaced by the other side
//!
//! Any other combination (a mapping meeting a sequence, a scalar meeting a
//! mapping, ...) is a [`PipelineError::ConfigConflict`]. Inputs are never
//! modified; the merged value is always a fresh copy.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::pipeline::PipelineDescription;

/// Partial pipeline description layered over a base.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PipelineFragment {
    fields: Map<String, Value>,
}

impl PipelineFragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an arbitrary JSON object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(PipelineError::conflict("", &Value::Object(Map::new()), &other)),
        }
    }

    /// Set a dotted path (`module.rules`), creating intermediate mappings.
    ///
    /// ```
    /// use kiln_pipeline::PipelineFragment;
    /// use serde_json::json;
    ///
    /// let fragment = PipelineFragment::new()
    ///     .set("output.publicPath", "/app/")
    ///     .unwrap();
    /// assert_eq!(fragment.to_value(), json!({ "output": { "publicPath": "/app/" } }));
    /// ```
    pub fn set(mut self, path: &str, value: impl Serialize) -> Result<Self> {
        let value = serde_json::to_value(value)?;
        let mut segments = path.split('.').peekable();
        let mut current = &mut self.fields;
        let mut walked = String::new();

        while let Some(segment) = segments.next() {
            if !walked.is_empty() {
                walked.push('.');
            }
            walked.push_str(segment);

            if segments.peek().is_none() {
                current.insert(segment.to_string(), value);
                break;
            }

            let slot = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            current = match slot {
                Value::Object(map) => map,
                other => {
                    return Err(PipelineError::conflict(
                        &walked,
                        other,
                        &Value::Object(Map::new()),
                    ));
                }
            };
        }

        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

/// Merge `fragment` over `base`, producing a new description.
pub fn merge(base: &PipelineDescription, fragment: &PipelineFragment) -> Result<PipelineDescription> {
    let base_value = serde_json::to_value(base)?;
    let merged = merge_values(&base_value, &fragment.to_value())?;
    debug!(keys = fragment.fields.len(), "merged pipeline fragment");
    Ok(serde_json::from_value(merged)?)
}

/// Merge two JSON values without touching either input.
pub fn merge_values(base: &Value, incoming: &Value) -> Result<Value> {
    merge_at("", base, incoming)
}

fn merge_at(path: &str, base: &Value, incoming: &Value) -> Result<Value> {
    match (base, incoming) {
        (_, Value::Null) => Ok(Value::Null),
        (Value::Null, other) => Ok(other.clone()),
        (Value::Object(left), Value::Object(right)) => {
            let mut out = left.clone();
            for (key, value) in right {
                let child = child_path(path, key);
                let merged = match left.get(key) {
                    Some(existing) => merge_at(&child, existing, value)?,
                    None => value.clone(),
                };
                out.insert(key.clone(), merged);
            }
            Ok(Value::Object(out))
        }
        (Value::Array(left), Value::Array(right)) => {
            let mut out = Vec::with_capacity(left.len() + right.len());
            out.extend(left.iter().cloned());
            out.extend(right.iter().cloned());
            Ok(Value::Array(out))
        }
        (left, right) if is_scalar(left) && is_scalar(right) => Ok(right.clone()),
        (left, right) => Err(PipelineError::conflict(path, left, right)),
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::Bool(_) | Value::Number(_) | Value::String(_))
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}
