//! Error types for configuration loading, validation and toggle construction.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Environment selection
    #[error("unknown mode `{value}` (expected one of: development, production, testing)")]
    UnknownMode { value: String },

    // Filesystem validation errors (for CLI use)
    #[error("project root not found: {}", .path.display())]
    RootNotFound { path: PathBuf },

    #[error("static assets directory not found: {}", .path.display())]
    StaticDirNotFound { path: PathBuf },

    #[error("HTML template not found: {}", .path.display())]
    TemplateNotFound { path: PathBuf },

    // Config parsing/loading errors
    #[error("config not found")]
    NotFound,

    #[error("invalid config value for `{field}`{}", .hint.as_ref().map(|h| format!(": {h}")).unwrap_or_default())]
    InvalidValue { field: String, hint: Option<String> },

    // Schema validation errors (no filesystem checks)
    #[error("schema validation failed: {message}{}", .hint.as_ref().map(|h| format!(" (hint: {h})")).unwrap_or_default())]
    SchemaValidation {
        message: String,
        hint: Option<String>,
    },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        let field = err
            .path
            .last()
            .cloned()
            .unwrap_or_else(|| "config".to_string());
        ConfigError::InvalidValue {
            field,
            hint: Some(err.to_string()),
        }
    }
}
