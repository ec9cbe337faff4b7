pub mod build;
pub mod config;
pub mod dev;
pub mod discovery;
pub mod error;
mod helpers;
pub mod mode;
pub mod project;
pub mod toggles;
pub mod validation;

// Re-export main types
pub use build::BuildSettings;
pub use config::KilnConfig;
pub use dev::{DevSettings, ProxyConfig};
pub use error::{ConfigError, Result};
pub use mode::Mode;
pub use project::ProjectSettings;
pub use toggles::{EnvironmentToggles, TogglesBuilder};

// Re-export discovery and validation
pub use discovery::{CONFIG_FILE, ConfigDiscovery, ENV_PREFIX, discover};
pub use validation::{ConfigValidator, FsValidator, SchemaValidator, validate_fs, validate_schema};
