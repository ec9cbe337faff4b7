//! File-based config discovery and layering for CLI use
//!
//! Handles finding kiln configuration files on disk and layering them with
//! defaults and environment overrides.
//! Priority: environment (`KILN_*`) > config file > defaults.

use std::fs;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde_json::Value;
use tracing::debug;

use crate::config::KilnConfig;
use crate::error::{ConfigError, Result};

/// Name of the dedicated config file
pub const CONFIG_FILE: &str = "kiln.toml";

/// Prefix of environment overrides; nested keys are separated by `__`
/// (`KILN_DEV__PORT=9000` sets `dev.port`).
pub const ENV_PREFIX: &str = "KILN_";

/// File-based configuration discovery
///
/// Searches for kiln configuration in conventional locations and loads it.
/// This is primarily for CLI use - library users should use
/// `KilnConfig::from_value()` directly.
///
/// # Example
///
/// ```no_run
/// use kiln_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    /// Create a new config discovery with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. TOML config: kiln.toml
    /// 2. package.json (kiln field)
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(CONFIG_FILE);
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.exists() {
            if let Ok(content) = fs::read_to_string(&pkg_path) {
                if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                    if parsed.get("kiln").is_some_and(|v| !v.is_null()) {
                        return Some(pkg_path);
                    }
                }
            }
        }

        None
    }

    /// Load config from the discovered file, falling back to defaults when no
    /// file exists. Environment overrides apply either way.
    pub fn load(&self) -> Result<KilnConfig> {
        match self.find() {
            Some(path) => self.load_from(&path),
            None => {
                debug!(root = %self.root.display(), "no kiln config found, using defaults");
                self.extract(Self::base_figment())
            }
        }
    }

    /// Load config from a specific file path
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file does not exist.
    pub fn load_from(&self, path: &Path) -> Result<KilnConfig> {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };

        if !path.exists() {
            return Err(ConfigError::NotFound);
        }

        debug!(path = %path.display(), "loading kiln config");

        let figment = if path.file_name() == Some(std::ffi::OsStr::new("package.json")) {
            Self::base_figment().merge(Serialized::defaults(Self::package_json_field(&path)?))
        } else {
            Self::check_toml(&path)?;
            Self::base_figment().merge(Toml::file(&path))
        };

        self.extract(figment)
    }

    fn base_figment() -> Figment {
        Figment::new().merge(Serialized::defaults(KilnConfig::default()))
    }

    fn extract(&self, figment: Figment) -> Result<KilnConfig> {
        let mut config: KilnConfig = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        config.project.root = if config.project.root == Path::new(".") {
            self.root.clone()
        } else if config.project.root.is_relative() {
            self.root.join(&config.project.root)
        } else {
            config.project.root
        };

        Ok(config)
    }

    // figment reports TOML syntax errors without a field; surface them first
    fn check_toml(path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)?;
        toml::from_str::<toml::Value>(&content).map_err(|e| ConfigError::InvalidValue {
            field: "toml".to_string(),
            hint: Some(format!("Invalid TOML syntax: {e}")),
        })?;
        Ok(())
    }

    fn package_json_field(path: &Path) -> Result<Value> {
        let content = fs::read_to_string(path)?;

        let parsed: Value =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
                field: "package.json".to_string(),
                hint: Some(format!("Invalid JSON: {e}")),
            })?;

        match parsed.get("kiln") {
            Some(Value::Object(map)) => Ok(Value::Object(map.clone())),
            Some(Value::Null) | None => Err(ConfigError::InvalidValue {
                field: "kiln".to_string(),
                hint: Some("Add a 'kiln' object to your package.json".to_string()),
            }),
            Some(_) => Err(ConfigError::InvalidValue {
                field: "kiln".to_string(),
                hint: Some("The 'kiln' field must be an object".to_string()),
            }),
        }
    }
}

/// Discover and load configuration rooted at `root`.
pub fn discover(root: impl AsRef<Path>) -> Result<KilnConfig> {
    ConfigDiscovery::new(root).load()
}
