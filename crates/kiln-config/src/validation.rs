//! Pluggable config validation strategies
//!
//! Separates filesystem validation (for CLI use) from schema validation (for library use).

use crate::config::KilnConfig;
use crate::error::{ConfigError, Result};

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, config: &KilnConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use kiln_config::{ConfigValidator, KilnConfig, SchemaValidator};
///
/// let config = KilnConfig::default();
/// SchemaValidator.validate(&config).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &KilnConfig) -> Result<()> {
        if config.dev.port == 0 {
            return Err(ConfigError::SchemaValidation {
                message: "dev.port cannot be 0".to_string(),
                hint: Some("Pick a concrete port; kiln probes upwards when it is busy".to_string()),
            });
        }

        if config.dev.host.trim().is_empty() {
            return Err(ConfigError::SchemaValidation {
                message: "dev.host cannot be empty".to_string(),
                hint: Some("Use \"localhost\" or \"0.0.0.0\"".to_string()),
            });
        }

        for (section, sub_dir) in [
            ("dev", &config.dev.assets_sub_directory),
            ("build", &config.build.assets_sub_directory),
        ] {
            if sub_dir.trim().is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: format!("{section}.assets_sub_directory cannot be empty"),
                    hint: Some("Use \"static\" to keep assets in their own folder".to_string()),
                });
            }
        }

        for (section, public_path) in [
            ("dev", &config.dev.assets_public_path),
            ("build", &config.build.assets_public_path),
        ] {
            if public_path.is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: format!("{section}.assets_public_path cannot be empty"),
                    hint: Some("Use \"/\" to serve from the site root".to_string()),
                });
            }
        }

        for (context, proxy) in &config.dev.proxy_table {
            if proxy.target.trim().is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: format!("proxy `{context}` has an empty target"),
                    hint: Some("Set target to the upstream URL".to_string()),
                });
            }
        }

        if config.build.production_gzip && config.build.production_gzip_extensions.is_empty() {
            return Err(ConfigError::SchemaValidation {
                message: "production_gzip is enabled but production_gzip_extensions is empty"
                    .to_string(),
                hint: Some("Add extensions such as [\"js\", \"css\"] or disable gzip".to_string()),
            });
        }

        Ok(())
    }
}

/// Filesystem validator (for CLI use)
///
/// Validates that the project root, static directory and template exist on disk.
pub struct FsValidator;

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &KilnConfig) -> Result<()> {
        SchemaValidator.validate(config)?;

        let project = &config.project;
        if !project.root.exists() {
            return Err(ConfigError::RootNotFound {
                path: project.root.clone(),
            });
        }

        let static_dir = project.resolve(&project.static_dir);
        if !static_dir.is_dir() {
            return Err(ConfigError::StaticDirNotFound { path: static_dir });
        }

        let template = project.resolve(&project.template);
        if !template.is_file() {
            return Err(ConfigError::TemplateNotFound { path: template });
        }

        Ok(())
    }
}

/// Convenience function for schema-only validation
pub fn validate_schema(config: &KilnConfig) -> Result<()> {
    SchemaValidator.validate(config)
}

/// Convenience function for filesystem validation
pub fn validate_fs(config: &KilnConfig) -> Result<()> {
    FsValidator.validate(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dev::ProxyConfig;

    #[test]
    fn schema_validator_accepts_defaults() {
        assert!(SchemaValidator.validate(&KilnConfig::default()).is_ok());
    }

    #[test]
    fn schema_validator_rejects_port_zero() {
        let mut config = KilnConfig::default();
        config.dev.port = 0;
        let result = SchemaValidator.validate(&config);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::SchemaValidation { .. }
        ));
    }

    #[test]
    fn schema_validator_rejects_blank_sub_directory() {
        let mut config = KilnConfig::default();
        config.build.assets_sub_directory = "  ".to_string();
        let err = SchemaValidator.validate(&config).unwrap_err();
        assert!(err.to_string().contains("build.assets_sub_directory"));
    }

    #[test]
    fn schema_validator_rejects_empty_proxy_target() {
        let mut config = KilnConfig::default();
        config
            .dev
            .proxy_table
            .insert("/api".to_string(), ProxyConfig::default());
        let err = SchemaValidator.validate(&config).unwrap_err();
        assert!(err.to_string().contains("/api"));
    }

    #[test]
    fn schema_validator_rejects_gzip_without_extensions() {
        let mut config = KilnConfig::default();
        config.build.production_gzip_extensions.clear();
        assert!(validate_schema(&config).is_err());

        config.build.production_gzip = false;
        assert!(validate_schema(&config).is_ok());
    }
}
