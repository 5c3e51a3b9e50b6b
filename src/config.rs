//! Operator configuration
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (operator.toml)
//! - Environment variables (OPERATOR__*)
//!
//! ## Example config file (operator.toml):
//! ```toml
//! [conversion.default_provider]
//! name = "vertex-ai"
//! namespace = "kfp-operator-system"
//!
//! [logging]
//! filter = "pipelines_apis=debug,info"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::apis::NamespacedName;
use crate::conversion::ConversionContext;

pub const DEFAULT_PROVIDER_NAME: &str = "default";
pub const DEFAULT_PROVIDER_NAMESPACE: &str = "kfp-operator-system";

/// Main configuration for the operator's conversion components
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatorConfig {
    /// Conversion settings
    #[serde(default)]
    pub conversion: ConversionConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Conversion configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Provider assumed by versions that do not record one
    #[serde(default = "default_provider")]
    pub default_provider: NamespacedName,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_provider() -> NamespacedName {
    NamespacedName::new(DEFAULT_PROVIDER_NAMESPACE, DEFAULT_PROVIDER_NAME)
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl ConversionConfig {
    /// The context conversions run with
    pub fn context(&self) -> ConversionContext {
        ConversionContext::new(self.default_provider.clone())
    }
}

impl OperatorConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a required file on top of the default locations
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        for location in ["operator.toml", ".operator.toml", "config/operator.toml"] {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(dirs) = directories::ProjectDirs::from("org", "kubeflow", "pipelines") {
            let xdg_config = dirs.config_dir().join("operator.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("OPERATOR")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OperatorConfig::default();
        assert_eq!(config.conversion.default_provider.name, "default");
        assert_eq!(config.conversion.default_provider.namespace, "kfp-operator-system");
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_serialize_config() {
        let toml_str = toml::to_string_pretty(&OperatorConfig::default()).unwrap();
        assert!(toml_str.contains("[conversion.default_provider]"));
        assert!(toml_str.contains("[logging]"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("operator.toml");

        let mut config = OperatorConfig::default();
        config.conversion.default_provider = NamespacedName::new("providers", "vertex-ai");
        config.save(&path).unwrap();

        let loaded = OperatorConfig::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.conversion.default_provider, config.conversion.default_provider);
        assert_eq!(
            loaded.conversion.context().default_provider,
            NamespacedName::new("providers", "vertex-ai")
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("operator.toml");
        std::fs::write(&path, "[logging]\nfilter = \"debug\"\n").unwrap();

        let loaded = OperatorConfig::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.logging.filter, "debug");
        assert_eq!(loaded.conversion, ConversionConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(OperatorConfig::load_from(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
