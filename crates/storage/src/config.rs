//! Repository configuration via `xrepo.toml`
//!
//! A repository needs very little configuration: the namespace it owns and
//! whether it announces its mutations. Both can be given in code or loaded
//! from a TOML file next to the application's data.

use std::path::Path;

use serde::{Deserialize, Serialize};
use xrepo_core::{Namespace, RepositoryError, RepositoryResult, DEFAULT_NAMESPACE};

/// Config file name used by applications that keep one next to their data.
pub const CONFIG_FILE_NAME: &str = "xrepo.toml";

/// Repository configuration loaded from `xrepo.toml`.
///
/// # Example
///
/// ```toml
/// # Storage slot owned by this repository
/// namespace = "employees"
///
/// # Deliver change events to subscribers (default: true)
/// change_events = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Namespace the repository owns; validated by [`RepositoryConfig::namespace`].
    #[serde(default = "default_namespace_str")]
    pub namespace: String,
    /// Deliver change events to subscribers.
    #[serde(default = "default_change_events")]
    pub change_events: bool,
}

fn default_namespace_str() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_change_events() -> bool {
    true
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace_str(),
            change_events: default_change_events(),
        }
    }
}

impl RepositoryConfig {
    /// Default configuration with a different namespace.
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Validate the configured namespace.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNamespace` if the name breaks the namespace rules.
    pub fn namespace(&self) -> RepositoryResult<Namespace> {
        Ok(Namespace::new(self.namespace.as_str())?)
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# xrepo repository configuration
#
# Namespace owned by the repository (default: "default").
# 1-128 characters from [A-Za-z0-9_.:-], not starting with '-', '.' or ':'.
namespace = "default"

# Deliver change events to subscribers (default: true)
change_events = true
"#
    }

    /// Parse and validate config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the text is not valid TOML for this struct, and
    /// `InvalidNamespace` if the namespace is malformed.
    pub fn from_toml_str(content: &str) -> RepositoryResult<Self> {
        let config: RepositoryConfig = toml::from_str(content)
            .map_err(|e| RepositoryError::Config(format!("Failed to parse config: {}", e)))?;
        config.namespace()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> RepositoryResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RepositoryError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            RepositoryError::Config(msg) => {
                RepositoryError::Config(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> RepositoryResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                RepositoryError::Config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> RepositoryResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| RepositoryError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            RepositoryError::Config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
