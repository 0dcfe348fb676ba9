//! Generator configuration loading and validation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generator::UnmappedTypePolicy;
use crate::model::DuplicatePolicy;
use crate::sql::Dialect;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings shared by every generator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Author stamped into every artifact.
    pub author: String,

    /// Module name for constants artifacts.
    pub namespace: Option<String>,

    pub dialect: Dialect,

    /// Directory receiving one file per artifact; stdout when unset.
    pub output_dir: Option<PathBuf>,

    pub unmapped_types: UnmappedTypePolicy,

    /// Tables to generate, by plain or qualified name. Empty means all.
    pub tables: Vec<String>,

    /// Handling of duplicate names when reading descriptor documents.
    pub duplicates: DuplicatePolicy,
}

fn default_author() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            author: default_author(),
            namespace: None,
            dialect: Dialect::default(),
            output_dir: None,
            unmapped_types: UnmappedTypePolicy::default(),
            tables: Vec::new(),
            duplicates: DuplicatePolicy::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.author.trim().is_empty() {
            return Err(ConfigError::Invalid("author must not be empty".into()));
        }
        if let Some(namespace) = &self.namespace {
            if !is_identifier(namespace) {
                return Err(ConfigError::Invalid(format!(
                    "namespace must be a valid identifier, got '{}'",
                    namespace
                )));
            }
        }
        Ok(())
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    s != "_" && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml() {
        let config = GeneratorConfig::from_yaml(
            r#"
author: jdoe
namespace: shop
dialect: postgres
output_dir: out
unmapped_types: omit
tables: [orders, app.order_items]
duplicates: reject
"#,
        )
        .unwrap();

        assert_eq!(config.author, "jdoe");
        assert_eq!(config.namespace.as_deref(), Some("shop"));
        assert_eq!(config.dialect, Dialect::PostgreSQL);
        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
        assert_eq!(config.unmapped_types, UnmappedTypePolicy::Omit);
        assert_eq!(config.tables, vec!["orders", "app.order_items"]);
        assert_eq!(config.duplicates, DuplicatePolicy::Reject);
    }

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::from_yaml("author: jdoe").unwrap();
        assert_eq!(config.dialect, Dialect::Auto);
        assert_eq!(config.unmapped_types, UnmappedTypePolicy::Preserve);
        assert_eq!(config.duplicates, DuplicatePolicy::Replace);
        assert!(config.namespace.is_none());
        assert!(config.tables.is_empty());
    }

    #[test]
    fn test_empty_author_rejected() {
        let err = GeneratorConfig::from_yaml("author: '  '").unwrap_err();
        assert_eq!(err.to_string(), "Invalid config: author must not be empty");
    }

    #[test]
    fn test_bad_namespace_rejected() {
        let err = GeneratorConfig::from_yaml("author: a\nnamespace: 9lives").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(GeneratorConfig::from_yaml("author: a\nnamespace: my-shop").is_err());
        assert!(GeneratorConfig::from_yaml("author: a\nnamespace: _shop").is_ok());
    }

    #[test]
    fn test_unknown_policy_is_yaml_error() {
        let err = GeneratorConfig::from_yaml("unmapped_types: skip").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = GeneratorConfig::load("/nonexistent/repodef.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
