use crate::core::{MoonStoneError, Result};
use serde::Deserialize;
use std::path::Path;

/// Default key prefix in the progress store.
pub const DEFAULT_PREFIX: &str = "MoonStone";

/// Engine configuration
///
/// Fixed for the lifetime of a `MoonStone` instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct MoonStoneConfig {
    /// Namespace for keys in the progress store
    pub prefix: String,

    /// Run predicate-keyed evolutions before version-keyed ones
    pub run_predicates_before_version: bool,
}

impl MoonStoneConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            run_predicates_before_version: false,
        }
    }

    /// Set the store key prefix
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Set phase order
    pub fn run_predicates_before_version(mut self, enabled: bool) -> Self {
        self.run_predicates_before_version = enabled;
        self
    }

    /// Key under which the last applied version is stored
    pub fn version_key(&self) -> String {
        format!("{}.version", self.prefix)
    }

    /// Parse from a JSON document; missing fields take their defaults
    ///
    /// # Examples
    ///
    /// ```
    /// use moonstone::MoonStoneConfig;
    ///
    /// let config = MoonStoneConfig::from_json_str(r#"{"prefix": "Notes"}"#).unwrap();
    /// assert_eq!(config.version_key(), "Notes.version");
    /// assert!(!config.run_predicates_before_version);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config = serde_json::from_str::<Self>(json)
            .map_err(|err| MoonStoneError::Config(format!("parse config: {}", err)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| {
            MoonStoneError::Config(format!("Failed to read '{}': {}", path.display(), err))
        })?;
        Self::from_json_str(&json)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(MoonStoneError::Config("prefix cannot be empty".to_string()));
        }

        if self.prefix.trim() != self.prefix {
            return Err(MoonStoneError::Config(
                "prefix cannot start or end with whitespace".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for MoonStoneConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MoonStoneConfig::default();
        assert_eq!(config.prefix, "MoonStone");
        assert!(!config.run_predicates_before_version);
        assert_eq!(config.version_key(), "MoonStone.version");
    }

    #[test]
    fn test_builder_pattern() {
        let config = MoonStoneConfig::new()
            .prefix("Journal")
            .run_predicates_before_version(true);

        assert_eq!(config.version_key(), "Journal.version");
        assert!(config.run_predicates_before_version);
    }

    #[test]
    fn test_validate() {
        assert!(MoonStoneConfig::new().validate().is_ok());
        assert!(MoonStoneConfig::new().prefix("").validate().is_err());
        assert!(MoonStoneConfig::new().prefix(" App").validate().is_err());
    }

    #[test]
    fn test_from_json() {
        let config =
            MoonStoneConfig::from_json_str(r#"{"run_predicates_before_version": true}"#).unwrap();
        assert_eq!(config.prefix, DEFAULT_PREFIX);
        assert!(config.run_predicates_before_version);

        assert!(MoonStoneConfig::from_json_str(r#"{"prefix": ""}"#).is_err());
        assert!(MoonStoneConfig::from_json_str("[1, 2]").is_err());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("moonstone.json");
        std::fs::write(&path, r#"{"prefix": "Tasks"}"#).unwrap();

        let config = MoonStoneConfig::from_json_file(&path).unwrap();
        assert_eq!(config.version_key(), "Tasks.version");
        assert!(MoonStoneConfig::from_json_file(dir.path().join("missing.json")).is_err());
    }
}
