//! CLI configuration management

use abikit_codec::Rules;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Codec rules
    #[serde(default)]
    pub rules: Rules,
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".abikit"))
    }

    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load config from `path`, or return default if missing or unreadable
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path).map_err(|e| e.to_string()).and_then(|content| {
            toml::from_str(&content).map_err(|e| e.to_string())
        }) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Save config to `path`
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;

        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abikit_codec::DecodingRules;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(!config.rules.encoding.optimize);
        assert!(config.rules.decoding.structs_as_records);
        assert_eq!(config.rules.return_decoding, DecodingRules::return_values());
    }

    #[test]
    fn test_config_serialize() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("optimize"));
        assert!(toml.contains("structs_as_records"));
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            [rules.encoding]
            optimize = true

            [rules.decoding]
            strict = true
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.rules.encoding.optimize);
        assert!(config.rules.decoding.strict);
        assert!(!config.rules.return_decoding.strict);
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.rules.decoding.max_length = Some(4096);
        config.save(&path).unwrap();

        assert_eq!(Config::load(Some(&path)), config);
    }

    #[test]
    fn test_config_load_missing_or_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(Config::load(Some(&path)), Config::default());

        std::fs::write(&path, "rules = 5").unwrap();
        assert_eq!(Config::load(Some(&path)), Config::default());
    }
}
