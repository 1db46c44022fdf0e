//! Config file for the `adf` binary
//!
//! Every key is optional; a flag given on the command line wins over the file.
//!
//! ```yaml
//! strictness: strict
//! max_errors: 20
//! keys: field
//! emit_nulls: true
//! pretty: false
//! ```

use adf_ir::{FlattenOptions, KeyStyle, NullPolicy};
use adf_validation::{StrictnessLevel, ValidationConfig};
use clap::ValueEnum;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Output key style as spelled on the command line and in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Keys {
    /// Source aliases (`@status`, `#text`)
    #[default]
    Alias,
    /// Semantic field names
    Field,
}

impl From<Keys> for KeyStyle {
    fn from(keys: Keys) -> Self {
        match keys {
            Keys::Alias => KeyStyle::Alias,
            Keys::Field => KeyStyle::FieldName,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid config {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Settings read from the YAML config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub strictness: Option<StrictnessLevel>,
    pub max_errors: Option<usize>,
    pub keys: Option<Keys>,
    pub emit_nulls: Option<bool>,
    pub pretty: Option<bool>,
}

impl CliConfig {
    /// Parse config text
    pub fn from_yaml(yaml: &str, path: &Path) -> Result<Self, ConfigError> {
        // An empty file deserializes to unit, not a mapping
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read the config file at `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Io(e)
            }
        })?;
        Self::from_yaml(&yaml, path)
    }

    /// Read `path` when given, otherwise use defaults
    pub fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub strictness: Option<StrictnessLevel>,
    pub max_errors: Option<usize>,
    pub keys: Option<Keys>,
    pub emit_nulls: bool,
}

/// Effective settings for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub strictness: StrictnessLevel,
    pub max_errors: usize,
    pub keys: Keys,
    pub emit_nulls: bool,
    pub pretty: bool,
}

impl Settings {
    /// Merge flags over the config file over built-in defaults
    pub fn resolve(config: &CliConfig, overrides: &Overrides) -> Self {
        Self {
            strictness: overrides
                .strictness
                .or(config.strictness)
                .unwrap_or_default(),
            max_errors: overrides.max_errors.or(config.max_errors).unwrap_or(0),
            keys: overrides.keys.or(config.keys).unwrap_or_default(),
            emit_nulls: overrides.emit_nulls || config.emit_nulls.unwrap_or(false),
            pretty: config.pretty.unwrap_or(true),
        }
    }

    pub fn validation_config(&self) -> ValidationConfig {
        ValidationConfig::new()
            .strictness(self.strictness)
            .max_errors(self.max_errors)
    }

    pub fn flatten_options(&self) -> FlattenOptions {
        let null_policy = if self.emit_nulls {
            NullPolicy::Emit
        } else {
            NullPolicy::Omit
        };
        FlattenOptions::new()
            .key_style(self.keys.into())
            .null_policy(null_policy)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(&CliConfig::default(), &Overrides::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.strictness, StrictnessLevel::Moderate);
        assert_eq!(settings.max_errors, 0);
        assert_eq!(settings.keys, Keys::Alias);
        assert!(!settings.emit_nulls);
        assert!(settings.pretty);
        assert_eq!(settings.flatten_options(), FlattenOptions::default());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = "strictness: strict\nmax_errors: 5\nkeys: field\nemit_nulls: true\npretty: false\n";
        let config = CliConfig::from_yaml(yaml, Path::new("adf.yaml")).unwrap();

        assert_eq!(config.strictness, Some(StrictnessLevel::Strict));
        assert_eq!(config.max_errors, Some(5));
        assert_eq!(config.keys, Some(Keys::Field));
        assert_eq!(config.emit_nulls, Some(true));
        assert_eq!(config.pretty, Some(false));
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = CliConfig::from_yaml("  \n", Path::new("adf.yaml")).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = CliConfig::from_yaml("strictnes: strict\n", Path::new("adf.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("Invalid config adf.yaml"));
    }

    #[test]
    fn test_bad_strictness_rejected() {
        let err = CliConfig::from_yaml("strictness: loose\n", Path::new("adf.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_flags_override_file() {
        let config = CliConfig {
            strictness: Some(StrictnessLevel::Lenient),
            max_errors: Some(10),
            keys: Some(Keys::Field),
            emit_nulls: None,
            pretty: Some(false),
        };
        let overrides = Overrides {
            strictness: Some(StrictnessLevel::Strict),
            emit_nulls: true,
            ..Overrides::default()
        };

        let settings = Settings::resolve(&config, &overrides);
        assert_eq!(settings.strictness, StrictnessLevel::Strict);
        assert_eq!(settings.max_errors, 10);
        assert_eq!(settings.keys, Keys::Field);
        assert!(settings.emit_nulls);
        assert!(!settings.pretty);

        let options = settings.flatten_options();
        assert_eq!(options.key_style, KeyStyle::FieldName);
        assert_eq!(options.null_policy, NullPolicy::Emit);
        assert_eq!(settings.validation_config().max_errors, 10);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_errors: 3").unwrap();

        let config = CliConfig::load(file.path()).unwrap();
        assert_eq!(config.max_errors, Some(3));

        let missing = CliConfig::load(Path::new("/nonexistent/adf.yaml")).unwrap_err();
        assert!(matches!(missing, ConfigError::NotFound { .. }));
        assert_eq!(CliConfig::load_optional(None).unwrap(), CliConfig::default());
    }
}
