//! Configuration types

use crate::{CharterResult, ConfigError, ValidationError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default maximum length of blueprint and contract names.
pub const DEFAULT_MAX_NAME_LEN: usize = 100;

/// Default maximum length of field labels.
pub const DEFAULT_MAX_LABEL_LEN: usize = 100;

/// Default maximum length of a single field value.
pub const DEFAULT_MAX_VALUE_LEN: usize = 10_000;

/// Input limits enforced by the registry and the field value store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(deny_unknown_fields)]
pub struct CharterConfig {
    pub max_name_len: usize,
    pub max_label_len: usize,
    pub max_value_len: usize,
}

impl Default for CharterConfig {
    fn default() -> Self {
        Self {
            max_name_len: DEFAULT_MAX_NAME_LEN,
            max_label_len: DEFAULT_MAX_LABEL_LEN,
            max_value_len: DEFAULT_MAX_VALUE_LEN,
        }
    }
}

impl CharterConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_path(path: &Path) -> CharterResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(contents: &str) -> CharterResult<Self> {
        let config: CharterConfig = toml::from_str(contents).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Create a config from environment variables.
    ///
    /// Environment variables:
    /// - `CHARTER_MAX_NAME_LEN` (default: 100)
    /// - `CHARTER_MAX_LABEL_LEN` (default: 100)
    /// - `CHARTER_MAX_VALUE_LEN` (default: 10000)
    ///
    /// Unset variables fall back to defaults; set but unparseable ones are
    /// reported rather than ignored.
    pub fn from_env() -> CharterResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from `CHARTER_MAX_*` keys resolved through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> CharterResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            max_name_len: lookup_usize(&lookup, "CHARTER_MAX_NAME_LEN", defaults.max_name_len)?,
            max_label_len: lookup_usize(&lookup, "CHARTER_MAX_LABEL_LEN", defaults.max_label_len)?,
            max_value_len: lookup_usize(&lookup, "CHARTER_MAX_VALUE_LEN", defaults.max_value_len)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Every limit must be strictly positive.
    pub fn validate(&self) -> CharterResult<()> {
        for (field, value) in [
            ("max_name_len", self.max_name_len),
            ("max_label_len", self.max_label_len),
            ("max_value_len", self.max_value_len),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason: "must be > 0".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Check a blueprint or contract name and return it trimmed.
    pub fn check_name(&self, field: &str, name: &str) -> Result<String, ValidationError> {
        required_text(field, name, self.max_name_len)
    }

    /// Check a field label and return it trimmed.
    pub fn check_label(&self, label: &str) -> Result<String, ValidationError> {
        required_text("label", label, self.max_label_len)
    }

    /// Check a field value. Values may be empty and are stored verbatim.
    pub fn check_value(&self, field: &str, value: &str) -> Result<(), ValidationError> {
        let actual = value.chars().count();
        if actual > self.max_value_len {
            return Err(ValidationError::TooLong {
                field: field.to_string(),
                max: self.max_value_len,
                actual,
            });
        }
        Ok(())
    }
}

fn required_text(field: &str, value: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::RequiredFieldMissing {
            field: field.to_string(),
        });
    }
    let actual = trimmed.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
            actual,
        });
    }
    Ok(trimmed.to_string())
}

fn lookup_usize<F>(lookup: &F, key: &str, default: usize) -> CharterResult<usize>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            ConfigError::InvalidValue {
                field: key.to_string(),
                value: raw.clone(),
                reason: "must be a non-negative integer".to_string(),
            }
            .into()
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CharterError;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = CharterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_name_len, 100);
        assert_eq!(config.max_label_len, 100);
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let config = CharterConfig {
            max_label_len: 0,
            ..CharterConfig::default()
        };
        match config.validate() {
            Err(CharterError::Config(ConfigError::InvalidValue { field, .. })) => {
                assert_eq!(field, "max_label_len");
            }
            other => panic!("Expected ConfigError::InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_from_toml_str() {
        let config = CharterConfig::from_toml_str(
            "max_name_len = 50\nmax_label_len = 40\nmax_value_len = 500\n",
        )
        .unwrap();
        assert_eq!(config.max_name_len, 50);
        assert_eq!(config.max_label_len, 40);
        assert_eq!(config.max_value_len, 500);
    }

    #[test]
    fn test_from_toml_str_rejects_unknown_keys() {
        let result = CharterConfig::from_toml_str(
            "max_name_len = 50\nmax_label_len = 40\nmax_value_len = 500\ntheme = \"dark\"\n",
        );
        assert!(matches!(
            result,
            Err(CharterError::Config(ConfigError::Parse { .. }))
        ));
    }

    #[test]
    fn test_from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_name_len = 10").unwrap();
        writeln!(file, "max_label_len = 10").unwrap();
        writeln!(file, "max_value_len = 10").unwrap();
        let config = CharterConfig::from_path(file.path()).unwrap();
        assert_eq!(config.max_value_len, 10);
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = CharterConfig::from_path(Path::new("/definitely/not/here.toml"));
        assert!(matches!(
            result,
            Err(CharterError::Config(ConfigError::Io { .. }))
        ));
    }

    #[test]
    fn test_check_name_trims_and_bounds() {
        let config = CharterConfig {
            max_name_len: 5,
            ..CharterConfig::default()
        };
        assert_eq!(config.check_name("name", "  NDA  ").unwrap(), "NDA");
        assert!(matches!(
            config.check_name("name", "   "),
            Err(ValidationError::RequiredFieldMissing { .. })
        ));
        assert!(matches!(
            config.check_name("name", "Lease agreement"),
            Err(ValidationError::TooLong { max: 5, .. })
        ));
    }

    #[test]
    fn test_check_value_allows_empty() {
        let config = CharterConfig {
            max_value_len: 3,
            ..CharterConfig::default()
        };
        assert!(config.check_value("v", "").is_ok());
        assert!(config.check_value("v", "abc").is_ok());
        assert!(config.check_value("v", "abcd").is_err());
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    #[test]
    fn test_from_lookup_unset_falls_back_to_defaults() {
        let config = CharterConfig::from_lookup(vars(&[])).unwrap();
        assert_eq!(config, CharterConfig::default());
    }

    #[test]
    fn test_from_lookup_reads_overrides() {
        let config = CharterConfig::from_lookup(vars(&[
            ("CHARTER_MAX_NAME_LEN", "40"),
            ("CHARTER_MAX_VALUE_LEN", " 500 "),
        ]))
        .unwrap();
        assert_eq!(config.max_name_len, 40);
        assert_eq!(config.max_label_len, DEFAULT_MAX_LABEL_LEN);
        assert_eq!(config.max_value_len, 500);
    }

    #[test]
    fn test_from_lookup_reports_unparseable_value() {
        let err = CharterConfig::from_lookup(vars(&[("CHARTER_MAX_VALUE_LEN", "abc")])).unwrap_err();
        match err {
            CharterError::Config(ConfigError::InvalidValue { field, value, .. }) => {
                assert_eq!(field, "CHARTER_MAX_VALUE_LEN");
                assert_eq!(value, "abc");
            }
            other => panic!("Expected InvalidValue, got: {:?}", other),
        }
    }

    #[test]
    fn test_from_lookup_rejects_zero_limit() {
        let err = CharterConfig::from_lookup(vars(&[("CHARTER_MAX_VALUE_LEN", "0")])).unwrap_err();
        match err {
            CharterError::Config(ConfigError::InvalidValue { field, reason, .. }) => {
                assert_eq!(field, "max_value_len");
                assert_eq!(reason, "must be > 0");
            }
            other => panic!("Expected InvalidValue, got: {:?}", other),
        }
    }
}
