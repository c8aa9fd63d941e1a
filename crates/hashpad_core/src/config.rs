//! Runtime configuration loaded from TOML.
//!
//! # Invariants
//! - Every field has a default; an empty file is a valid configuration.
//! - `key_prefix` is never empty after validation.

use crate::id::{DEFAULT_ID_LENGTH, MAX_ID_LENGTH};
use crate::repo::note_repo::{SavePolicy, DEFAULT_KEY_PREFIX};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Settings shared by the storage layer and its hosts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HashpadConfig {
    /// Store key prefix for note records.
    pub key_prefix: String,
    /// Blank-content handling; `allow_blank` restores the legacy behavior.
    pub save_policy: SavePolicy,
    /// Store capacity in bytes; unbounded when absent.
    pub capacity_bytes: Option<u64>,
    /// Length of freshly generated note ids.
    pub id_length: usize,
    /// Log level used when the host enables file logging.
    pub log_level: Option<String>,
}

impl Default for HashpadConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            save_policy: SavePolicy::default(),
            capacity_bytes: None,
            id_length: DEFAULT_ID_LENGTH,
            log_level: None,
        }
    }
}

impl HashpadConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key_prefix.is_empty() {
            return Err(ConfigError::Invalid("key_prefix cannot be empty".to_string()));
        }
        if !(1..=MAX_ID_LENGTH).contains(&self.id_length) {
            return Err(ConfigError::Invalid(format!(
                "id_length must be within 1..={MAX_ID_LENGTH}, got {}",
                self.id_length
            )));
        }
        if self.capacity_bytes == Some(0) {
            return Err(ConfigError::Invalid(
                "capacity_bytes must be positive when set".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, HashpadConfig};
    use crate::repo::note_repo::SavePolicy;

    #[test]
    fn empty_document_yields_defaults() {
        let config = HashpadConfig::from_toml_str("").unwrap();
        assert_eq!(config, HashpadConfig::default());
        assert_eq!(config.key_prefix, "note_");
        assert_eq!(config.save_policy, SavePolicy::RejectBlank);
    }

    #[test]
    fn fields_override_defaults() {
        let config = HashpadConfig::from_toml_str(
            r#"
key_prefix = "pad_"
save_policy = "allow_blank"
capacity_bytes = 5242880
id_length = 8
log_level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.key_prefix, "pad_");
        assert_eq!(config.save_policy, SavePolicy::AllowBlank);
        assert_eq!(config.capacity_bytes, Some(5_242_880));
        assert_eq!(config.id_length, 8);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            HashpadConfig::from_toml_str("key_prefix = \"\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            HashpadConfig::from_toml_str("id_length = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            HashpadConfig::from_toml_str("unknown = 1"),
            Err(ConfigError::Parse(_))
        ));
    }
}
