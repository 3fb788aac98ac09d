//! Engine configuration.
//!
//! Configuration can come from JSON (a file or a string) or from the
//! environment:
//!
//! | Variable | Field |
//! |---|---|
//! | `INTERACTOR_DIAGNOSTICS` | `diagnostics` (`off`, `tracing`, `stderr`) |
//! | `INTERACTOR_INDENT_WIDTH` | `indent_width` |
//! | `INTERACTOR_MAX_INPUTS_LEN` | `max_inputs_len` |

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const ENV_DIAGNOSTICS: &str = "INTERACTOR_DIAGNOSTICS";
pub const ENV_INDENT_WIDTH: &str = "INTERACTOR_INDENT_WIDTH";
pub const ENV_MAX_INPUTS_LEN: &str = "INTERACTOR_MAX_INPUTS_LEN";

/// Errors produced while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Where diagnostic lines go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticsTarget {
    #[default]
    Off,
    Tracing,
    Stderr,
}

impl DiagnosticsTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticsTarget::Off => "off",
            DiagnosticsTarget::Tracing => "tracing",
            DiagnosticsTarget::Stderr => "stderr",
        }
    }
}

impl fmt::Display for DiagnosticsTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagnosticsTarget {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(DiagnosticsTarget::Off),
            "tracing" => Ok(DiagnosticsTarget::Tracing),
            "stderr" => Ok(DiagnosticsTarget::Stderr),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_DIAGNOSTICS.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub diagnostics: DiagnosticsTarget,
    /// Spaces per nesting level in diagnostic lines.
    pub indent_width: usize,
    /// Rendered inputs longer than this are truncated in the middle.
    pub max_inputs_len: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            diagnostics: DiagnosticsTarget::Off,
            indent_width: 2,
            max_inputs_len: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Defaults overridden by `INTERACTOR_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().merge_env_with(|key| std::env::var(key).ok())
    }

    /// Override fields from `lookup`, a stand-in for the process environment.
    pub fn merge_env_with<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_DIAGNOSTICS) {
            self.diagnostics = value.parse()?;
        }
        if let Some(value) = lookup(ENV_INDENT_WIDTH) {
            self.indent_width = parse_usize(ENV_INDENT_WIDTH, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_INPUTS_LEN) {
            self.max_inputs_len = Some(parse_usize(ENV_MAX_INPUTS_LEN, &value)?);
        }
        Ok(self)
    }
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.diagnostics, DiagnosticsTarget::Off);
        assert_eq!(config.indent_width, 2);
        assert_eq!(config.max_inputs_len, None);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{ "diagnostics": "stderr" }"#).unwrap();
        assert_eq!(config.diagnostics, DiagnosticsTarget::Stderr);
        assert_eq!(config.indent_width, 2);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = EngineConfig::from_json_str(r#"{ "verbose": true }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "diagnostics": "tracing", "max_inputs_len": 200 }}"#).unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.diagnostics, DiagnosticsTarget::Tracing);
        assert_eq!(config.max_inputs_len, Some(200));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_DIAGNOSTICS, "STDERR"),
            (ENV_INDENT_WIDTH, "4"),
            (ENV_MAX_INPUTS_LEN, "120"),
        ]
        .into_iter()
        .collect();

        let config = EngineConfig::default()
            .merge_env_with(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.diagnostics, DiagnosticsTarget::Stderr);
        assert_eq!(config.indent_width, 4);
        assert_eq!(config.max_inputs_len, Some(120));
    }

    #[test]
    fn test_env_invalid_value() {
        let err = EngineConfig::default()
            .merge_env_with(|key| (key == ENV_INDENT_WIDTH).then(|| "wide".to_string()))
            .unwrap_err();
        match err {
            ConfigError::InvalidValue { key, value } => {
                assert_eq!(key, ENV_INDENT_WIDTH);
                assert_eq!(value, "wide");
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }
}
