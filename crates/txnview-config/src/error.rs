//! Error types for txnview-config

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigErrorCode {
    IoError,
    InvalidYaml,
    InvalidValue,
}

impl std::fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ConfigErrorCode::IoError => "IO_ERROR",
            ConfigErrorCode::InvalidYaml => "INVALID_YAML",
            ConfigErrorCode::InvalidValue => "INVALID_VALUE",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigErrorSeverity {
    /// The file is readable but some value is unusable
    Error,
    /// No configuration could be read at all
    Critical,
}

impl std::fmt::Display for ConfigErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ConfigErrorSeverity::Error => "error",
            ConfigErrorSeverity::Critical => "critical",
        })
    }
}

/// Report printed by the CLI before it gives up on a configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigErrorDetails {
    pub code: ConfigErrorCode,
    pub severity: ConfigErrorSeverity,
    pub message: String,
    /// Dotted path of the offending key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
}

impl std::fmt::Display for ConfigErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;
        if let Some(field) = &self.field {
            write!(f, "\n  at: {}", field)?;
        }
        for hint in &self.hints {
            write!(f, "\n  hint: {}", hint)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {message}")]
    IoError { path: String, message: String },

    #[error("Invalid YAML format: {message}")]
    InvalidYaml { message: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ConfigErrorCode {
        match self {
            ConfigError::IoError { .. } => ConfigErrorCode::IoError,
            ConfigError::InvalidYaml { .. } => ConfigErrorCode::InvalidYaml,
            ConfigError::InvalidValue { .. } => ConfigErrorCode::InvalidValue,
        }
    }

    pub fn severity(&self) -> ConfigErrorSeverity {
        match self {
            ConfigError::IoError { .. } => ConfigErrorSeverity::Critical,
            ConfigError::InvalidYaml { .. } | ConfigError::InvalidValue { .. } => ConfigErrorSeverity::Error,
        }
    }

    pub fn to_details(&self) -> ConfigErrorDetails {
        let (field, hints) = match self {
            ConfigError::IoError { .. } => (
                None,
                vec![
                    "Pass --config with the right path, or remove the file to use defaults.".to_string(),
                    "Run with --print-config for a template.".to_string(),
                ],
            ),
            ConfigError::InvalidYaml { .. } => (None, vec!["Compare the file with --print-config.".to_string()]),
            ConfigError::InvalidValue { field, .. } => (Some(field.clone()), Vec::new()),
        };

        ConfigErrorDetails {
            code: self.code(),
            severity: self.severity(),
            message: self.to_string(),
            field,
            hints,
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
