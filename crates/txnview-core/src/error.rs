//! Error types for txnview-core
//!
//! Fetch failures are the only errors the reconciler deals with. It never
//! swallows them; the types here carry them to whoever talks to the user.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable identifier of a [`CoreError`] variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    FetchFailed,
    EmptyEmployeeId,
    InvalidCursor,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorCode::FetchFailed => "FETCH_FAILED",
            ErrorCode::EmptyEmployeeId => "EMPTY_EMPLOYEE_ID",
            ErrorCode::InvalidCursor => "INVALID_CURSOR",
        };
        f.write_str(name)
    }
}

/// User-facing description of a failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    /// Structured data about the failed request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
    /// What the user can do next
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            hints: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error [{}]: {}", self.code, self.message)?;
        for hint in &self.hints {
            write!(f, "\n  hint: {}", hint)?;
        }
        Ok(())
    }
}

/// How bad a failure is for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Request refused, nothing changed
    Warning,
    /// A fetch failed; the view keeps its previous data
    Error,
}

impl ErrorSeverity {
    pub fn log_level(self) -> log::Level {
        match self {
            ErrorSeverity::Warning => log::Level::Warn,
            ErrorSeverity::Error => log::Level::Error,
        }
    }
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Fetching {endpoint} failed: {message}")]
    FetchFailed { endpoint: String, message: String },

    #[error("Employee id must not be empty; select all employees instead")]
    EmptyEmployeeId,

    #[error("Invalid page cursor: {cursor}")]
    InvalidCursor { cursor: String },
}

impl CoreError {
    /// Failure reported by the data layer for `endpoint`
    pub fn fetch(endpoint: &str, message: impl Into<String>) -> Self {
        CoreError::FetchFailed {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::FetchFailed { .. } => ErrorCode::FetchFailed,
            CoreError::EmptyEmployeeId => ErrorCode::EmptyEmployeeId,
            CoreError::InvalidCursor { .. } => ErrorCode::InvalidCursor,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::EmptyEmployeeId => ErrorSeverity::Warning,
            CoreError::FetchFailed { .. } | CoreError::InvalidCursor { .. } => ErrorSeverity::Error,
        }
    }

    pub fn to_details(&self) -> ErrorDetails {
        let details = ErrorDetails::new(self.code(), self.to_string());
        match self {
            CoreError::FetchFailed { endpoint, .. } => details
                .with_context(serde_json::json!({ "endpoint": endpoint }))
                .with_hint("Select the employee again, or select all employees, to retry."),
            CoreError::InvalidCursor { cursor } => details
                .with_context(serde_json::json!({ "cursor": cursor }))
                .with_hint("Select all employees to restart from the first page."),
            CoreError::EmptyEmployeeId => details,
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

/// What was being attempted when an error surfaced
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub operation: String,
    pub data: serde_json::Value,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            data: serde_json::Value::Object(Default::default()),
        }
    }

    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Sink for failures reported to the user
pub trait ErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// [`ErrorLogger`] writing to the `log` facade, levelled by severity
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        log::log!(
            target: "txnview::error",
            error.severity().log_level(),
            "{} [{}] during {}: {} {}",
            error.severity(),
            error.code(),
            context.operation,
            error,
            context.data
        );
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(target: "txnview::error", "{} during {}: {}", message, context.operation, context.data);
    }
}
