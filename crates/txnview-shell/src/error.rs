//! Error types for txnview-shell

use thiserror::Error;
use txnview_core::CoreError;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Unknown command: {input} (try `help`)")]
    UnknownCommand { input: String },

    #[error("Unexpected argument for `{command}`: {argument}")]
    UnexpectedArgument { command: String, argument: String },

    #[error("No employee with id {id:?} in the selector")]
    UnknownEmployee { id: String },

    #[error("The employee list has not loaded yet")]
    DirectoryNotLoaded,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShellError {
    /// Whether the session can carry on after reporting this error
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ShellError::Io(_))
    }
}

pub type ShellResult<T> = Result<T, ShellError>;
