//! Error types for txnview-fixtures

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Failed to read fixture file {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid fixture JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Transaction {transaction_id} references unknown employee {employee_id:?}")]
    UnknownEmployee {
        transaction_id: String,
        employee_id: String,
    },

    #[error("Duplicate {kind} id {id:?}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("Employee with an empty id; the empty id is reserved for \"all employees\"")]
    ReservedEmployeeId,
}

pub type FixtureResult<T> = Result<T, FixtureError>;
