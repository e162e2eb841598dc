//! View reconciliation for the transaction browser
//!
//! Two independently fetched feeds back the transaction list: the
//! unfiltered feed, loaded a page at a time, and the feed filtered by one
//! employee. The [`Reconciler`] decides which one is authoritative, keeps the
//! other invalidated, and sequences the fetches so the two never show at
//! once. All state lives in one [`ViewState`] value that is replaced whole
//! on every change.
//!
//! Modules:
//! - models: employees, transactions, pages and cursors
//! - api: the data-fetching port
//! - state / store: the view state container and its shared holder
//! - sources: the employee directory and the two transaction feeds
//! - reconciler: `load_all`, `load_by_employee`, the initial-load rule
//! - surface: selector, "view more" control and selection dispatch

pub mod api;
pub mod error;
pub mod models;
pub mod reconciler;
pub mod sources;
pub mod state;
pub mod store;
pub mod surface;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{ApiRef, TransactionsApi};
pub use error::{CoreError, CoreResult, ErrorSeverity};
pub use models::{Cursor, Employee, Page, Transaction};
pub use reconciler::Reconciler;
pub use sources::{
    EmployeeDirectorySource, FetchOutcome, PaginatedTransactionsSource, TransactionsByEmployeeSource,
};
pub use state::{FetchTicket, SourceKind, SourceState, ViewMode, ViewState};
pub use store::ViewStore;
pub use surface::{Selection, SelectorOption, SelectorView, ViewMore};
