//! Data-fetching port consumed by the feed sources

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::CoreResult;
use crate::models::{Cursor, Employee, Page, Transaction};

/// Shared handle to the data-fetching layer
pub type ApiRef = Arc<dyn TransactionsApi>;

/// Transport-agnostic access to employees and transactions
#[async_trait]
pub trait TransactionsApi: Send + Sync {
    /// Fetch the full employee directory
    async fn employees(&self) -> CoreResult<Vec<Employee>>;

    /// Fetch one page of all transactions; `None` asks for the first page
    async fn paginated_transactions(&self, cursor: Option<&Cursor>) -> CoreResult<Page<Transaction>>;

    /// Fetch every transaction for one employee
    async fn transactions_by_employee(&self, employee_id: &str) -> CoreResult<Vec<Transaction>>;
}
