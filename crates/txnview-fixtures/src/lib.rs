//! Fixture-backed data layer
//!
//! Serves employees and transactions from a JSON file through
//! [`TransactionsApi`]. The paginated feed hands out cursors that encode the
//! next page index.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use txnview_config::FixturesConfig;
use txnview_core::{CoreError, CoreResult, Cursor, Employee, Page, Transaction, TransactionsApi};

pub mod dataset;
pub mod error;

pub use dataset::{Dataset, TransactionRecord};
pub use error::{FixtureError, FixtureResult};

const PAGINATED_ENDPOINT: &str = "paginatedTransactions";

/// Data layer over an in-memory [`Dataset`]
#[derive(Debug, Clone)]
pub struct FixtureApi {
    dataset: Arc<Dataset>,
    page_size: usize,
    latency: Duration,
}

impl FixtureApi {
    pub fn new(dataset: Dataset, page_size: usize, latency: Duration) -> Self {
        Self {
            dataset: Arc::new(dataset),
            page_size: page_size.max(1),
            latency,
        }
    }

    /// Load the configured fixture file
    pub async fn from_config(config: &FixturesConfig) -> FixtureResult<Self> {
        let dataset = Dataset::load(&config.path).await?;
        Ok(Self::new(dataset, config.page_size, config.latency()))
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn page_index(&self, cursor: Option<&Cursor>) -> CoreResult<usize> {
        let Some(cursor) = cursor else {
            return Ok(0);
        };

        let invalid = || CoreError::InvalidCursor {
            cursor: cursor.as_str().to_string(),
        };
        let index: usize = cursor.as_str().parse().map_err(|_| invalid())?;
        match index.checked_mul(self.page_size) {
            Some(start) if index > 0 && start < self.dataset.transactions.len() => Ok(index),
            _ => Err(invalid()),
        }
    }
}

#[async_trait]
impl TransactionsApi for FixtureApi {
    async fn employees(&self) -> CoreResult<Vec<Employee>> {
        self.simulate_latency().await;
        log::debug!(target: "txnview::fixtures", "Serving {} employees", self.dataset.employees.len());
        Ok(self.dataset.employees.clone())
    }

    async fn paginated_transactions(&self, cursor: Option<&Cursor>) -> CoreResult<Page<Transaction>> {
        self.simulate_latency().await;

        let index = self.page_index(cursor).map_err(|e| {
            log::warn!(target: "txnview::fixtures", "{} rejected: {}", PAGINATED_ENDPOINT, e);
            e
        })?;

        let all = &self.dataset.transactions;
        let start = index * self.page_size;
        let end = (start + self.page_size).min(all.len());
        let next = (end < all.len()).then(|| Cursor::new((index + 1).to_string()));

        log::debug!(
            target: "txnview::fixtures",
            "Serving page {} ({}..{} of {}), next {:?}",
            index,
            start,
            end,
            all.len(),
            next
        );
        Ok(Page::new(all[start..end].to_vec(), next))
    }

    async fn transactions_by_employee(&self, employee_id: &str) -> CoreResult<Vec<Transaction>> {
        self.simulate_latency().await;

        if employee_id.is_empty() {
            return Err(CoreError::EmptyEmployeeId);
        }

        let transactions: Vec<Transaction> = self
            .dataset
            .transactions
            .iter()
            .filter(|t| t.employee.id == employee_id)
            .cloned()
            .collect();
        log::debug!(
            target: "txnview::fixtures",
            "Serving {} transactions for employee {}",
            transactions.len(),
            employee_id
        );
        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn dataset(count: usize) -> Dataset {
        let employees = vec![Employee::new("e1", "Ann", "Lee"), Employee::new("e2", "Bo", "Ng")];
        let transactions = (0..count)
            .map(|i| Transaction {
                id: format!("t{}", i),
                amount: Decimal::new(i as i64 * 100, 2),
                employee: employees[i % 2].clone(),
                merchant: "Merchant".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                approved: false,
            })
            .collect();
        Dataset { employees, transactions }
    }

    fn ids(transactions: &[Transaction]) -> Vec<&str> {
        transactions.iter().map(|t| t.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_pages_walk_to_the_end() {
        let api = FixtureApi::new(dataset(12), 5, Duration::ZERO);

        let first = api.paginated_transactions(None).await.unwrap();
        assert_eq!(ids(&first.data), vec!["t0", "t1", "t2", "t3", "t4"]);
        assert_eq!(first.next_page_cursor, Some(Cursor::new("1")));

        let second = api.paginated_transactions(first.next_page_cursor.as_ref()).await.unwrap();
        assert_eq!(ids(&second.data), vec!["t5", "t6", "t7", "t8", "t9"]);

        let last = api.paginated_transactions(second.next_page_cursor.as_ref()).await.unwrap();
        assert_eq!(ids(&last.data), vec!["t10", "t11"]);
        assert_eq!(last.next_page_cursor, None);
    }

    #[tokio::test]
    async fn test_exact_multiple_has_no_trailing_cursor() {
        let api = FixtureApi::new(dataset(10), 5, Duration::ZERO);
        let second = api.paginated_transactions(Some(&Cursor::new("1"))).await.unwrap();
        assert_eq!(second.data.len(), 5);
        assert!(!second.has_more());
    }

    #[tokio::test]
    async fn test_empty_dataset_single_empty_page() {
        let api = FixtureApi::new(dataset(0), 5, Duration::ZERO);
        let page = api.paginated_transactions(None).await.unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.next_page_cursor, None);
    }

    #[tokio::test]
    async fn test_bad_cursors_fail() {
        let api = FixtureApi::new(dataset(6), 5, Duration::ZERO);
        for token in ["abc", "0", "2", "-1"] {
            let result = api.paginated_transactions(Some(&Cursor::new(token))).await;
            assert_eq!(
                result.unwrap_err(),
                CoreError::InvalidCursor { cursor: token.to_string() },
                "cursor {}",
                token
            );
        }
    }

    #[tokio::test]
    async fn test_huge_cursor_rejected() {
        let api = FixtureApi::new(dataset(6), 5, Duration::ZERO);
        for index in [usize::MAX, usize::MAX / 4] {
            let token = index.to_string();
            let result = api.paginated_transactions(Some(&Cursor::new(token.as_str()))).await;
            assert_eq!(result.unwrap_err(), CoreError::InvalidCursor { cursor: token });
        }
    }

    #[tokio::test]
    async fn test_transactions_by_employee() {
        let api = FixtureApi::new(dataset(5), 5, Duration::ZERO);

        let ann = api.transactions_by_employee("e1").await.unwrap();
        assert_eq!(ids(&ann), vec!["t0", "t2", "t4"]);
        assert!(api.transactions_by_employee("nobody").await.unwrap().is_empty());
        assert_eq!(api.transactions_by_employee("").await.unwrap_err(), CoreError::EmptyEmployeeId);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_applied() {
        let api = FixtureApi::new(dataset(1), 5, Duration::from_millis(300));
        let started = tokio::time::Instant::now();
        api.employees().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[test]
    fn test_zero_page_size_clamped() {
        let api = FixtureApi::new(dataset(3), 0, Duration::ZERO);
        assert_eq!(api.page_size, 1);
        assert_eq!(api.dataset.transactions.len(), 3);
    }
}
