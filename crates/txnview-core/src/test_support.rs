//! Scripted data layer for orchestration tests
//!
//! Endpoints can be held (calls block until released), failed, and their
//! calls counted, which lets tests observe the view state mid-flight.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use crate::api::TransactionsApi;
use crate::error::{CoreError, CoreResult};
use crate::models::{Cursor, Employee, Page, Transaction};

pub(crate) const EMPLOYEES: &str = "employees";
pub(crate) const PAGINATED: &str = "paginatedTransactions";
pub(crate) const BY_EMPLOYEE: &str = "transactionsByEmployee";

pub(crate) fn tx(id: &str, employee_id: &str) -> Transaction {
    Transaction {
        id: id.to_string(),
        amount: Decimal::new(4200, 2),
        employee: Employee::new(employee_id, "Test", "Employee"),
        merchant: format!("Merchant {}", id),
        date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        approved: false,
    }
}

pub(crate) fn page(ids: &[&str], next: Option<&str>) -> Page<Transaction> {
    Page::new(ids.iter().map(|id| tx(id, "0")).collect(), next.map(Cursor::new))
}

pub(crate) fn ids(list: Option<&[Transaction]>) -> Option<Vec<String>> {
    list.map(|items| items.iter().map(|t| t.id.clone()).collect())
}

#[derive(Default)]
pub(crate) struct ScriptedApi {
    employees: Vec<Employee>,
    pages: HashMap<Option<String>, Page<Transaction>>,
    by_employee: HashMap<String, Vec<Transaction>>,
    failing: Mutex<HashSet<&'static str>>,
    gates: Mutex<HashMap<&'static str, Arc<Semaphore>>>,
    calls: Mutex<Vec<(&'static str, Option<String>)>>,
}

impl ScriptedApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_employees(mut self, employees: Vec<Employee>) -> Self {
        self.employees = employees;
        self
    }

    pub(crate) fn with_page(mut self, cursor: Option<&str>, page: Page<Transaction>) -> Self {
        self.pages.insert(cursor.map(str::to_string), page);
        self
    }

    pub(crate) fn with_employee_transactions(mut self, employee_id: &str, transactions: Vec<Transaction>) -> Self {
        self.by_employee.insert(employee_id.to_string(), transactions);
        self
    }

    pub(crate) fn fail(&self, endpoint: &'static str) {
        self.failing.lock().unwrap().insert(endpoint);
    }

    /// Block subsequent calls to `endpoint` until released
    pub(crate) fn hold(&self, endpoint: &'static str) {
        self.gates.lock().unwrap().insert(endpoint, Arc::new(Semaphore::new(0)));
    }

    /// Let one blocked (or future) call to `endpoint` through
    pub(crate) fn release(&self, endpoint: &'static str) {
        if let Some(gate) = self.gates.lock().unwrap().get(endpoint) {
            gate.add_permits(1);
        }
    }

    /// Stop holding `endpoint` and let every blocked call through
    pub(crate) fn open(&self, endpoint: &'static str) {
        if let Some(gate) = self.gates.lock().unwrap().remove(endpoint) {
            gate.close();
        }
    }

    pub(crate) fn call_count(&self, endpoint: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|(name, _)| *name == endpoint).count()
    }

    pub(crate) fn cursors_requested(&self) -> Vec<Option<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| *name == PAGINATED)
            .map(|(_, detail)| detail.clone())
            .collect()
    }

    pub(crate) async fn wait_for_calls(&self, endpoint: &str, count: usize) {
        while self.call_count(endpoint) < count {
            tokio::task::yield_now().await;
        }
    }

    async fn enter(&self, endpoint: &'static str, detail: Option<String>) -> CoreResult<()> {
        self.calls.lock().unwrap().push((endpoint, detail));

        let gate = self.gates.lock().unwrap().get(endpoint).cloned();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        if self.failing.lock().unwrap().contains(endpoint) {
            return Err(CoreError::fetch(endpoint, "scripted failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionsApi for ScriptedApi {
    async fn employees(&self) -> CoreResult<Vec<Employee>> {
        self.enter(EMPLOYEES, None).await?;
        Ok(self.employees.clone())
    }

    async fn paginated_transactions(&self, cursor: Option<&Cursor>) -> CoreResult<Page<Transaction>> {
        let key = cursor.map(|c| c.as_str().to_string());
        self.enter(PAGINATED, key.clone()).await?;
        self.pages.get(&key).cloned().ok_or_else(|| CoreError::InvalidCursor {
            cursor: key.unwrap_or_default(),
        })
    }

    async fn transactions_by_employee(&self, employee_id: &str) -> CoreResult<Vec<Transaction>> {
        self.enter(BY_EMPLOYEE, Some(employee_id.to_string())).await?;
        Ok(self.by_employee.get(employee_id).cloned().unwrap_or_default())
    }
}
