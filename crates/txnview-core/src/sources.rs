//! Feed sources: the employee directory, the paginated feed and the
//! employee-filtered feed
//!
//! Each source wraps the data-fetching port and owns one slot of the view
//! state. Fetches raise the slot's loading flag for their whole duration and
//! lower it again however they end, including when the future is dropped.
//! Failures leave the slot's previous data untouched.

use std::sync::Arc;

use crate::api::ApiRef;
use crate::error::CoreResult;
use crate::models::{Employee, Page, Transaction};
use crate::state::{FetchTicket, SourceKind, SourceState, ViewState};
use crate::store::ViewStore;

/// What happened to a fetch result
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    /// Stored in the view state
    Applied(Arc<T>),
    /// Nothing to fetch; the current value is returned as is
    Unchanged(Arc<T>),
    /// A newer orchestration call started while this fetch was in flight
    Discarded,
}

impl<T> FetchOutcome<T> {
    pub fn value(&self) -> Option<&Arc<T>> {
        match self {
            FetchOutcome::Applied(value) | FetchOutcome::Unchanged(value) => Some(value),
            FetchOutcome::Discarded => None,
        }
    }

    pub fn is_discarded(&self) -> bool {
        matches!(self, FetchOutcome::Discarded)
    }
}

/// Holds a source's loading flag up while a fetch is outstanding
pub(crate) struct InFlight {
    store: ViewStore,
    kind: SourceKind,
    armed: bool,
}

impl InFlight {
    pub(crate) fn start(store: &ViewStore, kind: SourceKind) -> Self {
        store.replace(|state| state.with_fetch_started(kind));
        Self {
            store: store.clone(),
            kind,
            armed: true,
        }
    }

    /// Raise the loading flag only if `condition` holds, checked and applied
    /// in one replacement
    pub(crate) fn claim_if(
        store: &ViewStore,
        kind: SourceKind,
        condition: impl FnOnce(&ViewState) -> bool,
    ) -> Option<Self> {
        let claimed = store.replace_if(|state| {
            if condition(state) {
                Some(state.with_fetch_started(kind))
            } else {
                None
            }
        });

        claimed.then(|| Self {
            store: store.clone(),
            kind,
            armed: true,
        })
    }

    /// Apply `update` and lower the loading flag in the same replacement
    fn finish(mut self, update: impl FnOnce(&ViewState) -> ViewState) {
        self.armed = false;
        let kind = self.kind;
        self.store.replace(|state| update(state).with_fetch_ended(kind));
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.armed {
            let kind = self.kind;
            self.store.replace(|state| state.with_fetch_ended(kind));
        }
    }
}

// ==================== Employee Directory ====================

/// Source of the employee list shown in the selector
#[derive(Clone)]
pub struct EmployeeDirectorySource {
    api: ApiRef,
    store: ViewStore,
}

impl EmployeeDirectorySource {
    pub fn new(api: ApiRef, store: ViewStore) -> Self {
        Self { api, store }
    }

    pub fn state(&self) -> SourceState<Vec<Employee>> {
        self.store.snapshot().employees
    }

    /// Fetch the whole directory, always hitting the data layer.
    ///
    /// The result is stored even if an orchestration call started meanwhile:
    /// the directory never decides which feed is shown.
    pub async fn fetch_all(&self) -> CoreResult<FetchOutcome<Vec<Employee>>> {
        self.fetch_all_with(InFlight::start(&self.store, SourceKind::Employees)).await
    }

    /// Like [`EmployeeDirectorySource::fetch_all`], under a loading flag the
    /// caller already raised. The flag is lowered when the fetch settles.
    pub(crate) async fn fetch_all_with(&self, flight: InFlight) -> CoreResult<FetchOutcome<Vec<Employee>>> {
        debug_assert_eq!(flight.kind, SourceKind::Employees);

        let employees = match self.api.employees().await {
            Ok(employees) => Arc::new(employees),
            Err(e) => {
                log::warn!(target: "txnview::source", "Employee directory fetch failed: {}", e);
                return Err(e);
            }
        };

        flight.finish(|state| state.with_employees(state.employees.with_data(Some(Arc::clone(&employees)))));
        log::debug!(target: "txnview::source", "Loaded {} employees", employees.len());
        Ok(FetchOutcome::Applied(employees))
    }
}

// ==================== Paginated Transactions ====================

/// Source of the unfiltered feed, grown one page at a time
#[derive(Clone)]
pub struct PaginatedTransactionsSource {
    api: ApiRef,
    store: ViewStore,
}

impl PaginatedTransactionsSource {
    pub fn new(api: ApiRef, store: ViewStore) -> Self {
        Self { api, store }
    }

    pub fn state(&self) -> SourceState<Page<Transaction>> {
        self.store.snapshot().paginated
    }

    /// Fetch the first page, or the next one if a page is already loaded.
    ///
    /// A continuation page is appended after the loaded items. Once the
    /// loaded page has no cursor this is a no-op.
    pub async fn fetch_all(&self) -> CoreResult<FetchOutcome<Page<Transaction>>> {
        self.fetch_all_for(FetchTicket::Always).await
    }

    pub async fn fetch_all_for(&self, ticket: FetchTicket) -> CoreResult<FetchOutcome<Page<Transaction>>> {
        let cursor = match &self.state().data {
            None => None,
            Some(page) => match &page.next_page_cursor {
                Some(cursor) => Some(cursor.clone()),
                None => {
                    log::debug!(target: "txnview::source", "Last page already loaded");
                    return Ok(FetchOutcome::Unchanged(Arc::clone(page)));
                }
            },
        };

        let flight = InFlight::start(&self.store, SourceKind::Paginated);

        let page = match self.api.paginated_transactions(cursor.as_ref()).await {
            Ok(page) => page,
            Err(e) => {
                log::warn!(target: "txnview::source", "Paginated fetch failed (cursor {:?}): {}", cursor, e);
                return Err(e);
            }
        };
        let received = page.data.len();

        let mut outcome = FetchOutcome::Discarded;
        flight.finish(|state| {
            if !ticket.admits(state) {
                return state.clone();
            }
            let merged = match state.paginated.data.as_deref() {
                None => page,
                Some(previous) => previous.extended_with(page),
            };
            let merged = Arc::new(merged);
            outcome = FetchOutcome::Applied(Arc::clone(&merged));
            state.with_paginated(state.paginated.with_data(Some(merged)))
        });

        match &outcome {
            FetchOutcome::Applied(page) => log::debug!(
                target: "txnview::source",
                "Received {} transactions, {} loaded, more: {}",
                received,
                page.data.len(),
                page.has_more()
            ),
            _ => log::debug!(target: "txnview::source", "Discarded stale page ({:?})", ticket),
        }
        Ok(outcome)
    }

    /// Forget the loaded pages without a network call
    pub fn invalidate_data(&self) {
        self.store.replace(|state| state.with_paginated(state.paginated.invalidated()));
    }
}

// ==================== Transactions By Employee ====================

/// Source of the employee-filtered feed
#[derive(Clone)]
pub struct TransactionsByEmployeeSource {
    api: ApiRef,
    store: ViewStore,
}

impl TransactionsByEmployeeSource {
    pub fn new(api: ApiRef, store: ViewStore) -> Self {
        Self { api, store }
    }

    pub fn state(&self) -> SourceState<Vec<Transaction>> {
        self.store.snapshot().by_employee
    }

    /// Replace the cached list with every transaction of `employee_id`
    pub async fn fetch_by_id(&self, employee_id: &str) -> CoreResult<FetchOutcome<Vec<Transaction>>> {
        self.fetch_by_id_for(employee_id, FetchTicket::Always).await
    }

    pub async fn fetch_by_id_for(
        &self,
        employee_id: &str,
        ticket: FetchTicket,
    ) -> CoreResult<FetchOutcome<Vec<Transaction>>> {
        let flight = InFlight::start(&self.store, SourceKind::ByEmployee);

        let transactions = match self.api.transactions_by_employee(employee_id).await {
            Ok(transactions) => Arc::new(transactions),
            Err(e) => {
                log::warn!(target: "txnview::source", "Fetch for employee {} failed: {}", employee_id, e);
                return Err(e);
            }
        };

        let mut outcome = FetchOutcome::Discarded;
        flight.finish(|state| {
            if !ticket.admits(state) {
                return state.clone();
            }
            outcome = FetchOutcome::Applied(Arc::clone(&transactions));
            state.with_by_employee(state.by_employee.with_data(Some(Arc::clone(&transactions))))
        });

        if outcome.is_discarded() {
            log::debug!(target: "txnview::source", "Discarded stale transactions for {} ({:?})", employee_id, ticket);
        } else {
            log::debug!(target: "txnview::source", "Loaded {} transactions for {}", transactions.len(), employee_id);
        }
        Ok(outcome)
    }

    /// Forget the cached list without a network call
    pub fn invalidate_data(&self) {
        self.store.replace(|state| state.with_by_employee(state.by_employee.invalidated()));
    }
}
