//! Explicit view state container
//!
//! Every field the view depends on lives in [`ViewState`]. Transitions are
//! written as functions from the previous value to a whole new value, and
//! the derived transaction list is computed from the state on demand rather
//! than stored next to it.

use std::sync::Arc;

use crate::models::{Cursor, Employee, Page, Transaction};

/// Which transaction feed is authoritative for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Nothing requested yet
    Uninitialized,
    /// Unfiltered, paginated feed
    AllTransactions,
    /// Feed filtered by one employee
    TransactionsByEmployee,
}

impl Default for ViewMode {
    fn default() -> Self {
        ViewMode::Uninitialized
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewMode::Uninitialized => write!(f, "uninitialized"),
            ViewMode::AllTransactions => write!(f, "all"),
            ViewMode::TransactionsByEmployee => write!(f, "by-employee"),
        }
    }
}

/// Names one of the three source slots in [`ViewState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Employees,
    Paginated,
    ByEmployee,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Employees => write!(f, "employees"),
            SourceKind::Paginated => write!(f, "paginated"),
            SourceKind::ByEmployee => write!(f, "by_employee"),
        }
    }
}

/// Cached data and loading flag of one source
///
/// `data == None` means "not loaded or invalidated", which is distinct from
/// a loaded empty sequence.
#[derive(Debug)]
pub struct SourceState<T> {
    pub data: Option<Arc<T>>,
    pub loading: bool,
    in_flight: u32,
}

impl<T> Clone for SourceState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            loading: self.loading,
            in_flight: self.in_flight,
        }
    }
}

impl<T> Default for SourceState<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> SourceState<T> {
    /// Not loaded, not loading
    pub fn empty() -> Self {
        Self {
            data: None,
            loading: false,
            in_flight: 0,
        }
    }

    /// Loaded with `value`, not loading
    pub fn loaded(value: T) -> Self {
        Self {
            data: Some(Arc::new(value)),
            loading: false,
            in_flight: 0,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    pub(crate) fn fetch_started(&self) -> Self {
        let in_flight = self.in_flight + 1;
        Self {
            data: self.data.clone(),
            loading: true,
            in_flight,
        }
    }

    pub(crate) fn fetch_ended(&self) -> Self {
        let in_flight = self.in_flight.saturating_sub(1);
        Self {
            data: self.data.clone(),
            loading: in_flight > 0,
            in_flight,
        }
    }

    pub(crate) fn with_data(&self, data: Option<Arc<T>>) -> Self {
        Self {
            data,
            loading: self.loading,
            in_flight: self.in_flight,
        }
    }

    pub(crate) fn invalidated(&self) -> Self {
        self.with_data(None)
    }
}

/// The complete state the view is rendered from
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Which feed is rendered
    pub mode: ViewMode,
    /// Global indicator driving the selector's loading affordance
    pub is_loading: bool,
    /// Bumped on every orchestration entry
    pub generation: u64,
    pub employees: SourceState<Vec<Employee>>,
    pub paginated: SourceState<Page<Transaction>>,
    pub by_employee: SourceState<Vec<Transaction>>,
    loading_holders: u32,
}

impl ViewState {
    /// The transaction list to render, derived from mode and the two feeds
    pub fn displayed(&self) -> Option<&[Transaction]> {
        match self.mode {
            ViewMode::Uninitialized => None,
            ViewMode::AllTransactions => self.paginated.data.as_deref().map(|page| page.data.as_slice()),
            ViewMode::TransactionsByEmployee => self.by_employee.data.as_deref().map(Vec::as_slice),
        }
    }

    /// Cursor of the loaded paginated feed, if another page exists
    pub fn next_page_cursor(&self) -> Option<&Cursor> {
        self.paginated
            .data
            .as_deref()
            .and_then(|page| page.next_page_cursor.as_ref())
    }

    /// Loaded employees, if any
    pub fn employee_list(&self) -> Option<&[Employee]> {
        self.employees.data.as_deref().map(Vec::as_slice)
    }

    /// Directory unloaded and not loading
    pub fn needs_initial_load(&self) -> bool {
        self.employees.data.is_none() && !self.employees.loading
    }

    /// Nothing in flight and no loading indicator held
    pub fn is_settled(&self) -> bool {
        !self.is_loading && !self.employees.loading && !self.paginated.loading && !self.by_employee.loading
    }

    /// Exactly one transaction feed holds data, and it is the one `mode` renders
    pub fn is_settled_consistent(&self) -> bool {
        match (self.mode, self.paginated.is_loaded(), self.by_employee.is_loaded()) {
            (ViewMode::AllTransactions, true, false) => true,
            (ViewMode::TransactionsByEmployee, false, true) => true,
            _ => false,
        }
    }

    // ==================== Transitions ====================

    pub(crate) fn with_mode(&self, mode: ViewMode) -> Self {
        Self { mode, ..self.clone() }
    }

    pub(crate) fn with_generation_advanced(&self) -> Self {
        Self {
            generation: self.generation + 1,
            ..self.clone()
        }
    }

    pub(crate) fn with_loading_acquired(&self) -> Self {
        Self {
            is_loading: true,
            loading_holders: self.loading_holders + 1,
            ..self.clone()
        }
    }

    pub(crate) fn with_loading_released(&self) -> Self {
        let loading_holders = self.loading_holders.saturating_sub(1);
        Self {
            is_loading: loading_holders > 0,
            loading_holders,
            ..self.clone()
        }
    }

    pub(crate) fn with_employees(&self, employees: SourceState<Vec<Employee>>) -> Self {
        Self { employees, ..self.clone() }
    }

    pub(crate) fn with_paginated(&self, paginated: SourceState<Page<Transaction>>) -> Self {
        Self { paginated, ..self.clone() }
    }

    pub(crate) fn with_by_employee(&self, by_employee: SourceState<Vec<Transaction>>) -> Self {
        Self { by_employee, ..self.clone() }
    }

    pub(crate) fn with_fetch_started(&self, kind: SourceKind) -> Self {
        match kind {
            SourceKind::Employees => self.with_employees(self.employees.fetch_started()),
            SourceKind::Paginated => self.with_paginated(self.paginated.fetch_started()),
            SourceKind::ByEmployee => self.with_by_employee(self.by_employee.fetch_started()),
        }
    }

    pub(crate) fn with_fetch_ended(&self, kind: SourceKind) -> Self {
        match kind {
            SourceKind::Employees => self.with_employees(self.employees.fetch_ended()),
            SourceKind::Paginated => self.with_paginated(self.paginated.fetch_ended()),
            SourceKind::ByEmployee => self.with_by_employee(self.by_employee.fetch_ended()),
        }
    }
}

/// Generation check applied when a fetch result lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTicket {
    /// Apply unconditionally
    Always,
    /// Apply only while the state is still at this generation
    Generation(u64),
}

impl FetchTicket {
    pub fn admits(&self, state: &ViewState) -> bool {
        match self {
            FetchTicket::Always => true,
            FetchTicket::Generation(generation) => state.generation == *generation,
        }
    }
}
