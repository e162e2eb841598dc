//! View reconciler: decides which transaction feed is shown and sequences
//! the fetches when switching between them.
//!
//! The step order inside [`Reconciler::load_all`] and
//! [`Reconciler::load_by_employee`] determines what a renderer can observe
//! mid-flight: the feed being switched away from is always invalidated
//! before the mode changes and before the new feed is fetched.

use tokio::sync::watch;
use txnview_config::{ReconcilerConfig, StaleResultPolicy};

use crate::api::ApiRef;
use crate::error::{CoreError, CoreResult};
use crate::sources::{
    EmployeeDirectorySource, InFlight, PaginatedTransactionsSource, TransactionsByEmployeeSource,
};
use crate::state::{FetchTicket, SourceKind, ViewMode, ViewState};
use crate::store::ViewStore;

/// Global loading indicator, released on drop
struct LoadingIndicator {
    store: ViewStore,
    held: bool,
}

impl LoadingIndicator {
    fn acquire(store: &ViewStore) -> Self {
        store.replace(|state| state.with_loading_acquired());
        Self {
            store: store.clone(),
            held: true,
        }
    }

    fn release(&mut self) {
        if self.held {
            self.held = false;
            self.store.replace(|state| state.with_loading_released());
        }
    }
}

impl Drop for LoadingIndicator {
    fn drop(&mut self) {
        self.release();
    }
}

/// Owns the view state and the three feed sources
#[derive(Clone)]
pub struct Reconciler {
    store: ViewStore,
    employees: EmployeeDirectorySource,
    paginated: PaginatedTransactionsSource,
    by_employee: TransactionsByEmployeeSource,
    settings: ReconcilerConfig,
}

impl Reconciler {
    pub fn new(api: ApiRef, settings: ReconcilerConfig) -> Self {
        let store = ViewStore::new();
        Self {
            employees: EmployeeDirectorySource::new(api.clone(), store.clone()),
            paginated: PaginatedTransactionsSource::new(api.clone(), store.clone()),
            by_employee: TransactionsByEmployeeSource::new(api, store.clone()),
            store,
            settings,
        }
    }

    /// Current state; render from this
    pub fn snapshot(&self) -> ViewState {
        self.store.snapshot()
    }

    /// Receiver notified on every state replacement
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.store.subscribe()
    }

    /// Start an orchestration call: bump the generation and pick the ticket
    /// its fetches will commit with.
    fn begin(&self, operation: &str) -> FetchTicket {
        let state = self.store.replace(|state| state.with_generation_advanced());
        log::debug!(target: "txnview::reconciler", "{} entered at generation {}", operation, state.generation);

        match self.settings.stale_results {
            StaleResultPolicy::Discard => FetchTicket::Generation(state.generation),
            StaleResultPolicy::LastWriteWins => FetchTicket::Always,
        }
    }

    /// Switch to the unfiltered feed and load the directory and the next page.
    ///
    /// Called again while already showing all transactions, this appends the
    /// following page. The loading indicator is released on every exit path.
    pub async fn load_all(&self) -> CoreResult<()> {
        self.load_all_claimed(None).await
    }

    /// `directory_claim` is a directory loading flag raised by the caller;
    /// the directory fetch takes it over instead of raising its own.
    async fn load_all_claimed(&self, directory_claim: Option<InFlight>) -> CoreResult<()> {
        let ticket = self.begin("load_all");

        let mut indicator = LoadingIndicator::acquire(&self.store);
        self.by_employee.invalidate_data();
        self.store.replace(|state| state.with_mode(ViewMode::AllTransactions));

        let flight = directory_claim.unwrap_or_else(|| InFlight::start(&self.store, SourceKind::Employees));
        self.employees.fetch_all_with(flight).await?;

        if !ticket.admits(&self.store.snapshot()) {
            log::debug!(target: "txnview::reconciler", "load_all superseded before the page fetch");
            return Ok(());
        }

        // The selector becomes usable again before the page arrives.
        if self.settings.release_selector_early {
            indicator.release();
        }

        self.paginated.fetch_all_for(ticket).await?;
        drop(indicator);

        let state = self.store.snapshot();
        log::info!(
            target: "txnview::reconciler",
            "Showing all transactions: {} loaded, more: {}",
            state.displayed().map_or(0, |list| list.len()),
            state.next_page_cursor().is_some()
        );
        Ok(())
    }

    /// Switch to the feed filtered by `employee_id`.
    ///
    /// The paginated feed stays invalidated if the fetch fails.
    pub async fn load_by_employee(&self, employee_id: &str) -> CoreResult<()> {
        if employee_id.is_empty() {
            return Err(CoreError::EmptyEmployeeId);
        }

        let ticket = self.begin("load_by_employee");

        self.paginated.invalidate_data();
        self.store.replace(|state| state.with_mode(ViewMode::TransactionsByEmployee));

        self.by_employee.fetch_by_id_for(employee_id, ticket).await?;

        log::info!(
            target: "txnview::reconciler",
            "Showing transactions of employee {}: {} loaded",
            employee_id,
            self.store.snapshot().displayed().map_or(0, |list| list.len())
        );
        Ok(())
    }

    /// Run [`Reconciler::load_all`] if the directory is neither loaded nor
    /// loading. Returns whether it ran.
    ///
    /// The check and the raising of the directory's loading flag happen in
    /// one state replacement, so concurrent callers fire at most once.
    pub async fn ensure_initial_load(&self) -> CoreResult<bool> {
        let Some(claim) = InFlight::claim_if(&self.store, SourceKind::Employees, ViewState::needs_initial_load)
        else {
            return Ok(false);
        };

        log::debug!(target: "txnview::reconciler", "Directory not loaded, starting initial load");
        self.load_all_claimed(Some(claim)).await?;
        Ok(true)
    }
}
