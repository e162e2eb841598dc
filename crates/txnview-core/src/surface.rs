//! Rendered surface: what a presentation layer shows for a [`ViewState`],
//! and how user actions map onto the reconciler.

use crate::error::CoreResult;
use crate::models::Employee;
use crate::reconciler::Reconciler;
use crate::state::{ViewMode, ViewState};

pub const SELECTOR_LABEL: &str = "Filter by employee";
pub const SELECTOR_LOADING_LABEL: &str = "Loading employees";
pub const VIEW_MORE_LABEL: &str = "View More";

/// One entry of the employee selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorOption {
    pub value: String,
    pub label: String,
}

impl From<&Employee> for SelectorOption {
    fn from(employee: &Employee) -> Self {
        Self {
            value: employee.id.clone(),
            label: employee.label(),
        }
    }
}

/// Employee selector contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorView {
    pub options: Vec<SelectorOption>,
    pub is_loading: bool,
}

impl SelectorView {
    pub fn find(&self, value: &str) -> Option<&SelectorOption> {
        self.options.iter().find(|option| option.value == value)
    }
}

/// The selector lists nothing until the directory loads, then the sentinel
/// followed by every employee.
pub fn selector(state: &ViewState) -> SelectorView {
    let sentinel = Employee::empty();
    let options = match state.employee_list() {
        None => Vec::new(),
        Some(employees) => std::iter::once(&sentinel)
            .chain(employees.iter())
            .map(SelectorOption::from)
            .collect(),
    };

    SelectorView {
        options,
        is_loading: state.is_loading,
    }
}

/// State of the "view more" control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMore {
    Hidden,
    Enabled,
    /// Shown, but a page fetch is running
    Disabled,
}

pub fn view_more(state: &ViewState) -> ViewMore {
    let visible = state.displayed().is_some()
        && state.mode == ViewMode::AllTransactions
        && state.next_page_cursor().is_some();

    if !visible {
        ViewMore::Hidden
    } else if state.paginated.loading {
        ViewMore::Disabled
    } else {
        ViewMore::Enabled
    }
}

/// A choice made in the selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    AllEmployees,
    Employee(String),
}

impl Selection {
    /// Map a selector value to a selection; the empty id is the sentinel
    pub fn from_value(value: &str) -> Self {
        if value.is_empty() {
            Selection::AllEmployees
        } else {
            Selection::Employee(value.to_string())
        }
    }
}

/// Route a selection to the matching orchestration call
pub async fn dispatch(reconciler: &Reconciler, selection: Selection) -> CoreResult<()> {
    log::debug!(target: "txnview::surface", "Dispatching {:?}", selection);
    match selection {
        Selection::AllEmployees => reconciler.load_all().await,
        Selection::Employee(id) => reconciler.load_by_employee(&id).await,
    }
}

/// Load the next page if the "view more" control is enabled; returns whether
/// a load was started
pub async fn request_more(reconciler: &Reconciler) -> CoreResult<bool> {
    match view_more(&reconciler.snapshot()) {
        ViewMore::Enabled => {
            reconciler.load_all().await?;
            Ok(true)
        }
        other => {
            log::debug!(target: "txnview::surface", "View more ignored ({:?})", other);
            Ok(false)
        }
    }
}
