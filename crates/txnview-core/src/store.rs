//! Shared holder of the [`ViewState`]
//!
//! Mutations replace the whole value and notify subscribers, so a renderer
//! watching the channel sees every intermediate state in order.

use std::sync::Arc;
use tokio::sync::watch;

use crate::state::ViewState;

/// Cloneable handle to the single view state
#[derive(Clone)]
pub struct ViewStore {
    tx: Arc<watch::Sender<ViewState>>,
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ViewState::default());
        Self { tx: Arc::new(tx) }
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ViewState {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every replacement
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.tx.subscribe()
    }

    /// Replace the state with `next(current)` and return the new value
    pub(crate) fn replace(&self, next: impl FnOnce(&ViewState) -> ViewState) -> ViewState {
        let mut published = ViewState::default();
        self.tx.send_modify(|state| {
            let replacement = next(state);
            published = replacement.clone();
            *state = replacement;
        });
        published
    }

    /// Replace the state only when `next` yields a value; returns whether it did
    pub(crate) fn replace_if(&self, next: impl FnOnce(&ViewState) -> Option<ViewState>) -> bool {
        self.tx.send_if_modified(|state| match next(state) {
            Some(replacement) => {
                *state = replacement;
                true
            }
            None => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ViewMode;

    #[test]
    fn test_replace_publishes_new_value() {
        let store = ViewStore::new();
        let rx = store.subscribe();

        let published = store.replace(|s| s.with_mode(ViewMode::AllTransactions));
        assert_eq!(published.mode, ViewMode::AllTransactions);
        assert_eq!(store.snapshot().mode, ViewMode::AllTransactions);
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn test_replace_if_skips_when_declined() {
        let store = ViewStore::new();
        let rx = store.subscribe();

        assert!(!store.replace_if(|_| None));
        assert!(!rx.has_changed().unwrap());

        assert!(store.replace_if(|s| Some(s.with_generation_advanced())));
        assert_eq!(store.snapshot().generation, 1);
    }

    #[test]
    fn test_clones_share_state() {
        let store = ViewStore::new();
        let other = store.clone();
        other.replace(|s| s.with_loading_acquired());
        assert!(store.snapshot().is_loading);
    }
}
