//! Observable breed-list state: actions, a pure reducer, and a watch-backed store.
//!
//! The fetch task is the only writer. Presenters read snapshots or subscribe.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::debug;

use crate::breed::Breed;

/// Error class of a failed breed fetch, kept in state for presenters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Transport,
    /// HTTP 400..=500.
    ServerNotResponding(u16),
    /// Any other non-2xx status.
    UnexpectedStatus(u16),
    Decode,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchErrorKind::Transport => write!(f, "could not reach the breeds server"),
            FetchErrorKind::ServerNotResponding(status) => {
                write!(f, "server is not responding (HTTP {status})")
            }
            FetchErrorKind::UnexpectedStatus(status) => {
                write!(f, "something went wrong (HTTP {status})")
            }
            FetchErrorKind::Decode => write!(f, "breed data could not be decoded"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(FetchErrorKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreedAction {
    FetchStarted,
    FetchSucceeded(Vec<Breed>),
    FetchFailed(FetchErrorKind),
}

/// Snapshot of the breed list. Cloning is cheap: breeds sit behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreedState {
    pub phase: LoadPhase,
    pub breeds: Arc<[Breed]>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Default for BreedState {
    fn default() -> Self {
        Self {
            phase: LoadPhase::Idle,
            breeds: Arc::from(Vec::new()),
            fetched_at: None,
        }
    }
}

impl BreedState {
    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn error(&self) -> Option<FetchErrorKind> {
        match self.phase {
            LoadPhase::Failed(kind) => Some(kind),
            _ => None,
        }
    }

    /// Apply one action. Pure: the previous state is consumed, a new one returned.
    ///
    /// A failed fetch leaves `Loading` for `Failed` and keeps whatever breeds
    /// were already shown.
    pub fn reduce(self, action: BreedAction) -> Self {
        match action {
            BreedAction::FetchStarted => Self {
                phase: LoadPhase::Loading,
                ..self
            },
            BreedAction::FetchSucceeded(breeds) => Self {
                phase: LoadPhase::Loaded,
                breeds: Arc::from(breeds),
                fetched_at: Some(Utc::now()),
            },
            BreedAction::FetchFailed(kind) => Self {
                phase: LoadPhase::Failed(kind),
                ..self
            },
        }
    }
}

/// Single-writer, many-reader container for [`BreedState`].
#[derive(Debug, Clone)]
pub struct BreedStore {
    tx: Arc<watch::Sender<BreedState>>,
}

impl Default for BreedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BreedStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(BreedState::default());
        Self { tx: Arc::new(tx) }
    }

    /// Reduce `action` into the current state and notify subscribers.
    pub fn dispatch(&self, action: BreedAction) {
        self.tx.send_modify(|state| {
            let next = std::mem::take(state).reduce(action);
            debug!(phase = ?next.phase, breeds = next.breeds.len(), "breed state updated");
            *state = next;
        });
    }

    pub fn snapshot(&self) -> BreedState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BreedState> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_breeds() -> Vec<Breed> {
        let mut abys = Breed::new("abys", "Abyssinian");
        abys.origin = "Egypt".into();
        let mut aege = Breed::new("aege", "Aegean");
        aege.origin = "Greece".into();
        vec![abys, aege]
    }

    #[test]
    fn starts_idle_and_empty() {
        let state = BreedState::default();
        assert_eq!(state.phase, LoadPhase::Idle);
        assert!(!state.is_loading());
        assert!(state.breeds.is_empty());
        assert!(state.fetched_at.is_none());
    }

    #[test]
    fn success_path() {
        let state = BreedState::default().reduce(BreedAction::FetchStarted);
        assert!(state.is_loading());

        let state = state.reduce(BreedAction::FetchSucceeded(two_breeds()));
        assert_eq!(state.phase, LoadPhase::Loaded);
        assert!(!state.is_loading());
        assert_eq!(state.breeds.len(), 2);
        assert_eq!(state.breeds[0].name, "Abyssinian");
        assert_eq!(state.breeds[1].name, "Aegean");
        assert!(state.fetched_at.is_some());
    }

    #[test]
    fn failure_clears_loading_and_keeps_breeds() {
        let loaded = BreedState::default()
            .reduce(BreedAction::FetchStarted)
            .reduce(BreedAction::FetchSucceeded(two_breeds()));
        let fetched_at = loaded.fetched_at;

        let state = loaded
            .reduce(BreedAction::FetchStarted)
            .reduce(BreedAction::FetchFailed(FetchErrorKind::ServerNotResponding(500)));
        assert!(!state.is_loading());
        assert_eq!(
            state.error(),
            Some(FetchErrorKind::ServerNotResponding(500))
        );
        assert_eq!(state.breeds.len(), 2);
        assert_eq!(state.fetched_at, fetched_at);
    }

    #[test]
    fn error_kind_display() {
        assert_eq!(
            FetchErrorKind::ServerNotResponding(503).to_string(),
            "server is not responding (HTTP 503)"
        );
        assert_eq!(
            FetchErrorKind::Decode.to_string(),
            "breed data could not be decoded"
        );
    }

    #[test]
    fn store_snapshot_follows_dispatch() {
        let store = BreedStore::new();
        store.dispatch(BreedAction::FetchStarted);
        assert!(store.snapshot().is_loading());
        store.dispatch(BreedAction::FetchSucceeded(two_breeds()));
        assert_eq!(store.snapshot().breeds.len(), 2);
    }

    #[tokio::test]
    async fn subscribers_are_notified() {
        let store = BreedStore::new();
        let mut rx = store.subscribe();

        store.dispatch(BreedAction::FetchStarted);
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_loading());

        store.dispatch(BreedAction::FetchFailed(FetchErrorKind::Transport));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().error(), Some(FetchErrorKind::Transport));
    }

    #[test]
    fn clones_share_one_state() {
        let store = BreedStore::new();
        let reader = store.clone();
        store.dispatch(BreedAction::FetchSucceeded(two_breeds()));
        assert_eq!(reader.snapshot().phase, LoadPhase::Loaded);
    }
}
