use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::scope::ScheduleScope;

/// Render state of one query-backed view. Exactly one applies at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum ViewState<T> {
    Loading,
    Error(String),
    Empty,
    Loaded(T),
}

impl<T> ViewState<T> {
    /// `Empty` is reported separately from a failure.
    pub fn from_result<F>(result: Result<T, String>, is_empty: F) -> Self
    where
        F: FnOnce(&T) -> bool,
    {
        match result {
            Ok(data) if is_empty(&data) => ViewState::Empty,
            Ok(data) => ViewState::Loaded(data),
            Err(message) => ViewState::Error(message),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ViewState<U> {
        match self {
            ViewState::Loading => ViewState::Loading,
            ViewState::Error(message) => ViewState::Error(message),
            ViewState::Empty => ViewState::Empty,
            ViewState::Loaded(data) => ViewState::Loaded(f(data)),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// Full identity of a query: which view, which scope, which day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeKey {
    pub view: &'static str,
    pub scope: ScheduleScope,
    pub today: NaiveDate,
}

/// Handle for one in-flight query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    key: ScopeKey,
    generation: u64,
}

impl Ticket {
    pub fn key(&self) -> &ScopeKey {
        &self.key
    }
}

/// Holds the state for whatever scope a view currently shows.
///
/// Starting a new scope supersedes any outstanding ticket; results that
/// arrive for a superseded ticket are dropped instead of merged.
///
/// Used by long-lived clients that switch scope while a query is in flight.
/// The Lambda handler serves one scope per invocation and builds its
/// `ViewState`s directly.
#[derive(Debug, Clone)]
pub struct ScopedView<T> {
    current: Option<ScopeKey>,
    generation: u64,
    state: ViewState<T>,
}

impl<T> Default for ScopedView<T> {
    fn default() -> Self {
        Self { current: None, generation: 0, state: ViewState::Loading }
    }
}

impl<T> ScopedView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading `key`. Returns `None` when that exact key is already
    /// loading or loaded, so at most one query per key is outstanding.
    pub fn begin(&mut self, key: ScopeKey) -> Option<Ticket> {
        if self.current.as_ref() == Some(&key) && !matches!(self.state, ViewState::Error(_)) {
            return None;
        }
        self.generation += 1;
        self.current = Some(key.clone());
        self.state = ViewState::Loading;
        Some(Ticket { key, generation: self.generation })
    }

    /// Store a result if its ticket is still current. Returns whether it was kept.
    pub fn resolve<F>(&mut self, ticket: Ticket, result: Result<T, String>, is_empty: F) -> bool
    where
        F: FnOnce(&T) -> bool,
    {
        if ticket.generation != self.generation {
            debug!(view = ticket.key.view, generation = ticket.generation, "Discarding stale result");
            return false;
        }
        self.state = ViewState::from_result(result, is_empty);
        true
    }

    pub fn current(&self) -> Option<&ScopeKey> {
        self.current.as_ref()
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    pub fn into_state(self) -> ViewState<T> {
        self.state
    }
}
