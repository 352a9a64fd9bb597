//! List synchronization state machine for carsync.
//!
//! This module provides a pure, side-effect-free state machine for keeping
//! the list view consistent with the remote collection and the search
//! query. It takes events as input, updates its state, and returns a list
//! of actions to execute.
//!
//! The actual I/O (fetching, timers) is performed by car-client, not by
//! this module. This enables instant unit testing without network mocks.
//!
//! After every settled transition the visible set equals
//! `filter(dataset, query)`. The only permitted deviation is transient:
//! while a query change waits out its debounce, or while a fetch is in
//! flight.

use carsync_types::Dataset;

use crate::filter::filter;
use crate::sequence::{RequestSeq, SequenceGate};

/// Where the list is in its fetch lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncState {
    /// Nothing requested yet.
    Idle,
    /// A list fetch is in flight.
    Loading,
    /// The latest fetch succeeded.
    Ready(Dataset),
    /// The latest fetch failed.
    Error(String),
}

impl SyncState {
    /// Check if a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Error message of the latest fetch, if it failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl Default for SyncState {
    fn default() -> Self {
        Self::Idle
    }
}

/// What asked for a refetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The list view was created.
    Mount,
    /// The list view regained focus (e.g. back from the form).
    Focus,
    /// The user pulled to refresh.
    Pull,
}

/// Events that drive the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A refetch was requested.
    RefreshRequested(Trigger),
    /// A list fetch returned a dataset.
    FetchSucceeded {
        /// Request the response belongs to.
        seq: RequestSeq,
        /// The fetched cars.
        dataset: Dataset,
    },
    /// A list fetch failed.
    FetchFailed {
        /// Request the response belongs to.
        seq: RequestSeq,
        /// User-facing description.
        message: String,
    },
    /// The user edited the query (every keystroke).
    QueryChanged(String),
    /// The debounce delay elapsed for this query.
    QuerySettled(String),
    /// The list view was discarded.
    TornDown,
}

/// Instructions for the car-client driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Call `list()` and report back with this sequence number.
    Fetch(RequestSeq),
    /// (Re)arm the debounce timer for this query, replacing any pending one.
    ScheduleFilter {
        /// Query to evaluate when the timer fires.
        query: String,
    },
    /// Cancel any pending debounce timer.
    CancelFilter,
    /// A response was dropped because it was superseded or arrived after
    /// teardown.
    DropResponse(RequestSeq),
    /// The view snapshot changed; publish it.
    Publish,
}

/// The list synchronization machine - NO I/O, just state transitions.
#[derive(Debug, Clone, Default)]
pub struct SyncMachine {
    state: SyncState,
    dataset: Dataset,
    visible: Dataset,
    query: String,
    query_pending: bool,
    refreshing: bool,
    torn_down: bool,
    gate: SequenceGate,
}

impl SyncMachine {
    /// Create a machine in the Idle state with an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an event and return the actions to execute.
    ///
    /// The caller (car-client) is responsible for executing them in order.
    pub fn handle(&mut self, event: Event) -> Vec<Action> {
        if self.torn_down {
            return match event {
                Event::FetchSucceeded { seq, .. } | Event::FetchFailed { seq, .. } => {
                    vec![Action::DropResponse(seq)]
                }
                _ => vec![],
            };
        }

        match event {
            Event::RefreshRequested(Trigger::Pull) => {
                self.refreshing = true;
                if self.gate.outstanding() {
                    // Coalesce into the fetch already in flight.
                    vec![Action::Publish]
                } else {
                    self.start_fetch()
                }
            }
            Event::RefreshRequested(Trigger::Mount | Trigger::Focus) => self.start_fetch(),

            Event::FetchSucceeded { seq, dataset } => {
                if !self.gate.settle(seq) {
                    return vec![Action::DropResponse(seq)];
                }
                // Dataset-driven recompute: no debounce.
                self.visible = filter(&dataset, &self.query);
                self.query_pending = false;
                self.dataset = dataset.clone();
                self.state = SyncState::Ready(dataset);
                self.refreshing = false;
                vec![Action::Publish]
            }
            Event::FetchFailed { seq, message } => {
                if !self.gate.settle(seq) {
                    return vec![Action::DropResponse(seq)];
                }
                self.dataset = Dataset::empty();
                self.visible = Dataset::empty();
                self.query_pending = false;
                self.state = SyncState::Error(message);
                self.refreshing = false;
                vec![Action::Publish]
            }

            Event::QueryChanged(query) => {
                self.query = query.clone();
                self.query_pending = true;
                vec![Action::ScheduleFilter { query }, Action::Publish]
            }
            Event::QuerySettled(query) => {
                if query != self.query {
                    // A newer keystroke is waiting on its own timer.
                    return vec![];
                }
                self.visible = filter(&self.dataset, &self.query);
                self.query_pending = false;
                vec![Action::Publish]
            }

            Event::TornDown => {
                self.torn_down = true;
                self.query_pending = false;
                self.refreshing = false;
                vec![Action::CancelFilter, Action::Publish]
            }
        }
    }

    fn start_fetch(&mut self) -> Vec<Action> {
        let seq = self.gate.issue();
        self.state = SyncState::Loading;
        vec![Action::Fetch(seq), Action::Publish]
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &SyncState {
        &self.state
    }

    /// The authoritative dataset (empty after a failed fetch).
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The cars currently shown.
    pub fn visible(&self) -> &Dataset {
        &self.visible
    }

    /// The query as last typed.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether a refresh spinner should show.
    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    /// Whether the view was torn down.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Whether no fetch is in flight and no query is waiting to apply.
    ///
    /// A torn-down view is always settled: nothing it still has in flight
    /// can change what it shows.
    pub fn is_settled(&self) -> bool {
        self.torn_down || (!self.gate.outstanding() && !self.query_pending)
    }

    /// Project the machine into what a list screen renders.
    pub fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            loading: self.state.is_loading(),
            refreshing: self.refreshing,
            error: self.state.error().map(str::to_string),
            query: self.query.clone(),
            query_pending: self.query_pending,
            settled: self.is_settled(),
            total: self.dataset.len(),
            visible: self.visible.clone(),
        }
    }
}

/// Everything a list screen needs, derived from [`SyncMachine`].
///
/// Presentation flags are never stored separately from the machine, so the
/// spinner, banner and rows cannot disagree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListSnapshot {
    /// Full-screen loading indicator.
    pub loading: bool,
    /// Pull-to-refresh indicator.
    pub refreshing: bool,
    /// Error banner text.
    pub error: Option<String>,
    /// Query as typed.
    pub query: String,
    /// The visible rows lag behind the typed query.
    pub query_pending: bool,
    /// No fetch in flight and no query waiting.
    pub settled: bool,
    /// Size of the authoritative dataset.
    pub total: usize,
    /// Rows to show.
    pub visible: Dataset,
}

impl ListSnapshot {
    /// Whether a non-blank query is active.
    pub fn is_searching(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// "Found N cars" line, shown only while searching.
    pub fn found_line(&self) -> Option<String> {
        if !self.is_searching() {
            return None;
        }
        let n = self.visible.len();
        Some(format!("Found {} {}", n, if n == 1 { "car" } else { "cars" }))
    }

    /// Empty-state hint, shown only when there are no rows.
    pub fn empty_hint(&self) -> Option<&'static str> {
        if !self.visible.is_empty() {
            return None;
        }
        Some(if self.is_searching() {
            "Try a different search term"
        } else {
            "Add your first car to get started"
        })
    }
}
