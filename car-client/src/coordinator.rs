//! SyncCoordinator - keeps the list view in step with the remote collection.
//!
//! # Architecture
//!
//! SyncCoordinator uses a pure state machine (from car-core) for all
//! transitions and interprets its actions to perform the actual I/O: list
//! fetches through the [`CarStore`] and debounce timers through the
//! [`Debouncer`].
//!
//! ```text
//! List screen → SyncCoordinator → CarStore → Network
//!                    ↓        ↘
//!        car-core (pure)    Debouncer (search input)
//! ```
//!
//! Every change is published as a [`ListSnapshot`] on a watch channel.
//!
//! # Example
//!
//! ```ignore
//! use carsync_client::{MockCarStore, SyncCoordinator};
//!
//! let coordinator = SyncCoordinator::new(MockCarStore::sample(), Duration::from_millis(300));
//! coordinator.mount().await;
//! coordinator.set_query("porsche").await;
//! let view = coordinator.settled().await;
//! ```

use carsync_core::{Action, Event, ListSnapshot, RequestSeq, SyncMachine, SyncState, Trigger};
use carsync_types::Dataset;
use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use crate::debounce::Debouncer;
use crate::store::CarStore;

/// What happened to the fetch a trigger asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The fetch was the latest and its dataset is now shown.
    Applied {
        /// Number of cars fetched.
        count: usize,
    },
    /// The fetch was the latest and failed; the error is shown.
    Failed {
        /// User-facing error message.
        message: String,
    },
    /// A newer fetch was issued meanwhile; this response was discarded.
    Superseded,
    /// The trigger joined a fetch already in flight.
    Coalesced,
    /// The view was torn down.
    Ignored,
}

struct Inner<S> {
    store: S,
    machine: Mutex<SyncMachine>,
    debouncer: Mutex<Debouncer>,
    snapshots: watch::Sender<ListSnapshot>,
}

/// The list screen's synchronization driver.
pub struct SyncCoordinator<S: CarStore> {
    inner: Arc<Inner<S>>,
}

impl<S: CarStore + 'static> SyncCoordinator<S> {
    /// Create a coordinator over `store`, debouncing search input by `debounce`.
    pub fn new(store: S, debounce: Duration) -> Self {
        let machine = SyncMachine::new();
        let (snapshots, _) = watch::channel(machine.snapshot());
        Self {
            inner: Arc::new(Inner {
                store,
                machine: Mutex::new(machine),
                debouncer: Mutex::new(Debouncer::new(debounce)),
                snapshots,
            }),
        }
    }

    /// The view was created: fetch.
    pub async fn mount(&self) -> FetchOutcome {
        self.refresh(Trigger::Mount).await
    }

    /// The view regained focus: fetch again.
    pub async fn focus(&self) -> FetchOutcome {
        self.refresh(Trigger::Focus).await
    }

    /// Pull-to-refresh: joins an in-flight fetch, otherwise fetches.
    ///
    /// Returns once the fetch it joined or issued has settled.
    pub async fn pull_refresh(&self) -> FetchOutcome {
        self.refresh(Trigger::Pull).await
    }

    /// The user edited the query. The visible set follows after the
    /// debounce delay.
    pub async fn set_query(&self, query: impl Into<String>) {
        self.apply(Event::QueryChanged(query.into())).await;
    }

    /// Discard the view: cancel pending filtering and ignore late results.
    pub async fn teardown(&self) {
        self.apply(Event::TornDown).await;
        debug!("list view torn down");
    }

    /// Watch every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot> {
        self.inner.snapshots.subscribe()
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> ListSnapshot {
        self.inner.snapshots.borrow().clone()
    }

    /// Wait until no fetch is in flight and no query is waiting.
    ///
    /// Resolves immediately once the view is torn down.
    pub async fn settled(&self) -> ListSnapshot {
        let mut rx = self.subscribe();
        let settled = match rx.wait_for(|s| s.settled).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        };
        settled
    }

    /// The authoritative dataset.
    pub async fn dataset(&self) -> Dataset {
        self.inner.machine.lock().await.dataset().clone()
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> SyncState {
        self.inner.machine.lock().await.state().clone()
    }

    /// Get a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.inner.store
    }

    async fn apply(&self, event: Event) -> Step {
        self.inner.apply(event).await
    }

    async fn refresh(&self, trigger: Trigger) -> FetchOutcome {
        let step = self.apply(Event::RefreshRequested(trigger)).await;
        let seq = match step.fetch() {
            Some(seq) => seq,
            None if step.torn_down => return FetchOutcome::Ignored,
            None => {
                debug!(?trigger, "joining in-flight fetch");
                let mut rx = self.subscribe();
                let _ = rx.wait_for(|s| !s.refreshing).await;
                return FetchOutcome::Coalesced;
            }
        };

        debug!(%seq, ?trigger, "fetching car list");
        // The fetch settles on its own task even if this caller is dropped.
        let task = tokio::spawn(Arc::clone(&self.inner).fetch(seq));
        match task.await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(%seq, error = %err, "car list fetch task did not finish");
                self.inner
                    .conclude(seq, Err(format!("Failed to load cars: {err}")))
                    .await
            }
        }
    }
}

impl<S: CarStore + 'static> Inner<S> {
    /// Run `list()` for `seq` and feed the result back through the machine.
    async fn fetch(self: Arc<Self>, seq: RequestSeq) -> FetchOutcome {
        let result = match self.store.list().await {
            Ok(dataset) => Ok(dataset),
            Err(err) => {
                warn!(%seq, error = %err, "car list fetch failed");
                Err(format!("Failed to load cars: {err}"))
            }
        };
        self.conclude(seq, result).await
    }

    async fn conclude(
        self: &Arc<Self>,
        seq: RequestSeq,
        result: Result<Dataset, String>,
    ) -> FetchOutcome {
        let (event, outcome) = match result {
            Ok(dataset) => {
                let count = dataset.len();
                (
                    Event::FetchSucceeded { seq, dataset },
                    FetchOutcome::Applied { count },
                )
            }
            Err(message) => (
                Event::FetchFailed {
                    seq,
                    message: message.clone(),
                },
                FetchOutcome::Failed { message },
            ),
        };

        let step = self.apply(event).await;
        if step.dropped(seq) {
            if step.torn_down {
                FetchOutcome::Ignored
            } else {
                FetchOutcome::Superseded
            }
        } else {
            if let FetchOutcome::Applied { count } = outcome {
                debug!(%seq, count, "applied car list");
            }
            outcome
        }
    }

    /// Feed one event through the machine and carry out its actions.
    ///
    /// The debouncer is locked before the machine so that schedules land in
    /// the same order as the query changes that caused them.
    async fn apply(self: &Arc<Self>, event: Event) -> Step {
        let mut debouncer = self.debouncer.lock().await;
        let mut machine = self.machine.lock().await;
        let actions = machine.handle(event);
        let torn_down = machine.is_torn_down();

        for action in &actions {
            match action {
                Action::Publish => {
                    self.snapshots.send_replace(machine.snapshot());
                }
                Action::ScheduleFilter { query } => {
                    debouncer.schedule(settle_query(Arc::downgrade(self), query.clone()));
                }
                Action::CancelFilter => debouncer.cancel(),
                Action::DropResponse(seq) if torn_down => {
                    debug!(%seq, "ignoring list response after teardown");
                }
                Action::DropResponse(seq) => {
                    warn!(%seq, "discarding superseded list response");
                }
                Action::Fetch(_) => {}
            }
        }

        Step { actions, torn_down }
    }
}

/// Debounced job: apply `query` once input has gone quiet.
fn settle_query<S>(inner: Weak<Inner<S>>, query: String) -> impl Future<Output = ()> + Send + 'static
where
    S: CarStore + 'static,
{
    async move {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        let mut machine = inner.machine.lock().await;
        let actions = machine.handle(Event::QuerySettled(query));
        if actions.contains(&Action::Publish) {
            inner.snapshots.send_replace(machine.snapshot());
        }
    }
}

struct Step {
    actions: Vec<Action>,
    torn_down: bool,
}

impl Step {
    fn fetch(&self) -> Option<RequestSeq> {
        self.actions.iter().find_map(|a| match a {
            Action::Fetch(seq) => Some(*seq),
            _ => None,
        })
    }

    fn dropped(&self, seq: RequestSeq) -> bool {
        self.actions.contains(&Action::DropResponse(seq))
    }
}
