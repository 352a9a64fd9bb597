//! MutationWorkflow - create, update and delete from the car form.
//!
//! Every mutation has the same shape:
//!
//! ```text
//! validate → store call → notify → navigator.go_back() → busy cleared
//!                 ↘ failure → notify, state untouched
//! ```
//!
//! The workflow never refetches. Going back returns focus to the list,
//! and the list's focus transition refetches.

use async_trait::async_trait;
use carsync_types::{Car, CarDraft, CarId, ValidationError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::store::{CarStore, StoreError};

/// Prompt shown before deleting.
pub const DELETE_PROMPT: &str = "Delete this car?";

/// Mutation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// The draft was rejected locally; nothing was sent.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The store rejected or never received the request.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Another mutation is still running.
    #[error("another change is in progress")]
    Busy,
}

/// A short user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Heading, e.g. `Success`.
    pub title: String,
    /// Body, e.g. `Car created`.
    pub message: String,
}

impl Notice {
    /// Create a notice.
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Shows notices to the user.
pub trait Notifier: Send + Sync {
    /// Show `notice`.
    fn notify(&self, notice: Notice);
}

/// Navigation capability handed in by the host screen.
pub trait Navigator: Send + Sync {
    /// Leave the form and return to the previous screen.
    fn go_back(&self);
}

/// Asks the user to confirm a destructive action.
#[async_trait]
pub trait Confirm: Send + Sync {
    /// Return `true` if the user accepted `prompt`.
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record was removed.
    Deleted,
    /// The user declined the confirmation; nothing happened.
    Cancelled,
}

/// Runs form mutations against a store.
pub struct MutationWorkflow<S: CarStore> {
    store: S,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    confirm: Arc<dyn Confirm>,
    busy: AtomicBool,
}

/// Clears the busy flag when dropped.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S: CarStore> MutationWorkflow<S> {
    /// Create a workflow.
    pub fn new(
        store: S,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        confirm: Arc<dyn Confirm>,
    ) -> Self {
        Self {
            store,
            notifier,
            navigator,
            confirm,
            busy: AtomicBool::new(false),
        }
    }

    /// Whether a mutation is running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Validate `draft` and create a new record.
    pub async fn create(&self, draft: &CarDraft) -> Result<Car, MutationError> {
        let _busy = self.begin()?;
        let fields = self.validate(draft)?;

        match self.store.create(&fields).await {
            Ok(car) => {
                info!(id = %car.id, make = %car.make, model = %car.model, "car created");
                self.succeed(Notice::new("Success", "Car created"));
                Ok(car)
            }
            Err(e) => Err(self.fail("create", "Create failed", e)),
        }
    }

    /// Validate `draft` and replace every field of record `id`.
    pub async fn update(&self, id: &CarId, draft: &CarDraft) -> Result<Car, MutationError> {
        let _busy = self.begin()?;
        let fields = self.validate(draft)?;

        match self.store.update(id, &fields).await {
            Ok(car) => {
                info!(%id, "car updated");
                self.succeed(Notice::new("Success", "Updated"));
                Ok(car)
            }
            Err(e) => Err(self.fail("update", "Update failed", e)),
        }
    }

    /// Ask for confirmation, then delete record `id`.
    pub async fn delete(&self, id: &CarId) -> Result<DeleteOutcome, MutationError> {
        if self.is_busy() {
            return Err(MutationError::Busy);
        }
        if !self.confirm.confirm(DELETE_PROMPT).await {
            return Ok(DeleteOutcome::Cancelled);
        }
        let _busy = self.begin()?;

        match self.store.remove(id).await {
            Ok(()) => {
                info!(%id, "car deleted");
                self.succeed(Notice::new("Deleted", "Car removed"));
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) => Err(self.fail("delete", "Delete failed", e)),
        }
    }

    fn begin(&self) -> Result<BusyGuard<'_>, MutationError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| MutationError::Busy)?;
        Ok(BusyGuard(&self.busy))
    }

    fn validate(&self, draft: &CarDraft) -> Result<carsync_types::CarFields, MutationError> {
        draft.normalize().map_err(|e| {
            self.notifier.notify(Notice::new("Invalid", e.to_string()));
            MutationError::Validation(e)
        })
    }

    fn succeed(&self, notice: Notice) {
        self.notifier.notify(notice);
        self.navigator.go_back();
    }

    fn fail(&self, op: &str, message: &str, error: StoreError) -> MutationError {
        warn!(op, error = %error, "car mutation failed");
        self.notifier.notify(Notice::new("Error", message));
        MutationError::Store(error)
    }
}
