//! # car-client
//!
//! Client library for carsync: keeps a searchable list of cars in step
//! with a remote REST collection.
//!
//! ## Features
//!
//! - **Store Abstraction**: Pluggable remote collection (HTTP, mock)
//! - **Sequence-Gated Refresh**: Late responses never overwrite newer ones
//! - **Debounced Search**: Local filtering once typing goes quiet
//! - **Pure State Machine**: Uses car-core for side-effect-free logic
//!
//! ## Example
//!
//! ```ignore
//! use carsync_client::{ClientConfig, HttpCarStore, SyncCoordinator};
//!
//! let config = ClientConfig::default();
//! let store = HttpCarStore::new(config.store_config())?;
//! let list = SyncCoordinator::new(store, config.debounce());
//!
//! list.mount().await;
//! list.set_query("porsche").await;
//! let view = list.settled().await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod coordinator;
pub mod debounce;
pub mod mutation;
pub mod store;

pub use config::{ClientConfig, ConfigError};
pub use coordinator::{FetchOutcome, SyncCoordinator};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use mutation::{
    Confirm, DeleteOutcome, MutationError, MutationWorkflow, Navigator, Notice, Notifier,
    DELETE_PROMPT,
};
pub use store::{
    CarStore, HttpCarStore, MockCarStore, StoreCall, StoreConfig, StoreError, DEFAULT_BASE_URL,
    DEFAULT_LIST_LIMIT,
};
