//! Remote collection abstraction for carsync.
//!
//! This module provides a pluggable store layer that abstracts where the
//! car collection lives (a JSON REST endpoint, or an in-memory mock for
//! testing and demos).
//!
//! # Design
//!
//! The store trait is async and stateless from the caller's view:
//! - `list()` fetches the complete collection, sorted by id
//! - `create()` adds a record and returns it with its assigned id
//! - `update()` replaces every field of an existing record
//! - `remove()` deletes a record
//!
//! No retries happen at this layer.
//!
//! # Example
//!
//! ```ignore
//! let store = MockCarStore::sample();
//! let cars = store.list().await?;
//! let created = store.create(&draft.normalize()?).await?;
//! store.remove(&created.id).await?;
//! ```

mod http;
mod mock;

pub use http::{HttpCarStore, StoreConfig, DEFAULT_BASE_URL, DEFAULT_LIST_LIMIT};
pub use mock::{MockCarStore, StoreCall};

use async_trait::async_trait;
use carsync_types::{Car, CarFields, CarId, Dataset};
use thiserror::Error;

/// Store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The endpoint could not be reached (refused, timed out, reset).
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status.
    #[error("HTTP {status}")]
    Http {
        /// Response status code.
        status: u16,
    },

    /// A create or update response was not a car record.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The configured base URL cannot address the collection.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl StoreError {
    /// Status code for [`StoreError::Http`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => StoreError::Http {
                status: status.as_u16(),
            },
            None => StoreError::Network(e.to_string()),
        }
    }
}

/// Store trait for the remote car collection.
///
/// Implementations handle the underlying transport (HTTP, mock, etc).
#[async_trait]
pub trait CarStore: Send + Sync {
    /// Fetch the whole collection in ascending id order.
    ///
    /// A response that is not a list is treated as an empty collection.
    async fn list(&self) -> Result<Dataset, StoreError>;

    /// Create a record. Returns it as stored, with its assigned id.
    async fn create(&self, fields: &CarFields) -> Result<Car, StoreError>;

    /// Replace every field of the record `id`.
    async fn update(&self, id: &CarId, fields: &CarFields) -> Result<Car, StoreError>;

    /// Delete the record `id`.
    async fn remove(&self, id: &CarId) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: CarStore + ?Sized> CarStore for std::sync::Arc<S> {
    async fn list(&self) -> Result<Dataset, StoreError> {
        (**self).list().await
    }

    async fn create(&self, fields: &CarFields) -> Result<Car, StoreError> {
        (**self).create(fields).await
    }

    async fn update(&self, id: &CarId, fields: &CarFields) -> Result<Car, StoreError> {
        (**self).update(id, fields).await
    }

    async fn remove(&self, id: &CarId) -> Result<(), StoreError> {
        (**self).remove(id).await
    }
}
