//! HTTP/JSON store backed by a REST collection endpoint.
//!
//! Speaks the `json-server` dialect:
//! - `GET    {base}/cars?_sort=id&_order=asc&_limit=N`
//! - `POST   {base}/cars`
//! - `PUT    {base}/cars/{id}` (body carries the id and every field)
//! - `DELETE {base}/cars/{id}`

use async_trait::async_trait;
use carsync_types::{Car, CarFields, CarId, Dataset};
use reqwest::header::CACHE_CONTROL;
use reqwest::{Response, Url};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CarStore, StoreError};

/// Default collection endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Default `_limit` for list requests (effectively unbounded).
pub const DEFAULT_LIST_LIMIT: u32 = 9999;

/// Where the collection lives and how to talk to it.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root URL; `/cars` is appended.
    pub base_url: String,
    /// `_limit` sent with every list request.
    pub list_limit: u32,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            list_limit: DEFAULT_LIST_LIMIT,
            timeout: Duration::from_secs(10),
        }
    }
}

impl StoreConfig {
    /// Create a config for `base_url` with default limit and timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Body for a full replace: the id travels with every field.
#[derive(Serialize)]
struct ReplaceBody<'a> {
    id: &'a CarId,
    #[serde(flatten)]
    fields: &'a CarFields,
}

/// Client for the REST car collection.
#[derive(Debug, Clone)]
pub struct HttpCarStore {
    collection: Url,
    list_limit: u32,
    http: reqwest::Client,
}

impl HttpCarStore {
    /// Create a store for the configured endpoint.
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let mut collection = Url::parse(&config.base_url)
            .map_err(|e| StoreError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;
        collection
            .path_segments_mut()
            .map_err(|_| StoreError::InvalidBaseUrl(config.base_url.clone()))?
            .pop_if_empty()
            .push("cars");

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Ok(Self {
            collection,
            list_limit: config.list_limit,
            http,
        })
    }

    /// URL of the collection (`{base}/cars`).
    pub fn collection_url(&self) -> &Url {
        &self.collection
    }

    /// URL of one record (`{base}/cars/{id}`), with the id path-escaped.
    pub fn record_url(&self, id: &CarId) -> Url {
        let mut url = self.collection.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(&id.to_string());
        }
        url
    }

    /// URL of the sorted, unbounded list request.
    pub fn list_url(&self) -> Url {
        let mut url = self.collection.clone();
        url.query_pairs_mut()
            .append_pair("_sort", "id")
            .append_pair("_order", "asc")
            .append_pair("_limit", &self.list_limit.to_string());
        url
    }
}

/// Map non-success statuses to [`StoreError::Http`].
fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(StoreError::Http {
            status: status.as_u16(),
        })
    }
}

async fn read_car(response: Response) -> Result<Car, StoreError> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| StoreError::Malformed(e.to_string()))
}

/// Decode a list body leniently.
///
/// Anything that is not a JSON array yields an empty dataset; elements that
/// are not car records are skipped.
pub(crate) fn decode_list(body: &[u8]) -> Dataset {
    let items = match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(other) => {
            warn!(kind = json_kind(&other), "list response is not an array, treating as empty");
            return Dataset::empty();
        }
        Err(e) => {
            warn!(error = %e, "list response is not JSON, treating as empty");
            return Dataset::empty();
        }
    };

    let total = items.len();
    let cars: Vec<Car> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if cars.len() < total {
        warn!(skipped = total - cars.len(), "skipped list elements that are not cars");
    }
    Dataset::new(cars)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[async_trait]
impl CarStore for HttpCarStore {
    async fn list(&self) -> Result<Dataset, StoreError> {
        let url = self.list_url();
        debug!(%url, "GET list");
        let response = self
            .http
            .get(url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;
        let body = check_status(response)?.bytes().await?;
        Ok(decode_list(&body))
    }

    async fn create(&self, fields: &CarFields) -> Result<Car, StoreError> {
        debug!(make = %fields.make, model = %fields.model, "POST car");
        let response = self
            .http
            .post(self.collection.clone())
            .json(fields)
            .send()
            .await?;
        read_car(check_status(response)?).await
    }

    async fn update(&self, id: &CarId, fields: &CarFields) -> Result<Car, StoreError> {
        debug!(%id, "PUT car");
        let response = self
            .http
            .put(self.record_url(id))
            .json(&ReplaceBody { id, fields })
            .send()
            .await?;
        read_car(check_status(response)?).await
    }

    async fn remove(&self, id: &CarId) -> Result<(), StoreError> {
        debug!(%id, "DELETE car");
        let response = self.http.delete(self.record_url(id)).send().await?;
        check_status(response)?;
        Ok(())
    }
}
