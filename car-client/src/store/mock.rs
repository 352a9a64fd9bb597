//! Mock store for testing.
//!
//! Keeps records in memory, allows scripting list responses with latency,
//! and captures every call for verification.

use super::{CarStore, StoreError};
use async_trait::async_trait;
use carsync_types::{Car, CarFields, CarId, Dataset};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// A call the mock received.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    /// `list()`
    List,
    /// `create(fields)`
    Create(CarFields),
    /// `update(id, fields)`
    Update(CarId, CarFields),
    /// `remove(id)`
    Remove(CarId),
}

/// A scripted `list()` response.
#[derive(Debug)]
struct ScriptedList {
    delay: Duration,
    result: Result<Vec<Car>, StoreError>,
}

/// Mock store for testing.
///
/// Clones share state, so a test can keep one handle while the code under
/// test owns another.
#[derive(Debug, Default)]
pub struct MockCarStore {
    inner: Arc<Mutex<MockCarStoreInner>>,
}

#[derive(Debug, Default)]
struct MockCarStoreInner {
    records: Vec<Car>,
    calls: Vec<StoreCall>,
    list_script: VecDeque<ScriptedList>,
    latency: Duration,
    fail_next_list: Option<StoreError>,
    fail_next_create: Option<StoreError>,
    fail_next_update: Option<StoreError>,
    fail_next_remove: Option<StoreError>,
}

impl MockCarStore {
    /// Create an empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock store holding `cars`.
    pub fn with_cars(cars: Vec<Car>) -> Self {
        let store = Self::new();
        store.lock().records = cars;
        store
    }

    /// Create a mock store seeded with a handful of sample cars.
    pub fn sample() -> Self {
        let seed = [
            ("Porsche", "911 Carrera", 2022, 379, 101200.0),
            ("Ferrari", "F8 Tributo", 2020, 710, 276550.0),
            ("Chevrolet", "Corvette Stingray", 2023, 495, 64500.0),
            ("Toyota", "GR Supra", 2021, 382, 43540.0),
            ("Mazda", "MX-5 Miata", 2019, 181, 26830.0),
        ];
        let cars = seed
            .iter()
            .zip(1u64..)
            .map(|(&(make, model, year, horsepower, price), id)| {
                Car::from_fields(
                    CarId::from(id),
                    &CarFields {
                        make: make.into(),
                        model: model.into(),
                        year,
                        horsepower,
                        price,
                    },
                )
            })
            .collect();
        Self::with_cars(cars)
    }

    // Poisoning only happens if a test already panicked.
    fn lock(&self) -> MutexGuard<'_, MockCarStoreInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Script the next unscripted `list()` to wait `delay` and then return
    /// `result` instead of the stored records.
    ///
    /// Scripts are consumed in call order.
    pub fn queue_list(&self, delay: Duration, result: Result<Vec<Car>, StoreError>) {
        self.lock()
            .list_script
            .push_back(ScriptedList { delay, result });
    }

    /// Delay applied to every unscripted call.
    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = latency;
    }

    /// Cause the next list() to fail with the given error.
    pub fn fail_next_list(&self, error: StoreError) {
        self.lock().fail_next_list = Some(error);
    }

    /// Cause the next create() to fail with the given error.
    pub fn fail_next_create(&self, error: StoreError) {
        self.lock().fail_next_create = Some(error);
    }

    /// Cause the next update() to fail with the given error.
    pub fn fail_next_update(&self, error: StoreError) {
        self.lock().fail_next_update = Some(error);
    }

    /// Cause the next remove() to fail with the given error.
    pub fn fail_next_remove(&self, error: StoreError) {
        self.lock().fail_next_remove = Some(error);
    }

    /// Get the stored records.
    pub fn records(&self) -> Vec<Car> {
        self.lock().records.clone()
    }

    /// Get every call received so far.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Number of `list()` calls received so far.
    pub fn list_calls(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, StoreCall::List))
            .count()
    }

    /// Clear all state (records, calls, scripts, failures).
    pub fn reset(&self) {
        *self.lock() = MockCarStoreInner::default();
    }

    fn next_id(records: &[Car]) -> CarId {
        let max = records.iter().filter_map(|c| c.id.as_number()).max().unwrap_or(0);
        CarId::from(max + 1)
    }
}

impl Clone for MockCarStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

async fn wait(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl CarStore for MockCarStore {
    async fn list(&self) -> Result<Dataset, StoreError> {
        let (delay, result) = {
            let mut inner = self.lock();
            inner.calls.push(StoreCall::List);

            if let Some(scripted) = inner.list_script.pop_front() {
                (scripted.delay, scripted.result)
            } else if let Some(error) = inner.fail_next_list.take() {
                (inner.latency, Err(error))
            } else {
                let mut records = inner.records.clone();
                records.sort_by(|a, b| match (a.id.as_number(), b.id.as_number()) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    _ => a.id.to_string().cmp(&b.id.to_string()),
                });
                (inner.latency, Ok(records))
            }
        };

        wait(delay).await;
        result.map(Dataset::new)
    }

    async fn create(&self, fields: &CarFields) -> Result<Car, StoreError> {
        let (delay, result) = {
            let mut inner = self.lock();
            inner.calls.push(StoreCall::Create(fields.clone()));

            let result = match inner.fail_next_create.take() {
                Some(error) => Err(error),
                None => {
                    let car = Car::from_fields(Self::next_id(&inner.records), fields);
                    inner.records.push(car.clone());
                    Ok(car)
                }
            };
            (inner.latency, result)
        };

        wait(delay).await;
        result
    }

    async fn update(&self, id: &CarId, fields: &CarFields) -> Result<Car, StoreError> {
        let (delay, result) = {
            let mut inner = self.lock();
            inner.calls.push(StoreCall::Update(id.clone(), fields.clone()));

            let result = match inner.fail_next_update.take() {
                Some(error) => Err(error),
                None => match inner.records.iter_mut().find(|c| &c.id == id) {
                    Some(slot) => {
                        *slot = Car::from_fields(id.clone(), fields);
                        Ok(slot.clone())
                    }
                    None => Err(StoreError::Http { status: 404 }),
                },
            };
            (inner.latency, result)
        };

        wait(delay).await;
        result
    }

    async fn remove(&self, id: &CarId) -> Result<(), StoreError> {
        let (delay, result) = {
            let mut inner = self.lock();
            inner.calls.push(StoreCall::Remove(id.clone()));

            let result = match inner.fail_next_remove.take() {
                Some(error) => Err(error),
                None => {
                    let before = inner.records.len();
                    inner.records.retain(|c| &c.id != id);
                    if inner.records.len() < before {
                        Ok(())
                    } else {
                        Err(StoreError::Http { status: 404 })
                    }
                }
            };
            (inner.latency, result)
        };

        wait(delay).await;
        result
    }
}
