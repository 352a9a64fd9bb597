//! HttpCarStore integration tests.
//!
//! Starts an axum fake of the car collection and exercises it over HTTP.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use carsync_client::{CarStore, HttpCarStore, StoreConfig, StoreError};
use carsync_types::{CarDraft, CarFields, CarId};
use serde_json::{json, Value};

#[derive(Default)]
struct Fake {
    records: Vec<Value>,
    requests: Vec<Recorded>,
    fail_status: Option<u16>,
    list_body: Option<Value>,
    mutation_body: Option<Value>,
}

#[derive(Debug, Clone)]
struct Recorded {
    method: &'static str,
    path: String,
    query: HashMap<String, String>,
    cache_control: Option<String>,
    body: Option<Value>,
}

type Shared = Arc<Mutex<Fake>>;

fn record(
    fake: &mut Fake,
    method: &'static str,
    path: String,
    query: HashMap<String, String>,
    headers: &HeaderMap,
    body: Option<Value>,
) {
    fake.requests.push(Recorded {
        method,
        path,
        query,
        cache_control: headers
            .get("cache-control")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
}

fn failure(fake: &Fake) -> Option<Response> {
    fake.fail_status.map(|status| {
        let code = StatusCode::from_u16(status).unwrap();
        (code, Json(json!({"error": "boom"}))).into_response()
    })
}

async fn list(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let mut fake = state.lock().unwrap();
    record(&mut fake, "GET", "/cars".into(), query, &headers, None);
    if let Some(resp) = failure(&fake) {
        return resp;
    }
    if let Some(body) = fake.list_body.clone() {
        return Json(body).into_response();
    }
    let mut records = fake.records.clone();
    records.sort_by_key(|r| r["id"].as_u64());
    Json(Value::Array(records)).into_response()
}

async fn create(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut fake = state.lock().unwrap();
    record(&mut fake, "POST", "/cars".into(), HashMap::new(), &headers, Some(body.clone()));
    if let Some(resp) = failure(&fake) {
        return resp;
    }
    if let Some(garbage) = fake.mutation_body.clone() {
        return (StatusCode::CREATED, Json(garbage)).into_response();
    }
    let next = fake
        .records
        .iter()
        .filter_map(|r| r["id"].as_u64())
        .max()
        .unwrap_or(0)
        + 1;
    let mut created = body;
    created["id"] = json!(next);
    fake.records.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn update(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut fake = state.lock().unwrap();
    record(&mut fake, "PUT", format!("/cars/{id}"), HashMap::new(), &headers, Some(body.clone()));
    if let Some(resp) = failure(&fake) {
        return resp;
    }
    match fake.records.iter_mut().find(|r| r["id"].to_string() == id) {
        Some(slot) => {
            *slot = body.clone();
            Json(body).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn remove(State(state): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> Response {
    let mut fake = state.lock().unwrap();
    record(&mut fake, "DELETE", format!("/cars/{id}"), HashMap::new(), &headers, None);
    if let Some(resp) = failure(&fake) {
        return resp;
    }
    let before = fake.records.len();
    fake.records.retain(|r| r["id"].to_string() != id);
    if fake.records.len() < before {
        Json(json!({})).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({}))).into_response()
    }
}

/// Bind to port 0 and return the base URL plus shared server state.
async fn start_server(records: Vec<Value>) -> (String, Shared) {
    let state: Shared = Arc::new(Mutex::new(Fake {
        records,
        ..Fake::default()
    }));
    let app = Router::new()
        .route("/cars", get(list).post(create))
        .route("/cars/:id", axum::routing::put(update).delete(remove))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

fn store(base: &str) -> HttpCarStore {
    HttpCarStore::new(StoreConfig::new(base)).unwrap()
}

fn seed() -> Vec<Value> {
    vec![
        json!({"id": 2, "make": "Ferrari", "model": "F8 Tributo", "year": 2020, "horsepower": 710, "price": 276550}),
        json!({"id": 1, "make": "Porsche", "model": "911", "year": 2022, "horsepower": 379, "price": 101200}),
    ]
}

fn fields(make: &str, model: &str) -> CarFields {
    CarDraft {
        make: make.into(),
        model: model.into(),
        year: "2021".into(),
        horsepower: "562".into(),
        price: "142700".into(),
    }
    .normalize()
    .unwrap()
}

fn last_request(state: &Shared) -> Recorded {
    state.lock().unwrap().requests.last().cloned().unwrap()
}

#[tokio::test]
async fn list_requests_sorted_unbounded_uncached() {
    let (base, state) = start_server(seed()).await;

    let cars = store(&base).list().await.unwrap();

    assert_eq!(cars.len(), 2);
    assert_eq!(cars[0].make, "Porsche");
    assert_eq!(cars[1].make, "Ferrari");

    let req = last_request(&state);
    assert_eq!(req.method, "GET");
    assert_eq!(req.query.get("_sort").map(String::as_str), Some("id"));
    assert_eq!(req.query.get("_order").map(String::as_str), Some("asc"));
    assert_eq!(req.query.get("_limit").map(String::as_str), Some("9999"));
    assert_eq!(req.cache_control.as_deref(), Some("no-store"));
}

#[tokio::test]
async fn list_limit_is_configurable() {
    let (base, state) = start_server(seed()).await;
    let config = StoreConfig {
        list_limit: 50,
        ..StoreConfig::new(&base)
    };

    HttpCarStore::new(config).unwrap().list().await.unwrap();

    assert_eq!(
        last_request(&state).query.get("_limit").map(String::as_str),
        Some("50")
    );
}

#[tokio::test]
async fn create_posts_fields_without_id() {
    let (base, state) = start_server(seed()).await;

    let car = store(&base).create(&fields("Audi", "R8")).await.unwrap();

    assert_eq!(car.id, CarId::from(3u64));
    assert_eq!(car.model, "R8");
    let req = last_request(&state);
    assert_eq!(req.method, "POST");
    assert_eq!(
        req.body,
        Some(json!({"make": "Audi", "model": "R8", "year": 2021, "horsepower": 562, "price": 142700}))
    );
}

#[tokio::test]
async fn update_puts_id_with_every_field() {
    let (base, state) = start_server(seed()).await;
    let s = store(&base);

    let car = s.update(&CarId::from(2u64), &fields("Ferrari", "296 GTB")).await.unwrap();
    assert_eq!(car.model, "296 GTB");

    let req = last_request(&state);
    assert_eq!(req.method, "PUT");
    assert_eq!(req.path, "/cars/2");
    let body = req.body.unwrap();
    assert_eq!(body["id"], json!(2));
    for key in ["make", "model", "year", "horsepower", "price"] {
        assert!(body.get(key).is_some(), "missing {key}");
    }

    let cars = s.list().await.unwrap();
    assert_eq!(cars[1].model, "296 GTB");
}

#[tokio::test]
async fn remove_deletes_record() {
    let (base, state) = start_server(seed()).await;
    let s = store(&base);

    s.remove(&CarId::from(1u64)).await.unwrap();
    assert_eq!(last_request(&state).path, "/cars/1");

    let cars = s.list().await.unwrap();
    assert_eq!(cars.len(), 1);
    assert_eq!(cars[0].make, "Ferrari");
}

#[tokio::test]
async fn non_success_status_is_http_error() {
    let (base, state) = start_server(seed()).await;
    state.lock().unwrap().fail_status = Some(500);
    let s = store(&base);

    assert_eq!(s.list().await.unwrap_err(), StoreError::Http { status: 500 });
    assert_eq!(
        s.create(&fields("A", "B")).await.unwrap_err(),
        StoreError::Http { status: 500 }
    );
    assert_eq!(
        s.remove(&CarId::from(1u64)).await.unwrap_err(),
        StoreError::Http { status: 500 }
    );
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let (base, _state) = start_server(seed()).await;

    let err = store(&base)
        .update(&CarId::from(42u64), &fields("A", "B"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn non_array_list_is_empty() {
    let (base, state) = start_server(seed()).await;
    state.lock().unwrap().list_body = Some(json!({"cars": []}));

    assert!(store(&base).list().await.unwrap().is_empty());
}

#[tokio::test]
async fn non_car_elements_are_skipped() {
    let (base, state) = start_server(seed()).await;
    state.lock().unwrap().list_body = Some(json!([
        {"id": 1, "make": "Porsche", "model": "911"},
        "junk",
        {"make": "no id"}
    ]));

    let cars = store(&base).list().await.unwrap();
    assert_eq!(cars.len(), 1);
}

#[tokio::test]
async fn non_car_mutation_body_is_malformed() {
    let (base, state) = start_server(seed()).await;
    state.lock().unwrap().mutation_body = Some(json!("ok"));

    let err = store(&base).create(&fields("A", "B")).await.unwrap_err();
    assert!(matches!(err, StoreError::Malformed(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = store(&format!("http://{addr}")).list().await.unwrap_err();
    assert!(matches!(err, StoreError::Network(_)), "got {err:?}");
}
