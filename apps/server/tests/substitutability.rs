//! The storage backends must produce identical success/failure outcomes
//! for the same logical sequence of operations. The local backend runs
//! against a scratch directory, the API backend against a real server
//! instance on an ephemeral port, and the hosted backend against a mock
//! of the hosted document service.

mod common;

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use tempfile::TempDir;
use uuid::Uuid;

use debtfolio_core::errors::Error;
use debtfolio_core::plans::{NewPlan, Plan};
use debtfolio_core::storage::EntityStore;
use debtfolio_server::api::app_router;
use debtfolio_server::build_state;
use debtfolio_storage::{ApiStore, HostedStore, LocalStore};

fn sample_plan(name: &str) -> Plan {
    NewPlan {
        id: None,
        name: name.to_string(),
        total_amount: 1_200.0,
        number_of_months: Some(12),
        monthly_payment: 100.0,
        debt_owner: Default::default(),
        is_active: None,
    }
    .into_plan(Utc::now())
}

fn outcome<T>(result: &Result<T, Error>) -> String {
    match result {
        Ok(_) => "ok".to_string(),
        Err(Error::NotFound(_)) => "not-found".to_string(),
        Err(Error::Unauthorized(_)) => "unauthorized".to_string(),
        Err(Error::StorageUnavailable(_)) => "unavailable".to_string(),
        Err(other) => format!("other: {other}"),
    }
}

async fn count(store: &Arc<dyn EntityStore<Plan>>) -> usize {
    store.list().await.map(|plans| plans.len()).unwrap_or_default()
}

/// One logical sequence of save/get/delete/list calls, reduced to its
/// observable outcomes.
async fn run_sequence(store: Arc<dyn EntityStore<Plan>>) -> Vec<String> {
    let mut outcomes = Vec::new();

    let saved = store.save(sample_plan("Car loan")).await;
    outcomes.push(outcome(&saved));
    let saved = saved.expect("initial save must succeed");
    outcomes.push(format!("id-assigned={}", !saved.id.is_empty()));

    let fetched = store.get(&saved.id).await;
    outcomes.push(outcome(&fetched));
    outcomes.push(format!(
        "round-trip={}",
        fetched.as_ref().ok() == Some(&saved)
    ));

    outcomes.push(outcome(&store.get("missing").await));

    let mut ghost = sample_plan("Ghost");
    ghost.id = "does-not-exist".to_string();
    outcomes.push(outcome(&store.save(ghost).await));

    let mut renamed = saved.clone();
    renamed.name = "Car loan refinanced".to_string();
    let updated = store.save(renamed).await;
    outcomes.push(outcome(&updated));
    outcomes.push(format!(
        "renamed={}",
        updated.map(|plan| plan.name).unwrap_or_default()
    ));

    outcomes.push(format!("count={}", count(&store).await));
    outcomes.push(outcome(&store.delete(&saved.id).await));
    outcomes.push(outcome(&store.delete(&saved.id).await));
    outcomes.push(format!("count={}", count(&store).await));

    outcomes
}

async fn spawn_api_backend() -> (String, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = common::test_config(dir.path());
    let state = build_state(&config).unwrap();
    let router = app_router(state, &config);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}/api/v1"), dir)
}

async fn fetch_token(base_url: &str) -> String {
    let response = reqwest::Client::new()
        .post(format!("{base_url}/auth/register"))
        .json(&json!({ "email": "store@example.com", "password": "correct horse" }))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    body["data"]["accessToken"].as_str().unwrap().to_string()
}

type Records = Arc<Mutex<Vec<Value>>>;

async fn hosted_query(State(records): State<Records>, Json(query): Json<Value>) -> Json<Value> {
    let records = records.lock().unwrap();
    let matches: Vec<Value> = match query["id"].as_str() {
        Some(id) => records.iter().filter(|r| r["id"] == id).cloned().collect(),
        None => records.clone(),
    };
    Json(json!({ "records": matches }))
}

async fn hosted_insert(State(records): State<Records>, Json(mut body): Json<Value>) -> Json<Value> {
    let mut record = body["record"].take();
    record["id"] = json!(Uuid::new_v4().to_string());
    records.lock().unwrap().push(record.clone());
    Json(json!({ "record": record }))
}

async fn hosted_update(
    State(records): State<Records>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let id = body["id"].as_str().unwrap_or_default().to_string();
    let mut records = records.lock().unwrap();
    match records.iter_mut().find(|r| r["id"] == id.as_str()) {
        Some(slot) => {
            let mut record = body["record"].clone();
            record["id"] = json!(id);
            *slot = record.clone();
            Ok(Json(json!({ "record": record })))
        }
        None => Err(StatusCode::NOT_FOUND),
    }
}

async fn hosted_delete(
    State(records): State<Records>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let id = body["id"].as_str().unwrap_or_default().to_string();
    let mut records = records.lock().unwrap();
    match records.iter().position(|r| r["id"] == id.as_str()) {
        Some(position) => {
            records.remove(position);
            Ok(Json(json!({})))
        }
        None => Err(StatusCode::NOT_FOUND),
    }
}

async fn spawn_hosted_service() -> String {
    let records: Records = Arc::default();
    let router = Router::new()
        .route("/v1/records/query", post(hosted_query))
        .route("/v1/records/insert", post(hosted_insert))
        .route("/v1/records/update", post(hosted_update))
        .route("/v1/records/delete", post(hosted_delete))
        .with_state(records);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn backends_produce_identical_outcomes() {
    let dir = TempDir::new().unwrap();
    let local: Arc<dyn EntityStore<Plan>> = Arc::new(LocalStore::new(dir.path()));
    let local_outcomes = run_sequence(local).await;

    let (base_url, _data_dir) = spawn_api_backend().await;
    let token = fetch_token(&base_url).await;
    let api: Arc<dyn EntityStore<Plan>> = Arc::new(ApiStore::new(&base_url, &token).unwrap());
    let api_outcomes = run_sequence(api).await;

    let hosted_url = spawn_hosted_service().await;
    let hosted: Arc<dyn EntityStore<Plan>> =
        Arc::new(HostedStore::new(&hosted_url, "test-key").unwrap());
    let hosted_outcomes = run_sequence(hosted).await;

    assert_eq!(local_outcomes, api_outcomes);
    assert_eq!(local_outcomes, hosted_outcomes);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn api_backend_translates_auth_and_transport_failures() {
    let (base_url, _data_dir) = spawn_api_backend().await;

    let store: ApiStore<Plan> = ApiStore::new(&base_url, "tampered.token.value").unwrap();
    assert!(matches!(
        store.list().await.unwrap_err(),
        Error::Unauthorized(_)
    ));

    // Nothing listens on port 9; the failure is a storage outage, not an
    // entity-level error.
    let unreachable: ApiStore<Plan> = ApiStore::new("http://127.0.0.1:9/api/v1", "token").unwrap();
    assert!(matches!(
        unreachable.list().await.unwrap_err(),
        Error::StorageUnavailable(_)
    ));
}
