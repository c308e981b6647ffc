use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use workout_tracker::{
    config::Config,
    error::StoreError,
    state::AppState,
    store::{KeyValueStore, MemoryStore, UNREADABLE_WORKOUTS_KEY, WORKOUTS_KEY},
};

fn app_with(store: impl KeyValueStore + 'static) -> Router {
    let config = Config::from_env();
    let state = AppState::with_store(config, Arc::new(store));
    workout_tracker::app(state)
}

/// Refuses to write the unreadable-collection copy.
#[derive(Clone)]
struct NoBackupStore(MemoryStore);

impl KeyValueStore for NoBackupStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.0.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if key == UNREADABLE_WORKOUTS_KEY {
            return Err(StoreError::Io {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            });
        }
        self.0.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.0.remove(key)
    }
}

fn app() -> Router {
    app_with(MemoryStore::new())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri).method(method);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}

fn run() -> Value {
    json!({
        "type": "running",
        "coords": [40.7, -74.0],
        "distance": "5.2",
        "duration": "24",
        "cadence": "178"
    })
}

fn ride() -> Value {
    json!({
        "type": "cycling",
        "coords": [40.7, -74.0],
        "distance": 20,
        "duration": 60,
        "elevation": 300
    })
}

#[tokio::test]
async fn create_running_workout_returns_view_with_pace() {
    let app = app();
    let (status, body) = send(&app, "POST", "/api/workouts", Some(run())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "running");
    assert_eq!(body["popup_class"], "running-popup");
    assert_eq!(body["cadence"], 178.0);
    assert_eq!(body["clicks"], 0);
    let pace = body["pace"].as_f64().expect("pace");
    assert!((pace - 24.0 / 5.2).abs() < 1e-9);
    assert_eq!(body["metric_display"], "4.6 min/km");
    let description = body["description"].as_str().expect("description");
    assert!(description.starts_with("Running on "));
    assert!(body["label"].as_str().expect("label").ends_with(description));
}

#[tokio::test]
async fn create_cycling_workout_returns_speed() {
    let app = app();
    let (status, body) = send(&app, "POST", "/api/workouts", Some(ride())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "cycling");
    assert_eq!(body["speed"], 20.0);
    assert_eq!(body["elevation"], 300.0);
    assert_eq!(body["metric_display"], "20.0 km/h");
}

#[tokio::test]
async fn invalid_numbers_are_rejected_with_user_message() {
    let app = app();
    let cases = [
        json!({"type": "running", "coords": [1.0, 1.0], "distance": 0, "duration": 10, "cadence": 150}),
        json!({"type": "cycling", "coords": [1.0, 1.0], "distance": 0, "duration": 10, "elevation": 5}),
        json!({"type": "running", "coords": [1.0, 1.0], "distance": "abc", "duration": 10, "cadence": 150}),
        json!({"type": "running", "coords": [1.0, 1.0], "distance": 5, "duration": -3, "cadence": 150}),
        json!({"type": "running", "coords": [1.0, 1.0], "distance": 5, "duration": 10}),
        json!({"type": "cycling", "coords": [1.0, 1.0], "distance": "Infinity", "duration": 10, "elevation": 5}),
    ];

    for case in cases {
        let (status, body) = send(&app, "POST", "/api/workouts", Some(case.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{case}");
        assert_eq!(body["error"], "Inputs have to be positive numbers!", "{case}");
    }

    let (_, list) = send(&app, "GET", "/api/workouts", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn unknown_type_is_rejected() {
    let app = app();
    let body = json!({"type": "swimming", "coords": [1.0, 1.0], "distance": 1, "duration": 1});
    let (status, body) = send(&app, "POST", "/api/workouts", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown workout type: swimming");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = app();
    let (status, _) = send(
        &app,
        "POST",
        "/api/workouts",
        Some(json!({"type": "running", "distance": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_keeps_insertion_order_and_map_has_markers() {
    let app = app();
    send(&app, "POST", "/api/workouts", Some(run())).await;
    send(&app, "POST", "/api/workouts", Some(ride())).await;

    let (status, list) = send(&app, "GET", "/api/workouts", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().expect("array");
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["type"], "running");
    assert_eq!(list[1]["type"], "cycling");

    let (status, map) = send(&app, "GET", "/api/map", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(map["zoom"], 13);
    assert_eq!(map["markers"].as_array().expect("markers").len(), 2);
    assert_eq!(map["markers"][1]["popup_class"], "cycling-popup");
    assert_eq!(map["markers"][0]["coords"], json!([40.7, -74.0]));
}

#[tokio::test]
async fn click_and_locate_workout() {
    let app = app();
    let (_, created) = send(&app, "POST", "/api/workouts", Some(ride())).await;
    let id = created["id"].as_str().expect("id").to_string();

    let (status, clicked) = send(&app, "POST", &format!("/api/workouts/{id}/click"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(clicked["clicks"], 1);

    let (_, fetched) = send(&app, "GET", &format!("/api/workouts/{id}"), None).await;
    assert_eq!(fetched["clicks"], 1);
    assert_eq!(fetched["description"], created["description"]);

    let (status, located) = send(&app, "GET", &format!("/api/workouts/{id}/locate"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(located["coords"], json!([40.7, -74.0]));
    assert_eq!(located["zoom"], 13);
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let app = app();
    let missing = uuid::Uuid::new_v4();
    let (status, _) = send(&app, "GET", &format!("/api/workouts/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", &format!("/api/workouts/{missing}/click"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/workouts/12345/locate", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn workouts_are_persisted_and_restored() {
    let store = MemoryStore::new();
    let first = app_with(store.clone());
    send(&first, "POST", "/api/workouts", Some(run())).await;
    send(&first, "POST", "/api/workouts", Some(ride())).await;

    let stored = store.get(WORKOUTS_KEY).expect("get").expect("stored value");
    let stored: Value = serde_json::from_str(&stored).expect("stored json");
    assert_eq!(stored.as_array().expect("array").len(), 2);
    assert_eq!(stored[0]["type"], "running");

    let second = app_with(store);
    let (_, list) = send(&second, "GET", "/api/workouts", None).await;
    assert_eq!(list.as_array().expect("array").len(), 2);
    assert_eq!(list[1]["speed"], 20.0);
}

#[tokio::test]
async fn reset_clears_store_and_memory() {
    let store = MemoryStore::new();
    let app = app_with(store.clone());
    send(&app, "POST", "/api/workouts", Some(run())).await;

    let (status, _) = send(&app, "DELETE", "/api/workouts", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(store.get(WORKOUTS_KEY).expect("get").is_none());

    let (_, list) = send(&app, "GET", "/api/workouts", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn overflowing_ride_is_rejected_and_history_survives_restart() {
    let store = MemoryStore::new();
    let first = app_with(store.clone());
    send(&first, "POST", "/api/workouts", Some(run())).await;
    send(&first, "POST", "/api/workouts", Some(ride())).await;

    let overflow = json!({
        "type": "cycling",
        "coords": [40.7, -74.0],
        "distance": 1e300,
        "duration": 1e-10,
        "elevation": 0
    });
    let (status, body) = send(&first, "POST", "/api/workouts", Some(overflow)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Inputs have to be positive numbers!");

    let second = app_with(store.clone());
    send(&second, "POST", "/api/workouts", Some(run())).await;
    let (_, list) = send(&second, "GET", "/api/workouts", None).await;
    assert_eq!(list.as_array().expect("array").len(), 3);
}

#[tokio::test]
async fn unreadable_collection_is_backed_up_before_overwrite() {
    let store = MemoryStore::new();
    store.set(WORKOUTS_KEY, "{not an array").expect("set");

    let app = app_with(store.clone());
    let (status, _) = send(&app, "POST", "/api/workouts", Some(run())).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(
        store.get(UNREADABLE_WORKOUTS_KEY).expect("get").as_deref(),
        Some("{not an array")
    );
}

#[tokio::test]
async fn writes_are_refused_until_reset_when_backup_fails() {
    let memory = MemoryStore::new();
    memory.set(WORKOUTS_KEY, "{not an array").expect("set");
    let app = app_with(NoBackupStore(memory.clone()));

    let (status, _) = send(&app, "POST", "/api/workouts", Some(run())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        memory.get(WORKOUTS_KEY).expect("get").as_deref(),
        Some("{not an array")
    );

    let (status, _) = send(&app, "DELETE", "/api/workouts", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "POST", "/api/workouts", Some(run())).await;
    assert_eq!(status, StatusCode::OK);
}
