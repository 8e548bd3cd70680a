//! End-to-end tests of `HttpComputeService` against an in-process stub of
//! the computation service.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use pagesim_core::{
    AlgorithmId, ClientConfig, ComputeService, HttpComputeService, ServiceError, SimulationRequest,
};
use serde_json::{json, Value};

async fn calculate(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let reference = body["reference_string"].as_str().unwrap_or_default().to_string();
    if reference == "bad" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": "Invalid format"})),
        );
    }
    let frames = body["frames"].as_u64().unwrap_or(0);
    let algorithms = body["algorithms"].clone();
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "results": {
                "FIFO": {
                    "name": "FIFO",
                    "page_faults": 2,
                    "page_fault_rate": 1.0,
                    "history": [
                        {"step": 1, "page": 7, "memory": [7], "fault": true, "replaced": null},
                        {"step": 2, "page": 0, "memory": [7, 0], "fault": true, "replaced": null}
                    ]
                }
            },
            "graph": null,
            "input": {"frames": frames, "reference_string": reference, "total_pages": 2},
            "echo_algorithms": algorithms
        })),
    )
}

async fn random(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let length: usize = params.get("length").and_then(|l| l.parse().ok()).unwrap_or(15);
    let pages: Vec<String> = (0..length).map(|i| (i % 10).to_string()).collect();
    Json(json!({"reference_string": pages.join(" "), "frames": 4}))
}

async fn algorithms() -> Json<Value> {
    Json(json!({
        "fifo": {"name": "FIFO", "description": "First In First Out"},
        "lru": {"name": "LRU", "description": "Least Recently Used"},
        "optimal": {"name": "Optimal", "description": "Look ahead to maximize hits"}
    }))
}

async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn stub_router() -> Router {
    Router::new()
        .route("/api/calculate", post(calculate))
        .route("/api/random", get(random))
        .route("/api/algorithms", get(algorithms))
}

fn broken_router() -> Router {
    Router::new()
        .route(
            "/api/calculate",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route("/api/random", get(|| async { "not json" }))
        .route(
            "/api/algorithms",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        )
}

fn client(base_url: String) -> Arc<HttpComputeService> {
    Arc::new(HttpComputeService::new(&ClientConfig {
        base_url,
        ..ClientConfig::default()
    }))
}

async fn blocking<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap()
}

#[tokio::test]
async fn test_run_simulation_success() {
    let service = client(spawn_stub(stub_router()).await);
    let request = SimulationRequest::new(3, "7 0", vec![AlgorithmId::new("fifo")]).unwrap();

    let response = blocking(move || service.run_simulation(&request)).await.unwrap();
    assert_eq!(response.success, Some(true));
    let fifo = response.results.get("FIFO").unwrap();
    assert_eq!(fifo.history.len(), 2);
    assert!(fifo.history.iter().all(|step| step.fault));
    let input = response.input.as_ref().unwrap();
    assert_eq!(input.frames, Some(3));
    assert_eq!(input.reference_string, "7 0");
    assert_eq!(response.total_steps(), 2);
}

#[tokio::test]
async fn test_business_error_becomes_rejection() {
    let service = client(spawn_stub(stub_router()).await);
    let request = SimulationRequest::new(3, "bad", vec![AlgorithmId::new("lru")]).unwrap();

    let err = blocking(move || service.run_simulation(&request)).await.unwrap_err();
    assert_eq!(err, ServiceError::Rejected("Invalid format".into()));
}

#[tokio::test]
async fn test_random_and_catalog() {
    let service = client(spawn_stub(stub_router()).await);

    let random_service = Arc::clone(&service);
    let random = blocking(move || random_service.fetch_random_input(5)).await.unwrap();
    assert_eq!(random.reference_string, "0 1 2 3 4");
    assert_eq!(random.frames, 4);

    let catalog = blocking(move || service.fetch_algorithm_catalog()).await.unwrap();
    let names: Vec<String> = catalog.entries().into_iter().map(|info| info.name).collect();
    assert_eq!(names, vec!["FIFO", "LRU", "Optimal"]);
}

#[tokio::test]
async fn test_broken_service_errors() {
    let service = client(spawn_stub(broken_router()).await);
    let request = SimulationRequest::new(3, "1 2", vec![AlgorithmId::new("fifo")]).unwrap();

    let simulation_service = Arc::clone(&service);
    let err = blocking(move || simulation_service.run_simulation(&request)).await.unwrap_err();
    assert_eq!(err, ServiceError::Status(500));

    let random_service = Arc::clone(&service);
    let err = blocking(move || random_service.fetch_random_input(3)).await.unwrap_err();
    assert!(matches!(err, ServiceError::Decode(_)));

    let err = blocking(move || service.fetch_algorithm_catalog()).await.unwrap_err();
    assert_eq!(err, ServiceError::Status(503));
}

#[tokio::test]
async fn test_unreachable_service() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let service = client(format!("http://127.0.0.1:{port}"));

    let err = blocking(move || service.fetch_algorithm_catalog()).await.unwrap_err();
    assert!(matches!(err, ServiceError::Transport(_)));
}
