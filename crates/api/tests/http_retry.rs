//! Retry, error-mapping and cancellation behavior of the HTTP client,
//! exercised against a local axum stand-in for the backend.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use assert_matches::assert_matches;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use vidflow_api::http::RequestSpec;
use vidflow_api::{ApiConfig, ApiError, HttpClient};

async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn client_for(base_url: &str) -> HttpClient {
    HttpClient::new(&ApiConfig::with_base_url(base_url))
}

#[tokio::test]
async fn retries_server_errors_with_exponential_backoff() {
    let hits = Arc::new(AtomicU32::new(0));
    let router = Router::new()
        .route(
            "/api/flaky",
            get(|State(hits): State<Arc<AtomicU32>>| async move {
                let attempt = hits.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        Json(json!({"detail": "warming up"})),
                    )
                } else {
                    (StatusCode::OK, Json(json!({"ok": true})))
                }
            }),
        )
        .with_state(hits.clone());
    let base_url = spawn_backend(router).await;
    let client = client_for(&base_url);

    let started = Instant::now();
    let value: serde_json::Value = client
        .request(RequestSpec::get("/api/flaky").retries(2))
        .await
        .unwrap();

    assert_eq!(value["ok"], true);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    // Two backoff waits: 1000ms then 2000ms.
    assert!(started.elapsed() >= Duration::from_millis(2900));
}

#[tokio::test]
async fn client_errors_fail_immediately_with_backend_detail() {
    let hits = Arc::new(AtomicU32::new(0));
    let router = Router::new()
        .route(
            "/api/downloads/99",
            get(|State(hits): State<Arc<AtomicU32>>| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({"detail": "Download not found"})),
                )
            }),
        )
        .with_state(hits.clone());
    let base_url = spawn_backend(router).await;
    let client = client_for(&base_url);

    let err = client
        .send(RequestSpec::get("/api/downloads/99").retries(3))
        .await
        .unwrap_err();

    assert_matches!(err, ApiError::Client { status: 404, ref detail } if detail == "Download not found");
    assert_eq!(hits.load(Ordering::SeqCst), 1, "4xx must not be retried");
}

#[tokio::test]
async fn stale_revision_maps_to_conflict() {
    let router = Router::new().route(
        "/api/workflows/1",
        axum::routing::put(|| async {
            (
                StatusCode::CONFLICT,
                Json(json!({"detail": "Workflow was modified by another session"})),
            )
        }),
    );
    let base_url = spawn_backend(router).await;
    let client = client_for(&base_url);

    let err = client
        .send(RequestSpec::put("/api/workflows/1").body(json!({"revision": 1})))
        .await
        .unwrap_err();

    assert_matches!(err, ApiError::Conflict { ref detail } if detail.contains("another session"));
}

#[tokio::test]
async fn cancellation_aborts_inflight_request() {
    let router = Router::new().route(
        "/api/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Json(json!({"ok": true}))
        }),
    );
    let base_url = spawn_backend(router).await;

    let token = CancellationToken::new();
    let client = HttpClient::with_cancellation(&ApiConfig::with_base_url(&base_url), token.clone());

    let cancel = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();
    });

    let started = Instant::now();
    let err = client.send(RequestSpec::get("/api/slow")).await.unwrap_err();

    assert_matches!(err, ApiError::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn cancellation_interrupts_backoff_wait() {
    let router = Router::new().route(
        "/api/broken",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"detail": "boom"}))) }),
    );
    let base_url = spawn_backend(router).await;

    let token = CancellationToken::new();
    let client = HttpClient::with_cancellation(&ApiConfig::with_base_url(&base_url), token.clone());

    let cancel = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        cancel.cancel();
    });

    // First attempt fails fast, then the 1s backoff wait gets cancelled.
    let started = Instant::now();
    let err = client
        .send(RequestSpec::get("/api/broken").retries(5))
        .await
        .unwrap_err();

    assert_matches!(err, ApiError::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(1));
}
