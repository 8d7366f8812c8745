//! End-to-end shapes: resource methods against an axum stand-in backend.

use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::json;

use vidflow_core::editor::WorkflowEditor;
use vidflow_core::graph::Position;
use vidflow_core::types::{NodeKind, WorkflowStatus};
use vidflow_api::{ApiConfig, VidFlowApi};

async fn spawn_backend(router: Router) -> VidFlowApi {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    VidFlowApi::new(&ApiConfig::with_base_url(format!("http://{addr}")))
}

fn video_json(id: i64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "url": format!("https://www.youtube.com/watch?v=v{id}"),
        "platform": "youtube",
        "thumbnail_url": null,
        "duration": 120,
        "views": "1000",
        "upload_date": "20260801",
        "description": null,
        "file_path": null,
        "file_size": null,
        "has_subtitles": false,
        "watermark_removed": false,
        "created_at": "2026-08-27T09:00:00"
    })
}

#[tokio::test]
async fn scan_channel_forwards_url_and_limit() {
    let router = Router::new().route(
        "/api/downloads/channel/scan",
        post(|Query(params): Query<HashMap<String, String>>| async move {
            assert_eq!(params["url"], "https://www.youtube.com/@somecreator");
            assert_eq!(params["max_videos"], "10");
            Json(json!({
                "channel": {
                    "id": 1,
                    "name": "Some Creator",
                    "url": params["url"],
                    "platform": "youtube",
                    "channel_id": "UC123",
                    "avatar_url": null,
                    "subscribers": "10K",
                    "description": null,
                    "last_sync": "2026-08-27T09:00:00",
                    "is_active": true,
                    "created_at": "2026-08-01T00:00:00"
                },
                "videos": [video_json(1, "a"), video_json(2, "b"), video_json(3, "c")],
                "total_videos": 3
            }))
        }),
    );
    let api = spawn_backend(router).await;

    let result = api
        .downloads()
        .scan_channel("https://www.youtube.com/@somecreator", Some(10))
        .await
        .unwrap();

    assert_eq!(result.channel.name, "Some Creator");
    assert_eq!(result.videos.len(), 3);
    assert_eq!(result.total_videos, 3);
}

#[tokio::test]
async fn save_dispatches_create_then_update_with_revision() {
    let router = Router::new()
        .route(
            "/api/workflows",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["name"], "Channel sweep");
                assert!(body["workflow_data"]["nodes"].is_array());
                Json(json!({
                    "id": 5,
                    "name": body["name"],
                    "description": null,
                    "workflow_data": body["workflow_data"],
                    "is_active": true,
                    "schedule": null,
                    "revision": 1,
                    "created_at": "2026-08-27T09:00:00",
                    "updated_at": null
                }))
            }),
        )
        .route(
            "/api/workflows/{workflow_id}",
            put(
                |Path(workflow_id): Path<i64>, Json(body): Json<serde_json::Value>| async move {
                    assert_eq!(workflow_id, 5);
                    assert_eq!(body["revision"], 1);
                    Json(json!({
                        "id": 5,
                        "name": body["name"],
                        "description": null,
                        "workflow_data": body["workflow_data"],
                        "is_active": true,
                        "schedule": null,
                        "revision": 2,
                        "created_at": "2026-08-27T09:00:00",
                        "updated_at": "2026-08-27T10:00:00"
                    }))
                },
            ),
        );
    let api = spawn_backend(router).await;

    let mut editor = WorkflowEditor::new("Channel sweep");
    editor.add_node(NodeKind::Scan, Position { x: 0.0, y: 0.0 });

    let draft = editor.draft().unwrap();
    let created = api.workflows().save(None, &draft).await.unwrap();
    assert_eq!(created.id, 5);
    editor.mark_saved(created.id, created.revision);

    let draft = editor.draft().unwrap();
    assert_eq!(draft.revision, Some(1));
    let updated = api.workflows().save(Some(created.id), &draft).await.unwrap();
    assert_eq!(updated.revision, Some(2));
}

#[tokio::test]
async fn execution_snapshot_parses_naive_timestamps() {
    let router = Router::new().route(
        "/api/workflows/execution/{execution_id}",
        get(|Path(execution_id): Path<i64>| async move {
            Json(json!({
                "id": execution_id,
                "workflow_id": 3,
                "status": "running",
                "execution_log": ["[10:15:00] Started"],
                "execution_results": {"videos_found": 2},
                "error_message": null,
                "started_at": "2026-08-27T10:15:00",
                "completed_at": null
            }))
        }),
    );
    let api = spawn_backend(router).await;

    let snapshot = api.workflows().execution(12).await.unwrap();
    assert_eq!(snapshot.id, 12);
    assert_eq!(snapshot.status, WorkflowStatus::Running);
    assert!(snapshot.completed_at.is_none());
}

#[tokio::test]
async fn bulk_download_reports_started_count() {
    let router = Router::new().route(
        "/api/downloads/bulk",
        post(|Json(body): Json<serde_json::Value>| async move {
            let urls = body["video_urls"].as_array().unwrap().len();
            Json(json!({
                "total": urls,
                "started": urls,
                "download_ids": [11, 12]
            }))
        }),
    );
    let api = spawn_backend(router).await;

    let response = api
        .downloads()
        .bulk(
            vec![
                "https://www.youtube.com/watch?v=a".to_string(),
                "https://www.youtube.com/watch?v=b".to_string(),
            ],
            Default::default(),
        )
        .await
        .unwrap();

    assert_eq!(response.total, 2);
    assert_eq!(response.download_ids, vec![11, 12]);
}

#[tokio::test]
async fn unsupported_platform_surfaces_detail() {
    let router = Router::new().route(
        "/api/downloads/single",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"detail": "Unsupported platform or invalid URL"})),
            )
        }),
    );
    let api = spawn_backend(router).await;

    let err = api
        .downloads()
        .start("https://example.com/nope", Default::default())
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "request rejected (400): Unsupported platform or invalid URL"
    );
}
