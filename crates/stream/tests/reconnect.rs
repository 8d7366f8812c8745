//! Hub behavior against a local axum WebSocket stand-in: frame routing,
//! automatic reconnect after a drop, and clean shutdown.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tokio::sync::broadcast;

use vidflow_core::StreamEvent;
use vidflow_stream::reconnect::ReconnectConfig;
use vidflow_stream::{StreamClient, StreamHub};

#[derive(Clone)]
struct FakeStream {
    connections: Arc<AtomicU32>,
    /// Frames replayed to every client right after it connects.
    frames: Arc<Vec<String>>,
    /// Close the socket after replaying, to force a reconnect.
    drop_after_send: bool,
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<FakeStream>) -> Response {
    ws.on_upgrade(move |socket| serve_stream(socket, state))
}

async fn serve_stream(mut socket: WebSocket, state: FakeStream) {
    state.connections.fetch_add(1, Ordering::SeqCst);
    // Give the client a beat to subscribe before frames flow.
    tokio::time::sleep(Duration::from_millis(100)).await;
    for frame in state.frames.iter() {
        if socket.send(Message::Text(frame.clone().into())).await.is_err() {
            return;
        }
    }
    if state.drop_after_send {
        let _ = socket.send(Message::Close(None)).await;
        return;
    }
    // Keep the socket open until the client goes away.
    while socket.recv().await.is_some() {}
}

async fn spawn_fake_stream(state: FakeStream) -> String {
    let router = Router::new()
        .route("/api/downloads/progress", get(ws_handler))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("ws://{addr}/api/downloads/progress")
}

fn fast_reconnect() -> ReconnectConfig {
    ReconnectConfig {
        delay: Duration::from_millis(100),
    }
}

async fn recv_event(
    rx: &mut broadcast::Receiver<StreamEvent>,
    within: Duration,
) -> Option<StreamEvent> {
    tokio::time::timeout(within, rx.recv()).await.ok()?.ok()
}

#[tokio::test]
async fn routes_events_and_progress_frames() {
    let state = FakeStream {
        connections: Arc::new(AtomicU32::new(0)),
        frames: Arc::new(vec![
            r#"{"type":"workflow_started","data":{"execution_id":7,"workflow_id":3}}"#.to_string(),
            r#"{"download_id":12,"progress":55.5,"status":"downloading","message":"Downloading video"}"#
                .to_string(),
            "garbage that is not json".to_string(),
            r#"{"type":"log","data":{"message":"scanning","timestamp":"10:15:00"}}"#.to_string(),
        ]),
        drop_after_send: false,
    };
    let url = spawn_fake_stream(state).await;

    let hub = StreamHub::start_with(StreamClient::new(url), fast_reconnect());
    let mut rx = hub.subscribe();

    let first = recv_event(&mut rx, Duration::from_secs(2)).await.unwrap();
    assert!(matches!(first, StreamEvent::WorkflowStarted(ref d) if d.execution_id == 7));

    // The malformed frame is dropped; the log event still arrives.
    let second = recv_event(&mut rx, Duration::from_secs(2)).await.unwrap();
    assert!(matches!(second, StreamEvent::Log(_)));

    // The untagged frame landed in the progress map, not on the bus.
    let progress = hub.progress_snapshot().await;
    let entry = progress.get(12).unwrap();
    assert_eq!(entry.status, "downloading");
    assert!((entry.progress - 55.5).abs() < f64::EPSILON);

    hub.shutdown().await;
}

#[tokio::test]
async fn reconnects_after_the_stream_drops() {
    let connections = Arc::new(AtomicU32::new(0));
    let state = FakeStream {
        connections: Arc::clone(&connections),
        frames: Arc::new(vec![
            r#"{"type":"workflow_started","data":{"execution_id":1}}"#.to_string(),
        ]),
        drop_after_send: true,
    };
    let url = spawn_fake_stream(state).await;

    let hub = StreamHub::start_with(StreamClient::new(url), fast_reconnect());
    let mut rx = hub.subscribe();

    // First connection delivers the event, then the server hangs up.
    assert!(recv_event(&mut rx, Duration::from_secs(2)).await.is_some());

    // The hub comes back on its own and replays from the new connection.
    assert!(recv_event(&mut rx, Duration::from_secs(2)).await.is_some());
    assert!(connections.load(Ordering::SeqCst) >= 2);

    hub.shutdown().await;
    let settled = connections.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(
        connections.load(Ordering::SeqCst),
        settled,
        "no reconnect attempts after shutdown"
    );
}

#[tokio::test]
async fn is_connected_tracks_the_socket() {
    let state = FakeStream {
        connections: Arc::new(AtomicU32::new(0)),
        frames: Arc::new(Vec::new()),
        drop_after_send: false,
    };
    let url = spawn_fake_stream(state).await;

    let hub = StreamHub::start_with(StreamClient::new(url), fast_reconnect());
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(hub.is_connected());

    hub.shutdown().await;
    assert!(!hub.is_connected());
}
