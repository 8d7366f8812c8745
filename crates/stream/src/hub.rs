//! Long-lived stream hub: one connection task per process.
//!
//! [`StreamHub::start`] spawns a task that connects to the backend
//! stream endpoint, processes frames, and reconnects whenever the
//! connection drops. The hub is created once at startup and the
//! returned `Arc` is cloned into whatever needs events or progress;
//! there is no process-wide global.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use vidflow_api::ApiConfig;
use vidflow_core::progress::ProgressMap;
use vidflow_core::StreamEvent;
use vidflow_events::EventBus;

use crate::client::StreamClient;
use crate::processor::process_messages;
use crate::reconnect::{reconnect_loop, ReconnectConfig};

pub struct StreamHub {
    bus: EventBus,
    progress: Arc<RwLock<ProgressMap>>,
    connected: Arc<AtomicBool>,
    cancel: CancellationToken,
    task_handle: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl StreamHub {
    /// Connect to the stream endpoint from `config` and keep the
    /// connection alive until [`shutdown`](Self::shutdown).
    pub fn start(config: &ApiConfig) -> Arc<Self> {
        Self::start_with(StreamClient::new(config.ws_url.clone()), ReconnectConfig::default())
    }

    /// Same as [`start`](Self::start) with an explicit client and
    /// reconnect cadence.
    pub fn start_with(client: StreamClient, reconnect: ReconnectConfig) -> Arc<Self> {
        let bus = EventBus::default();
        let progress = Arc::new(RwLock::new(ProgressMap::new()));
        let connected = Arc::new(AtomicBool::new(false));
        let cancel = CancellationToken::new();

        let task_bus = bus.clone();
        let task_progress = Arc::clone(&progress);
        let task_connected = Arc::clone(&connected);
        let task_cancel = cancel.clone();

        let task_handle = tokio::spawn(async move {
            tracing::info!(url = client.ws_url(), "Starting stream connection task");
            run_connection_loop(
                &client,
                &reconnect,
                &task_bus,
                &task_progress,
                &task_connected,
                &task_cancel,
            )
            .await;
            tracing::info!("Stream connection task exited");
        });

        Arc::new(Self {
            bus,
            progress,
            connected,
            cancel,
            task_handle: Mutex::new(Some(task_handle)),
        })
    }

    /// Subscribe to workflow events.
    pub fn subscribe(&self) -> broadcast::Receiver<StreamEvent> {
        self.bus.subscribe()
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Shared handle to the live download-progress map.
    pub fn progress(&self) -> Arc<RwLock<ProgressMap>> {
        Arc::clone(&self.progress)
    }

    /// Snapshot of the current download progress.
    pub async fn progress_snapshot(&self) -> ProgressMap {
        self.progress.read().await.clone()
    }

    /// Whether the WebSocket is currently up.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Stop the connection task and wait briefly for it to exit.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down stream hub");
        self.cancel.cancel();

        if let Some(handle) = self.task_handle.lock().await.take() {
            let _ = tokio::time::timeout(std::time::Duration::from_secs(5), handle).await;
        }
    }
}

/// Core connection loop: connect -> process frames -> reconnect.
///
/// Runs until the cancellation token is triggered.
async fn run_connection_loop(
    client: &StreamClient,
    reconnect: &ReconnectConfig,
    bus: &EventBus,
    progress: &Arc<RwLock<ProgressMap>>,
    connected: &AtomicBool,
    cancel: &CancellationToken,
) {
    // The first attempt is immediate; every later attempt waits out the
    // fixed delay inside `reconnect_loop`.
    let mut conn = match client.connect().await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::warn!(error = %e, "Connection failed, entering reconnect loop");
            match reconnect_loop(client, reconnect, cancel).await {
                Some(conn) => conn,
                None => return, // cancelled
            }
        }
    };

    loop {
        connected.store(true, Ordering::SeqCst);
        let mut ws_stream = conn.ws_stream;

        tokio::select! {
            _ = cancel.cancelled() => {
                connected.store(false, Ordering::SeqCst);
                return;
            }
            _ = process_messages(&mut ws_stream, bus, progress) => {
                connected.store(false, Ordering::SeqCst);
                tracing::warn!(url = client.ws_url(), "Event stream dropped");
            }
        }

        conn = match reconnect_loop(client, reconnect, cancel).await {
            Some(conn) => conn,
            None => return, // cancelled
        };
    }
}
