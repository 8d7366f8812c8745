//! WebSocket frame processing loop.
//!
//! Reads raw frames from a live stream connection, decodes them via
//! [`decode_frame`], republishes workflow events on the event bus, and
//! folds download-progress frames into the shared progress map.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::RwLock;
use tokio_tungstenite::tungstenite::Message;
use vidflow_core::progress::ProgressMap;
use vidflow_events::EventBus;

use crate::messages::{decode_frame, Frame};

/// Process frames from a stream connection.
///
/// Loops until the WebSocket closes, hits a fatal receive error, or the
/// stream is exhausted. Malformed text frames are logged and dropped so
/// one bad payload cannot kill the connection.
///
/// Binary frames are ignored; the backend never sends any.
pub async fn process_messages(
    ws_stream: &mut tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    bus: &EventBus,
    progress: &Arc<RwLock<ProgressMap>>,
) {
    while let Some(msg_result) = ws_stream.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                handle_text_frame(&text, bus, progress).await;
            }
            Ok(Message::Binary(_)) => {
                tracing::trace!("Ignoring binary frame");
            }
            Ok(Message::Ping(_) | Message::Pong(_)) => {
                // Handled automatically by tungstenite.
            }
            Ok(Message::Close(frame)) => {
                tracing::info!(?frame, "Event stream closed");
                break;
            }
            Ok(Message::Frame(_)) => {}
            Err(e) => {
                tracing::error!(error = %e, "Event stream receive error");
                break;
            }
        }
    }
}

async fn handle_text_frame(text: &str, bus: &EventBus, progress: &Arc<RwLock<ProgressMap>>) {
    match decode_frame(text) {
        Ok(Frame::Event(event)) => {
            bus.publish(event);
        }
        Ok(Frame::DownloadProgress(update)) => {
            tracing::trace!(
                download_id = update.download_id,
                progress = update.progress,
                status = %update.status,
                "Download progress",
            );
            progress.write().await.upsert(update);
        }
        Err(e) => {
            tracing::warn!(error = %e, frame = text, "Dropping malformed frame");
        }
    }
}
