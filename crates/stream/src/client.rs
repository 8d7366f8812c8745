//! WebSocket client for the backend event stream.
//!
//! [`StreamClient`] holds the stream endpoint URL. Call
//! [`StreamClient::connect`] to establish a live [`StreamConnection`].

use tokio_tungstenite::{connect_async, MaybeTlsStream};

/// Configuration handle for the backend event stream.
#[derive(Debug, Clone)]
pub struct StreamClient {
    ws_url: String,
}

/// A live WebSocket connection to the backend.
pub struct StreamConnection {
    /// The raw WebSocket stream for reading frames.
    pub ws_stream: tokio_tungstenite::WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl StreamClient {
    /// Create a client targeting the stream endpoint, e.g.
    /// `ws://localhost:8000/api/downloads/progress`.
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
        }
    }

    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    /// Connect to the stream endpoint.
    pub async fn connect(&self) -> Result<StreamConnection, StreamError> {
        let (ws_stream, _response) = connect_async(&self.ws_url).await.map_err(|e| {
            StreamError::Connection(format!("failed to connect to {}: {e}", self.ws_url))
        })?;

        tracing::info!(url = %self.ws_url, "Connected to event stream");

        Ok(StreamConnection { ws_stream })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Failed to establish the WebSocket connection.
    #[error("stream connection error: {0}")]
    Connection(String),
}
