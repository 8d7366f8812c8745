//! Reconnection logic for the event stream.
//!
//! When the connection drops, the hub calls [`reconnect_loop`] to keep
//! retrying at a fixed interval. The interval never grows: the stream is
//! a single local backend, and a steady 3-second cadence resumes promptly
//! after a backend restart without hammering it in between. Retries
//! continue indefinitely until the [`CancellationToken`] is triggered.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::client::{StreamClient, StreamConnection};

/// Tunable parameters for the reconnect cadence.
pub struct ReconnectConfig {
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(3000),
        }
    }
}

/// Attempt to reconnect to the stream at a fixed interval.
///
/// Returns `Some(connection)` once a connection succeeds, or `None` if
/// the `cancel` token is triggered first.
pub async fn reconnect_loop(
    client: &StreamClient,
    config: &ReconnectConfig,
    cancel: &CancellationToken,
) -> Option<StreamConnection> {
    let mut attempt = 0u32;

    loop {
        // Wait first: the caller lands here right after a drop or a
        // failed initial connect.
        tokio::select! {
            _ = cancel.cancelled() => return None,
            _ = tokio::time::sleep(config.delay) => {}
        }

        attempt += 1;
        tracing::info!(
            url = client.ws_url(),
            attempt,
            delay_ms = config.delay.as_millis() as u64,
            "Reconnecting to event stream",
        );

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(url = client.ws_url(), "Reconnect cancelled");
                return None;
            }
            result = client.connect() => {
                match result {
                    Ok(conn) => {
                        tracing::info!(url = client.ws_url(), attempt, "Reconnected to event stream");
                        return Some(conn);
                    }
                    Err(e) => {
                        tracing::warn!(
                            url = client.ws_url(),
                            error = %e,
                            "Reconnect attempt {attempt} failed",
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_delay_is_three_seconds() {
        let config = ReconnectConfig::default();
        assert_eq!(config.delay, Duration::from_millis(3000));
    }

    #[tokio::test]
    async fn cancel_stops_the_loop() {
        let client = StreamClient::new("ws://127.0.0.1:1/api/downloads/progress");
        let config = ReconnectConfig {
            delay: Duration::from_millis(10),
        };
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let result = reconnect_loop(&client, &config, &cancel).await;
        assert!(result.is_none());
    }
}
