//! Frame decoding for the multiplexed event stream.
//!
//! The backend interleaves two frame shapes on one socket: workflow
//! events tagged with `type`/`data`, and untagged download-progress
//! objects (`{"download_id", "progress", "status", ...}`). The tagged
//! form is tried first; anything that parses as neither is an error.

use vidflow_core::progress::ProgressUpdate;
use vidflow_core::StreamEvent;

/// One decoded frame off the wire.
#[derive(Debug, Clone)]
pub enum Frame {
    Event(StreamEvent),
    DownloadProgress(ProgressUpdate),
}

/// Decode a single text frame.
pub fn decode_frame(text: &str) -> Result<Frame, serde_json::Error> {
    match serde_json::from_str::<StreamEvent>(text) {
        Ok(event) => Ok(Frame::Event(event)),
        Err(event_err) => match serde_json::from_str::<ProgressUpdate>(text) {
            Ok(update) => Ok(Frame::DownloadProgress(update)),
            // Report the event-shape error; it is the richer of the two.
            Err(_) => Err(event_err),
        },
    }
}
