//! Domain types and pure client-side logic for the VidFlow platform.
//!
//! This crate has no I/O and no internal dependencies. It defines the
//! workflow graph model the editor mutates, the execution snapshot and
//! stream-event types shared with the backend, and the reconciler that
//! merges a REST snapshot with live events into one coherent progress
//! view. Network plumbing lives in `vidflow-api` and `vidflow-stream`.

pub mod editor;
pub mod error;
pub mod execution;
pub mod graph;
pub mod node_config;
pub mod platform;
pub mod progress;
pub mod reconciler;
pub mod types;

pub use error::CoreError;
pub use execution::StreamEvent;
pub use types::DbId;
