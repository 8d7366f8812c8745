//! Live event stream from the VidFlow backend.
//!
//! The backend multiplexes two kinds of frames over one WebSocket:
//! tagged workflow events (`{"type": ..., "data": ...}`) and bare
//! download-progress updates. [`StreamHub`] owns the connection task
//! (connect -> process -> reconnect), republishes workflow events on an
//! [`vidflow_events::EventBus`], and folds progress updates into a shared
//! [`vidflow_core::progress::ProgressMap`].

pub mod client;
pub mod hub;
pub mod messages;
pub mod monitor;
pub mod processor;
pub mod reconnect;

pub use client::{StreamClient, StreamConnection, StreamError};
pub use hub::StreamHub;
pub use monitor::{ExecutionMonitor, MonitorError};
