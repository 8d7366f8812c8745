//! In-process fan-out of decoded event-stream frames.
//!
//! One [`EventBus`] is created per application (inside the stream hub)
//! so that any number of views can observe the shared server-push feed
//! without each opening its own socket.

pub mod bus;

pub use bus::EventBus;
