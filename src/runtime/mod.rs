//! Runtime module - executes commands produced by `update`
//!
//! - `host` - owns the model and storage, dispatches messages, queues effects

pub mod host;

pub use host::{Host, HostEffect};
