//! Messages between the UI thread and the storage worker.
//!
//! Pane handlers and modal completions queue [`Effect`]s; an
//! [`EffectRunner`] executes them off the UI thread and answers with
//! [`AppMessage`]s that the event loop drains in arrival order.

mod effect;
mod message;

pub use effect::{Effect, EffectRunner};
pub use message::AppMessage;
