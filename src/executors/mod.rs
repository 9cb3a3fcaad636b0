//! Executors Layer
//!
//! Single-shot invocations of a [`ChatModel`](crate::traits::ChatModel):
//! exactly one remote call, with latency measurement and error wrapping.

pub mod chat;

pub use chat::{generate, stream};
