//! Client construction
//!
//! Turns a validated [`ModelConfig`](crate::config::ModelConfig) into a ready
//! chat model.

pub mod factory;

pub use factory::{ClientFactory, DEFAULT_BACKOFF_UNIT};
