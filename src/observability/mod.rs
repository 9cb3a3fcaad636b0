//! Observability
//!
//! Subscriber installation for binaries and embedders.

pub mod tracing;

pub use self::tracing::{TracingConfig, init_tracing};
