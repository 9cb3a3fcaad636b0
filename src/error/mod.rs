//! Error Handling Module
//!
//! - `types`: the crate error taxonomy (`Error`, `ConfigError`, `ClientCreationError`,
//!   `GenerationError`, `StreamError`)
//! - `transient`: the `TransientFailure` capability used to classify retryable errors
//! - `helpers`: source-chain inspection
//!
//! # Example
//!
//! ```rust,ignore
//! use chatguard::error::{ConfigError, Error};
//!
//! let err: Error = ConfigError::Missing { key: "OPENAI_API_KEY" }.into();
//! assert!(err.is_config());
//! ```

pub mod helpers;
pub mod transient;
pub mod types;

pub use helpers::*;
pub use transient::*;
pub use types::*;
