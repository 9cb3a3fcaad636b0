//! Utility helpers

pub mod cancel;

pub use cancel::{CloseHandle, run_until_cancelled};
