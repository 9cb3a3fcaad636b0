//! Core data types shared by every component.

mod chat;
mod conversation;
mod streaming;

pub use chat::*;
pub use conversation::*;
pub use streaming::*;
