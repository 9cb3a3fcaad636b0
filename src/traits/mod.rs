//! Capability traits at the boundary with the remote model.

mod chat;

pub use chat::*;
