//! Providers
//!
//! Concrete [`ChatModel`](crate::traits::ChatModel) implementations.

pub mod openai_compatible;
