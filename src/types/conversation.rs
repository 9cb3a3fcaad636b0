//! Ordered message sequences

use std::ops::Deref;

use super::chat::{ChatMessage, MessageRole};

/// An ordered sequence of messages passed to the model.
///
/// The order is significant and is never changed after construction; the
/// type only exposes read access to the underlying slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation(Vec<ChatMessage>);

impl Conversation {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self(messages)
    }

    pub fn as_slice(&self) -> &[ChatMessage] {
        &self.0
    }

    /// Roles in order, handy for asserting dialogue shape.
    pub fn roles(&self) -> Vec<MessageRole> {
        self.0.iter().map(|m| m.role).collect()
    }

    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.0
    }
}

impl Deref for Conversation {
    type Target = [ChatMessage];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[ChatMessage]> for Conversation {
    fn as_ref(&self) -> &[ChatMessage] {
        &self.0
    }
}

impl From<Vec<ChatMessage>> for Conversation {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Self(messages)
    }
}

impl FromIterator<ChatMessage> for Conversation {
    fn from_iter<I: IntoIterator<Item = ChatMessage>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Conversation {
    type Item = ChatMessage;
    type IntoIter = std::vec::IntoIter<ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a ChatMessage;
    type IntoIter = std::slice::Iter<'a, ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
