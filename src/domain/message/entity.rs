//! Message entity and boundary shape

use serde::{Deserialize, Serialize};

use crate::domain::user::UserId;

/// Insertion sequence number assigned by the persistence provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(i64);

impl MessageId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for MessageId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored message, immutable once appended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    author_id: UserId,
    text: String,
}

impl Message {
    pub fn new(id: MessageId, author_id: UserId, text: impl Into<String>) -> Self {
        Self {
            id,
            author_id,
            text: text.into(),
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Message with its author referenced by name
///
/// Used both for incoming posts and for feed entries returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoredMessage {
    pub name: String,
    pub text: String,
}

impl AuthoredMessage {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}
