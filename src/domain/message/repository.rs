//! Message log trait

use async_trait::async_trait;

use super::entity::{AuthoredMessage, Message};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Append-only, insertion-ordered message store inside a unit of work
#[async_trait]
pub trait MessageLog: Send {
    /// Store a message at the next sequence position
    ///
    /// The caller is responsible for `author_id` naming an existing user.
    async fn append(&mut self, author_id: UserId, text: &str) -> Result<Message, DomainError>;

    /// Up to `limit` most recent messages, oldest first, authors resolved to names
    async fn last_n(&mut self, limit: usize) -> Result<Vec<AuthoredMessage>, DomainError>;
}
