//! Feed service for posting and reading messages

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::message::{AuthoredMessage, MessageLog};
use crate::domain::storage::{Persistence, UnitOfWork};
use crate::domain::user::UserDirectory;
use crate::domain::DomainError;

/// Feed service composing the user directory and the message log
#[derive(Debug)]
pub struct FeedService<P: Persistence> {
    persistence: Arc<P>,
}

impl<P: Persistence> FeedService<P> {
    /// Create a new feed service
    pub fn new(persistence: Arc<P>) -> Self {
        Self { persistence }
    }

    /// Append a message on behalf of a registered author
    ///
    /// Fails with `DomainError::UnknownAuthor` when the name is not registered;
    /// nothing is written in that case.
    pub async fn post_message(&self, message: &AuthoredMessage) -> Result<(), DomainError> {
        let mut uow = self.persistence.begin().await?;

        let author = match uow.find_by_name(&message.name).await? {
            Some(author) => author,
            None => {
                warn!(name = %message.name, "Rejected message from unknown user");
                return Err(DomainError::unknown_author(&message.name));
            }
        };

        let stored = uow.append(author.id(), &message.text).await?;
        uow.commit().await?;

        info!(message_id = %stored.id(), author_id = %author.id(), "Posted message");
        Ok(())
    }

    /// Up to `limit` most recent messages, oldest first
    pub async fn recent_messages(&self, limit: usize) -> Result<Vec<AuthoredMessage>, DomainError> {
        let mut uow = self.persistence.begin().await?;
        let messages = uow.last_n(limit).await?;
        uow.commit().await?;

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::mock::MockPersistence;
    use crate::infrastructure::storage::InMemoryPersistence;

    async fn create_service_with_users(names: &[&str]) -> FeedService<InMemoryPersistence> {
        let persistence = Arc::new(InMemoryPersistence::new());

        let mut uow = persistence.begin().await.unwrap();
        for name in names {
            uow.create(name, "hash").await.unwrap();
        }
        uow.commit().await.unwrap();

        FeedService::new(persistence)
    }

    async fn post(service: &FeedService<InMemoryPersistence>, name: &str, text: &str) {
        service
            .post_message(&AuthoredMessage::new(name, text))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_post_and_read_back() {
        let service = create_service_with_users(&["alice"]).await;
        post(&service, "alice", "hello").await;

        let messages = service.recent_messages(10).await.unwrap();
        assert_eq!(messages, vec![AuthoredMessage::new("alice", "hello")]);
    }

    #[tokio::test]
    async fn test_unknown_author_rejected_without_write() {
        let service = create_service_with_users(&["alice"]).await;
        post(&service, "alice", "before").await;

        let result = service
            .post_message(&AuthoredMessage::new("bob", "hi"))
            .await;

        match result {
            Err(DomainError::UnknownAuthor { name }) => assert_eq!(name, "bob"),
            other => panic!("Expected UnknownAuthor, got {:?}", other),
        }

        let messages = service.recent_messages(100).await.unwrap();
        assert_eq!(messages, vec![AuthoredMessage::new("alice", "before")]);
    }

    #[tokio::test]
    async fn test_recent_messages_window() {
        let service = create_service_with_users(&["a", "b"]).await;
        post(&service, "a", "m1").await;
        post(&service, "b", "m2").await;
        post(&service, "a", "m3").await;

        assert_eq!(
            service.recent_messages(2).await.unwrap(),
            vec![AuthoredMessage::new("b", "m2"), AuthoredMessage::new("a", "m3")]
        );
    }

    #[tokio::test]
    async fn test_recent_messages_zero_and_oversized_limits() {
        let service = create_service_with_users(&["a", "b"]).await;
        post(&service, "a", "m1").await;
        post(&service, "b", "m2").await;
        post(&service, "a", "m3").await;

        assert!(service.recent_messages(0).await.unwrap().is_empty());
        assert_eq!(
            service.recent_messages(100).await.unwrap(),
            vec![
                AuthoredMessage::new("a", "m1"),
                AuthoredMessage::new("b", "m2"),
                AuthoredMessage::new("a", "m3"),
            ]
        );
    }

    #[tokio::test]
    async fn test_recent_messages_on_empty_log() {
        let service = create_service_with_users(&[]).await;

        assert!(service.recent_messages(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_same_text_from_different_authors_kept_apart() {
        let service = create_service_with_users(&["a", "b"]).await;
        post(&service, "a", "same").await;
        post(&service, "b", "same").await;

        assert_eq!(
            service.recent_messages(2).await.unwrap(),
            vec![AuthoredMessage::new("a", "same"), AuthoredMessage::new("b", "same")]
        );
    }

    #[tokio::test]
    async fn test_storage_errors_propagate() {
        let service = FeedService::new(Arc::new(MockPersistence::failing("database unavailable")));

        let post = service.post_message(&AuthoredMessage::new("a", "m1")).await;
        assert!(matches!(post, Err(DomainError::Storage { .. })));

        let recent = service.recent_messages(3).await;
        assert!(matches!(recent, Err(DomainError::Storage { .. })));
    }
}
