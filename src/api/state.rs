//! Application state for shared services

use std::sync::Arc;

use crate::domain::storage::Persistence;
use crate::domain::{AuthoredMessage, Credentials, DomainError, UserSummary};
use crate::infrastructure::message::FeedService;
use crate::infrastructure::user::{AuthService, PasswordHasher};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServiceTrait>,
    pub feed_service: Arc<dyn FeedServiceTrait>,
    /// Window size used when `GET /messages` carries no `limit`
    pub default_limit: usize,
}

impl AppState {
    pub fn new(
        auth_service: Arc<dyn AuthServiceTrait>,
        feed_service: Arc<dyn FeedServiceTrait>,
        default_limit: usize,
    ) -> Self {
        Self {
            auth_service,
            feed_service,
            default_limit,
        }
    }
}

/// Trait for auth service operations
#[async_trait::async_trait]
pub trait AuthServiceTrait: Send + Sync {
    async fn register(&self, credentials: &Credentials) -> Result<UserSummary, DomainError>;
    async fn check_credentials(&self, credentials: &Credentials) -> Result<bool, DomainError>;
}

/// Trait for feed service operations
#[async_trait::async_trait]
pub trait FeedServiceTrait: Send + Sync {
    async fn post_message(&self, message: &AuthoredMessage) -> Result<(), DomainError>;
    async fn recent_messages(&self, limit: usize) -> Result<Vec<AuthoredMessage>, DomainError>;
}

#[async_trait::async_trait]
impl<P, H> AuthServiceTrait for AuthService<P, H>
where
    P: Persistence + 'static,
    H: PasswordHasher + 'static,
{
    async fn register(&self, credentials: &Credentials) -> Result<UserSummary, DomainError> {
        AuthService::register(self, credentials).await
    }

    async fn check_credentials(&self, credentials: &Credentials) -> Result<bool, DomainError> {
        AuthService::check_credentials(self, credentials).await
    }
}

#[async_trait::async_trait]
impl<P> FeedServiceTrait for FeedService<P>
where
    P: Persistence + 'static,
{
    async fn post_message(&self, message: &AuthoredMessage) -> Result<(), DomainError> {
        FeedService::post_message(self, message).await
    }

    async fn recent_messages(&self, limit: usize) -> Result<Vec<AuthoredMessage>, DomainError> {
        FeedService::recent_messages(self, limit).await
    }
}
