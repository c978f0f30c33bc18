//! User directory trait

use async_trait::async_trait;

use super::entity::User;
use crate::domain::DomainError;

/// Lookup and creation of user identities inside a unit of work
#[async_trait]
pub trait UserDirectory: Send {
    /// Exact-match lookup; `None` is an ordinary outcome
    async fn find_by_name(&mut self, name: &str) -> Result<Option<User>, DomainError>;

    /// Persist a new identity and return it with its assigned id
    ///
    /// Name uniqueness is left to the storage schema, which reports a
    /// duplicate as `DomainError::Conflict`.
    async fn create(&mut self, name: &str, password_hash: &str) -> Result<User, DomainError>;
}
