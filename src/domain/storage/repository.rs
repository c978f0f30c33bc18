//! Persistence provider traits

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::message::MessageLog;
use crate::domain::user::UserDirectory;
use crate::domain::DomainError;

/// A single transaction against the persistence provider
///
/// Writes become visible to other units of work only after `commit`.
/// Dropping a unit of work without committing abandons everything it wrote.
#[async_trait]
pub trait UnitOfWork: UserDirectory + MessageLog + Send {
    /// Make all writes of this unit of work durable
    async fn commit(self) -> Result<(), DomainError>;
}

/// Source of units of work, held by services as an injected handle
#[async_trait]
pub trait Persistence: Send + Sync + Debug {
    type UnitOfWork: UnitOfWork;

    /// Open a new unit of work
    async fn begin(&self) -> Result<Self::UnitOfWork, DomainError>;
}
