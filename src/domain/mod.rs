//! Domain layer - Core business logic and entities

pub mod error;
pub mod message;
pub mod storage;
pub mod user;

pub use error::DomainError;
pub use message::{AuthoredMessage, Message, MessageId, MessageLog};
pub use storage::{Persistence, UnitOfWork};
pub use user::{Credentials, User, UserDirectory, UserId, UserSummary};
