//! User domain
//!
//! Identity types and the directory trait used to resolve and register users.

mod entity;
mod repository;

pub use entity::{Credentials, User, UserId, UserSummary};
pub use repository::UserDirectory;
