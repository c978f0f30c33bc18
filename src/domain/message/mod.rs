//! Message domain

mod entity;
mod repository;

pub use entity::{AuthoredMessage, Message, MessageId};
pub use repository::MessageLog;
