//! Infrastructure layer - hashing, persistence providers and services

pub mod logging;
pub mod message;
pub mod storage;
pub mod user;
