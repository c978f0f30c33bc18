//! User infrastructure module
//!
//! Password hashing with Argon2 and the auth service built on top of it.

mod password;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use service::AuthService;

#[cfg(test)]
pub(crate) use password::test_hasher;
