//! User entity and boundary shapes

use serde::{Deserialize, Serialize};

/// User identifier assigned by the persistence provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw integer value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored user identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Provider-assigned identifier
    id: UserId,
    /// Unique login name, immutable after creation
    name: String,
    /// Argon2 PHC string - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            password_hash: password_hash.into(),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Public view of this user
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            name: self.name.clone(),
        }
    }
}

/// Name and plaintext password as received from a caller
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub name: String,
    pub password: String,
}

impl Credentials {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// What a caller learns about a registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub name: String,
}
