//! Auth service for registration and credential checks

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::domain::storage::{Persistence, UnitOfWork};
use crate::domain::user::{Credentials, UserDirectory, UserSummary};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Plaintext behind the hash that unknown names are verified against
const UNKNOWN_USER_PASSWORD: &str = "unknown-user-placeholder";

/// Auth service composing the password hasher and the user directory
#[derive(Debug)]
pub struct AuthService<P: Persistence, H: PasswordHasher> {
    persistence: Arc<P>,
    hasher: Arc<H>,
    dummy_hash: OnceCell<String>,
}

impl<P, H> AuthService<P, H>
where
    P: Persistence,
    H: PasswordHasher + 'static,
{
    /// Create a new auth service
    pub fn new(persistence: Arc<P>, hasher: Arc<H>) -> Self {
        Self {
            persistence,
            hasher,
            dummy_hash: OnceCell::new(),
        }
    }

    /// Register a new user and return its public summary
    pub async fn register(&self, credentials: &Credentials) -> Result<UserSummary, DomainError> {
        // Hash before opening the unit of work so the transaction stays short
        let hasher = Arc::clone(&self.hasher);
        let password = credentials.password.clone();
        let password_hash = run_blocking(move || hasher.hash(&password)).await??;

        let mut uow = self.persistence.begin().await?;
        let user = uow.create(&credentials.name, &password_hash).await?;
        uow.commit().await?;

        info!(user_id = %user.id(), name = %user.name(), "Registered user");
        Ok(user.summary())
    }

    /// Check whether the name/password pair identifies a registered user
    ///
    /// Unknown names and wrong passwords both yield `Ok(false)`.
    pub async fn check_credentials(&self, credentials: &Credentials) -> Result<bool, DomainError> {
        let mut uow = self.persistence.begin().await?;
        let user = uow.find_by_name(&credentials.name).await?;
        uow.commit().await?;

        let Some(user) = user else {
            debug!(name = %credentials.name, "Credential check for unknown user");
            self.verify_against_dummy(&credentials.password).await;
            return Ok(false);
        };

        let hasher = Arc::clone(&self.hasher);
        let password = credentials.password.clone();
        let password_hash = user.password_hash().to_string();
        let valid = run_blocking(move || hasher.verify(&password, &password_hash)).await?;

        debug!(name = %credentials.name, valid, "Credential check");
        Ok(valid)
    }

    /// Do the same verification work a known user costs, so timing does not
    /// reveal whether a name is registered
    async fn verify_against_dummy(&self, password: &str) {
        let dummy_hash = self
            .dummy_hash
            .get_or_try_init(|| {
                let hasher = Arc::clone(&self.hasher);
                async move {
                    let hash = run_blocking(move || hasher.hash(UNKNOWN_USER_PASSWORD)).await??;
                    Ok::<_, DomainError>(hash)
                }
            })
            .await;

        let dummy_hash = match dummy_hash {
            Ok(hash) => hash.clone(),
            Err(e) => {
                warn!(error = %e, "Failed to prepare hash for unknown-user checks");
                return;
            }
        };

        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        if let Err(e) = run_blocking(move || hasher.verify(&password, &dummy_hash)).await {
            warn!(error = %e, "Unknown-user verification failed");
        }
    }
}

/// Run CPU-bound hashing work on the blocking pool
async fn run_blocking<T, F>(work: F) -> Result<T, DomainError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| DomainError::internal(format!("Hashing task failed: {}", e)))
}
