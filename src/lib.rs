//! Message Board API
//!
//! A small credential store and shared message log:
//! - Argon2id password hashing with configurable cost
//! - User registration and credential checks
//! - Posting messages and reading the most recent window
//! - In-memory or PostgreSQL persistence behind a unit of work

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::Persistence;
use infrastructure::{
    message::FeedService,
    storage::{StorageConfig, StorageFactory},
    user::{Argon2Hasher, AuthService},
};
use tracing::info;

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let hasher = Argon2Hasher::from_config(&config.hashing)?;
    let storage = StorageConfig::from_settings(&config.storage, std::env::var("DATABASE_URL").ok())?;

    info!(storage_type = ?storage.storage_type(), "Initializing persistence");

    let state = match storage {
        StorageConfig::InMemory => {
            build_state(StorageFactory::create_in_memory(), hasher, config)
        }
        StorageConfig::Postgres(postgres) => {
            build_state(StorageFactory::create_postgres(&postgres).await?, hasher, config)
        }
    };

    Ok(state)
}

fn build_state<P>(persistence: P, hasher: Argon2Hasher, config: &AppConfig) -> AppState
where
    P: Persistence + 'static,
{
    let persistence = Arc::new(persistence);

    AppState::new(
        Arc::new(AuthService::new(Arc::clone(&persistence), Arc::new(hasher))),
        Arc::new(FeedService::new(persistence)),
        config.feed.default_limit,
    )
}
