//! Storage factory for runtime backend selection

use tracing::info;

use crate::config::StorageSettings;
use crate::domain::DomainError;

use super::in_memory::InMemoryPersistence;
use super::migrations::run_storage_migrations;
use super::postgres::{PostgresConfig, PostgresPersistence};

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl std::str::FromStr for StorageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            _ => Err(DomainError::configuration(format!(
                "Unknown storage backend '{}'. Valid backends: memory, postgres",
                s
            ))),
        }
    }
}

/// Resolved storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage configuration
    InMemory,
    /// PostgreSQL storage configuration
    Postgres(PostgresConfig),
}

impl StorageConfig {
    /// Resolves application settings, falling back to `database_url` when no URL is configured
    pub fn from_settings(
        settings: &StorageSettings,
        database_url: Option<String>,
    ) -> Result<Self, DomainError> {
        let storage_type: StorageType = settings.backend.parse()?;

        match storage_type {
            StorageType::InMemory => Ok(Self::InMemory),
            StorageType::Postgres => {
                let url = settings.url.clone().or(database_url).ok_or_else(|| {
                    DomainError::configuration(
                        "PostgreSQL storage requires storage.url or DATABASE_URL",
                    )
                })?;

                Ok(Self::Postgres(
                    PostgresConfig::new(url).with_max_connections(settings.max_connections),
                ))
            }
        }
    }

    /// Returns the storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Factory for creating persistence providers
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates an in-memory provider
    pub fn create_in_memory() -> InMemoryPersistence {
        InMemoryPersistence::new()
    }

    /// Connects to PostgreSQL and applies pending migrations
    pub async fn create_postgres(config: &PostgresConfig) -> Result<PostgresPersistence, DomainError> {
        info!("Connecting to PostgreSQL...");
        let persistence = PostgresPersistence::connect(config).await?;
        info!("PostgreSQL connection established");

        run_storage_migrations(persistence.pool()).await?;
        Ok(persistence)
    }
}
