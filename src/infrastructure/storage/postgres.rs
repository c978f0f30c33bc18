//! PostgreSQL persistence implementation with connection pooling

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, Row, Transaction};

use crate::domain::message::{AuthoredMessage, Message, MessageId, MessageLog};
use crate::domain::storage::{Persistence, UnitOfWork};
use crate::domain::user::{User, UserDirectory, UserId};
use crate::domain::DomainError;

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/message_board".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// PostgreSQL persistence provider
///
/// Every unit of work is one database transaction. Dropping it without
/// committing rolls the transaction back.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    /// Creates a provider over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool and wraps it
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(std::time::Duration::from_secs(config.idle_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        Ok(Self::new(pool))
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Persistence for PostgresPersistence {
    type UnitOfWork = PostgresUnitOfWork;

    async fn begin(&self) -> Result<PostgresUnitOfWork, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        Ok(PostgresUnitOfWork { tx })
    }
}

/// A PostgreSQL transaction acting as a unit of work
pub struct PostgresUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UserDirectory for PostgresUnitOfWork {
    async fn find_by_name(&mut self, name: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, password_hash
            FROM users
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by name: {}", e)))?;

        Ok(row.as_ref().map(row_to_user))
    }

    async fn create(&mut self, name: &str, password_hash: &str) -> Result<User, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (name, password_hash)
            VALUES ($1, $2)
            RETURNING id, name, password_hash
            "#,
        )
        .bind(name)
        .bind(password_hash)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| classify_insert_error(&e, name))?;

        Ok(row_to_user(&row))
    }
}

#[async_trait]
impl MessageLog for PostgresUnitOfWork {
    async fn append(&mut self, author_id: UserId, text: &str) -> Result<Message, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO messages (author_id, text)
            VALUES ($1, $2)
            RETURNING id, author_id, text
            "#,
        )
        .bind(author_id.value())
        .bind(text)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to append message: {}", e)))?;

        Ok(row_to_message(&row))
    }

    async fn last_n(&mut self, limit: usize) -> Result<Vec<AuthoredMessage>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT u.name, m.text
            FROM messages m
            JOIN users u ON u.id = m.author_id
            ORDER BY m.id DESC
            LIMIT $1
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to load recent messages: {}", e)))?;

        // Rows arrive newest first
        Ok(rows
            .iter()
            .rev()
            .map(|row| AuthoredMessage::new(row.get::<String, _>("name"), row.get::<String, _>("text")))
            .collect())
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    async fn commit(self) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))
    }
}

fn row_to_user(row: &PgRow) -> User {
    let id: i64 = row.get("id");
    let name: String = row.get("name");
    let password_hash: String = row.get("password_hash");

    User::new(UserId::new(id), name, password_hash)
}

fn row_to_message(row: &PgRow) -> Message {
    let id: i64 = row.get("id");
    let author_id: i64 = row.get("author_id");
    let text: String = row.get("text");

    Message::new(MessageId::new(id), UserId::new(author_id), text)
}

/// SQLSTATE raised when an insert breaks a unique index
const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(sqlstate: Option<&str>) -> bool {
    sqlstate == Some(UNIQUE_VIOLATION)
}

fn classify_insert_error(error: &sqlx::Error, name: &str) -> DomainError {
    let sqlstate = error.as_database_error().and_then(|db| db.code());

    if is_unique_violation(sqlstate.as_deref()) {
        DomainError::conflict(format!("Username '{}' already exists", name))
    } else {
        DomainError::storage(format!("Failed to create user: {}", error))
    }
}
