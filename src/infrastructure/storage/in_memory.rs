//! In-memory persistence implementation

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

use crate::domain::message::{AuthoredMessage, Message, MessageId, MessageLog};
use crate::domain::storage::{Persistence, UnitOfWork};
use crate::domain::user::{User, UserDirectory, UserId};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    messages: Vec<Message>,
}

/// Thread-safe in-memory persistence provider
///
/// Useful for testing and development. Data is lost when the process terminates.
/// A unit of work holds the table lock until it is committed or dropped, so
/// units of work never interleave.
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryPersistence {
    /// Creates a new empty provider
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Persistence for InMemoryPersistence {
    type UnitOfWork = InMemoryUnitOfWork;

    async fn begin(&self) -> Result<InMemoryUnitOfWork, DomainError> {
        let committed = Arc::clone(&self.tables).write_owned().await;

        Ok(InMemoryUnitOfWork {
            committed,
            staged: Tables::default(),
        })
    }
}

/// Unit of work over the in-memory tables
///
/// Writes are staged and only applied to the shared tables on commit.
pub struct InMemoryUnitOfWork {
    committed: OwnedRwLockWriteGuard<Tables>,
    staged: Tables,
}

impl InMemoryUnitOfWork {
    fn users(&self) -> impl Iterator<Item = &User> {
        self.committed.users.iter().chain(self.staged.users.iter())
    }

    fn messages(&self) -> impl DoubleEndedIterator<Item = &Message> {
        self.committed
            .messages
            .iter()
            .chain(self.staged.messages.iter())
    }

    fn user_by_id(&self, id: UserId) -> Option<&User> {
        self.users().find(|u| u.id() == id)
    }

    fn next_user_id(&self) -> UserId {
        UserId::new((self.committed.users.len() + self.staged.users.len()) as i64 + 1)
    }

    fn next_message_id(&self) -> MessageId {
        MessageId::new((self.committed.messages.len() + self.staged.messages.len()) as i64 + 1)
    }
}

#[async_trait]
impl UserDirectory for InMemoryUnitOfWork {
    async fn find_by_name(&mut self, name: &str) -> Result<Option<User>, DomainError> {
        Ok(self.users().find(|u| u.name() == name).cloned())
    }

    async fn create(&mut self, name: &str, password_hash: &str) -> Result<User, DomainError> {
        // Mirrors the unique index on users.name
        if self.users().any(|u| u.name() == name) {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                name
            )));
        }

        let user = User::new(self.next_user_id(), name, password_hash);
        self.staged.users.push(user.clone());

        Ok(user)
    }
}

#[async_trait]
impl MessageLog for InMemoryUnitOfWork {
    async fn append(&mut self, author_id: UserId, text: &str) -> Result<Message, DomainError> {
        // Mirrors the foreign key on messages.author_id
        if self.user_by_id(author_id).is_none() {
            return Err(DomainError::storage(format!(
                "Author {} does not reference an existing user",
                author_id
            )));
        }

        let message = Message::new(self.next_message_id(), author_id, text);
        self.staged.messages.push(message.clone());

        Ok(message)
    }

    async fn last_n(&mut self, limit: usize) -> Result<Vec<AuthoredMessage>, DomainError> {
        let mut recent = self
            .messages()
            .rev()
            .take(limit)
            .map(|message| {
                let author = self.user_by_id(message.author_id()).ok_or_else(|| {
                    DomainError::storage(format!(
                        "Message {} references missing author {}",
                        message.id(),
                        message.author_id()
                    ))
                })?;

                Ok(AuthoredMessage::new(author.name(), message.text()))
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        recent.reverse();
        Ok(recent)
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn commit(self) -> Result<(), DomainError> {
        let InMemoryUnitOfWork {
            mut committed,
            staged,
        } = self;

        committed.users.extend(staged.users);
        committed.messages.extend(staged.messages);

        Ok(())
    }
}
