//! Port for message persistence and thread retrieval.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Message, ThreadMessage};

/// Errors raised by message repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageRepositoryError {
    /// Repository connection could not be established.
    #[error("message repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("message repository query failed: {message}")]
    Query { message: String },
}

impl MessageRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for message storage and transcript queries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a message.
    async fn insert(&self, message: &Message) -> Result<(), MessageRepositoryError>;

    /// Every message the user sent or received, oldest first.
    async fn list_involving(&self, user_id: Uuid)
        -> Result<Vec<Message>, MessageRepositoryError>;

    /// Mark every message from `counterparty_id` to `user_id` read, then
    /// return the full bidirectional transcript oldest-first with display
    /// names. Both steps run as one atomic unit so a failed mark-read never
    /// yields a transcript with stale unread state.
    async fn thread(
        &self,
        user_id: Uuid,
        counterparty_id: Uuid,
    ) -> Result<Vec<ThreadMessage>, MessageRepositoryError>;
}
