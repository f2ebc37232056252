//! Port for user account persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::User;

/// Errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },

    /// The email address is already registered.
    #[error("email address is already registered")]
    DuplicateEmail,
}

impl UserRepositoryError {
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

/// Port for storing and resolving user accounts.
///
/// Email uniqueness is enforced by the store's unique index, not by a
/// check-then-insert sequence; adapters surface a violation as
/// [`UserRepositoryError::DuplicateEmail`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account together with its opaque credential secret.
    async fn insert(&self, user: &User, secret: &str) -> Result<(), UserRepositoryError>;

    /// Find the account matching both email and secret exactly.
    ///
    /// Returns `None` for unknown email and for wrong secret alike; the
    /// caller must not be able to distinguish the two.
    async fn find_by_credentials(
        &self,
        email: &str,
        secret: &str,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserRepositoryError>;
}
