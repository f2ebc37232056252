//! Port for the favorites ledger.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Favorite, FavoriteListing};

/// Errors raised by favorite repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FavoriteRepositoryError {
    /// Repository connection could not be established.
    #[error("favorite repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("favorite repository query failed: {message}")]
    Query { message: String },

    /// The (user, listing) pair is already bookmarked.
    #[error("listing is already favorited")]
    DuplicatePair,

    /// The referenced user or listing does not exist.
    #[error("favorite references an unknown user or listing")]
    InvalidReference,
}

impl FavoriteRepositoryError {
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

/// Port for bookmark storage. Pair uniqueness is the store's unique index;
/// adapters surface a violation as [`FavoriteRepositoryError::DuplicatePair`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Persist a bookmark.
    async fn insert(&self, favorite: &Favorite) -> Result<(), FavoriteRepositoryError>;

    /// Remove the matching pair if present. Removing an absent pair is not
    /// an error.
    async fn remove(&self, user_id: Uuid, listing_id: Uuid)
        -> Result<(), FavoriteRepositoryError>;

    /// The user's bookmarked listings currently in approved status, most
    /// recently bookmarked first.
    async fn list_approved(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FavoriteListing>, FavoriteRepositoryError>;
}
