//! Port for listing persistence and queries.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Listing, ListingFilters, ListingPatch, ListingSort, ListingStatus, ModerationListing,
    OwnedListing,
};

/// Errors raised by listing repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingRepositoryError {
    /// Repository connection could not be established.
    #[error("listing repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("listing repository query failed: {message}")]
    Query { message: String },
}

impl ListingRepositoryError {
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

/// Port for listing storage, search and conditional mutation.
///
/// The mutating operations take an optional `required_owner`: when present
/// the write carries a `... AND owner_id = ?` predicate so the ownership
/// check is enforced atomically by the store rather than by a prior read.
/// They return the number of rows affected; callers disambiguate zero into
/// "absent" versus "not yours" with a follow-up read.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Persist a freshly created listing.
    async fn insert(&self, listing: &Listing) -> Result<(), ListingRepositoryError>;

    /// Fetch one listing by id, regardless of status.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, ListingRepositoryError>;

    /// Search approved listings with conjunctive filters and an
    /// allow-listed sort.
    async fn search(
        &self,
        filters: &ListingFilters,
        sort: ListingSort,
    ) -> Result<Vec<Listing>, ListingRepositoryError>;

    /// Apply a sparse field patch, optionally conditioned on ownership.
    /// The patch must not be empty.
    async fn update_fields(
        &self,
        id: Uuid,
        required_owner: Option<Uuid>,
        patch: &ListingPatch,
    ) -> Result<usize, ListingRepositoryError>;

    /// Move a listing into the given status unconditionally.
    async fn set_status(
        &self,
        id: Uuid,
        status: ListingStatus,
    ) -> Result<usize, ListingRepositoryError>;

    /// Delete a listing, optionally conditioned on ownership.
    async fn delete(
        &self,
        id: Uuid,
        required_owner: Option<Uuid>,
    ) -> Result<usize, ListingRepositoryError>;

    /// Every listing owned by the user, any status, newest first, with
    /// bookmark counts.
    async fn list_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<OwnedListing>, ListingRepositoryError>;

    /// All listings joined with owner contact details for moderator review,
    /// optionally restricted to one status, newest first.
    async fn list_with_owner(
        &self,
        status: Option<ListingStatus>,
    ) -> Result<Vec<ModerationListing>, ListingRepositoryError>;
}
