//! Favorites ledger: per-user bookmarks with pair uniqueness.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{FavoriteRepository, FavoriteRepositoryError};
use crate::domain::{Error, Favorite, FavoriteListing};

/// Driving port for bookmark management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoritesLedger: Send + Sync {
    /// The user's bookmarked listings currently in approved status.
    async fn list(&self, user_id: Uuid) -> Result<Vec<FavoriteListing>, Error>;

    /// Bookmark a listing. Bookmarking the same listing twice fails.
    async fn add(&self, user_id: Uuid, listing_id: Uuid) -> Result<Favorite, Error>;

    /// Drop a bookmark. Removing an absent bookmark succeeds quietly.
    async fn remove(&self, user_id: Uuid, listing_id: Uuid) -> Result<(), Error>;
}

/// Favorites service over the favorite repository port.
#[derive(Clone)]
pub struct FavoritesService<F> {
    favorites: Arc<F>,
}

impl<F> FavoritesService<F> {
    /// Create a new service with the given repository.
    pub fn new(favorites: Arc<F>) -> Self {
        Self { favorites }
    }
}

fn map_favorite_error(error: FavoriteRepositoryError) -> Error {
    match error {
        FavoriteRepositoryError::DuplicatePair => Error::duplicate("listing is already favorited"),
        FavoriteRepositoryError::InvalidReference => {
            Error::validation("unknown user or listing")
        }
        FavoriteRepositoryError::Connection { message }
        | FavoriteRepositoryError::Query { message } => {
            Error::internal(format!("favorite repository error: {message}"))
        }
    }
}

#[async_trait]
impl<F> FavoritesLedger for FavoritesService<F>
where
    F: FavoriteRepository,
{
    async fn list(&self, user_id: Uuid) -> Result<Vec<FavoriteListing>, Error> {
        self.favorites
            .list_approved(user_id)
            .await
            .map_err(map_favorite_error)
    }

    async fn add(&self, user_id: Uuid, listing_id: Uuid) -> Result<Favorite, Error> {
        let favorite = Favorite::new(user_id, listing_id);
        self.favorites
            .insert(&favorite)
            .await
            .map_err(map_favorite_error)?;
        Ok(favorite)
    }

    async fn remove(&self, user_id: Uuid, listing_id: Uuid) -> Result<(), Error> {
        self.favorites
            .remove(user_id, listing_id)
            .await
            .map_err(map_favorite_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockFavoriteRepository;
    use crate::domain::ErrorCode;

    #[tokio::test]
    async fn add_persists_a_new_pair() {
        let user_id = Uuid::new_v4();
        let listing_id = Uuid::new_v4();

        let mut repo = MockFavoriteRepository::new();
        repo.expect_insert()
            .withf(move |favorite| {
                favorite.user_id == user_id && favorite.listing_id == listing_id
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = FavoritesService::new(Arc::new(repo));
        let favorite = service.add(user_id, listing_id).await.expect("added");
        assert_eq!(favorite.user_id, user_id);
        assert_eq!(favorite.listing_id, listing_id);
    }

    #[tokio::test]
    async fn duplicate_pair_is_reported_as_duplicate() {
        let mut repo = MockFavoriteRepository::new();
        repo.expect_insert()
            .returning(|_| Err(FavoriteRepositoryError::DuplicatePair));

        let service = FavoritesService::new(Arc::new(repo));
        let err = service
            .add(Uuid::new_v4(), Uuid::new_v4())
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::Duplicate);
    }

    #[tokio::test]
    async fn unknown_listing_is_a_validation_failure() {
        let mut repo = MockFavoriteRepository::new();
        repo.expect_insert()
            .returning(|_| Err(FavoriteRepositoryError::InvalidReference));

        let service = FavoritesService::new(Arc::new(repo));
        let err = service
            .add(Uuid::new_v4(), Uuid::new_v4())
            .await
            .expect_err("bad reference");
        assert_eq!(err.code(), ErrorCode::Validation);
    }

    #[tokio::test]
    async fn remove_of_absent_pair_succeeds() {
        let mut repo = MockFavoriteRepository::new();
        repo.expect_remove().times(1).returning(|_, _| Ok(()));

        let service = FavoritesService::new(Arc::new(repo));
        service
            .remove(Uuid::new_v4(), Uuid::new_v4())
            .await
            .expect("idempotent remove");
    }
}
