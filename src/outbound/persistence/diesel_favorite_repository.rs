//! Diesel-backed favorite repository.
//!
//! Pair uniqueness and referential integrity live in the schema; this
//! adapter translates the corresponding constraint violations into the
//! port's distinct error variants.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use uuid::Uuid;

use super::models::{ListingRow, NewFavoriteRow};
use super::pool::{DbPool, RunError};
use super::schema::{favorites, listings};
use crate::domain::ports::{FavoriteRepository, FavoriteRepositoryError};
use crate::domain::{Favorite, FavoriteListing, ListingStatus};

/// SQLite implementation of [`FavoriteRepository`].
#[derive(Clone)]
pub struct DieselFavoriteRepository {
    pool: DbPool,
}

impl DieselFavoriteRepository {
    /// Create a repository backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_run_error(error: RunError) -> FavoriteRepositoryError {
    match error {
        RunError::Pool(err) => FavoriteRepositoryError::connection(err.to_string()),
        RunError::Query(diesel::result::Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            _,
        )) => FavoriteRepositoryError::DuplicatePair,
        RunError::Query(diesel::result::Error::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            _,
        )) => FavoriteRepositoryError::InvalidReference,
        RunError::Query(err) => FavoriteRepositoryError::query(err.to_string()),
    }
}

#[async_trait]
impl FavoriteRepository for DieselFavoriteRepository {
    async fn insert(&self, favorite: &Favorite) -> Result<(), FavoriteRepositoryError> {
        let row = NewFavoriteRow::from_domain(favorite);
        self.pool
            .run(move |conn| {
                diesel::insert_into(favorites::table)
                    .values(&row)
                    .execute(conn)
                    .map(|_| ())
            })
            .await
            .map_err(map_run_error)
    }

    async fn remove(
        &self,
        user_id: Uuid,
        listing_id: Uuid,
    ) -> Result<(), FavoriteRepositoryError> {
        let user_id = user_id.to_string();
        let listing_id = listing_id.to_string();
        self.pool
            .run(move |conn| {
                diesel::delete(
                    favorites::table
                        .filter(favorites::user_id.eq(user_id))
                        .filter(favorites::listing_id.eq(listing_id)),
                )
                .execute(conn)
                .map(|_| ())
            })
            .await
            .map_err(map_run_error)
    }

    async fn list_approved(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FavoriteListing>, FavoriteRepositoryError> {
        let user_id = user_id.to_string();
        self.pool
            .run(move |conn| {
                favorites::table
                    .inner_join(listings::table)
                    .filter(favorites::user_id.eq(user_id))
                    .filter(listings::status.eq(ListingStatus::Approved.as_str()))
                    .order(favorites::created_at.desc())
                    .select((ListingRow::as_select(), favorites::created_at))
                    .load::<(ListingRow, chrono::NaiveDateTime)>(conn)?
                    .into_iter()
                    .map(|(row, favorited_at)| {
                        Ok(FavoriteListing {
                            listing: row.into_domain()?,
                            favorited_at: chrono::DateTime::from_naive_utc_and_offset(
                                favorited_at,
                                chrono::Utc,
                            ),
                        })
                    })
                    .collect()
            })
            .await
            .map_err(map_run_error)
    }
}
