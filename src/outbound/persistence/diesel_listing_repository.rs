//! Diesel-backed listing repository.
//!
//! Search composes a boxed query from conjunctive filters; the sort is an
//! exhaustive match over the allow-listed keys, so caller input never
//! reaches the SQL text. Ownership-conditioned writes carry the owner
//! predicate in the statement itself and report rows affected.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use super::models::{ListingChangeset, ListingRow, NewListingRow};
use super::pool::{DbPool, RunError};
use super::schema::{favorites, listings, users};
use crate::domain::ports::{ListingRepository, ListingRepositoryError};
use crate::domain::{
    Listing, ListingFilters, ListingPatch, ListingSort, ListingStatus, ModerationListing,
    OwnedListing, SortDirection, SortKey,
};

/// SQLite implementation of [`ListingRepository`].
#[derive(Clone)]
pub struct DieselListingRepository {
    pool: DbPool,
}

impl DieselListingRepository {
    /// Create a repository backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_run_error(error: RunError) -> ListingRepositoryError {
    match error {
        RunError::Pool(err) => ListingRepositoryError::connection(err.to_string()),
        RunError::Query(err) => ListingRepositoryError::query(err.to_string()),
    }
}

fn changeset_from(patch: &ListingPatch) -> ListingChangeset {
    ListingChangeset {
        make: patch.make.clone(),
        model: patch.model.clone(),
        year: patch.year,
        price: patch.price,
        mileage: patch.mileage,
        condition: patch.condition.clone(),
        description: patch.description.clone(),
    }
}

#[async_trait]
impl ListingRepository for DieselListingRepository {
    async fn insert(&self, listing: &Listing) -> Result<(), ListingRepositoryError> {
        let row = NewListingRow::from_domain(listing);
        self.pool
            .run(move |conn| {
                diesel::insert_into(listings::table)
                    .values(&row)
                    .execute(conn)
                    .map(|_| ())
            })
            .await
            .map_err(map_run_error)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, ListingRepositoryError> {
        let id = id.to_string();
        self.pool
            .run(move |conn| {
                listings::table
                    .find(id)
                    .select(ListingRow::as_select())
                    .first::<ListingRow>(conn)
                    .optional()?
                    .map(ListingRow::into_domain)
                    .transpose()
            })
            .await
            .map_err(map_run_error)
    }

    async fn search(
        &self,
        filters: &ListingFilters,
        sort: ListingSort,
    ) -> Result<Vec<Listing>, ListingRepositoryError> {
        let filters = filters.clone();
        self.pool
            .run(move |conn| {
                let mut query = listings::table
                    .filter(listings::status.eq(ListingStatus::Approved.as_str()))
                    .into_boxed();

                if let Some(make) = filters.make {
                    query = query.filter(listings::make.like(format!("%{make}%")));
                }
                if let Some(model) = filters.model {
                    query = query.filter(listings::model.like(format!("%{model}%")));
                }
                if let Some(year_min) = filters.year_min {
                    query = query.filter(listings::year.ge(year_min));
                }
                if let Some(year_max) = filters.year_max {
                    query = query.filter(listings::year.le(year_max));
                }
                if let Some(price_min) = filters.price_min {
                    query = query.filter(listings::price.ge(price_min));
                }
                if let Some(price_max) = filters.price_max {
                    query = query.filter(listings::price.le(price_max));
                }
                if let Some(mileage_min) = filters.mileage_min {
                    query = query.filter(listings::mileage.ge(mileage_min));
                }
                if let Some(mileage_max) = filters.mileage_max {
                    query = query.filter(listings::mileage.le(mileage_max));
                }
                if let Some(condition) = filters.condition {
                    query = query.filter(listings::condition.eq(condition));
                }

                query = match (sort.key, sort.direction) {
                    (SortKey::CreatedAt, SortDirection::Asc) => {
                        query.order(listings::created_at.asc())
                    }
                    (SortKey::CreatedAt, SortDirection::Desc) => {
                        query.order(listings::created_at.desc())
                    }
                    (SortKey::Price, SortDirection::Asc) => query.order(listings::price.asc()),
                    (SortKey::Price, SortDirection::Desc) => query.order(listings::price.desc()),
                    (SortKey::Year, SortDirection::Asc) => query.order(listings::year.asc()),
                    (SortKey::Year, SortDirection::Desc) => query.order(listings::year.desc()),
                    (SortKey::Mileage, SortDirection::Asc) => query.order(listings::mileage.asc()),
                    (SortKey::Mileage, SortDirection::Desc) => {
                        query.order(listings::mileage.desc())
                    }
                };

                query
                    .select(ListingRow::as_select())
                    .load::<ListingRow>(conn)?
                    .into_iter()
                    .map(ListingRow::into_domain)
                    .collect()
            })
            .await
            .map_err(map_run_error)
    }

    async fn update_fields(
        &self,
        id: Uuid,
        required_owner: Option<Uuid>,
        patch: &ListingPatch,
    ) -> Result<usize, ListingRepositoryError> {
        let id = id.to_string();
        let owner = required_owner.map(|owner| owner.to_string());
        let changeset = changeset_from(patch);
        self.pool
            .run(move |conn| match owner {
                Some(owner) => diesel::update(
                    listings::table
                        .filter(listings::id.eq(id))
                        .filter(listings::owner_id.eq(owner)),
                )
                .set(&changeset)
                .execute(conn),
                None => diesel::update(listings::table.filter(listings::id.eq(id)))
                    .set(&changeset)
                    .execute(conn),
            })
            .await
            .map_err(map_run_error)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ListingStatus,
    ) -> Result<usize, ListingRepositoryError> {
        let id = id.to_string();
        self.pool
            .run(move |conn| {
                diesel::update(listings::table.filter(listings::id.eq(id)))
                    .set(listings::status.eq(status.as_str()))
                    .execute(conn)
            })
            .await
            .map_err(map_run_error)
    }

    async fn delete(
        &self,
        id: Uuid,
        required_owner: Option<Uuid>,
    ) -> Result<usize, ListingRepositoryError> {
        let id = id.to_string();
        let owner = required_owner.map(|owner| owner.to_string());
        self.pool
            .run(move |conn| match owner {
                Some(owner) => diesel::delete(
                    listings::table
                        .filter(listings::id.eq(id))
                        .filter(listings::owner_id.eq(owner)),
                )
                .execute(conn),
                None => {
                    diesel::delete(listings::table.filter(listings::id.eq(id))).execute(conn)
                }
            })
            .await
            .map_err(map_run_error)
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<OwnedListing>, ListingRepositoryError> {
        let owner_id = owner_id.to_string();
        self.pool
            .run(move |conn| {
                let rows = listings::table
                    .filter(listings::owner_id.eq(owner_id))
                    .order(listings::created_at.desc())
                    .select(ListingRow::as_select())
                    .load::<ListingRow>(conn)?;

                let ids: Vec<String> = rows.iter().map(|row| row.id.clone()).collect();
                let counts: HashMap<String, i64> = favorites::table
                    .filter(favorites::listing_id.eq_any(&ids))
                    .group_by(favorites::listing_id)
                    .select((favorites::listing_id, diesel::dsl::count_star()))
                    .load::<(String, i64)>(conn)?
                    .into_iter()
                    .collect();

                rows.into_iter()
                    .map(|row| {
                        let favorite_count = counts.get(&row.id).copied().unwrap_or(0);
                        Ok(OwnedListing {
                            listing: row.into_domain()?,
                            favorite_count,
                        })
                    })
                    .collect()
            })
            .await
            .map_err(map_run_error)
    }

    async fn list_with_owner(
        &self,
        status: Option<ListingStatus>,
    ) -> Result<Vec<ModerationListing>, ListingRepositoryError> {
        self.pool
            .run(move |conn| {
                let mut query = listings::table.inner_join(users::table).into_boxed();
                if let Some(status) = status {
                    query = query.filter(listings::status.eq(status.as_str()));
                }

                query
                    .order(listings::created_at.desc())
                    .select((
                        ListingRow::as_select(),
                        users::first_name,
                        users::last_name,
                        users::email,
                        users::phone,
                    ))
                    .load::<(ListingRow, String, String, String, Option<String>)>(conn)?
                    .into_iter()
                    .map(|(row, first_name, last_name, email, phone)| {
                        Ok(ModerationListing {
                            listing: row.into_domain()?,
                            owner_name: format!("{first_name} {last_name}"),
                            owner_email: email,
                            owner_phone: phone,
                        })
                    })
                    .collect()
            })
            .await
            .map_err(map_run_error)
    }
}
