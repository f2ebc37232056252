//! Listing lifecycle: creation, search, owner views and conditional
//! mutation.
//!
//! Every mutation resolves the caller through the identity gate first, then
//! delegates the ownership check to the repository as a conditional write.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::identity_service::{caller_role, IdentityGate};
use crate::domain::ports::{ListingRepository, ListingRepositoryError};
use crate::domain::{
    Error, Listing, ListingDraft, ListingFilters, ListingPatch, ListingSort, ListingStatus,
    OwnedListing,
};

/// Driving port for the listing lifecycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingLifecycle: Send + Sync {
    /// Create a listing for the caller; it always enters pending status.
    async fn create(&self, owner_id: Uuid, draft: ListingDraft) -> Result<Listing, Error>;

    /// Search approved listings with conjunctive filters and an allow-listed
    /// sort.
    async fn search(&self, filters: ListingFilters, sort: ListingSort)
        -> Result<Vec<Listing>, Error>;

    /// Fetch one listing by id, regardless of status.
    async fn get(&self, id: Uuid) -> Result<Listing, Error>;

    /// Apply a sparse field patch. Only the owner or a moderator may do so;
    /// the status field is out of reach here.
    async fn update(&self, id: Uuid, caller_id: Uuid, patch: ListingPatch)
        -> Result<Listing, Error>;

    /// Remove a listing. Only the owner or a moderator may do so.
    async fn delete(&self, id: Uuid, caller_id: Uuid) -> Result<(), Error>;

    /// Every listing owned by the user, any status, with bookmark counts.
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<OwnedListing>, Error>;
}

/// Listing service over the listing repository and identity gate.
#[derive(Clone)]
pub struct ListingService<L> {
    listings: Arc<L>,
    identity: Arc<dyn IdentityGate>,
}

impl<L> ListingService<L> {
    /// Create a new service with the given repository and identity gate.
    pub fn new(listings: Arc<L>, identity: Arc<dyn IdentityGate>) -> Self {
        Self { listings, identity }
    }
}

fn map_listing_error(error: ListingRepositoryError) -> Error {
    Error::internal(format!("listing repository error: {error}"))
}

impl<L> ListingService<L>
where
    L: ListingRepository,
{
    /// Turn a zero-row conditional write into the right refusal: the row is
    /// either absent or owned by someone else.
    async fn explain_missed_write(&self, id: Uuid) -> Error {
        match self.listings.find_by_id(id).await {
            Ok(None) => Error::not_found("listing not found"),
            Ok(Some(_)) => Error::unauthorized("only the owner or a moderator may modify a listing"),
            Err(err) => map_listing_error(err),
        }
    }
}

#[async_trait]
impl<L> ListingLifecycle for ListingService<L>
where
    L: ListingRepository,
{
    async fn create(&self, owner_id: Uuid, draft: ListingDraft) -> Result<Listing, Error> {
        draft.validate()?;
        caller_role(self.identity.as_ref(), owner_id).await?;

        let listing = Listing {
            id: Uuid::new_v4(),
            make: draft.make,
            model: draft.model,
            year: draft.year,
            price: draft.price,
            mileage: draft.mileage,
            condition: draft.condition,
            description: draft.description,
            owner_id,
            status: ListingStatus::Pending,
            created_at: Utc::now(),
        };

        self.listings
            .insert(&listing)
            .await
            .map_err(map_listing_error)?;
        Ok(listing)
    }

    async fn search(
        &self,
        filters: ListingFilters,
        sort: ListingSort,
    ) -> Result<Vec<Listing>, Error> {
        self.listings
            .search(&filters, sort)
            .await
            .map_err(map_listing_error)
    }

    async fn get(&self, id: Uuid) -> Result<Listing, Error> {
        self.listings
            .find_by_id(id)
            .await
            .map_err(map_listing_error)?
            .ok_or_else(|| Error::not_found("listing not found"))
    }

    async fn update(
        &self,
        id: Uuid,
        caller_id: Uuid,
        patch: ListingPatch,
    ) -> Result<Listing, Error> {
        patch.validate()?;
        let role = caller_role(self.identity.as_ref(), caller_id).await?;
        let required_owner = (!role.can_moderate()).then_some(caller_id);

        if patch.is_empty() {
            // Nothing to write; still enforce visibility and ownership.
            let listing = self.get(id).await?;
            if required_owner.is_some_and(|owner| listing.owner_id != owner) {
                return Err(Error::unauthorized(
                    "only the owner or a moderator may modify a listing",
                ));
            }
            return Ok(listing);
        }

        let affected = self
            .listings
            .update_fields(id, required_owner, &patch)
            .await
            .map_err(map_listing_error)?;
        if affected == 0 {
            return Err(self.explain_missed_write(id).await);
        }

        self.get(id).await
    }

    async fn delete(&self, id: Uuid, caller_id: Uuid) -> Result<(), Error> {
        let role = caller_role(self.identity.as_ref(), caller_id).await?;
        let required_owner = (!role.can_moderate()).then_some(caller_id);

        let affected = self
            .listings
            .delete(id, required_owner)
            .await
            .map_err(map_listing_error)?;
        if affected == 0 {
            return Err(self.explain_missed_write(id).await);
        }
        Ok(())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<OwnedListing>, Error> {
        self.listings
            .list_by_owner(owner_id)
            .await
            .map_err(map_listing_error)
    }
}
