//! Moderation queue: the only authority allowed to change listing status.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::identity_service::{caller_role, IdentityGate};
use crate::domain::ports::{ListingRepository, ListingRepositoryError};
use crate::domain::{Decision, Error, Listing, ListingStatus, ModerationListing};

/// Driving port for moderator review.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModerationQueue: Send + Sync {
    /// All listings with owner contact details, optionally restricted to one
    /// status. Moderators only.
    async fn review_queue(
        &self,
        caller_id: Uuid,
        status: Option<ListingStatus>,
    ) -> Result<Vec<ModerationListing>, Error>;

    /// Approve or reject a listing. Moderators only.
    async fn decide(
        &self,
        caller_id: Uuid,
        listing_id: Uuid,
        decision: Decision,
    ) -> Result<Listing, Error>;
}

/// Moderation service over the listing repository and identity gate.
#[derive(Clone)]
pub struct ModerationService<L> {
    listings: Arc<L>,
    identity: Arc<dyn IdentityGate>,
}

impl<L> ModerationService<L> {
    /// Create a new service with the given repository and identity gate.
    pub fn new(listings: Arc<L>, identity: Arc<dyn IdentityGate>) -> Self {
        Self { listings, identity }
    }
}

fn map_listing_error(error: ListingRepositoryError) -> Error {
    Error::internal(format!("listing repository error: {error}"))
}

impl<L> ModerationService<L> {
    async fn require_moderator(&self, caller_id: Uuid) -> Result<(), Error> {
        let role = caller_role(self.identity.as_ref(), caller_id).await?;
        if !role.can_moderate() {
            return Err(Error::unauthorized("moderator access required"));
        }
        Ok(())
    }
}

#[async_trait]
impl<L> ModerationQueue for ModerationService<L>
where
    L: ListingRepository,
{
    async fn review_queue(
        &self,
        caller_id: Uuid,
        status: Option<ListingStatus>,
    ) -> Result<Vec<ModerationListing>, Error> {
        self.require_moderator(caller_id).await?;
        self.listings
            .list_with_owner(status)
            .await
            .map_err(map_listing_error)
    }

    async fn decide(
        &self,
        caller_id: Uuid,
        listing_id: Uuid,
        decision: Decision,
    ) -> Result<Listing, Error> {
        self.require_moderator(caller_id).await?;

        let affected = self
            .listings
            .set_status(listing_id, decision.as_status())
            .await
            .map_err(map_listing_error)?;
        if affected == 0 {
            return Err(Error::not_found("listing not found"));
        }

        self.listings
            .find_by_id(listing_id)
            .await
            .map_err(map_listing_error)?
            .ok_or_else(|| Error::not_found("listing not found"))
    }
}
