//! Favorites: a user's bookmarks of specific listings.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::Listing;

/// A bookmark tying a user to a listing. The (user, listing) pair is unique;
/// a second bookmark attempt is rejected, never overwritten.
#[derive(Debug, Clone, PartialEq)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub listing_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    /// Build a fresh bookmark for the given pair.
    pub fn new(user_id: Uuid, listing_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            listing_id,
            created_at: Utc::now(),
        }
    }
}

/// A bookmarked listing with the moment it was bookmarked.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteListing {
    pub listing: Listing,
    pub favorited_at: DateTime<Utc>,
}
