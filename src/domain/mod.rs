//! Core marketplace domain: entities, validation, services and the ports
//! they drive.

mod conversation_service;
mod error;
mod favorite;
mod favorites_service;
mod identity_service;
mod listing;
mod listing_service;
mod message;
mod moderation_service;
mod user;

pub mod ports;

pub use conversation_service::{ConversationEngine, ConversationService};
pub use error::{Error, ErrorCode};
pub use favorite::{Favorite, FavoriteListing};
pub use favorites_service::{FavoritesLedger, FavoritesService};
pub use identity_service::{IdentityGate, IdentityService};
pub use listing::{
    Decision, Listing, ListingDraft, ListingFilters, ListingPatch, ListingSort, ListingStatus,
    ModerationListing, OwnedListing, SortDirection, SortKey,
};
pub use listing_service::{ListingLifecycle, ListingService};
pub use message::{
    group_conversations, ConversationGroup, ConversationSummary, ListingContext, Message,
    NewMessage, ThreadMessage,
};
pub use moderation_service::{ModerationQueue, ModerationService};
pub use user::{Registration, Role, User};

#[cfg(test)]
pub use conversation_service::MockConversationEngine;
#[cfg(test)]
pub use favorites_service::MockFavoritesLedger;
#[cfg(test)]
pub use identity_service::MockIdentityGate;
#[cfg(test)]
pub use listing_service::MockListingLifecycle;
#[cfg(test)]
pub use moderation_service::MockModerationQueue;
