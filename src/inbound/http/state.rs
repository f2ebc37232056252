//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::{
    ConversationEngine, FavoritesLedger, IdentityGate, ListingLifecycle, ModerationQueue,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<dyn IdentityGate>,
    pub listings: Arc<dyn ListingLifecycle>,
    pub moderation: Arc<dyn ModerationQueue>,
    pub favorites: Arc<dyn FavoritesLedger>,
    pub conversations: Arc<dyn ConversationEngine>,
}
