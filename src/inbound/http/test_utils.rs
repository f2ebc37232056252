//! Helpers for exercising HTTP handlers against mocked driving ports.

use std::sync::Arc;

use actix_web::web;

use crate::domain::{
    MockConversationEngine, MockFavoritesLedger, MockIdentityGate, MockListingLifecycle,
    MockModerationQueue,
};
use crate::inbound::http::state::HttpState;

/// Builds an [`HttpState`] out of mocks, configuring only the ports a test
/// cares about.
pub(crate) struct StateBuilder {
    identity: MockIdentityGate,
    listings: MockListingLifecycle,
    moderation: MockModerationQueue,
    favorites: MockFavoritesLedger,
    conversations: MockConversationEngine,
}

impl StateBuilder {
    pub(crate) fn new() -> Self {
        Self {
            identity: MockIdentityGate::new(),
            listings: MockListingLifecycle::new(),
            moderation: MockModerationQueue::new(),
            favorites: MockFavoritesLedger::new(),
            conversations: MockConversationEngine::new(),
        }
    }

    pub(crate) fn identity(mut self, configure: impl FnOnce(&mut MockIdentityGate)) -> Self {
        configure(&mut self.identity);
        self
    }

    pub(crate) fn listings(mut self, configure: impl FnOnce(&mut MockListingLifecycle)) -> Self {
        configure(&mut self.listings);
        self
    }

    pub(crate) fn moderation(mut self, configure: impl FnOnce(&mut MockModerationQueue)) -> Self {
        configure(&mut self.moderation);
        self
    }

    pub(crate) fn favorites(mut self, configure: impl FnOnce(&mut MockFavoritesLedger)) -> Self {
        configure(&mut self.favorites);
        self
    }

    pub(crate) fn conversations(
        mut self,
        configure: impl FnOnce(&mut MockConversationEngine),
    ) -> Self {
        configure(&mut self.conversations);
        self
    }

    pub(crate) fn build(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            identity: Arc::new(self.identity),
            listings: Arc::new(self.listings),
            moderation: Arc::new(self.moderation),
            favorites: Arc::new(self.favorites),
            conversations: Arc::new(self.conversations),
        })
    }
}
