//! Conversation engine: message delivery, per-counterparty summaries and
//! read-marking thread retrieval.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::message::group_conversations;
use crate::domain::ports::{
    ListingRepository, MessageRepository, MessageRepositoryError, UserRepository,
};
use crate::domain::{
    ConversationSummary, Error, Listing, ListingContext, Message, NewMessage, ThreadMessage,
};

/// Driving port for messaging.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationEngine: Send + Sync {
    /// Deliver a message; it starts unread.
    async fn send(&self, message: NewMessage) -> Result<Message, Error>;

    /// One summary per counterparty the user has exchanged messages with,
    /// most recent activity first.
    async fn conversations(&self, user_id: Uuid) -> Result<Vec<ConversationSummary>, Error>;

    /// The full transcript with one counterparty, oldest first. Fetching it
    /// marks the counterparty's messages to the user as read.
    async fn thread(
        &self,
        user_id: Uuid,
        counterparty_id: Uuid,
    ) -> Result<Vec<ThreadMessage>, Error>;
}

/// Conversation service over the message, user and listing ports.
#[derive(Clone)]
pub struct ConversationService<M, U, L> {
    messages: Arc<M>,
    users: Arc<U>,
    listings: Arc<L>,
}

impl<M, U, L> ConversationService<M, U, L> {
    /// Create a new service with the given repositories.
    pub fn new(messages: Arc<M>, users: Arc<U>, listings: Arc<L>) -> Self {
        Self {
            messages,
            users,
            listings,
        }
    }
}

fn map_message_error(error: MessageRepositoryError) -> Error {
    Error::internal(format!("message repository error: {error}"))
}

fn listing_context(listing: Listing) -> ListingContext {
    ListingContext {
        make: listing.make,
        model: listing.model,
        year: listing.year,
    }
}

#[async_trait]
impl<M, U, L> ConversationEngine for ConversationService<M, U, L>
where
    M: MessageRepository,
    U: UserRepository,
    L: ListingRepository,
{
    async fn send(&self, message: NewMessage) -> Result<Message, Error> {
        let message = Message {
            id: Uuid::new_v4(),
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            listing_id: message.listing_id,
            body: message.body,
            read: false,
            created_at: Utc::now(),
        };

        self.messages
            .insert(&message)
            .await
            .map_err(map_message_error)?;
        Ok(message)
    }

    async fn conversations(&self, user_id: Uuid) -> Result<Vec<ConversationSummary>, Error> {
        let messages = self
            .messages
            .list_involving(user_id)
            .await
            .map_err(map_message_error)?;

        let mut summaries = Vec::new();
        for group in group_conversations(user_id, &messages) {
            let counterparty = self
                .users
                .find_by_id(group.counterparty_id)
                .await
                .map_err(|err| Error::internal(format!("user repository error: {err}")))?
                .ok_or_else(|| Error::internal("message references an unknown user"))?;

            // Left-join semantics: a deleted listing leaves the summary
            // without context rather than failing the call.
            let listing = match group.last_listing_id {
                Some(listing_id) => self
                    .listings
                    .find_by_id(listing_id)
                    .await
                    .map_err(|err| Error::internal(format!("listing repository error: {err}")))?
                    .map(listing_context),
                None => None,
            };

            summaries.push(ConversationSummary {
                counterparty_id: group.counterparty_id,
                counterparty_name: counterparty.display_name(),
                listing,
                last_message_at: group.last_message_at,
                unread_count: group.unread_count,
            });
        }
        Ok(summaries)
    }

    async fn thread(
        &self,
        user_id: Uuid,
        counterparty_id: Uuid,
    ) -> Result<Vec<ThreadMessage>, Error> {
        self.messages
            .thread(user_id, counterparty_id)
            .await
            .map_err(map_message_error)
    }
}
