//! Direct messages and the conversation aggregation engine.
//!
//! A conversation is not stored: it is a derived grouping of all messages
//! between exactly two users, keyed by "the other party" relative to a
//! viewing user. The grouping itself is a pure function here so its
//! invariants (directional unread counts, last-activity ordering, most
//! recent listing context) are unit-testable without a store.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::Error;

/// A stored direct message. Immutable once created except for the read
/// flag, which only ever transitions unread→read.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub listing_id: Option<Uuid>,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Validated input for sending a message. Sender == receiver is permitted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub listing_id: Option<Uuid>,
    pub body: String,
}

impl NewMessage {
    /// Validate the body: required and non-blank.
    pub fn new(
        sender_id: Uuid,
        receiver_id: Uuid,
        listing_id: Option<Uuid>,
        body: impl Into<String>,
    ) -> Result<Self, Error> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(Error::validation("message body is required"));
        }
        Ok(Self {
            sender_id,
            receiver_id,
            listing_id,
            body,
        })
    }
}

/// Snippet of the listing a conversation most recently referenced.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingContext {
    pub make: String,
    pub model: String,
    pub year: i32,
}

/// Per-counterparty conversation summary for a viewing user.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSummary {
    pub counterparty_id: Uuid,
    pub counterparty_name: String,
    pub listing: Option<ListingContext>,
    pub last_message_at: DateTime<Utc>,
    pub unread_count: i64,
}

/// A transcript entry decorated with display names.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadMessage {
    pub message: Message,
    pub sender_name: String,
    pub receiver_name: String,
}

/// Raw per-counterparty aggregate before names and listing snippets are
/// attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationGroup {
    pub counterparty_id: Uuid,
    /// Listing referenced by the newest message in the group, if that
    /// message carried one.
    pub last_listing_id: Option<Uuid>,
    pub last_message_at: DateTime<Utc>,
    pub unread_count: i64,
}

/// Group a flat message log into per-counterparty aggregates for `viewer`.
///
/// All messages with the same other party collapse into a single group
/// regardless of how many listings were discussed; the listing context is
/// taken from the newest message only. The unread count is directional:
/// only unread messages addressed to the viewer are counted, never ones the
/// viewer sent. Groups come back ordered by last activity, newest first.
pub fn group_conversations(viewer: Uuid, messages: &[Message]) -> Vec<ConversationGroup> {
    let mut groups: Vec<ConversationGroup> = Vec::new();

    for message in messages {
        let counterparty = if message.sender_id == viewer {
            message.receiver_id
        } else {
            message.sender_id
        };
        let unread_for_viewer = !message.read && message.receiver_id == viewer;

        match groups
            .iter_mut()
            .find(|g| g.counterparty_id == counterparty)
        {
            Some(group) => {
                if message.created_at >= group.last_message_at {
                    group.last_message_at = message.created_at;
                    group.last_listing_id = message.listing_id;
                }
                if unread_for_viewer {
                    group.unread_count += 1;
                }
            }
            None => groups.push(ConversationGroup {
                counterparty_id: counterparty,
                last_listing_id: message.listing_id,
                last_message_at: message.created_at,
                unread_count: i64::from(unread_for_viewer),
            }),
        }
    }

    groups.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
    groups
}
