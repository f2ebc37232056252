//! Conversation HTTP handlers.
//!
//! ```text
//! GET  /api/v1/conversations
//! POST /api/v1/conversations
//! GET  /api/v1/conversations/{counterparty_id}
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    ConversationSummary, Error, ListingContext, Message, NewMessage, ThreadMessage,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    missing_field_error, parse_uuid, require_uuid, FieldName,
};
use crate::inbound::http::ApiResult;

/// A delivered message.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub listing_id: Option<String>,
    pub message: String,
    pub read: bool,
    pub created_at: String,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id.to_string(),
            sender_id: message.sender_id.to_string(),
            receiver_id: message.receiver_id.to_string(),
            listing_id: message.listing_id.map(|id| id.to_string()),
            message: message.body,
            read: message.read,
            created_at: message.created_at.to_rfc3339(),
        }
    }
}

/// Vehicle context attached to a conversation summary.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingContextResponse {
    pub make: String,
    pub model: String,
    pub year: i32,
}

impl From<ListingContext> for ListingContextResponse {
    fn from(context: ListingContext) -> Self {
        Self {
            make: context.make,
            model: context.model,
            year: context.year,
        }
    }
}

/// One conversation per counterparty, most recent activity first.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummaryResponse {
    pub counterparty_id: String,
    pub counterparty_name: String,
    pub listing: Option<ListingContextResponse>,
    pub last_message_at: String,
    pub unread_count: i64,
}

impl From<ConversationSummary> for ConversationSummaryResponse {
    fn from(summary: ConversationSummary) -> Self {
        Self {
            counterparty_id: summary.counterparty_id.to_string(),
            counterparty_name: summary.counterparty_name,
            listing: summary.listing.map(ListingContextResponse::from),
            last_message_at: summary.last_message_at.to_rfc3339(),
            unread_count: summary.unread_count,
        }
    }
}

/// A transcript entry with sender and receiver display names.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThreadMessageResponse {
    #[serde(flatten)]
    pub message: MessageResponse,
    pub sender_name: String,
    pub receiver_name: String,
}

impl From<ThreadMessage> for ThreadMessageResponse {
    fn from(entry: ThreadMessage) -> Self {
        Self {
            message: MessageResponse::from(entry.message),
            sender_name: entry.sender_name,
            receiver_name: entry.receiver_name,
        }
    }
}

/// Message delivery request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub receiver_id: Option<String>,
    pub listing_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ViewerQuery {
    pub user_id: Option<String>,
}

fn parse_send_request(
    sender_id: uuid::Uuid,
    payload: SendMessageRequest,
) -> Result<NewMessage, Error> {
    let receiver_id = payload
        .receiver_id
        .ok_or_else(|| missing_field_error(FieldName::new("receiverId")))?;
    let receiver_id = parse_uuid(&receiver_id, FieldName::new("receiverId"))?;
    let listing_id = payload
        .listing_id
        .map(|raw| parse_uuid(&raw, FieldName::new("listingId")))
        .transpose()?;
    let body = payload
        .message
        .ok_or_else(|| missing_field_error(FieldName::new("message")))?;

    NewMessage::new(sender_id, receiver_id, listing_id, body)
}

/// The caller's conversations, one per counterparty.
#[utoipa::path(
    get,
    path = "/api/v1/conversations",
    params(("user_id" = String, Query, description = "Caller identifier")),
    responses(
        (status = 200, description = "Conversation summaries", body = [ConversationSummaryResponse]),
        (status = 400, description = "Missing or malformed user_id", body = Error)
    ),
    tags = ["conversations"],
    operation_id = "listConversations"
)]
#[get("/conversations")]
pub async fn list_conversations(
    state: web::Data<HttpState>,
    query: web::Query<ViewerQuery>,
) -> ApiResult<web::Json<Vec<ConversationSummaryResponse>>> {
    let user_id = require_uuid(query.into_inner().user_id, FieldName::new("user_id"))?;
    let summaries = state.conversations.conversations(user_id).await?;
    Ok(web::Json(
        summaries
            .into_iter()
            .map(ConversationSummaryResponse::from)
            .collect(),
    ))
}

/// Deliver a message to another user, optionally about a listing.
#[utoipa::path(
    post,
    path = "/api/v1/conversations",
    params(("user_id" = String, Query, description = "Sender identifier")),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Delivered message", body = MessageResponse),
        (status = 400, description = "Missing receiver or blank message", body = Error)
    ),
    tags = ["conversations"],
    operation_id = "sendMessage"
)]
#[post("/conversations")]
pub async fn send_message(
    state: web::Data<HttpState>,
    query: web::Query<ViewerQuery>,
    payload: web::Json<SendMessageRequest>,
) -> ApiResult<HttpResponse> {
    let sender_id = require_uuid(query.into_inner().user_id, FieldName::new("user_id"))?;
    let new_message = parse_send_request(sender_id, payload.into_inner())?;
    let message = state.conversations.send(new_message).await?;
    Ok(HttpResponse::Created().json(MessageResponse::from(message)))
}

/// The full transcript with one counterparty. Fetching it marks their
/// messages to the caller as read.
#[utoipa::path(
    get,
    path = "/api/v1/conversations/{counterparty_id}",
    params(
        ("counterparty_id" = String, Path, description = "Counterparty identifier"),
        ("user_id" = String, Query, description = "Caller identifier")
    ),
    responses(
        (status = 200, description = "Transcript, oldest first", body = [ThreadMessageResponse]),
        (status = 400, description = "Missing or malformed identifiers", body = Error)
    ),
    tags = ["conversations"],
    operation_id = "getThread"
)]
#[get("/conversations/{counterparty_id}")]
pub async fn get_thread(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<ViewerQuery>,
) -> ApiResult<web::Json<Vec<ThreadMessageResponse>>> {
    let counterparty_id = parse_uuid(&path.into_inner(), FieldName::new("counterparty_id"))?;
    let user_id = require_uuid(query.into_inner().user_id, FieldName::new("user_id"))?;
    let transcript = state.conversations.thread(user_id, counterparty_id).await?;
    Ok(web::Json(
        transcript
            .into_iter()
            .map(ThreadMessageResponse::from)
            .collect(),
    ))
}
