//! OpenAPI documentation configuration.
//!
//! Generates the OpenAPI specification for the REST API. The document is
//! served by Swagger UI in debug builds only.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::{LoginRequest, RegisterRequest, UserResponse};
use crate::inbound::http::conversations::{
    ConversationSummaryResponse, ListingContextResponse, MessageResponse, SendMessageRequest,
    ThreadMessageResponse,
};
use crate::inbound::http::favorites::{
    AddFavoriteRequest, FavoriteListingResponse, FavoriteResponse,
};
use crate::inbound::http::listings::{
    CreateListingRequest, ListingResponse, OwnedListingResponse, UpdateListingRequest,
};
use crate::inbound::http::moderation::{DecisionRequest, ModerationListingResponse};
use crate::inbound::http::{auth, conversations, favorites, health, listings, moderation};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kerbside marketplace API",
        description = "HTTP interface for listings, moderation, favorites and conversations."
    ),
    paths(
        health::ready,
        health::live,
        auth::login,
        auth::register,
        listings::search_listings,
        listings::create_listing,
        listings::get_listing,
        listings::update_listing,
        listings::delete_listing,
        listings::my_listings,
        favorites::list_favorites,
        favorites::add_favorite,
        favorites::remove_favorite,
        conversations::list_conversations,
        conversations::send_message,
        conversations::get_thread,
        moderation::review_queue,
        moderation::decide_listing,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginRequest,
        RegisterRequest,
        UserResponse,
        CreateListingRequest,
        UpdateListingRequest,
        ListingResponse,
        OwnedListingResponse,
        AddFavoriteRequest,
        FavoriteResponse,
        FavoriteListingResponse,
        SendMessageRequest,
        MessageResponse,
        ListingContextResponse,
        ConversationSummaryResponse,
        ThreadMessageResponse,
        DecisionRequest,
        ModerationListingResponse,
    )),
    tags(
        (name = "auth", description = "Login and registration"),
        (name = "listings", description = "Listing lifecycle and search"),
        (name = "favorites", description = "Per-user bookmarks"),
        (name = "conversations", description = "Direct messaging"),
        (name = "moderation", description = "Moderator review queue"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;
