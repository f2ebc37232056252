//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod conversations;
pub mod error;
pub mod favorites;
pub mod health;
pub mod listings;
pub mod moderation;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::{web, Scope};

pub use error::ApiResult;

/// Every versioned API route under one scope, shared by the server and the
/// integration tests.
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .service(auth::login)
        .service(auth::register)
        .service(listings::search_listings)
        .service(listings::create_listing)
        .service(listings::my_listings)
        .service(listings::get_listing)
        .service(listings::update_listing)
        .service(listings::delete_listing)
        .service(favorites::list_favorites)
        .service(favorites::add_favorite)
        .service(favorites::remove_favorite)
        .service(conversations::list_conversations)
        .service(conversations::send_message)
        .service(conversations::get_thread)
        .service(moderation::review_queue)
        .service(moderation::decide_listing)
}
