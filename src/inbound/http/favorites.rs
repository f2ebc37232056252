//! Favorites HTTP handlers.
//!
//! ```text
//! GET    /api/v1/favorites
//! POST   /api/v1/favorites
//! DELETE /api/v1/favorites
//! ```

use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Favorite, FavoriteListing};
use crate::inbound::http::listings::ListingResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    missing_field_error, parse_uuid, require_uuid, FieldName,
};
use crate::inbound::http::ApiResult;

/// A bookmarked listing, annotated with when it was bookmarked.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteListingResponse {
    #[serde(flatten)]
    pub listing: ListingResponse,
    pub favorited_at: String,
}

impl From<FavoriteListing> for FavoriteListingResponse {
    fn from(favorite: FavoriteListing) -> Self {
        Self {
            listing: ListingResponse::from(favorite.listing),
            favorited_at: favorite.favorited_at.to_rfc3339(),
        }
    }
}

/// Acknowledgement for a newly created bookmark.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    pub id: String,
    pub user_id: String,
    pub listing_id: String,
    pub created_at: String,
}

impl From<Favorite> for FavoriteResponse {
    fn from(favorite: Favorite) -> Self {
        Self {
            id: favorite.id.to_string(),
            user_id: favorite.user_id.to_string(),
            listing_id: favorite.listing_id.to_string(),
            created_at: favorite.created_at.to_rfc3339(),
        }
    }
}

/// Bookmark creation request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub listing_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FavoritesQuery {
    pub user_id: Option<String>,
    pub listing_id: Option<String>,
}

/// The caller's bookmarked listings currently in approved status.
#[utoipa::path(
    get,
    path = "/api/v1/favorites",
    params(("user_id" = String, Query, description = "Caller identifier")),
    responses(
        (status = 200, description = "Approved bookmarked listings", body = [FavoriteListingResponse]),
        (status = 400, description = "Missing or malformed user_id", body = Error)
    ),
    tags = ["favorites"],
    operation_id = "listFavorites"
)]
#[get("/favorites")]
pub async fn list_favorites(
    state: web::Data<HttpState>,
    query: web::Query<FavoritesQuery>,
) -> ApiResult<web::Json<Vec<FavoriteListingResponse>>> {
    let user_id = require_uuid(query.into_inner().user_id, FieldName::new("user_id"))?;
    let favorites = state.favorites.list(user_id).await?;
    Ok(web::Json(
        favorites
            .into_iter()
            .map(FavoriteListingResponse::from)
            .collect(),
    ))
}

/// Bookmark a listing. Bookmarking the same listing twice fails.
#[utoipa::path(
    post,
    path = "/api/v1/favorites",
    params(("user_id" = String, Query, description = "Caller identifier")),
    request_body = AddFavoriteRequest,
    responses(
        (status = 201, description = "Bookmark created", body = FavoriteResponse),
        (status = 400, description = "Duplicate pair or unknown reference", body = Error)
    ),
    tags = ["favorites"],
    operation_id = "addFavorite"
)]
#[post("/favorites")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    query: web::Query<FavoritesQuery>,
    payload: web::Json<AddFavoriteRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = require_uuid(query.into_inner().user_id, FieldName::new("user_id"))?;
    let listing_id = payload
        .into_inner()
        .listing_id
        .ok_or_else(|| missing_field_error(FieldName::new("listingId")))?;
    let listing_id = parse_uuid(&listing_id, FieldName::new("listingId"))?;

    let favorite = state.favorites.add(user_id, listing_id).await?;
    Ok(HttpResponse::Created().json(FavoriteResponse::from(favorite)))
}

/// Drop a bookmark. Removing an absent bookmark succeeds quietly.
#[utoipa::path(
    delete,
    path = "/api/v1/favorites",
    params(
        ("user_id" = String, Query, description = "Caller identifier"),
        ("listing_id" = String, Query, description = "Listing identifier")
    ),
    responses(
        (status = 204, description = "Bookmark removed or already absent"),
        (status = 400, description = "Missing or malformed identifiers", body = Error)
    ),
    tags = ["favorites"],
    operation_id = "removeFavorite"
)]
#[delete("/favorites")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    query: web::Query<FavoritesQuery>,
) -> ApiResult<HttpResponse> {
    let query = query.into_inner();
    let user_id = require_uuid(query.user_id, FieldName::new("user_id"))?;
    let listing_id = require_uuid(query.listing_id, FieldName::new("listing_id"))?;

    state.favorites.remove(user_id, listing_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
