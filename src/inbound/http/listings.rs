//! Listing HTTP handlers.
//!
//! ```text
//! GET    /api/v1/listings
//! POST   /api/v1/listings
//! GET    /api/v1/listings/{id}
//! PUT    /api/v1/listings/{id}
//! DELETE /api/v1/listings/{id}
//! GET    /api/v1/my-listings
//! ```

use std::str::FromStr;

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    Error, Listing, ListingDraft, ListingFilters, ListingPatch, ListingSort, OwnedListing,
    SortDirection, SortKey,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    missing_field_error, parse_optional_f64, parse_optional_i32, parse_uuid, require_uuid,
    FieldName,
};
use crate::inbound::http::ApiResult;

/// Public view of a listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub mileage: Option<i32>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub owner_id: String,
    pub status: String,
    pub created_at: String,
}

impl From<Listing> for ListingResponse {
    fn from(listing: Listing) -> Self {
        Self {
            id: listing.id.to_string(),
            make: listing.make,
            model: listing.model,
            year: listing.year,
            price: listing.price,
            mileage: listing.mileage,
            condition: listing.condition,
            description: listing.description,
            owner_id: listing.owner_id.to_string(),
            status: listing.status.as_str().to_owned(),
            created_at: listing.created_at.to_rfc3339(),
        }
    }
}

/// An owner's listing annotated with its bookmark count.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnedListingResponse {
    #[serde(flatten)]
    pub listing: ListingResponse,
    pub favorite_count: i64,
}

impl From<OwnedListing> for OwnedListingResponse {
    fn from(owned: OwnedListing) -> Self {
        Self {
            listing: ListingResponse::from(owned.listing),
            favorite_count: owned.favorite_count,
        }
    }
}

/// Listing creation request body. Any supplied status is ignored: creation
/// always lands in pending.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub user_id: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price: Option<f64>,
    pub mileage: Option<i32>,
    pub condition: Option<String>,
    pub description: Option<String>,
}

/// Listing update request body. `status` is declared only so a caller who
/// sends one gets a clear refusal instead of a silent drop.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingRequest {
    pub user_id: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price: Option<f64>,
    pub mileage: Option<i32>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// Search and sort query parameters. Everything arrives as a string and is
/// parsed strictly.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year_min: Option<String>,
    pub year_max: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub mileage_min: Option<String>,
    pub mileage_max: Option<String>,
    pub condition: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

fn parse_search_query(query: SearchQuery) -> Result<(ListingFilters, ListingSort), Error> {
    let filters = ListingFilters {
        make: query.make,
        model: query.model,
        year_min: parse_optional_i32(query.year_min, FieldName::new("year_min"))?,
        year_max: parse_optional_i32(query.year_max, FieldName::new("year_max"))?,
        price_min: parse_optional_f64(query.price_min, FieldName::new("price_min"))?,
        price_max: parse_optional_f64(query.price_max, FieldName::new("price_max"))?,
        mileage_min: parse_optional_i32(query.mileage_min, FieldName::new("mileage_min"))?,
        mileage_max: parse_optional_i32(query.mileage_max, FieldName::new("mileage_max"))?,
        condition: query.condition,
    };

    let default = ListingSort::default();
    let sort = ListingSort {
        key: query
            .sort_by
            .map(|raw| SortKey::from_str(&raw))
            .transpose()?
            .unwrap_or(default.key),
        direction: query
            .sort_order
            .map(|raw| SortDirection::from_str(&raw))
            .transpose()?
            .unwrap_or(default.direction),
    };

    Ok((filters, sort))
}

fn parse_create_request(payload: CreateListingRequest) -> Result<(uuid::Uuid, ListingDraft), Error> {
    let owner_id = payload
        .user_id
        .ok_or_else(|| missing_field_error(FieldName::new("userId")))?;
    let owner_id = parse_uuid(&owner_id, FieldName::new("userId"))?;

    let draft = ListingDraft {
        make: payload
            .make
            .ok_or_else(|| missing_field_error(FieldName::new("make")))?,
        model: payload
            .model
            .ok_or_else(|| missing_field_error(FieldName::new("model")))?,
        year: payload
            .year
            .ok_or_else(|| missing_field_error(FieldName::new("year")))?,
        price: payload
            .price
            .ok_or_else(|| missing_field_error(FieldName::new("price")))?,
        mileage: payload.mileage,
        condition: payload.condition,
        description: payload.description,
    };
    Ok((owner_id, draft))
}

fn parse_update_request(payload: UpdateListingRequest) -> Result<(uuid::Uuid, ListingPatch), Error> {
    if payload.status.is_some() {
        return Err(
            Error::validation("status is moderated; use the moderation endpoint").with_details(
                json!({ "field": "status", "code": "field_not_editable" }),
            ),
        );
    }

    let caller_id = payload
        .user_id
        .ok_or_else(|| missing_field_error(FieldName::new("userId")))?;
    let caller_id = parse_uuid(&caller_id, FieldName::new("userId"))?;

    let patch = ListingPatch {
        make: payload.make,
        model: payload.model,
        year: payload.year,
        price: payload.price,
        mileage: payload.mileage,
        condition: payload.condition,
        description: payload.description,
    };
    Ok((caller_id, patch))
}

/// Caller identity for query-addressed operations.
#[derive(Debug, Deserialize)]
pub struct CallerQuery {
    pub user_id: Option<String>,
}

/// Search approved listings.
#[utoipa::path(
    get,
    path = "/api/v1/listings",
    params(
        ("make" = Option<String>, Query, description = "Substring match on make"),
        ("model" = Option<String>, Query, description = "Substring match on model"),
        ("year_min" = Option<i32>, Query, description = "Inclusive lower bound"),
        ("year_max" = Option<i32>, Query, description = "Inclusive upper bound"),
        ("price_min" = Option<f64>, Query, description = "Inclusive lower bound"),
        ("price_max" = Option<f64>, Query, description = "Inclusive upper bound"),
        ("mileage_min" = Option<i32>, Query, description = "Inclusive lower bound"),
        ("mileage_max" = Option<i32>, Query, description = "Inclusive upper bound"),
        ("condition" = Option<String>, Query, description = "Exact condition match"),
        ("sort_by" = Option<String>, Query, description = "created_at, price, year or mileage"),
        ("sort_order" = Option<String>, Query, description = "asc or desc")
    ),
    responses(
        (status = 200, description = "Matching approved listings", body = [ListingResponse]),
        (status = 400, description = "Malformed filter or sort", body = Error)
    ),
    tags = ["listings"],
    operation_id = "searchListings"
)]
#[get("/listings")]
pub async fn search_listings(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<ListingResponse>>> {
    let (filters, sort) = parse_search_query(query.into_inner())?;
    let listings = state.listings.search(filters, sort).await?;
    Ok(web::Json(
        listings.into_iter().map(ListingResponse::from).collect(),
    ))
}

/// Create a listing; it enters the moderation queue as pending.
#[utoipa::path(
    post,
    path = "/api/v1/listings",
    request_body = CreateListingRequest,
    responses(
        (status = 201, description = "Created listing", body = ListingResponse),
        (status = 400, description = "Invalid listing fields", body = Error),
        (status = 403, description = "Unknown caller", body = Error)
    ),
    tags = ["listings"],
    operation_id = "createListing"
)]
#[post("/listings")]
pub async fn create_listing(
    state: web::Data<HttpState>,
    payload: web::Json<CreateListingRequest>,
) -> ApiResult<HttpResponse> {
    let (owner_id, draft) = parse_create_request(payload.into_inner())?;
    let listing = state.listings.create(owner_id, draft).await?;
    Ok(HttpResponse::Created().json(ListingResponse::from(listing)))
}

/// Fetch one listing by id, regardless of status.
#[utoipa::path(
    get,
    path = "/api/v1/listings/{id}",
    params(("id" = String, Path, description = "Listing identifier")),
    responses(
        (status = 200, description = "The listing", body = ListingResponse),
        (status = 404, description = "Listing not found", body = Error)
    ),
    tags = ["listings"],
    operation_id = "getListing"
)]
#[get("/listings/{id}")]
pub async fn get_listing(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ListingResponse>> {
    let id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    let listing = state.listings.get(id).await?;
    Ok(web::Json(ListingResponse::from(listing)))
}

/// Update a listing's editable fields. Owner or moderator only; status is
/// out of reach.
#[utoipa::path(
    put,
    path = "/api/v1/listings/{id}",
    params(("id" = String, Path, description = "Listing identifier")),
    request_body = UpdateListingRequest,
    responses(
        (status = 200, description = "Updated listing", body = ListingResponse),
        (status = 400, description = "Invalid fields or status supplied", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Listing not found", body = Error)
    ),
    tags = ["listings"],
    operation_id = "updateListing"
)]
#[put("/listings/{id}")]
pub async fn update_listing(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateListingRequest>,
) -> ApiResult<web::Json<ListingResponse>> {
    let id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    let (caller_id, patch) = parse_update_request(payload.into_inner())?;
    let listing = state.listings.update(id, caller_id, patch).await?;
    Ok(web::Json(ListingResponse::from(listing)))
}

/// Delete a listing. Owner or moderator only.
#[utoipa::path(
    delete,
    path = "/api/v1/listings/{id}",
    params(
        ("id" = String, Path, description = "Listing identifier"),
        ("user_id" = String, Query, description = "Caller identifier")
    ),
    responses(
        (status = 204, description = "Listing deleted"),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Listing not found", body = Error)
    ),
    tags = ["listings"],
    operation_id = "deleteListing"
)]
#[delete("/listings/{id}")]
pub async fn delete_listing(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<CallerQuery>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    let caller_id = require_uuid(query.into_inner().user_id, FieldName::new("user_id"))?;
    state.listings.delete(id, caller_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// The caller's own listings, any status, with bookmark counts.
#[utoipa::path(
    get,
    path = "/api/v1/my-listings",
    params(("user_id" = String, Query, description = "Owner identifier")),
    responses(
        (status = 200, description = "Owned listings", body = [OwnedListingResponse]),
        (status = 400, description = "Missing or malformed user_id", body = Error)
    ),
    tags = ["listings"],
    operation_id = "myListings"
)]
#[get("/my-listings")]
pub async fn my_listings(
    state: web::Data<HttpState>,
    query: web::Query<CallerQuery>,
) -> ApiResult<web::Json<Vec<OwnedListingResponse>>> {
    let owner_id = require_uuid(query.into_inner().user_id, FieldName::new("user_id"))?;
    let listings = state.listings.list_by_owner(owner_id).await?;
    Ok(web::Json(
        listings
            .into_iter()
            .map(OwnedListingResponse::from)
            .collect(),
    ))
}
