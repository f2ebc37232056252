//! Moderation HTTP handlers.
//!
//! ```text
//! GET /api/v1/moderation/listings
//! PUT /api/v1/moderation/listings/{id}
//! ```

use std::str::FromStr;

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Decision, Error, ListingStatus, ModerationListing};
use crate::inbound::http::listings::ListingResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    missing_field_error, parse_uuid, require_uuid, FieldName,
};
use crate::inbound::http::ApiResult;

/// A listing in the review queue, joined with owner contact details.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModerationListingResponse {
    #[serde(flatten)]
    pub listing: ListingResponse,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_phone: Option<String>,
}

impl From<ModerationListing> for ModerationListingResponse {
    fn from(entry: ModerationListing) -> Self {
        Self {
            listing: ListingResponse::from(entry.listing),
            owner_name: entry.owner_name,
            owner_email: entry.owner_email,
            owner_phone: entry.owner_phone,
        }
    }
}

/// Moderation decision request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    pub decision: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ModerationQuery {
    pub user_id: Option<String>,
    pub status: Option<String>,
}

/// The review queue. Moderators only.
#[utoipa::path(
    get,
    path = "/api/v1/moderation/listings",
    params(
        ("user_id" = String, Query, description = "Caller identifier"),
        ("status" = Option<String>, Query, description = "pending, approved or rejected")
    ),
    responses(
        (status = 200, description = "Listings with owner contact details", body = [ModerationListingResponse]),
        (status = 400, description = "Malformed status filter", body = Error),
        (status = 403, description = "Caller is not a moderator", body = Error)
    ),
    tags = ["moderation"],
    operation_id = "reviewQueue"
)]
#[get("/moderation/listings")]
pub async fn review_queue(
    state: web::Data<HttpState>,
    query: web::Query<ModerationQuery>,
) -> ApiResult<web::Json<Vec<ModerationListingResponse>>> {
    let query = query.into_inner();
    let caller_id = require_uuid(query.user_id, FieldName::new("user_id"))?;
    let status = query
        .status
        .map(|raw| ListingStatus::from_str(&raw))
        .transpose()?;

    let listings = state.moderation.review_queue(caller_id, status).await?;
    Ok(web::Json(
        listings
            .into_iter()
            .map(ModerationListingResponse::from)
            .collect(),
    ))
}

/// Approve or reject a listing. Moderators only.
#[utoipa::path(
    put,
    path = "/api/v1/moderation/listings/{id}",
    params(
        ("id" = String, Path, description = "Listing identifier"),
        ("user_id" = String, Query, description = "Caller identifier")
    ),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Listing in its decided status", body = ListingResponse),
        (status = 400, description = "Unrecognised decision", body = Error),
        (status = 403, description = "Caller is not a moderator", body = Error),
        (status = 404, description = "Listing not found", body = Error)
    ),
    tags = ["moderation"],
    operation_id = "decideListing"
)]
#[put("/moderation/listings/{id}")]
pub async fn decide_listing(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<ModerationQuery>,
    payload: web::Json<DecisionRequest>,
) -> ApiResult<web::Json<ListingResponse>> {
    let listing_id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    let caller_id = require_uuid(query.into_inner().user_id, FieldName::new("user_id"))?;
    let decision = payload
        .into_inner()
        .decision
        .ok_or_else(|| missing_field_error(FieldName::new("decision")))?;
    let decision = Decision::from_str(&decision)?;

    let listing = state
        .moderation
        .decide(caller_id, listing_id, decision)
        .await?;
    Ok(web::Json(ListingResponse::from(listing)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Listing;
    use crate::inbound::http::test_utils::StateBuilder;
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};
    use chrono::Utc;
    use serde_json::{json, Value};
    use uuid::Uuid;

    fn pending_listing() -> Listing {
        Listing {
            id: Uuid::new_v4(),
            make: "Ford".into(),
            model: "Focus".into(),
            year: 2018,
            price: 9_000.0,
            mileage: Some(80_000),
            condition: Some("used".into()),
            description: None,
            owner_id: Uuid::new_v4(),
            status: ListingStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[actix_web::test]
    async fn review_queue_rejects_unknown_status_before_the_service() {
        let state = StateBuilder::new().build();
        let app = actix_test::init_service(
            App::new()
                .app_data(state)
                .service(web::scope("/api/v1").service(review_queue)),
        )
        .await;

        let request = actix_test::TestRequest::get()
            .uri(&format!(
                "/api/v1/moderation/listings?user_id={}&status=archived",
                Uuid::new_v4()
            ))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn review_queue_surfaces_owner_contact_details() {
        let state = StateBuilder::new()
            .moderation(|mock| {
                mock.expect_review_queue().returning(|_, _| {
                    Ok(vec![ModerationListing {
                        listing: pending_listing(),
                        owner_name: "Ada Lovelace".into(),
                        owner_email: "ada@example.com".into(),
                        owner_phone: Some("555-0100".into()),
                    }])
                });
            })
            .build();
        let app = actix_test::init_service(
            App::new()
                .app_data(state)
                .service(web::scope("/api/v1").service(review_queue)),
        )
        .await;

        let request = actix_test::TestRequest::get()
            .uri(&format!(
                "/api/v1/moderation/listings?user_id={}",
                Uuid::new_v4()
            ))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(response).await;
        let item = &body.as_array().expect("array")[0];
        assert_eq!(
            item.get("ownerEmail").and_then(Value::as_str),
            Some("ada@example.com")
        );
        assert_eq!(item.get("make").and_then(Value::as_str), Some("Ford"));
    }

    #[actix_web::test]
    async fn decide_rejects_garbage_decision() {
        let state = StateBuilder::new().build();
        let app = actix_test::init_service(
            App::new()
                .app_data(state)
                .service(web::scope("/api/v1").service(decide_listing)),
        )
        .await;

        let request = actix_test::TestRequest::put()
            .uri(&format!(
                "/api/v1/moderation/listings/{}?user_id={}",
                Uuid::new_v4(),
                Uuid::new_v4()
            ))
            .set_json(json!({ "decision": "maybe" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn non_moderator_gets_403() {
        let state = StateBuilder::new()
            .moderation(|mock| {
                mock.expect_decide().returning(|_, _, _| {
                    Err(Error::unauthorized("moderator access required"))
                });
            })
            .build();
        let app = actix_test::init_service(
            App::new()
                .app_data(state)
                .service(web::scope("/api/v1").service(decide_listing)),
        )
        .await;

        let request = actix_test::TestRequest::put()
            .uri(&format!(
                "/api/v1/moderation/listings/{}?user_id={}",
                Uuid::new_v4(),
                Uuid::new_v4()
            ))
            .set_json(json!({ "decision": "approved" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
