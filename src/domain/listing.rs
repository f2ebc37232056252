//! Vehicle listings: lifecycle status, creation drafts, sparse patches and
//! the search filter/sort vocabulary.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Listing lifecycle status.
///
/// Newly created listings always start `Pending`; the only reachable
/// transitions are pending→approved and pending→rejected, both owned by the
/// moderation component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Pending,
    Approved,
    Rejected,
}

impl ListingStatus {
    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ListingStatus::Pending => "pending",
            ListingStatus::Approved => "approved",
            ListingStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ListingStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(ListingStatus::Pending),
            "approved" => Ok(ListingStatus::Approved),
            "rejected" => Ok(ListingStatus::Rejected),
            other => Err(Error::validation(format!(
                "unrecognised listing status: {other}"
            ))),
        }
    }
}

/// A moderation decision. Exactly `approved` or `rejected`; anything else
/// fails validation before touching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    /// The terminal status this decision moves the listing into.
    pub fn as_status(self) -> ListingStatus {
        match self {
            Decision::Approved => ListingStatus::Approved,
            Decision::Rejected => ListingStatus::Rejected,
        }
    }
}

impl FromStr for Decision {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "approved" => Ok(Decision::Approved),
            "rejected" => Ok(Decision::Rejected),
            other => Err(
                Error::validation("decision must be approved or rejected").with_details(json!({
                    "field": "decision",
                    "value": other,
                })),
            ),
        }
    }
}

/// A vehicle-for-sale record.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub mileage: Option<i32>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
}

/// Validated creation input. Status is deliberately absent: creation always
/// lands in `Pending` no matter what the caller supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub mileage: Option<i32>,
    pub condition: Option<String>,
    pub description: Option<String>,
}

impl ListingDraft {
    /// Validate draft fields: make/model non-blank, year and price strictly
    /// positive, mileage (when present) non-negative.
    pub fn validate(&self) -> Result<(), Error> {
        if self.make.trim().is_empty() {
            return Err(Error::validation("make is required"));
        }
        if self.model.trim().is_empty() {
            return Err(Error::validation("model is required"));
        }
        if self.year <= 0 {
            return Err(Error::validation("year must be a positive integer"));
        }
        if self.price <= 0.0 {
            return Err(Error::validation("price must be greater than zero"));
        }
        if self.mileage.is_some_and(|m| m < 0) {
            return Err(Error::validation("mileage must not be negative"));
        }
        Ok(())
    }
}

/// Sparse field patch for the generic update path.
///
/// `status` has no representation here: status changes belong exclusively to
/// the moderation component, and the HTTP adapter rejects payloads that name
/// the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPatch {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price: Option<f64>,
    pub mileage: Option<i32>,
    pub condition: Option<String>,
    pub description: Option<String>,
}

impl ListingPatch {
    /// Whether the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Revalidate the numeric fields that creation validates.
    pub fn validate(&self) -> Result<(), Error> {
        if self.make.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(Error::validation("make must not be blank"));
        }
        if self.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(Error::validation("model must not be blank"));
        }
        if self.year.is_some_and(|y| y <= 0) {
            return Err(Error::validation("year must be a positive integer"));
        }
        if self.price.is_some_and(|p| p <= 0.0) {
            return Err(Error::validation("price must be greater than zero"));
        }
        if self.mileage.is_some_and(|m| m < 0) {
            return Err(Error::validation("mileage must not be negative"));
        }
        Ok(())
    }
}

/// Optional, conjunctive search filters over approved listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilters {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub mileage_min: Option<i32>,
    pub mileage_max: Option<i32>,
    pub condition: Option<String>,
}

/// Allow-listed sortable fields. Caller input is parsed into this set and
/// never reaches the query text itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    Price,
    Year,
    Mileage,
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "created_at" => Ok(SortKey::CreatedAt),
            "price" => Ok(SortKey::Price),
            "year" => Ok(SortKey::Year),
            "mileage" => Ok(SortKey::Mileage),
            other => Err(Error::validation(format!("unsupported sort field: {other}"))
                .with_details(json!({ "field": "sort_by", "value": other }))),
        }
    }
}

/// Sort direction, case-insensitive on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(
                Error::validation(format!("unsupported sort order: {other}"))
                    .with_details(json!({ "field": "sort_order", "value": other })),
            ),
        }
    }
}

/// Combined sort selection; defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingSort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for ListingSort {
    fn default() -> Self {
        Self {
            key: SortKey::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

/// A listing as seen by its owner, annotated with its bookmark count.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedListing {
    pub listing: Listing,
    pub favorite_count: i64,
}

/// A listing joined with the owner's contact details for moderator review.
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationListing {
    pub listing: Listing,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_phone: Option<String>,
}
