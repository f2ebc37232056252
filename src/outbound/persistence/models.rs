//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Identifiers and enumerations travel as
//! text in SQLite; the conversion functions here parse them back into the
//! domain's typed forms.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{favorites, listings, messages, users};
use crate::domain::{Favorite, Listing, ListingStatus, Message, Role, User};

/// Wrap a row-to-domain conversion failure as a Diesel deserialization
/// error so it surfaces through `QueryResult` like any other bad row.
pub(crate) fn bad_row(
    error: impl std::error::Error + Send + Sync + 'static,
) -> diesel::result::Error {
    diesel::result::Error::DeserializationError(Box::new(error))
}

fn parse_id(value: &str) -> QueryResult<Uuid> {
    Uuid::parse_str(value).map_err(bad_row)
}

fn utc(naive: NaiveDateTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(naive, Utc)
}

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct UserRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[expect(dead_code, reason = "credential secret never leaves the adapter")]
    pub password: String,
    pub phone: Option<String>,
    pub role: String,
    pub created_at: NaiveDateTime,
}

impl UserRow {
    pub(crate) fn into_domain(self) -> QueryResult<User> {
        Ok(User {
            id: parse_id(&self.id)?,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            role: Role::from_str(&self.role).map_err(bad_row)?,
            created_at: utc(self.created_at),
        })
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: String,
    pub created_at: NaiveDateTime,
}

impl NewUserRow {
    pub(crate) fn from_domain(user: &User, secret: &str) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            password: secret.to_owned(),
            phone: user.phone.clone(),
            role: user.role.as_str().to_owned(),
            created_at: user.created_at.naive_utc(),
        }
    }
}

/// Row struct for reading from the listings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = listings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct ListingRow {
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
    pub created_at: NaiveDateTime,
}

impl ListingRow {
    pub(crate) fn into_domain(self) -> QueryResult<Listing> {
        Ok(Listing {
            id: parse_id(&self.id)?,
            make: self.make,
            model: self.model,
            year: self.year,
            price: self.price,
            mileage: self.mileage,
            condition: self.condition,
            description: self.description,
            owner_id: parse_id(&self.owner_id)?,
            status: ListingStatus::from_str(&self.status).map_err(bad_row)?,
            created_at: utc(self.created_at),
        })
    }
}

/// Insertable struct for creating new listing records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = listings)]
pub(crate) struct NewListingRow {
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
    pub created_at: NaiveDateTime,
}

impl NewListingRow {
    pub(crate) fn from_domain(listing: &Listing) -> Self {
        Self {
            id: listing.id.to_string(),
            make: listing.make.clone(),
            model: listing.model.clone(),
            year: listing.year,
            price: listing.price,
            mileage: listing.mileage,
            condition: listing.condition.clone(),
            description: listing.description.clone(),
            owner_id: listing.owner_id.to_string(),
            status: listing.status.as_str().to_owned(),
            created_at: listing.created_at.naive_utc(),
        }
    }
}

/// Changeset struct for sparse listing updates. Absent fields are left
/// untouched by Diesel.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = listings)]
pub(crate) struct ListingChangeset {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price: Option<f64>,
    pub mileage: Option<i32>,
    pub condition: Option<String>,
    pub description: Option<String>,
}

/// Row struct for reading from the favorites table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = favorites)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct FavoriteRow {
    pub id: String,
    pub user_id: String,
    pub listing_id: String,
    pub created_at: NaiveDateTime,
}

impl FavoriteRow {
    #[expect(dead_code, reason = "favorites are read back joined with listings")]
    pub(crate) fn into_domain(self) -> QueryResult<Favorite> {
        Ok(Favorite {
            id: parse_id(&self.id)?,
            user_id: parse_id(&self.user_id)?,
            listing_id: parse_id(&self.listing_id)?,
            created_at: utc(self.created_at),
        })
    }
}

/// Insertable struct for creating new favorite records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = favorites)]
pub(crate) struct NewFavoriteRow {
    pub id: String,
    pub user_id: String,
    pub listing_id: String,
    pub created_at: NaiveDateTime,
}

impl NewFavoriteRow {
    pub(crate) fn from_domain(favorite: &Favorite) -> Self {
        Self {
            id: favorite.id.to_string(),
            user_id: favorite.user_id.to_string(),
            listing_id: favorite.listing_id.to_string(),
            created_at: favorite.created_at.naive_utc(),
        }
    }
}

/// Row struct for reading from the messages table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct MessageRow {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub listing_id: Option<String>,
    pub body: String,
    pub read: bool,
    pub created_at: NaiveDateTime,
}

impl MessageRow {
    pub(crate) fn into_domain(self) -> QueryResult<Message> {
        Ok(Message {
            id: parse_id(&self.id)?,
            sender_id: parse_id(&self.sender_id)?,
            receiver_id: parse_id(&self.receiver_id)?,
            listing_id: self
                .listing_id
                .as_deref()
                .map(parse_id)
                .transpose()?,
            body: self.body,
            read: self.read,
            created_at: utc(self.created_at),
        })
    }
}

/// Insertable struct for creating new message records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub(crate) struct NewMessageRow {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub listing_id: Option<String>,
    pub body: String,
    pub read: bool,
    pub created_at: NaiveDateTime,
}

impl NewMessageRow {
    pub(crate) fn from_domain(message: &Message) -> Self {
        Self {
            id: message.id.to_string(),
            sender_id: message.sender_id.to_string(),
            receiver_id: message.receiver_id.to_string(),
            listing_id: message.listing_id.map(|id| id.to_string()),
            body: message.body.clone(),
            read: message.read,
            created_at: message.created_at.naive_utc(),
        }
    }
}
