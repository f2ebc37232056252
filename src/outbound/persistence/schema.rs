//! Diesel table definitions for the SQLite schema.
//!
//! These definitions must match the database migrations exactly. When a
//! migration changes the schema, regenerate this file with
//! `diesel print-schema` or update it by hand to match.

diesel::table! {
    /// Registered accounts. Identifiers are UUIDs stored as text.
    users (id) {
        id -> Text,
        first_name -> Text,
        last_name -> Text,
        email -> Text,
        password -> Text,
        phone -> Nullable<Text>,
        role -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    /// Vehicle listings. `status` is one of pending, approved, rejected.
    listings (id) {
        id -> Text,
        make -> Text,
        model -> Text,
        year -> Integer,
        price -> Double,
        mileage -> Nullable<Integer>,
        condition -> Nullable<Text>,
        description -> Nullable<Text>,
        owner_id -> Text,
        status -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    /// Bookmark ledger; `(user_id, listing_id)` carries a unique index.
    favorites (id) {
        id -> Text,
        user_id -> Text,
        listing_id -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    /// Direct messages, optionally anchored to a listing.
    messages (id) {
        id -> Text,
        sender_id -> Text,
        receiver_id -> Text,
        listing_id -> Nullable<Text>,
        body -> Text,
        read -> Bool,
        created_at -> Timestamp,
    }
}

diesel::joinable!(listings -> users (owner_id));
diesel::joinable!(favorites -> listings (listing_id));

diesel::allow_tables_to_appear_in_same_query!(users, listings, favorites, messages);
