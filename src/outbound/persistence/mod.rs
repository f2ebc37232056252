//! SQLite persistence adapters built on Diesel.

pub mod bootstrap;
mod diesel_favorite_repository;
mod diesel_listing_repository;
mod diesel_message_repository;
mod diesel_user_repository;
mod models;
pub mod pool;
pub mod schema;

pub use diesel_favorite_repository::DieselFavoriteRepository;
pub use diesel_listing_repository::DieselListingRepository;
pub use diesel_message_repository::DieselMessageRepository;
pub use diesel_user_repository::DieselUserRepository;
