//! Driven ports: repository contracts the persistence adapters implement.
//!
//! Each port pairs a small `thiserror` error enum (with constructor helpers
//! so adapters can build variants from `impl Into<String>`) with an
//! `async_trait` trait carrying `mockall` automocks for service tests.

mod favorite_repository;
mod listing_repository;
mod message_repository;
mod user_repository;

pub use favorite_repository::{FavoriteRepository, FavoriteRepositoryError};
pub use listing_repository::{ListingRepository, ListingRepositoryError};
pub use message_repository::{MessageRepository, MessageRepositoryError};
pub use user_repository::{UserRepository, UserRepositoryError};

#[cfg(test)]
pub use favorite_repository::MockFavoriteRepository;
#[cfg(test)]
pub use listing_repository::MockListingRepository;
#[cfg(test)]
pub use message_repository::MockMessageRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
