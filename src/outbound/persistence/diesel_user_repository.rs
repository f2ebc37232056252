//! Diesel-backed user repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use uuid::Uuid;

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, RunError};
use super::schema::users;
use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::User;

/// SQLite implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_run_error(error: RunError) -> UserRepositoryError {
    match error {
        RunError::Pool(err) => UserRepositoryError::connection(err.to_string()),
        RunError::Query(diesel::result::Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            _,
        )) => UserRepositoryError::DuplicateEmail,
        RunError::Query(err) => UserRepositoryError::query(err.to_string()),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User, secret: &str) -> Result<(), UserRepositoryError> {
        let row = NewUserRow::from_domain(user, secret);
        self.pool
            .run(move |conn| {
                diesel::insert_into(users::table)
                    .values(&row)
                    .execute(conn)
                    .map(|_| ())
            })
            .await
            .map_err(map_run_error)
    }

    async fn find_by_credentials(
        &self,
        email: &str,
        secret: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        let email = email.to_owned();
        let secret = secret.to_owned();
        self.pool
            .run(move |conn| {
                users::table
                    .filter(users::email.eq(email))
                    .filter(users::password.eq(secret))
                    .select(UserRow::as_select())
                    .first::<UserRow>(conn)
                    .optional()?
                    .map(UserRow::into_domain)
                    .transpose()
            })
            .await
            .map_err(map_run_error)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserRepositoryError> {
        let id = id.to_string();
        self.pool
            .run(move |conn| {
                users::table
                    .find(id)
                    .select(UserRow::as_select())
                    .first::<UserRow>(conn)
                    .optional()?
                    .map(UserRow::into_domain)
                    .transpose()
            })
            .await
            .map_err(map_run_error)
    }
}
