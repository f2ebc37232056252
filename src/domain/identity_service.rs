//! Identity gate: authentication, registration and role resolution.
//!
//! Leaf dependency for every other component; mutating services resolve the
//! caller through this gate before applying their own authorization rule.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{Error, ErrorCode, Registration, Role, User};

/// Driving port for identity operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityGate: Send + Sync {
    /// Exact-match login. Unknown email and wrong secret yield the same
    /// generic failure.
    async fn authenticate(&self, email: &str, secret: &str) -> Result<User, Error>;

    /// Create a standard-role account; duplicate email fails.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Resolve the role of an existing user.
    async fn resolve_role(&self, user_id: Uuid) -> Result<Role, Error>;
}

/// Resolve a caller's role for an authorization decision, folding "unknown
/// user" into the unauthorized category rather than not-found.
pub(crate) async fn caller_role(identity: &dyn IdentityGate, caller: Uuid) -> Result<Role, Error> {
    identity.resolve_role(caller).await.map_err(|err| {
        if err.code() == ErrorCode::NotFound {
            Error::unauthorized("unknown caller")
        } else {
            err
        }
    })
}

/// Identity service over the user repository port.
#[derive(Clone)]
pub struct IdentityService<U> {
    users: Arc<U>,
}

impl<U> IdentityService<U> {
    /// Create a new service with the given repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::DuplicateEmail => Error::duplicate("email address is already registered"),
        UserRepositoryError::Connection { message } | UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

#[async_trait]
impl<U> IdentityGate for IdentityService<U>
where
    U: UserRepository,
{
    async fn authenticate(&self, email: &str, secret: &str) -> Result<User, Error> {
        self.users
            .find_by_credentials(email, secret)
            .await
            .map_err(map_user_error)?
            .ok_or_else(Error::invalid_credentials)
    }

    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let user = User {
            id: Uuid::new_v4(),
            first_name: registration.first_name,
            last_name: registration.last_name,
            email: registration.email,
            phone: registration.phone,
            role: Role::Standard,
            created_at: Utc::now(),
        };

        self.users
            .insert(&user, &registration.secret)
            .await
            .map_err(map_user_error)?;
        Ok(user)
    }

    async fn resolve_role(&self, user_id: Uuid) -> Result<Role, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .map(|user| user.role)
            .ok_or_else(|| Error::not_found("unknown user"))
    }
}
