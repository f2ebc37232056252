//! User accounts and roles.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Error;

/// Account role, modelled as a closed set.
///
/// Authorization checks go through the capability methods rather than
/// matching on the variant, so introducing a further role does not require
/// touching every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Standard,
    Moderator,
}

impl Role {
    /// Whether this role may decide listing moderation outcomes and mutate
    /// listings it does not own.
    pub fn can_moderate(self) -> bool {
        matches!(self, Role::Moderator)
    }

    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Standard => "standard",
            Role::Moderator => "moderator",
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "standard" => Ok(Role::Standard),
            "moderator" => Ok(Role::Moderator),
            other => Err(Error::internal(format!("unrecognised role: {other}"))),
        }
    }
}

/// A registered account. The credential secret is never carried here; it
/// stays inside the persistence adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Full display name used in conversation and moderation views.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Validated registration input. Phone is genuinely optional; everything
/// else is required and non-blank.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub secret: String,
    pub phone: Option<String>,
}

impl Registration {
    /// Validate and normalise registration fields.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        secret: impl Into<String>,
        phone: Option<String>,
    ) -> Result<Self, Error> {
        let registration = Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            secret: secret.into(),
            phone: phone.filter(|p| !p.trim().is_empty()),
        };

        for (field, value) in [
            ("firstName", &registration.first_name),
            ("lastName", &registration.last_name),
            ("email", &registration.email),
            ("password", &registration.secret),
        ] {
            if value.trim().is_empty() {
                return Err(Error::validation(format!("{field} is required")));
            }
        }

        Ok(registration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Role::Standard, false)]
    #[case(Role::Moderator, true)]
    fn moderation_capability_follows_role(#[case] role: Role, #[case] expected: bool) {
        assert_eq!(role.can_moderate(), expected);
    }

    #[rstest]
    #[case("standard", Role::Standard)]
    #[case("moderator", Role::Moderator)]
    fn role_round_trips_through_storage_form(#[case] raw: &str, #[case] role: Role) {
        assert_eq!(Role::from_str(raw).expect("parse"), role);
        assert_eq!(role.as_str(), raw);
    }

    #[rstest]
    fn unknown_role_is_rejected() {
        assert!(Role::from_str("admin").is_err());
    }

    #[rstest]
    #[case("", "User", "a@b.c", "pw")]
    #[case("Ada", "", "a@b.c", "pw")]
    #[case("Ada", "User", " ", "pw")]
    #[case("Ada", "User", "a@b.c", "")]
    fn registration_requires_core_fields(
        #[case] first: &str,
        #[case] last: &str,
        #[case] email: &str,
        #[case] secret: &str,
    ) {
        assert!(Registration::new(first, last, email, secret, None).is_err());
    }

    #[rstest]
    fn registration_blank_phone_becomes_absent() {
        let registration = Registration::new("Ada", "User", "a@b.c", "pw", Some("  ".into()))
            .expect("valid registration");
        assert_eq!(registration.phone, None);
    }
}
