//! Domain-level error type.
//!
//! Transport agnostic: inbound adapters map these errors onto HTTP status
//! codes, keeping the domain free of any protocol concern.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Stable machine-readable error code describing the failure category.
///
/// This is a closed set. The HTTP adapter folds `Validation`, `Duplicate`
/// and `Internal` onto one generic client-error status; the code keeps the
/// categories distinguishable in the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    Validation,
    /// Login failed; deliberately silent about which credential was wrong.
    InvalidCredentials,
    /// Authenticated but not permitted to perform this action.
    Unauthorized,
    /// The referenced entity does not exist.
    NotFound,
    /// A uniqueness constraint was violated (email or favorite pair).
    Duplicate,
    /// An unexpected failure inside the domain or a collaborator.
    Internal,
}

/// Domain error payload carried to adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    #[schema(example = "validation")]
    code: ErrorCode,
    #[schema(example = "year must be a positive integer")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create an error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary structured details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidCredentials`].
    ///
    /// The message is fixed so a caller cannot tell whether the email or the
    /// secret was wrong.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials, "invalid email or password")
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Duplicate`].
    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Duplicate, message)
    }

    /// Convenience constructor for [`ErrorCode::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(Error::validation("bad"), ErrorCode::Validation)]
    #[case(Error::invalid_credentials(), ErrorCode::InvalidCredentials)]
    #[case(Error::unauthorized("no"), ErrorCode::Unauthorized)]
    #[case(Error::not_found("gone"), ErrorCode::NotFound)]
    #[case(Error::duplicate("again"), ErrorCode::Duplicate)]
    #[case(Error::internal("boom"), ErrorCode::Internal)]
    fn constructors_set_expected_codes(#[case] error: Error, #[case] expected: ErrorCode) {
        assert_eq!(error.code(), expected);
    }

    #[rstest]
    fn serializes_with_snake_case_code_and_no_null_details() {
        let error = Error::duplicate("listing already favorited");
        let value = serde_json::to_value(&error).expect("serialize");

        assert_eq!(value.get("code").and_then(|v| v.as_str()), Some("duplicate"));
        assert!(value.get("details").is_none());
    }

    #[rstest]
    fn details_round_trip() {
        let error =
            Error::validation("missing field").with_details(json!({ "field": "email" }));
        let details = error.details().and_then(|v| v.as_object()).expect("details");
        assert_eq!(details.get("field").and_then(|v| v.as_str()), Some("email"));
    }

    #[rstest]
    fn invalid_credentials_message_is_generic() {
        assert_eq!(
            Error::invalid_credentials().message(),
            "invalid email or password"
        );
    }
}
