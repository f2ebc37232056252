//! Shared validation helpers for inbound HTTP adapters.
//!
//! Query parameters arrive as strings and are parsed strictly: a malformed
//! value is a structured validation error, never a silently ignored filter.

use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidInteger,
    InvalidNumber,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidInteger => "invalid_integer",
            ErrorCode::InvalidNumber => "invalid_number",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::validation(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::validation(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}

/// Require a query parameter that must carry a UUID.
pub(crate) fn require_uuid(value: Option<String>, field: FieldName) -> Result<Uuid, Error> {
    let value = value.ok_or_else(|| missing_field_error(field))?;
    parse_uuid(&value, field)
}

pub(crate) fn parse_i32(value: String, field: FieldName) -> Result<i32, Error> {
    let name = field.as_str();
    value.parse::<i32>().map_err(|_| {
        ValidationError::new(name, format!("{name} must be an integer"))
            .with_value(ErrorCode::InvalidInteger, value)
    })
}

pub(crate) fn parse_f64(value: String, field: FieldName) -> Result<f64, Error> {
    let name = field.as_str();
    let parsed = value.parse::<f64>().map_err(|_| {
        ValidationError::new(name, format!("{name} must be a number"))
            .with_value(ErrorCode::InvalidNumber, value.clone())
    })?;
    if !parsed.is_finite() {
        return Err(
            ValidationError::new(name, format!("{name} must be a finite number"))
                .with_value(ErrorCode::InvalidNumber, value),
        );
    }
    Ok(parsed)
}

pub(crate) fn parse_optional_i32(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<i32>, Error> {
    value.map(|raw| parse_i32(raw, field)).transpose()
}

pub(crate) fn parse_optional_f64(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<f64>, Error> {
    value.map(|raw| parse_f64(raw, field)).transpose()
}
