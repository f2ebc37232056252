//! Authentication HTTP handlers.
//!
//! ```text
//! POST /api/v1/login
//! POST /api/v1/register
//! ```

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Registration, User};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, FieldName};
use crate::inbound::http::ApiResult;

/// Login request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Registration request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
}

/// Public view of a user account. The credential secret never appears here.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            role: user.role.as_str().to_owned(),
        }
    }
}

fn parse_register_request(payload: RegisterRequest) -> Result<Registration, Error> {
    let first_name = payload
        .first_name
        .ok_or_else(|| missing_field_error(FieldName::new("firstName")))?;
    let last_name = payload
        .last_name
        .ok_or_else(|| missing_field_error(FieldName::new("lastName")))?;
    let email = payload
        .email
        .ok_or_else(|| missing_field_error(FieldName::new("email")))?;
    let password = payload
        .password
        .ok_or_else(|| missing_field_error(FieldName::new("password")))?;

    Registration::new(first_name, last_name, email, password, payload.phone)
}

/// Authenticate with email and password.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated user", body = UserResponse),
        (status = 400, description = "Missing credentials", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let payload = payload.into_inner();
    let email = payload
        .email
        .ok_or_else(|| missing_field_error(FieldName::new("email")))?;
    let password = payload
        .password
        .ok_or_else(|| missing_field_error(FieldName::new("password")))?;

    let user = state.identity.authenticate(&email, &password).await?;
    Ok(web::Json(UserResponse::from(user)))
}

/// Create a new standard-role account.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Created account", body = UserResponse),
        (status = 400, description = "Invalid or duplicate registration", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register"
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = parse_register_request(payload.into_inner())?;
    let user = state.identity.register(registration).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::inbound::http::test_utils::StateBuilder;
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::{json, Value};
    use uuid::Uuid;

    use crate::domain::Role;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: None,
            role: Role::Standard,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn parse_register_request_rejects_missing_password() {
        let payload = RegisterRequest {
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            email: Some("ada@example.com".into()),
            password: None,
            phone: None,
        };

        let err = parse_register_request(payload).expect_err("missing password");
        assert_eq!(err.code(), ErrorCode::Validation);
    }

    #[rstest]
    fn user_response_never_carries_the_secret() {
        let value = serde_json::to_value(UserResponse::from(sample_user())).expect("serialize");
        let object = value.as_object().expect("object");
        assert!(!object.contains_key("password"));
        assert_eq!(object.get("role").and_then(Value::as_str), Some("standard"));
    }

    #[actix_web::test]
    async fn login_returns_the_authenticated_user() {
        let state = StateBuilder::new()
            .identity(|mock| {
                mock.expect_authenticate()
                    .withf(|email, secret| email == "ada@example.com" && secret == "pw")
                    .returning(|_, _| Ok(sample_user()));
            })
            .build();
        let app = actix_test::init_service(
            App::new()
                .app_data(state)
                .service(web::scope("/api/v1").service(login)),
        )
        .await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": "ada@example.com", "password": "pw" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("email").and_then(Value::as_str),
            Some("ada@example.com")
        );
    }

    #[actix_web::test]
    async fn login_with_bad_credentials_is_401() {
        let state = StateBuilder::new()
            .identity(|mock| {
                mock.expect_authenticate()
                    .returning(|_, _| Err(Error::invalid_credentials()));
            })
            .build();
        let app = actix_test::init_service(
            App::new()
                .app_data(state)
                .service(web::scope("/api/v1").service(login)),
        )
        .await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": "ada@example.com", "password": "wrong" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn register_returns_created() {
        let state = StateBuilder::new()
            .identity(|mock| {
                mock.expect_register().returning(|_| Ok(sample_user()));
            })
            .build();
        let app = actix_test::init_service(
            App::new()
                .app_data(state)
                .service(web::scope("/api/v1").service(register)),
        )
        .await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "password": "pw"
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
