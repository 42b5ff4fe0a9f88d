//! Authentication handlers: register, login, logout.
//!
//! ```text
//! POST /api/v1/auth/register {"username":"mira","email":...,"role":"tourist",...}
//! POST /api/v1/auth/login    {"username":"mira","password":"password"}
//! POST /api/v1/auth/logout
//! ```
//!
//! Login persists the user id in the session cookie and returns the account
//! view so clients learn the role without a second round trip. Logout purges
//! the session.

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{Error, LoginCredentials, LoginValidationError};
use crate::domain::ports::{GetAccountRequest, GetAccountResponse, RegisterRequest};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Authenticate credentials and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success, account view returned", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Invalid credentials", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<GetAccountResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(&user_id)?;
    let account = state
        .account_query
        .current_account(GetAccountRequest { user_id })
        .await?;
    Ok(web::Json(account))
}

/// Drop the caller's session.
///
/// Always succeeds; logging out twice is a no-op.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 204, description = "Session cleared"),
    ),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Create an account and sign it in.
///
/// Developer accounts cannot be self-registered; the bundled
/// `create-developer` binary seeds those.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = crate::inbound::http::schemas::RegisterRequestSchema,
    responses(
        (status = 201, description = "Account created and signed in"),
        (status = 400, description = "Invalid form", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Username or email already taken", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 503, description = "Service unavailable", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let response = state.registration.register(payload.into_inner()).await?;
    session.persist_user(&response.user_id)?;
    Ok(HttpResponse::Created().json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{fixture_app, login_as};
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, web};
    use rstest::rstest;
    use serde_json::Value;

    fn configure(cfg: &mut web::ServiceConfig) {
        cfg.service(logout).service(register);
    }

    #[actix_web::test]
    async fn login_returns_the_account_view_and_a_cookie() {
        let app = actix_test::init_service(fixture_app(configure)).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(&LoginRequest {
                username: "mira".into(),
                password: "password".into(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .response()
                .cookies()
                .any(|cookie| cookie.name() == "session"),
            "session cookie expected"
        );
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/user/username").and_then(Value::as_str),
            Some("mira")
        );
        assert_eq!(
            body.pointer("/user/role").and_then(Value::as_str),
            Some("tourist")
        );
    }

    #[rstest]
    #[case("   ", "password", "empty_username")]
    #[case("mira", "", "empty_password")]
    #[actix_web::test]
    async fn login_rejects_blank_fields(
        #[case] username: &str,
        #[case] password: &str,
        #[case] detail_code: &str,
    ) {
        let app = actix_test::init_service(fixture_app(configure)).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(&LoginRequest {
                username: username.into(),
                password: password.into(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/details/code").and_then(Value::as_str),
            Some(detail_code)
        );
    }

    #[actix_web::test]
    async fn login_rejects_wrong_credentials() {
        let app = actix_test::init_service(fixture_app(configure)).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(&LoginRequest {
                username: "mira".into(),
                password: "wrong-password".into(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("code").and_then(Value::as_str),
            Some("unauthorized")
        );
    }

    #[actix_web::test]
    async fn logout_clears_the_session() {
        let app = actix_test::init_service(fixture_app(configure)).await;
        let cookie = login_as(&app, "mira").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn register_creates_and_signs_in() {
        let app = actix_test::init_service(fixture_app(configure)).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(serde_json::json!({
                "username": "nabila",
                "email": "nabila@campus.edu",
                "role": "tourist",
                "password": "correct-horse",
                "passwordConfirmation": "correct-horse",
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(
            response
                .response()
                .cookies()
                .any(|cookie| cookie.name() == "session"),
            "registration should sign the account in"
        );
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("username").and_then(Value::as_str), Some("nabila"));
    }

    #[actix_web::test]
    async fn register_rejects_developer_role() {
        let app = actix_test::init_service(fixture_app(configure)).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(serde_json::json!({
                "username": "sneaky",
                "email": "sneaky@campus.edu",
                "role": "developer",
                "password": "correct-horse",
                "passwordConfirmation": "correct-horse",
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
