//! Driving port for account registration.
//!
//! Sign-up creates the account row together with the role profile matching
//! the chosen role, so a freshly registered organizer already belongs to the
//! default department and a tourist starts with an empty student record.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, UserId};

/// Sign-up form fields as the wire presents them.
///
/// Validation happens inside the service; this payload deliberately carries
/// raw strings so the port can report which field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub password: String,
    pub password_confirmation: String,
}

/// Response from a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: UserId,
    pub username: String,
    pub role: String,
}

/// Driving port for creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Validate the sign-up form and create the account plus its role profile.
    ///
    /// Developer accounts cannot be self-registered; requests naming that
    /// role are rejected before any credential work happens.
    async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, Error>;
}

/// Fixture registration used when no database is configured.
///
/// Accepts any valid form and returns a random identifier without storing
/// anything, which is enough for handler tests to exercise the happy path.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRegistrationService;

#[async_trait]
impl RegistrationService for FixtureRegistrationService {
    async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, Error> {
        let role = request
            .role
            .parse::<crate::domain::Role>()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let parsed = crate::domain::RegistrationRequest::try_from_parts(
            &request.username,
            &request.email,
            role,
            request.phone.as_deref(),
            &request.password,
            &request.password_confirmation,
        )
        .map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(RegisterResponse {
            user_id: UserId::random(),
            username: parsed.username().as_ref().to_owned(),
            role: parsed.role().to_string(),
        })
    }
}
