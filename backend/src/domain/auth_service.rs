//! Authentication domain services.
//!
//! Credential login and account registration over the account repository
//! and password hasher ports. Both speak the driving ports the HTTP layer
//! depends on, so handler tests can swap in doubles.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::access::map_user_error;
use crate::domain::ports::{
    LoginService, PasswordHashError, PasswordHasher, RegisterRequest, RegisterResponse,
    RegistrationService, UserRepository,
};
use crate::domain::{Error, LoginCredentials, RegistrationRequest, RoleProfile, User, UserId};

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

/// Login service verifying credentials against stored Argon2 hashes.
///
/// A missing account and a wrong password produce the same response, so
/// login probes cannot tell which usernames exist.
#[derive(Clone)]
pub struct CredentialLoginService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> CredentialLoginService<R, H> {
    /// Create a new login service over the account repository and hasher.
    pub fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl<R, H> LoginService for CredentialLoginService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let stored = self
            .users
            .find_credentials(credentials.username())
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("invalid credentials"))?;

        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .map_err(map_hash_error)?;
        if !matches {
            return Err(Error::unauthorized("invalid credentials"));
        }
        Ok(stored.user_id)
    }
}

/// Registration service creating the account row plus its role profile.
#[derive(Clone)]
pub struct AccountRegistrationService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> AccountRegistrationService<R, H> {
    /// Create a new registration service over the account repository and
    /// hasher.
    pub fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl<R, H> RegistrationService for AccountRegistrationService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, Error> {
        let role = request
            .role
            .parse::<crate::domain::Role>()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let parsed = RegistrationRequest::try_from_parts(
            &request.username,
            &request.email,
            role,
            request.phone.as_deref(),
            &request.password,
            &request.password_confirmation,
        )
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        let password_hash = self.hasher.hash(parsed.password()).map_err(map_hash_error)?;
        let user = User::new(
            UserId::random(),
            parsed.username().clone(),
            parsed.email().clone(),
            parsed.role(),
            parsed.phone().cloned(),
            Utc::now(),
        );
        let profile = RoleProfile::default_for(parsed.role());

        self.users
            .create_account(&user, &profile, &password_hash)
            .await
            .map_err(map_user_error)?;

        Ok(RegisterResponse {
            user_id: user.id().clone(),
            username: user.username().as_ref().to_owned(),
            role: user.role().to_string(),
        })
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
