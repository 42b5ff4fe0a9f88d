//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing (or importing) the backing
//! infrastructure. This makes HTTP handler tests deterministic because they
//! can substitute a test double instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

use super::fixtures;

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// In-memory authenticator used until persistence is wired.
///
/// One account per role, all sharing the password `password`: tourist `mira`,
/// organizer `rahim`, and developer `admin`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if credentials.password() != "password" {
            return Err(Error::unauthorized("invalid credentials"));
        }
        let id = match credentials.username() {
            "mira" => fixtures::TOURIST_ID,
            "rahim" => fixtures::ORGANIZER_ID,
            "admin" => fixtures::DEVELOPER_ID,
            _ => return Err(Error::unauthorized("invalid credentials")),
        };
        Ok(UserId::from_uuid(id))
    }
}
