//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{PhoneNumber, Role, RoleProfile, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// A unique constraint such as username or email was violated.
        Duplicate { message: String } => "account already exists: {message}",
    }
}

/// Credential row used by password verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Account the hash belongs to.
    pub user_id: UserId,
    /// Argon2id encoded password hash.
    pub password_hash: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account with its role profile and password hash in one
    /// transaction.
    async fn create_account(
        &self,
        user: &User,
        profile: &RoleProfile,
        password_hash: &str,
    ) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch the credential row for a username, if the account exists.
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Fetch the role profile attached to an account.
    async fn find_profile(
        &self,
        id: &UserId,
    ) -> Result<Option<RoleProfile>, UserPersistenceError>;

    /// Replace the contact phone and role profile of an account.
    ///
    /// Returns `false` when the account does not exist.
    async fn update_profile(
        &self,
        id: &UserId,
        phone: Option<PhoneNumber>,
        profile: &RoleProfile,
    ) -> Result<bool, UserPersistenceError>;

    /// Change an account's role.
    ///
    /// Returns `false` when the account does not exist.
    async fn set_role(&self, id: &UserId, role: Role) -> Result<bool, UserPersistenceError>;

    /// Remove an account and everything hanging off it.
    ///
    /// Returns `false` when the account does not exist.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;
}
