//! Role guards shared by the domain services.
//!
//! Every mutating service re-checks the caller's role against the account
//! repository rather than trusting whatever the adapter layer claims. A
//! session can outlive an account or a role change, so the stored row is
//! the only authority.

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Error, Role, User, UserId};

/// Translate account repository failures into domain errors.
pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        UserPersistenceError::Duplicate { message } => Error::conflict(message),
    }
}

async fn require_role<R>(users: &R, id: &UserId, role: Role, refusal: &str) -> Result<User, Error>
where
    R: UserRepository + ?Sized,
{
    let user = users
        .find_by_id(id)
        .await
        .map_err(map_user_error)?
        .ok_or_else(|| Error::forbidden(refusal.to_owned()))?;
    if user.role() != role {
        return Err(Error::forbidden(refusal.to_owned()));
    }
    Ok(user)
}

/// The caller must hold a tourist account.
pub(crate) async fn require_tourist<R>(users: &R, id: &UserId) -> Result<User, Error>
where
    R: UserRepository + ?Sized,
{
    require_role(users, id, Role::Tourist, "not a tourist account").await
}

/// The caller must hold an organizer account.
pub(crate) async fn require_organizer<R>(users: &R, id: &UserId) -> Result<User, Error>
where
    R: UserRepository + ?Sized,
{
    require_role(users, id, Role::Organizer, "not an organizer account").await
}

/// The caller must hold a developer account.
pub(crate) async fn require_developer<R>(users: &R, id: &UserId) -> Result<User, Error>
where
    R: UserRepository + ?Sized,
{
    require_role(users, id, Role::Developer, "not a developer account").await
}
