//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Accounts and their role profiles are written together: registration
//! inserts the `users` row and the matching profile row in one transaction,
//! so a tourist can never exist without a tourist profile and a developer
//! never carries one.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{StoredCredentials, UserPersistenceError, UserRepository};
use crate::domain::{
    EmailAddress, OrganizerProfile, PhoneNumber, Role, RoleProfile, TouristProfile, User, UserId,
    Username,
};

use super::diesel_error_mapping::{
    map_common_diesel_error, map_common_pool_error, map_common_write_error,
};
use super::models::{
    NewOrganizerProfileRow, NewTouristProfileRow, NewUserRow, OrganizerProfileRow,
    TouristProfileRow, UserRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{organizer_profiles, tourist_profiles, users};

/// Diesel-backed implementation of the account repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_common_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_common_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn map_write_error(error: diesel::result::Error) -> UserPersistenceError {
    map_common_write_error(
        error,
        UserPersistenceError::duplicate,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Convert a database row into a validated domain user.
pub(crate) fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let UserRow {
        id,
        username,
        email,
        role,
        phone,
        created_at,
    } = row;

    let username = Username::new(username).map_err(|err| {
        UserPersistenceError::query(format!("stored username invalid: {err}"))
    })?;
    let email = EmailAddress::new(email)
        .map_err(|err| UserPersistenceError::query(format!("stored email invalid: {err}")))?;
    let role = role
        .parse::<Role>()
        .map_err(|err| UserPersistenceError::query(err.to_string()))?;
    let phone = phone
        .map(PhoneNumber::new)
        .transpose()
        .map_err(|err| UserPersistenceError::query(format!("stored phone invalid: {err}")))?;

    Ok(User::new(
        UserId::from_uuid(id),
        username,
        email,
        role,
        phone,
        created_at,
    ))
}

/// Write the profile row matching the account's role, replacing any
/// existing one.
async fn upsert_profile(
    conn: &mut AsyncPgConnection,
    id: &UserId,
    profile: &RoleProfile,
) -> Result<(), diesel::result::Error> {
    match profile {
        RoleProfile::Tourist(tourist) => {
            let row = NewTouristProfileRow {
                user_id: *id.as_uuid(),
                student_id: tourist.student_id.as_deref(),
                department: tourist.department.as_deref(),
                semester: tourist.semester.as_deref(),
                date_of_birth: tourist.date_of_birth,
            };
            diesel::insert_into(tourist_profiles::table)
                .values(&row)
                .on_conflict(tourist_profiles::user_id)
                .do_update()
                .set(&row)
                .execute(conn)
                .await?;
        }
        RoleProfile::Organizer(organizer) => {
            let row = NewOrganizerProfileRow {
                user_id: *id.as_uuid(),
                department: &organizer.department,
                organizer_id: organizer.organizer_id.as_deref(),
                bio: organizer.bio.as_deref(),
                is_verified: organizer.is_verified,
            };
            diesel::insert_into(organizer_profiles::table)
                .values(&row)
                .on_conflict(organizer_profiles::user_id)
                .do_update()
                .set(&row)
                .execute(conn)
                .await?;
        }
        RoleProfile::Developer => {}
    }
    Ok(())
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create_account(
        &self,
        user: &User,
        profile: &RoleProfile,
        password_hash: &str,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewUserRow {
            id: *user.id().as_uuid(),
            username: user.username().as_ref(),
            email: user.email().as_ref(),
            password_hash,
            role: user.role().as_str(),
            phone: user.phone().map(AsRef::as_ref),
            created_at: user.joined_at(),
        };
        let user_id = user.id().clone();
        let profile = profile.clone();

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(users::table)
                    .values(&new_row)
                    .execute(conn)
                    .await?;
                upsert_profile(conn, &user_id, &profile).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_write_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(uuid::Uuid, String)> = users::table
            .filter(users::username.eq(username))
            .select((users::id, users::password_hash))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(|(id, password_hash)| StoredCredentials {
            user_id: UserId::from_uuid(id),
            password_hash,
        }))
    }

    async fn find_profile(
        &self,
        id: &UserId,
    ) -> Result<Option<RoleProfile>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let role: Option<String> = users::table
            .find(id.as_uuid())
            .select(users::role)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(role) = role else {
            return Ok(None);
        };
        let role = role
            .parse::<Role>()
            .map_err(|err| UserPersistenceError::query(err.to_string()))?;

        let profile = match role {
            Role::Tourist => {
                let row: Option<TouristProfileRow> = tourist_profiles::table
                    .find(id.as_uuid())
                    .select(TouristProfileRow::as_select())
                    .first(&mut conn)
                    .await
                    .optional()
                    .map_err(map_diesel_error)?;
                let tourist = row
                    .map(|row| TouristProfile {
                        student_id: row.student_id,
                        department: row.department,
                        semester: row.semester,
                        date_of_birth: row.date_of_birth,
                    })
                    .unwrap_or_default();
                RoleProfile::Tourist(tourist)
            }
            Role::Organizer => {
                let row: Option<OrganizerProfileRow> = organizer_profiles::table
                    .find(id.as_uuid())
                    .select(OrganizerProfileRow::as_select())
                    .first(&mut conn)
                    .await
                    .optional()
                    .map_err(map_diesel_error)?;
                let organizer = row
                    .map(|row| OrganizerProfile {
                        department: row.department,
                        organizer_id: row.organizer_id,
                        bio: row.bio,
                        is_verified: row.is_verified,
                    })
                    .unwrap_or_default();
                RoleProfile::Organizer(organizer)
            }
            Role::Developer => RoleProfile::Developer,
        };
        Ok(Some(profile))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        phone: Option<PhoneNumber>,
        profile: &RoleProfile,
    ) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = id.clone();
        let profile = profile.clone();
        let phone = phone.map(String::from);

        conn.transaction(|conn| {
            async move {
                let updated = diesel::update(users::table.find(user_id.as_uuid()))
                    .set(users::phone.eq(phone.as_deref()))
                    .execute(conn)
                    .await?;
                if updated == 0 {
                    return Ok(false);
                }
                upsert_profile(conn, &user_id, &profile).await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn set_role(&self, id: &UserId, role: Role) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table.find(id.as_uuid()))
            .set(users::role.eq(role.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(users::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
