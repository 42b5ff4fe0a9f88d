//! PostgreSQL-backed `EmergencyContactRepository` implementation using Diesel ORM.
//!
//! Primary exclusivity is enforced in one transaction: promoting a contact
//! clears `is_primary` from the owner's other rows before setting it, so at
//! most one row per owner ever carries the flag.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{ContactPersistenceError, EmergencyContactRepository};
use crate::domain::{ContactDetails, EmergencyContact, Relationship, UserId};

use super::diesel_error_mapping::{
    map_common_diesel_error, map_common_pool_error, map_common_write_error,
};
use super::models::{ContactUpdate, EmergencyContactRow, NewEmergencyContactRow};
use super::pool::{DbPool, PoolError};
use super::schema::emergency_contacts;

/// Diesel-backed implementation of the emergency contact repository port.
#[derive(Clone)]
pub struct DieselEmergencyContactRepository {
    pool: DbPool,
}

impl DieselEmergencyContactRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ContactPersistenceError {
    map_common_pool_error(error, ContactPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ContactPersistenceError {
    map_common_diesel_error(
        error,
        ContactPersistenceError::query,
        ContactPersistenceError::connection,
    )
}

fn map_write_error(error: diesel::result::Error) -> ContactPersistenceError {
    map_common_write_error(
        error,
        ContactPersistenceError::duplicate,
        ContactPersistenceError::query,
        ContactPersistenceError::connection,
    )
}

/// Convert a database row into a validated domain contact.
fn row_to_contact(row: EmergencyContactRow) -> Result<EmergencyContact, ContactPersistenceError> {
    let corrupt = |message: String| ContactPersistenceError::query(message);
    let relationship = row
        .relationship
        .parse::<Relationship>()
        .map_err(|err| corrupt(err.to_string()))?;
    let details = ContactDetails::try_from_parts(
        &row.full_name,
        relationship,
        &row.phone,
        row.email.as_deref(),
        row.address.as_deref(),
    )
    .map_err(|err| corrupt(err.to_string()))?;
    Ok(EmergencyContact {
        id: row.id,
        owner: UserId::from_uuid(row.user_id),
        details,
        is_primary: row.is_primary,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl EmergencyContactRepository for DieselEmergencyContactRepository {
    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<EmergencyContact>, ContactPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EmergencyContactRow> = emergency_contacts::table
            .filter(emergency_contacts::user_id.eq(owner.as_uuid()))
            .order((
                emergency_contacts::is_primary.desc(),
                emergency_contacts::created_at.desc(),
            ))
            .select(EmergencyContactRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_contact).collect()
    }

    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<EmergencyContact>, ContactPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<EmergencyContactRow> = emergency_contacts::table
            .find(id)
            .filter(emergency_contacts::user_id.eq(owner.as_uuid()))
            .select(EmergencyContactRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_contact).transpose()
    }

    async fn insert(&self, contact: &EmergencyContact) -> Result<(), ContactPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewEmergencyContactRow {
            id: contact.id,
            user_id: *contact.owner.as_uuid(),
            full_name: &contact.details.full_name,
            relationship: contact.details.relationship.as_str(),
            phone: contact.details.phone.as_ref(),
            email: contact.details.email.as_deref(),
            address: contact.details.address.as_deref(),
            is_primary: contact.is_primary,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        };
        diesel::insert_into(emergency_contacts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    async fn update(
        &self,
        owner: &UserId,
        id: Uuid,
        details: &ContactDetails,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, ContactPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ContactUpdate {
            full_name: &details.full_name,
            relationship: details.relationship.as_str(),
            phone: details.phone.as_ref(),
            email: details.email.as_deref(),
            address: details.address.as_deref(),
            updated_at,
        };
        let updated = diesel::update(
            emergency_contacts::table
                .find(id)
                .filter(emergency_contacts::user_id.eq(owner.as_uuid())),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(map_write_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, owner: &UserId, id: Uuid) -> Result<bool, ContactPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            emergency_contacts::table
                .find(id)
                .filter(emergency_contacts::user_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn set_primary(
        &self,
        owner: &UserId,
        id: Uuid,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, ContactPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner_id = *owner.as_uuid();

        conn.transaction(|conn| {
            async move {
                let promoted = diesel::update(
                    emergency_contacts::table
                        .find(id)
                        .filter(emergency_contacts::user_id.eq(owner_id)),
                )
                .set((
                    emergency_contacts::is_primary.eq(true),
                    emergency_contacts::updated_at.eq(updated_at),
                ))
                .execute(conn)
                .await?;
                if promoted == 0 {
                    return Ok(false);
                }
                diesel::update(
                    emergency_contacts::table
                        .filter(emergency_contacts::user_id.eq(owner_id))
                        .filter(emergency_contacts::id.ne(id))
                        .filter(emergency_contacts::is_primary.eq(true)),
                )
                .set((
                    emergency_contacts::is_primary.eq(false),
                    emergency_contacts::updated_at.eq(updated_at),
                ))
                .execute(conn)
                .await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
