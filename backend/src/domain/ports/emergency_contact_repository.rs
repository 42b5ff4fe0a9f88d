//! Port abstraction for emergency contact persistence adapters.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{ContactDetails, EmergencyContact, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by emergency contact repository adapters.
    pub enum ContactPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "contact repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "contact repository query failed: {message}",
        /// The owner already stores this phone number.
        Duplicate { message: String } => "contact already exists: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmergencyContactRepository: Send + Sync {
    /// All contacts for an owner, primary first, then newest first.
    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<EmergencyContact>, ContactPersistenceError>;

    /// Fetch one contact scoped to its owner.
    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<EmergencyContact>, ContactPersistenceError>;

    /// Store a new contact.
    async fn insert(&self, contact: &EmergencyContact) -> Result<(), ContactPersistenceError>;

    /// Replace the details of an owner's contact.
    ///
    /// Returns `false` when the contact does not exist or belongs to someone
    /// else.
    async fn update(
        &self,
        owner: &UserId,
        id: Uuid,
        details: &ContactDetails,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, ContactPersistenceError>;

    /// Remove an owner's contact.
    ///
    /// Returns `false` when the contact does not exist or belongs to someone
    /// else.
    async fn delete(&self, owner: &UserId, id: Uuid) -> Result<bool, ContactPersistenceError>;

    /// Mark one contact primary and clear the flag from the owner's others
    /// in the same transaction.
    ///
    /// Returns `false` when the contact does not exist or belongs to someone
    /// else.
    async fn set_primary(
        &self,
        owner: &UserId,
        id: Uuid,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, ContactPersistenceError>;
}
