//! Account domain services.
//!
//! Profile reads and edits for the signed-in user, plus the emergency
//! contact book. Role changes and account removal are administrative and
//! live in the admin service instead.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::access::map_user_error;
use crate::domain::ports::{
    AccountCommand, AccountQuery, AddContactRequest, ContactPersistenceError, ContactResponse,
    DeleteContactRequest, EmergencyContactRepository, GetAccountRequest, GetAccountResponse,
    ListContactsRequest, ListContactsResponse, ProfileFieldsPayload, SetPrimaryContactRequest,
    UpdateAccountRequest, UpdateContactRequest, UserRepository,
};
use crate::domain::{
    EmergencyContact, Error, OrganizerProfile, PhoneNumber, RoleProfile, TouristProfile, User,
    UserId,
};

fn map_contact_error(error: ContactPersistenceError) -> Error {
    match error {
        ContactPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("contact repository unavailable: {message}"))
        }
        ContactPersistenceError::Query { message } => {
            Error::internal(format!("contact repository error: {message}"))
        }
        ContactPersistenceError::Duplicate { message } => Error::conflict(message),
    }
}

/// Fold submitted profile fields into the stored profile.
///
/// Absent fields keep their stored values, fields for another role are
/// ignored, and `is_verified` only ever changes through vetting.
fn merge_profile(current: RoleProfile, fields: &ProfileFieldsPayload) -> RoleProfile {
    match current {
        RoleProfile::Tourist(profile) => RoleProfile::Tourist(TouristProfile {
            student_id: fields.student_id.clone().or(profile.student_id),
            department: fields.department.clone().or(profile.department),
            semester: fields.semester.clone().or(profile.semester),
            date_of_birth: fields.date_of_birth.or(profile.date_of_birth),
        }),
        RoleProfile::Organizer(profile) => RoleProfile::Organizer(OrganizerProfile {
            department: fields.department.clone().unwrap_or(profile.department),
            organizer_id: fields.organizer_id.clone().or(profile.organizer_id),
            bio: fields.bio.clone().or(profile.bio),
            is_verified: profile.is_verified,
        }),
        RoleProfile::Developer => RoleProfile::Developer,
    }
}

async fn load_account<R>(users: &R, id: &UserId) -> Result<(User, RoleProfile), Error>
where
    R: UserRepository + ?Sized,
{
    let user = users
        .find_by_id(id)
        .await
        .map_err(map_user_error)?
        .ok_or_else(|| Error::not_found(format!("account {id} not found")))?;
    let profile = users
        .find_profile(id)
        .await
        .map_err(map_user_error)?
        .unwrap_or_else(|| RoleProfile::default_for(user.role()));
    Ok((user, profile))
}

/// Read side of the profile page.
#[derive(Clone)]
pub struct AccountQueryService<R, C> {
    users: Arc<R>,
    contacts: Arc<C>,
}

impl<R, C> AccountQueryService<R, C> {
    /// Create a new query service over the account and contact repositories.
    pub fn new(users: Arc<R>, contacts: Arc<C>) -> Self {
        Self { users, contacts }
    }
}

#[async_trait]
impl<R, C> AccountQuery for AccountQueryService<R, C>
where
    R: UserRepository,
    C: EmergencyContactRepository,
{
    async fn current_account(
        &self,
        request: GetAccountRequest,
    ) -> Result<GetAccountResponse, Error> {
        let (user, profile) = load_account(self.users.as_ref(), &request.user_id).await?;
        Ok(GetAccountResponse {
            user,
            profile: profile.into(),
        })
    }

    async fn list_contacts(
        &self,
        request: ListContactsRequest,
    ) -> Result<ListContactsResponse, Error> {
        let contacts = self
            .contacts
            .list_for_owner(&request.user_id)
            .await
            .map_err(map_contact_error)?;
        Ok(ListContactsResponse {
            contacts: contacts.into_iter().map(Into::into).collect(),
        })
    }
}

/// Write side of the profile page.
#[derive(Clone)]
pub struct AccountCommandService<R, C> {
    users: Arc<R>,
    contacts: Arc<C>,
}

impl<R, C> AccountCommandService<R, C> {
    /// Create a new command service over the account and contact
    /// repositories.
    pub fn new(users: Arc<R>, contacts: Arc<C>) -> Self {
        Self { users, contacts }
    }
}

#[async_trait]
impl<R, C> AccountCommand for AccountCommandService<R, C>
where
    R: UserRepository,
    C: EmergencyContactRepository,
{
    async fn update_account(
        &self,
        request: UpdateAccountRequest,
    ) -> Result<GetAccountResponse, Error> {
        let (user, current) = load_account(self.users.as_ref(), &request.user_id).await?;
        let phone = match request.phone.as_deref() {
            Some(raw) => Some(
                PhoneNumber::new(raw).map_err(|err| Error::invalid_request(err.to_string()))?,
            ),
            None => user.phone().cloned(),
        };
        let profile = merge_profile(current, &request.profile);

        let updated = self
            .users
            .update_profile(&request.user_id, phone.clone(), &profile)
            .await
            .map_err(map_user_error)?;
        if !updated {
            return Err(Error::not_found(format!(
                "account {} not found",
                request.user_id
            )));
        }

        let user = User::new(
            user.id().clone(),
            user.username().clone(),
            user.email().clone(),
            user.role(),
            phone,
            user.joined_at(),
        );
        Ok(GetAccountResponse {
            user,
            profile: profile.into(),
        })
    }

    async fn add_contact(&self, request: AddContactRequest) -> Result<ContactResponse, Error> {
        let details = request.contact.details()?;
        let now = Utc::now();
        let contact = EmergencyContact {
            id: Uuid::new_v4(),
            owner: request.user_id.clone(),
            details,
            is_primary: request.contact.is_primary,
            created_at: now,
            updated_at: now,
        };
        self.contacts
            .insert(&contact)
            .await
            .map_err(map_contact_error)?;
        if contact.is_primary {
            self.contacts
                .set_primary(&request.user_id, contact.id, now)
                .await
                .map_err(map_contact_error)?;
        }
        Ok(ContactResponse {
            contact: contact.into(),
        })
    }

    async fn update_contact(
        &self,
        request: UpdateContactRequest,
    ) -> Result<ContactResponse, Error> {
        let details = request.contact.details()?;
        let now = Utc::now();
        let updated = self
            .contacts
            .update(&request.user_id, request.contact_id, &details, now)
            .await
            .map_err(map_contact_error)?;
        if !updated {
            return Err(Error::not_found(format!(
                "contact {} not found",
                request.contact_id
            )));
        }
        if request.contact.is_primary {
            self.contacts
                .set_primary(&request.user_id, request.contact_id, now)
                .await
                .map_err(map_contact_error)?;
        }
        let contact = self
            .contacts
            .find_for_owner(&request.user_id, request.contact_id)
            .await
            .map_err(map_contact_error)?
            .ok_or_else(|| {
                Error::not_found(format!("contact {} not found", request.contact_id))
            })?;
        Ok(ContactResponse {
            contact: contact.into(),
        })
    }

    async fn delete_contact(&self, request: DeleteContactRequest) -> Result<(), Error> {
        let deleted = self
            .contacts
            .delete(&request.user_id, request.contact_id)
            .await
            .map_err(map_contact_error)?;
        if !deleted {
            return Err(Error::not_found(format!(
                "contact {} not found",
                request.contact_id
            )));
        }
        Ok(())
    }

    async fn set_primary_contact(&self, request: SetPrimaryContactRequest) -> Result<(), Error> {
        let promoted = self
            .contacts
            .set_primary(&request.user_id, request.contact_id, Utc::now())
            .await
            .map_err(map_contact_error)?;
        if !promoted {
            return Err(Error::not_found(format!(
                "contact {} not found",
                request.contact_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
