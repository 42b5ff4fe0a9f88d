//! Driving port for account mutations.
//!
//! Covers profile edits and the emergency contact book. Role changes and
//! account deletion are administrative operations and live on the admin
//! port instead.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, UserId};

use super::account_query::{ContactPayload, GetAccountResponse};

/// Flat, role-agnostic profile form.
///
/// The service applies only the fields that match the caller's role, so a
/// tourist submitting `bio` simply has it ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileFieldsPayload {
    pub student_id: Option<String>,
    pub department: Option<String>,
    pub semester: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub organizer_id: Option<String>,
    pub bio: Option<String>,
}

/// Request to update the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub user_id: UserId,
    /// New contact phone; `None` leaves the stored value untouched.
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub profile: ProfileFieldsPayload,
}

/// Emergency contact form fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub full_name: String,
    pub relationship: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

impl ContactForm {
    /// Validate the form into domain contact details.
    pub fn details(&self) -> Result<crate::domain::ContactDetails, Error> {
        let relationship = self
            .relationship
            .parse::<crate::domain::Relationship>()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        crate::domain::ContactDetails::try_from_parts(
            &self.full_name,
            relationship,
            &self.phone,
            self.email.as_deref(),
            self.address.as_deref(),
        )
        .map_err(|err| Error::invalid_request(err.to_string()))
    }
}

/// Request to add an emergency contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddContactRequest {
    pub user_id: UserId,
    pub contact: ContactForm,
}

/// Request to edit an existing emergency contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactRequest {
    pub user_id: UserId,
    pub contact_id: Uuid,
    pub contact: ContactForm,
}

/// Request to remove an emergency contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteContactRequest {
    pub user_id: UserId,
    pub contact_id: Uuid,
}

/// Request to mark one contact as the primary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPrimaryContactRequest {
    pub user_id: UserId,
    pub contact_id: Uuid,
}

/// Response carrying the contact after a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub contact: ContactPayload,
}

/// Driving port for account write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Update the caller's phone and role profile, returning the fresh view.
    async fn update_account(
        &self,
        request: UpdateAccountRequest,
    ) -> Result<GetAccountResponse, Error>;

    /// Add an emergency contact for the caller.
    ///
    /// A contact flagged `is_primary` demotes any existing primary. Adding a
    /// second contact with the same phone number is a conflict.
    async fn add_contact(&self, request: AddContactRequest) -> Result<ContactResponse, Error>;

    /// Edit one of the caller's emergency contacts.
    async fn update_contact(&self, request: UpdateContactRequest)
    -> Result<ContactResponse, Error>;

    /// Remove one of the caller's emergency contacts.
    async fn delete_contact(&self, request: DeleteContactRequest) -> Result<(), Error>;

    /// Promote one contact to primary, demoting the rest.
    async fn set_primary_contact(&self, request: SetPrimaryContactRequest) -> Result<(), Error>;
}

/// Fixture command that validates input but stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountCommand;

#[async_trait]
impl AccountCommand for FixtureAccountCommand {
    async fn update_account(
        &self,
        request: UpdateAccountRequest,
    ) -> Result<GetAccountResponse, Error> {
        use super::account_query::{AccountQuery, FixtureAccountQuery, GetAccountRequest};
        if let Some(phone) = request.phone.as_deref() {
            crate::domain::PhoneNumber::new(phone)
                .map_err(|err| Error::invalid_request(err.to_string()))?;
        }
        FixtureAccountQuery
            .current_account(GetAccountRequest {
                user_id: request.user_id,
            })
            .await
    }

    async fn add_contact(&self, request: AddContactRequest) -> Result<ContactResponse, Error> {
        let contact = request.contact.details()?;
        let now = chrono::Utc::now();
        Ok(ContactResponse {
            contact: ContactPayload {
                id: Uuid::new_v4(),
                full_name: contact.full_name.clone(),
                relationship: contact.relationship.as_str().to_owned(),
                phone: contact.phone.as_ref().to_owned(),
                email: contact.email.clone(),
                address: contact.address.clone(),
                is_primary: request.contact.is_primary,
                created_at: now,
            },
        })
    }

    async fn update_contact(
        &self,
        request: UpdateContactRequest,
    ) -> Result<ContactResponse, Error> {
        let contact = request.contact.details()?;
        let now = chrono::Utc::now();
        Ok(ContactResponse {
            contact: ContactPayload {
                id: request.contact_id,
                full_name: contact.full_name.clone(),
                relationship: contact.relationship.as_str().to_owned(),
                phone: contact.phone.as_ref().to_owned(),
                email: contact.email.clone(),
                address: contact.address.clone(),
                is_primary: request.contact.is_primary,
                created_at: now,
            },
        })
    }

    async fn delete_contact(&self, _request: DeleteContactRequest) -> Result<(), Error> {
        Ok(())
    }

    async fn set_primary_contact(&self, _request: SetPrimaryContactRequest) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::fixtures;
    use rstest::{fixture, rstest};

    #[fixture]
    fn contact_form() -> ContactForm {
        ContactForm {
            full_name: "Farhana Akter".to_owned(),
            relationship: "parent".to_owned(),
            phone: "+8801811111111".to_owned(),
            email: None,
            address: None,
            is_primary: true,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_add_contact_echoes_the_form(contact_form: ContactForm) {
        let command = FixtureAccountCommand;
        let response = command
            .add_contact(AddContactRequest {
                user_id: UserId::from_uuid(fixtures::TOURIST_ID),
                contact: contact_form,
            })
            .await
            .expect("contact accepted");
        assert_eq!(response.contact.full_name, "Farhana Akter");
        assert!(response.contact.is_primary);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_add_contact_rejects_unknown_relationships(mut contact_form: ContactForm) {
        contact_form.relationship = "acquaintance".to_owned();
        let command = FixtureAccountCommand;
        let error = command
            .add_contact(AddContactRequest {
                user_id: UserId::from_uuid(fixtures::TOURIST_ID),
                contact: contact_form,
            })
            .await
            .expect_err("relationship rejected");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_update_account_rejects_bad_phones() {
        let command = FixtureAccountCommand;
        let error = command
            .update_account(UpdateAccountRequest {
                user_id: UserId::from_uuid(fixtures::TOURIST_ID),
                phone: Some("not-a-phone".to_owned()),
                profile: ProfileFieldsPayload::default(),
            })
            .await
            .expect_err("phone rejected");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn profile_fields_default_to_empty() {
        let parsed: ProfileFieldsPayload =
            serde_json::from_value(serde_json::json!({})).expect("empty form deserialises");
        assert_eq!(parsed, ProfileFieldsPayload::default());
    }
}
