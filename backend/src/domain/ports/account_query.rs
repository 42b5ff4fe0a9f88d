//! Driving port for reading the signed-in account.
//!
//! Serves the profile page: the account row, the role profile, and the
//! emergency contact list.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    ContactDetails, EmergencyContact, Error, OrganizerProfile, RoleProfile, TouristProfile, User,
    UserId,
};

use super::fixtures;

/// Serializable role profile for driving ports.
///
/// The `role` tag mirrors [`crate::domain::Role`]; the remaining fields vary
/// by variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "camelCase")]
pub enum RoleProfilePayload {
    #[serde(rename_all = "camelCase")]
    Tourist {
        student_id: Option<String>,
        department: Option<String>,
        semester: Option<String>,
        date_of_birth: Option<NaiveDate>,
    },
    #[serde(rename_all = "camelCase")]
    Organizer {
        department: String,
        organizer_id: Option<String>,
        bio: Option<String>,
        is_verified: bool,
    },
    Developer,
}

impl From<RoleProfile> for RoleProfilePayload {
    fn from(value: RoleProfile) -> Self {
        match value {
            RoleProfile::Tourist(profile) => Self::Tourist {
                student_id: profile.student_id,
                department: profile.department,
                semester: profile.semester,
                date_of_birth: profile.date_of_birth,
            },
            RoleProfile::Organizer(profile) => Self::Organizer {
                department: profile.department,
                organizer_id: profile.organizer_id,
                bio: profile.bio,
                is_verified: profile.is_verified,
            },
            RoleProfile::Developer => Self::Developer,
        }
    }
}

impl From<RoleProfilePayload> for RoleProfile {
    fn from(value: RoleProfilePayload) -> Self {
        match value {
            RoleProfilePayload::Tourist {
                student_id,
                department,
                semester,
                date_of_birth,
            } => Self::Tourist(TouristProfile {
                student_id,
                department,
                semester,
                date_of_birth,
            }),
            RoleProfilePayload::Organizer {
                department,
                organizer_id,
                bio,
                is_verified,
            } => Self::Organizer(OrganizerProfile {
                department,
                organizer_id,
                bio,
                is_verified,
            }),
            RoleProfilePayload::Developer => Self::Developer,
        }
    }
}

/// Serializable emergency contact for driving ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    pub id: Uuid,
    pub full_name: String,
    pub relationship: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

impl From<EmergencyContact> for ContactPayload {
    fn from(value: EmergencyContact) -> Self {
        Self {
            id: value.id,
            full_name: value.details.full_name.clone(),
            relationship: value.details.relationship.as_str().to_owned(),
            phone: value.details.phone.as_ref().to_owned(),
            email: value.details.email.clone(),
            address: value.details.address.clone(),
            is_primary: value.is_primary,
            created_at: value.created_at,
        }
    }
}

/// Request to fetch the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAccountRequest {
    pub user_id: UserId,
}

/// Response carrying the account row and its role profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAccountResponse {
    pub user: User,
    pub profile: RoleProfilePayload,
}

/// Request to list the account's emergency contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContactsRequest {
    pub user_id: UserId,
}

/// Response listing emergency contacts, primary first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContactsResponse {
    pub contacts: Vec<ContactPayload>,
}

/// Driving port for account read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Fetch the signed-in user's account and role profile.
    async fn current_account(&self, request: GetAccountRequest) -> Result<GetAccountResponse, Error>;

    /// List the signed-in user's emergency contacts, primary first.
    async fn list_contacts(&self, request: ListContactsRequest)
    -> Result<ListContactsResponse, Error>;
}

/// Fixture query serving the canned accounts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountQuery;

#[async_trait]
impl AccountQuery for FixtureAccountQuery {
    async fn current_account(
        &self,
        request: GetAccountRequest,
    ) -> Result<GetAccountResponse, Error> {
        let now = Utc::now();
        let user = fixtures::user_by_id(&request.user_id, now)?
            .ok_or_else(|| Error::not_found(format!("account {} not found", request.user_id)))?;
        let profile = RoleProfile::default_for(user.role());
        Ok(GetAccountResponse {
            user,
            profile: profile.into(),
        })
    }

    async fn list_contacts(
        &self,
        request: ListContactsRequest,
    ) -> Result<ListContactsResponse, Error> {
        if *request.user_id.as_uuid() != fixtures::TOURIST_ID {
            return Ok(ListContactsResponse {
                contacts: Vec::new(),
            });
        }
        let details = ContactDetails::try_from_parts(
            "Farhana Akter",
            crate::domain::Relationship::Parent,
            "+8801811111111",
            Some("farhana@example.net"),
            None,
        )
        .map_err(|err| Error::internal(format!("fixture contact failed validation: {err}")))?;
        let now = Utc::now();
        let contact = EmergencyContact {
            id: Uuid::from_u128(0x77777777_7777_4777_8777_777777777777),
            owner: request.user_id,
            details,
            is_primary: true,
            created_at: now,
            updated_at: now,
        };
        Ok(ListContactsResponse {
            contacts: vec![contact.into()],
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{ErrorCode, Role};

    #[tokio::test]
    async fn fixture_account_query_serves_the_tourist() {
        let query = FixtureAccountQuery;
        let response = query
            .current_account(GetAccountRequest {
                user_id: UserId::from_uuid(fixtures::TOURIST_ID),
            })
            .await
            .expect("tourist account exists");
        assert_eq!(response.user.role(), Role::Tourist);
        assert!(matches!(
            response.profile,
            RoleProfilePayload::Tourist { .. }
        ));
    }

    #[tokio::test]
    async fn fixture_account_query_rejects_unknown_ids() {
        let query = FixtureAccountQuery;
        let error = query
            .current_account(GetAccountRequest {
                user_id: UserId::random(),
            })
            .await
            .expect_err("unknown account");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn fixture_contacts_list_primary_contact_for_tourist() {
        let query = FixtureAccountQuery;
        let response = query
            .list_contacts(ListContactsRequest {
                user_id: UserId::from_uuid(fixtures::TOURIST_ID),
            })
            .await
            .expect("contacts list");
        assert_eq!(response.contacts.len(), 1);
        assert!(response.contacts[0].is_primary);
    }

    #[test]
    fn role_profile_payload_round_trips() {
        let profile = RoleProfile::default_for(Role::Organizer);
        let payload = RoleProfilePayload::from(profile.clone());
        assert_eq!(RoleProfile::from(payload), profile);
    }

    #[test]
    fn role_profile_payload_serialises_with_role_tag() {
        let payload = RoleProfilePayload::from(RoleProfile::default_for(Role::Organizer));
        let value = serde_json::to_value(&payload).expect("profile serialises");
        assert_eq!(value["role"], "organizer");
        assert_eq!(value["department"], crate::domain::DEFAULT_ORGANIZER_DEPARTMENT);
        assert_eq!(value["isVerified"], false);
    }
}
