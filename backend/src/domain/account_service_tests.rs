//! Tests for account services.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::*;
use crate::domain::ports::{
    fixtures, ContactForm, MockEmergencyContactRepository, MockUserRepository, RoleProfilePayload,
};
use crate::domain::{ContactDetails, ErrorCode, Relationship, Role};

fn stored_tourist_profile() -> RoleProfile {
    RoleProfile::Tourist(TouristProfile {
        student_id: Some("S-2019-014".to_owned()),
        department: None,
        semester: None,
        date_of_birth: None,
    })
}

fn contact_form() -> ContactForm {
    ContactForm {
        full_name: "Farhana Akter".to_owned(),
        relationship: "parent".to_owned(),
        phone: "+8801811111111".to_owned(),
        email: Some("farhana@example.net".to_owned()),
        address: None,
        is_primary: false,
    }
}

fn stored_contact(owner: UserId, is_primary: bool) -> EmergencyContact {
    let details = ContactDetails::try_from_parts(
        "Farhana Akter",
        Relationship::Parent,
        "+8801811111111",
        Some("farhana@example.net"),
        None,
    )
    .expect("contact details");
    let now = Utc::now();
    EmergencyContact {
        id: Uuid::new_v4(),
        owner,
        details,
        is_primary,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn current_account_combines_user_and_profile() {
    let tourist = fixtures::tourist(Utc::now()).expect("fixture tourist");
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(tourist)));
    users
        .expect_find_profile()
        .times(1)
        .return_once(|_| Ok(Some(stored_tourist_profile())));
    let contacts = MockEmergencyContactRepository::new();

    let service = AccountQueryService::new(Arc::new(users), Arc::new(contacts));
    let response = service
        .current_account(GetAccountRequest {
            user_id: UserId::from_uuid(fixtures::TOURIST_ID),
        })
        .await
        .expect("account read succeeds");

    assert_eq!(response.user.role(), Role::Tourist);
    let RoleProfilePayload::Tourist { student_id, .. } = response.profile else {
        panic!("tourist account must carry a tourist profile");
    };
    assert_eq!(student_id.as_deref(), Some("S-2019-014"));
}

#[tokio::test]
async fn current_account_defaults_a_missing_profile_row() {
    let tourist = fixtures::tourist(Utc::now()).expect("fixture tourist");
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(tourist)));
    users.expect_find_profile().times(1).return_once(|_| Ok(None));
    let contacts = MockEmergencyContactRepository::new();

    let service = AccountQueryService::new(Arc::new(users), Arc::new(contacts));
    let response = service
        .current_account(GetAccountRequest {
            user_id: UserId::from_uuid(fixtures::TOURIST_ID),
        })
        .await
        .expect("account read succeeds");

    assert_eq!(
        RoleProfile::from(response.profile),
        RoleProfile::default_for(Role::Tourist)
    );
}

#[tokio::test]
async fn current_account_maps_a_missing_account_to_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().times(1).return_once(|_| Ok(None));
    let contacts = MockEmergencyContactRepository::new();

    let service = AccountQueryService::new(Arc::new(users), Arc::new(contacts));
    let error = service
        .current_account(GetAccountRequest {
            user_id: UserId::random(),
        })
        .await
        .expect_err("unknown account rejected");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn update_account_keeps_stored_values_for_absent_fields() {
    let tourist = fixtures::tourist(Utc::now()).expect("fixture tourist");
    let stored_phone = tourist.phone().cloned();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(tourist)));
    users
        .expect_find_profile()
        .times(1)
        .return_once(|_| Ok(Some(stored_tourist_profile())));
    let expected_phone = stored_phone.clone();
    users
        .expect_update_profile()
        .withf(move |_, phone, profile| {
            let RoleProfile::Tourist(fields) = profile else {
                return false;
            };
            *phone == expected_phone
                && fields.student_id.as_deref() == Some("S-2019-014")
                && fields.semester.as_deref() == Some("Spring 2026")
        })
        .times(1)
        .return_once(|_, _, _| Ok(true));
    let contacts = MockEmergencyContactRepository::new();

    let service = AccountCommandService::new(Arc::new(users), Arc::new(contacts));
    let response = service
        .update_account(UpdateAccountRequest {
            user_id: UserId::from_uuid(fixtures::TOURIST_ID),
            phone: None,
            profile: ProfileFieldsPayload {
                semester: Some("Spring 2026".to_owned()),
                ..ProfileFieldsPayload::default()
            },
        })
        .await
        .expect("update succeeds");

    assert_eq!(response.user.phone().cloned(), stored_phone);
}

#[tokio::test]
async fn update_account_rejects_an_invalid_phone() {
    let tourist = fixtures::tourist(Utc::now()).expect("fixture tourist");
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(tourist)));
    users.expect_find_profile().times(1).return_once(|_| Ok(None));
    let contacts = MockEmergencyContactRepository::new();

    let service = AccountCommandService::new(Arc::new(users), Arc::new(contacts));
    let error = service
        .update_account(UpdateAccountRequest {
            user_id: UserId::from_uuid(fixtures::TOURIST_ID),
            phone: Some("not-a-phone".to_owned()),
            profile: ProfileFieldsPayload::default(),
        })
        .await
        .expect_err("phone rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn update_account_cannot_touch_organizer_verification() {
    let organizer = fixtures::organizer(Utc::now()).expect("fixture organizer");
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(organizer)));
    users.expect_find_profile().times(1).return_once(|_| {
        Ok(Some(RoleProfile::Organizer(OrganizerProfile {
            department: "Architecture Department".to_owned(),
            organizer_id: None,
            bio: None,
            is_verified: true,
        })))
    });
    users
        .expect_update_profile()
        .withf(|_, _, profile| {
            let RoleProfile::Organizer(fields) = profile else {
                return false;
            };
            fields.is_verified
                && fields.department == "Architecture Department"
                && fields.bio.as_deref() == Some("Walking the old campus since 2015.")
        })
        .times(1)
        .return_once(|_, _, _| Ok(true));
    let contacts = MockEmergencyContactRepository::new();

    let service = AccountCommandService::new(Arc::new(users), Arc::new(contacts));
    service
        .update_account(UpdateAccountRequest {
            user_id: UserId::from_uuid(fixtures::ORGANIZER_ID),
            phone: None,
            profile: ProfileFieldsPayload {
                bio: Some("Walking the old campus since 2015.".to_owned()),
                ..ProfileFieldsPayload::default()
            },
        })
        .await
        .expect("update succeeds");
}

#[tokio::test]
async fn add_contact_demotes_the_previous_primary() {
    let users = MockUserRepository::new();
    let mut contacts = MockEmergencyContactRepository::new();
    contacts.expect_insert().times(1).return_once(|_| Ok(()));
    contacts
        .expect_set_primary()
        .times(1)
        .return_once(|_, _, _| Ok(true));

    let service = AccountCommandService::new(Arc::new(users), Arc::new(contacts));
    let mut form = contact_form();
    form.is_primary = true;
    let response = service
        .add_contact(AddContactRequest {
            user_id: UserId::from_uuid(fixtures::TOURIST_ID),
            contact: form,
        })
        .await
        .expect("contact stored");

    assert!(response.contact.is_primary);
    assert_eq!(response.contact.full_name, "Farhana Akter");
}

#[tokio::test]
async fn add_contact_maps_a_duplicate_phone_to_conflict() {
    let users = MockUserRepository::new();
    let mut contacts = MockEmergencyContactRepository::new();
    contacts
        .expect_insert()
        .times(1)
        .return_once(|_| Err(ContactPersistenceError::duplicate("phone already stored")));

    let service = AccountCommandService::new(Arc::new(users), Arc::new(contacts));
    let error = service
        .add_contact(AddContactRequest {
            user_id: UserId::from_uuid(fixtures::TOURIST_ID),
            contact: contact_form(),
        })
        .await
        .expect_err("duplicate rejected");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn update_contact_returns_not_found_for_a_foreign_contact() {
    let users = MockUserRepository::new();
    let mut contacts = MockEmergencyContactRepository::new();
    contacts
        .expect_update()
        .times(1)
        .return_once(|_, _, _, _| Ok(false));

    let service = AccountCommandService::new(Arc::new(users), Arc::new(contacts));
    let error = service
        .update_contact(UpdateContactRequest {
            user_id: UserId::from_uuid(fixtures::TOURIST_ID),
            contact_id: Uuid::new_v4(),
            contact: contact_form(),
        })
        .await
        .expect_err("foreign contact hidden");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn update_contact_rereads_the_stored_row() {
    let owner = UserId::from_uuid(fixtures::TOURIST_ID);
    let stored = stored_contact(owner.clone(), false);
    let contact_id = stored.id;
    let users = MockUserRepository::new();
    let mut contacts = MockEmergencyContactRepository::new();
    contacts
        .expect_update()
        .times(1)
        .return_once(|_, _, _, _| Ok(true));
    contacts
        .expect_find_for_owner()
        .times(1)
        .return_once(move |_, _| Ok(Some(stored)));

    let service = AccountCommandService::new(Arc::new(users), Arc::new(contacts));
    let response = service
        .update_contact(UpdateContactRequest {
            user_id: owner,
            contact_id,
            contact: contact_form(),
        })
        .await
        .expect("contact updated");

    assert_eq!(response.contact.id, contact_id);
    assert_eq!(response.contact.phone, "+8801811111111");
}

#[tokio::test]
async fn delete_contact_reports_a_missing_contact() {
    let users = MockUserRepository::new();
    let mut contacts = MockEmergencyContactRepository::new();
    contacts.expect_delete().times(1).return_once(|_, _| Ok(false));

    let service = AccountCommandService::new(Arc::new(users), Arc::new(contacts));
    let error = service
        .delete_contact(DeleteContactRequest {
            user_id: UserId::from_uuid(fixtures::TOURIST_ID),
            contact_id: Uuid::new_v4(),
        })
        .await
        .expect_err("missing contact");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn set_primary_contact_requires_an_existing_contact() {
    let users = MockUserRepository::new();
    let mut contacts = MockEmergencyContactRepository::new();
    contacts
        .expect_set_primary()
        .times(1)
        .return_once(|_, _, _| Ok(false));

    let service = AccountCommandService::new(Arc::new(users), Arc::new(contacts));
    let error = service
        .set_primary_contact(SetPrimaryContactRequest {
            user_id: UserId::from_uuid(fixtures::TOURIST_ID),
            contact_id: Uuid::new_v4(),
        })
        .await
        .expect_err("missing contact");

    assert_eq!(error.code(), ErrorCode::NotFound);
}
