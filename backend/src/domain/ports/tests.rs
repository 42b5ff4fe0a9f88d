use super::*;
use actix_rt::System;
use async_trait::async_trait;
use chrono::Utc;
use rstest::{fixture, rstest};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::domain::{
    DEFAULT_DEPARTMENTS, Department, DepartmentDetails, PhoneNumber, Role, RoleProfile, User,
    UserId,
};

#[derive(Clone)]
struct AccountRecord {
    user: User,
    profile: RoleProfile,
    password_hash: String,
}

impl AccountRecord {
    fn with_role(&self, role: Role) -> User {
        User::new(
            self.user.id().clone(),
            self.user.username().clone(),
            self.user.email().clone(),
            role,
            self.user.phone().cloned(),
            self.user.joined_at(),
        )
    }

    fn with_phone(&self, phone: Option<PhoneNumber>) -> User {
        User::new(
            self.user.id().clone(),
            self.user.username().clone(),
            self.user.email().clone(),
            self.user.role(),
            phone,
            self.user.joined_at(),
        )
    }
}

#[derive(Default)]
struct InMemoryUserRepository {
    store: Mutex<HashMap<UserId, AccountRecord>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_account(
        &self,
        user: &User,
        profile: &RoleProfile,
        password_hash: &str,
    ) -> Result<(), UserPersistenceError> {
        let mut guard = self.store.lock().expect("store poisoned");
        if guard
            .values()
            .any(|record| record.user.username() == user.username())
        {
            return Err(UserPersistenceError::Duplicate {
                message: user.username().to_string(),
            });
        }
        guard.insert(
            user.id().clone(),
            AccountRecord {
                user: user.clone(),
                profile: profile.clone(),
                password_hash: password_hash.to_owned(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let guard = self.store.lock().expect("store poisoned");
        Ok(guard.get(id).map(|record| record.user.clone()))
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let guard = self.store.lock().expect("store poisoned");
        Ok(guard
            .values()
            .find(|record| record.user.username().as_ref() == username)
            .map(|record| StoredCredentials {
                user_id: record.user.id().clone(),
                password_hash: record.password_hash.clone(),
            }))
    }

    async fn find_profile(
        &self,
        id: &UserId,
    ) -> Result<Option<RoleProfile>, UserPersistenceError> {
        let guard = self.store.lock().expect("store poisoned");
        Ok(guard.get(id).map(|record| record.profile.clone()))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        phone: Option<PhoneNumber>,
        profile: &RoleProfile,
    ) -> Result<bool, UserPersistenceError> {
        let mut guard = self.store.lock().expect("store poisoned");
        let Some(record) = guard.get_mut(id) else {
            return Ok(false);
        };
        if let Some(phone) = phone {
            record.user = record.with_phone(Some(phone));
        }
        record.profile = profile.clone();
        Ok(true)
    }

    async fn set_role(&self, id: &UserId, role: Role) -> Result<bool, UserPersistenceError> {
        let mut guard = self.store.lock().expect("store poisoned");
        let Some(record) = guard.get_mut(id) else {
            return Ok(false);
        };
        record.user = record.with_role(role);
        record.profile = RoleProfile::default_for(role);
        Ok(true)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut guard = self.store.lock().expect("store poisoned");
        Ok(guard.remove(id).is_some())
    }
}

#[fixture]
fn tourist() -> User {
    fixtures::tourist(Utc::now()).expect("fixture tourist is valid")
}

#[rstest]
fn account_round_trip(tourist: User) {
    let repo = InMemoryUserRepository::default();
    let profile = RoleProfile::default_for(Role::Tourist);

    System::new().block_on(async move {
        repo.create_account(&tourist, &profile, "$argon2id$stub")
            .await
            .expect("create succeeds");
        let fetched = repo
            .find_by_id(tourist.id())
            .await
            .expect("lookup succeeds")
            .expect("account exists");
        assert_eq!(fetched.username(), tourist.username());

        let credentials = repo
            .find_credentials(tourist.username().as_ref())
            .await
            .expect("lookup succeeds")
            .expect("credentials exist");
        assert_eq!(credentials.user_id, *tourist.id());
        assert_eq!(credentials.password_hash, "$argon2id$stub");

        assert!(
            repo.set_role(tourist.id(), Role::Organizer)
                .await
                .expect("role change succeeds")
        );
        let promoted = repo
            .find_by_id(tourist.id())
            .await
            .expect("lookup succeeds")
            .expect("account exists");
        assert_eq!(promoted.role(), Role::Organizer);
        let profile = repo
            .find_profile(tourist.id())
            .await
            .expect("lookup succeeds")
            .expect("profile exists");
        assert_eq!(profile.role(), Role::Organizer);

        assert!(repo.delete(tourist.id()).await.expect("delete succeeds"));
        assert!(
            repo.find_by_id(tourist.id())
                .await
                .expect("lookup succeeds")
                .is_none()
        );
    });
}

#[rstest]
fn duplicate_usernames_are_rejected(tourist: User) {
    let repo = InMemoryUserRepository::default();
    let profile = RoleProfile::default_for(Role::Tourist);

    System::new().block_on(async move {
        repo.create_account(&tourist, &profile, "hash-1")
            .await
            .expect("first create succeeds");
        let clash = repo
            .create_account(&tourist, &profile, "hash-2")
            .await
            .expect_err("second create clashes");
        assert!(matches!(clash, UserPersistenceError::Duplicate { .. }));
    });
}

#[derive(Default)]
struct InMemoryDepartmentRepository {
    store: Mutex<HashMap<Uuid, Department>>,
}

#[async_trait]
impl DepartmentRepository for InMemoryDepartmentRepository {
    async fn list(&self) -> Result<Vec<Department>, DepartmentPersistenceError> {
        let guard = self.store.lock().expect("store poisoned");
        let mut departments: Vec<_> = guard.values().cloned().collect();
        departments.sort_by(|a, b| a.details.name.cmp(&b.details.name));
        Ok(departments)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Department>, DepartmentPersistenceError> {
        let guard = self.store.lock().expect("store poisoned");
        Ok(guard.get(&id).cloned())
    }

    async fn insert(&self, department: &Department) -> Result<(), DepartmentPersistenceError> {
        let mut guard = self.store.lock().expect("store poisoned");
        if guard
            .values()
            .any(|existing| existing.details.name == department.details.name)
        {
            return Err(DepartmentPersistenceError::Duplicate {
                message: department.details.name.clone(),
            });
        }
        guard.insert(department.id, department.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: Uuid,
        details: &DepartmentDetails,
    ) -> Result<bool, DepartmentPersistenceError> {
        let mut guard = self.store.lock().expect("store poisoned");
        let Some(department) = guard.get_mut(&id) else {
            return Ok(false);
        };
        department.details = details.clone();
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DepartmentPersistenceError> {
        let mut guard = self.store.lock().expect("store poisoned");
        Ok(guard.remove(&id).is_some())
    }

    async fn seed_defaults(&self) -> Result<u64, DepartmentPersistenceError> {
        let mut guard = self.store.lock().expect("store poisoned");
        let mut inserted = 0;
        for (code, name) in DEFAULT_DEPARTMENTS {
            if guard.values().any(|existing| existing.details.name == name) {
                continue;
            }
            let details = DepartmentDetails::try_from_parts(name, code, "").map_err(|err| {
                DepartmentPersistenceError::Query {
                    message: err.to_string(),
                }
            })?;
            let department = Department {
                id: Uuid::new_v4(),
                details,
            };
            guard.insert(department.id, department);
            inserted += 1;
        }
        Ok(inserted)
    }
}

#[rstest]
fn seeding_skips_names_already_present() {
    let repo = InMemoryDepartmentRepository::default();
    let existing = Department {
        id: Uuid::new_v4(),
        details: DepartmentDetails::try_from_parts("Law", "LAW", "Moot court visits.")
            .expect("valid details"),
    };

    System::new().block_on(async move {
        repo.insert(&existing).await.expect("insert succeeds");
        let inserted = repo.seed_defaults().await.expect("seed succeeds");
        assert_eq!(inserted, DEFAULT_DEPARTMENTS.len() as u64 - 1);

        let repeat = repo.seed_defaults().await.expect("seed succeeds");
        assert_eq!(repeat, 0);
        assert_eq!(
            repo.list().await.expect("list succeeds").len(),
            DEFAULT_DEPARTMENTS.len()
        );
    });
}
