//! Driving port for the developer admin surface.
//!
//! Developers manage accounts, departments, and can remove any tour. Every
//! request names the acting developer so the self-service guards (no
//! deleting or demoting your own account) can hold at the service layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DepartmentDetails, Error, Role, UserId};

use super::catalog_query::DepartmentPayload;
use super::fixtures;

/// Request to delete an account and everything it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserRequest {
    pub developer_id: UserId,
    pub user_id: UserId,
}

/// Request to change an account's role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoteUserRequest {
    pub developer_id: UserId,
    pub user_id: UserId,
    pub role: Role,
}

/// Response after a role change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoteUserResponse {
    pub user_id: UserId,
    pub role: Role,
}

/// Department form fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentForm {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
}

impl DepartmentForm {
    /// Validate the form into domain department details.
    pub fn into_details(self) -> Result<DepartmentDetails, Error> {
        DepartmentDetails::try_from_parts(&self.name, &self.code, &self.description)
            .map_err(|err| Error::invalid_request(err.to_string()))
    }
}

/// Request to create a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentRequest {
    pub developer_id: UserId,
    pub department: DepartmentForm,
}

/// Request to edit a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartmentRequest {
    pub developer_id: UserId,
    pub department_id: Uuid,
    pub department: DepartmentForm,
}

/// Request to delete a department.
///
/// Tours pointing at it keep running and simply lose the link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDepartmentRequest {
    pub developer_id: UserId,
    pub department_id: Uuid,
}

/// Response carrying the department after a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResponse {
    pub department: DepartmentPayload,
}

/// Request to delete any tour, regardless of owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDeleteTourRequest {
    pub developer_id: UserId,
    pub tour_id: Uuid,
}

/// Driving port for developer administration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminCommand: Send + Sync {
    /// Delete an account along with its bookings, reviews, and contacts.
    ///
    /// Developers cannot delete their own account this way.
    async fn delete_user(&self, request: DeleteUserRequest) -> Result<(), Error>;

    /// Change an account's role.
    ///
    /// Developers cannot change their own role, so the platform always
    /// keeps at least the acting developer.
    async fn promote_user(&self, request: PromoteUserRequest)
    -> Result<PromoteUserResponse, Error>;

    /// Create a department. Names are unique.
    async fn create_department(
        &self,
        request: CreateDepartmentRequest,
    ) -> Result<DepartmentResponse, Error>;

    /// Edit a department.
    async fn update_department(
        &self,
        request: UpdateDepartmentRequest,
    ) -> Result<DepartmentResponse, Error>;

    /// Delete a department, unlinking its tours.
    async fn delete_department(&self, request: DeleteDepartmentRequest) -> Result<(), Error>;

    /// Delete any tour on the platform.
    async fn delete_tour(&self, request: AdminDeleteTourRequest) -> Result<(), Error>;
}

/// Fixture admin surface with the self-service guards wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAdminCommand;

impl FixtureAdminCommand {
    fn require_fixture_developer(developer_id: &UserId) -> Result<(), Error> {
        if *developer_id.as_uuid() == fixtures::DEVELOPER_ID {
            Ok(())
        } else {
            Err(Error::forbidden("developer access required"))
        }
    }
}

#[async_trait]
impl AdminCommand for FixtureAdminCommand {
    async fn delete_user(&self, request: DeleteUserRequest) -> Result<(), Error> {
        Self::require_fixture_developer(&request.developer_id)?;
        if request.developer_id == request.user_id {
            return Err(Error::invalid_request(
                "developers cannot delete their own account",
            ));
        }
        fixtures::user_by_id(&request.user_id, chrono::Utc::now())?
            .ok_or_else(|| Error::not_found(format!("user {} not found", request.user_id)))?;
        Ok(())
    }

    async fn promote_user(
        &self,
        request: PromoteUserRequest,
    ) -> Result<PromoteUserResponse, Error> {
        Self::require_fixture_developer(&request.developer_id)?;
        if request.developer_id == request.user_id {
            return Err(Error::invalid_request(
                "developers cannot change their own role",
            ));
        }
        fixtures::user_by_id(&request.user_id, chrono::Utc::now())?
            .ok_or_else(|| Error::not_found(format!("user {} not found", request.user_id)))?;
        Ok(PromoteUserResponse {
            user_id: request.user_id,
            role: request.role,
        })
    }

    async fn create_department(
        &self,
        request: CreateDepartmentRequest,
    ) -> Result<DepartmentResponse, Error> {
        Self::require_fixture_developer(&request.developer_id)?;
        let details = request.department.into_details()?;
        Ok(DepartmentResponse {
            department: DepartmentPayload {
                id: Uuid::new_v4(),
                name: details.name,
                code: details.code,
                description: details.description,
            },
        })
    }

    async fn update_department(
        &self,
        request: UpdateDepartmentRequest,
    ) -> Result<DepartmentResponse, Error> {
        Self::require_fixture_developer(&request.developer_id)?;
        let details = request.department.into_details()?;
        Ok(DepartmentResponse {
            department: DepartmentPayload {
                id: request.department_id,
                name: details.name,
                code: details.code,
                description: details.description,
            },
        })
    }

    async fn delete_department(&self, request: DeleteDepartmentRequest) -> Result<(), Error> {
        Self::require_fixture_developer(&request.developer_id)
    }

    async fn delete_tour(&self, request: AdminDeleteTourRequest) -> Result<(), Error> {
        Self::require_fixture_developer(&request.developer_id)?;
        fixtures::tour_by_id(request.tour_id, chrono::Utc::now())?
            .ok_or_else(|| Error::not_found(format!("tour {} not found", request.tour_id)))?;
        Ok(())
    }
}
