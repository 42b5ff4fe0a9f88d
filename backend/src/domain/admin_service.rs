//! Developer administration services.
//!
//! Admin writes reach any account, department, or tour. The self-service
//! guards live here: a developer can never delete their own account or
//! change their own role, so the platform always keeps one working admin.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::access::{map_user_error, require_developer};
use crate::domain::ports::{
    AdminCommand, AdminDeleteTourRequest, CreateDepartmentRequest, DeleteDepartmentRequest,
    DeleteUserRequest, DepartmentPayload, DepartmentRepository, DepartmentResponse,
    PromoteUserRequest, PromoteUserResponse, TourRepository, UpdateDepartmentRequest,
    UserRepository,
};
use crate::domain::service_support::{map_department_error, map_tour_error};
use crate::domain::{Department, Error};

/// Admin writes over the user, tour, and department repositories.
#[derive(Clone)]
pub struct AdminCommandService<U, T, D> {
    users: Arc<U>,
    tours: Arc<T>,
    departments: Arc<D>,
}

impl<U, T, D> AdminCommandService<U, T, D> {
    /// Create a new admin command service.
    pub fn new(users: Arc<U>, tours: Arc<T>, departments: Arc<D>) -> Self {
        Self {
            users,
            tours,
            departments,
        }
    }
}

#[async_trait]
impl<U, T, D> AdminCommand for AdminCommandService<U, T, D>
where
    U: UserRepository,
    T: TourRepository,
    D: DepartmentRepository,
{
    async fn delete_user(&self, request: DeleteUserRequest) -> Result<(), Error> {
        require_developer(self.users.as_ref(), &request.developer_id).await?;
        if request.developer_id == request.user_id {
            return Err(Error::invalid_request(
                "developers cannot delete their own account",
            ));
        }
        let deleted = self
            .users
            .delete(&request.user_id)
            .await
            .map_err(map_user_error)?;
        if !deleted {
            return Err(Error::not_found(format!(
                "user {} not found",
                request.user_id
            )));
        }
        Ok(())
    }

    async fn promote_user(
        &self,
        request: PromoteUserRequest,
    ) -> Result<PromoteUserResponse, Error> {
        require_developer(self.users.as_ref(), &request.developer_id).await?;
        if request.developer_id == request.user_id {
            return Err(Error::invalid_request(
                "developers cannot change their own role",
            ));
        }
        let changed = self
            .users
            .set_role(&request.user_id, request.role)
            .await
            .map_err(map_user_error)?;
        if !changed {
            return Err(Error::not_found(format!(
                "user {} not found",
                request.user_id
            )));
        }
        Ok(PromoteUserResponse {
            user_id: request.user_id,
            role: request.role,
        })
    }

    async fn create_department(
        &self,
        request: CreateDepartmentRequest,
    ) -> Result<DepartmentResponse, Error> {
        require_developer(self.users.as_ref(), &request.developer_id).await?;
        let department = Department {
            id: Uuid::new_v4(),
            details: request.department.into_details()?,
        };
        self.departments
            .insert(&department)
            .await
            .map_err(map_department_error)?;
        Ok(DepartmentResponse {
            department: DepartmentPayload::from(department),
        })
    }

    async fn update_department(
        &self,
        request: UpdateDepartmentRequest,
    ) -> Result<DepartmentResponse, Error> {
        require_developer(self.users.as_ref(), &request.developer_id).await?;
        let details = request.department.into_details()?;
        let updated = self
            .departments
            .update(request.department_id, &details)
            .await
            .map_err(map_department_error)?;
        if !updated {
            return Err(Error::not_found(format!(
                "department {} not found",
                request.department_id
            )));
        }
        Ok(DepartmentResponse {
            department: DepartmentPayload::from(Department {
                id: request.department_id,
                details,
            }),
        })
    }

    async fn delete_department(&self, request: DeleteDepartmentRequest) -> Result<(), Error> {
        require_developer(self.users.as_ref(), &request.developer_id).await?;
        let deleted = self
            .departments
            .delete(request.department_id)
            .await
            .map_err(map_department_error)?;
        if !deleted {
            return Err(Error::not_found(format!(
                "department {} not found",
                request.department_id
            )));
        }
        Ok(())
    }

    async fn delete_tour(&self, request: AdminDeleteTourRequest) -> Result<(), Error> {
        require_developer(self.users.as_ref(), &request.developer_id).await?;
        let deleted = self
            .tours
            .delete(request.tour_id)
            .await
            .map_err(map_tour_error)?;
        if !deleted {
            return Err(Error::not_found(format!(
                "tour {} not found",
                request.tour_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "admin_service_tests.rs"]
mod tests;
