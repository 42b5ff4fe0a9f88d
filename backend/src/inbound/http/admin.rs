//! Developer administration handlers.
//!
//! ```text
//! DELETE /api/v1/admin/users/{user_id}
//! PUT    /api/v1/admin/users/{user_id}/role
//! POST   /api/v1/admin/departments
//! PUT    /api/v1/admin/departments/{department_id}
//! DELETE /api/v1/admin/departments/{department_id}
//! DELETE /api/v1/admin/tours/{tour_id}
//! ```
//!
//! The port layer enforces that the caller holds the developer role; these
//! handlers only thread the session identity through.

use actix_web::{delete, post, put, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::ports::{
    AdminDeleteTourRequest, CreateDepartmentRequest, DeleteDepartmentRequest, DeleteUserRequest,
    DepartmentForm, DepartmentResponse, PromoteUserRequest, PromoteUserResponse,
    UpdateDepartmentRequest,
};
use crate::domain::{Role, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Body for `PUT /api/v1/admin/users/{user_id}/role`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleForm {
    /// Target role for the account.
    #[schema(value_type = String, example = "organizer")]
    pub role: Role,
}

/// Delete an account along with its bookings, reviews, and contacts.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{user_id}",
    params(("user_id" = String, Path, description = "Account identifier")),
    responses(
        (status = 204, description = "Account removed"),
        (status = 400, description = "Cannot delete the acting developer", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Caller is not a developer", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "delete_user"
)]
#[delete("/admin/users/{user_id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let developer_id = session.require_user_id()?;
    state
        .admin
        .delete_user(DeleteUserRequest {
            developer_id,
            user_id: UserId::from_uuid(path.into_inner()),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Change an account's role.
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{user_id}/role",
    params(("user_id" = String, Path, description = "Account identifier")),
    request_body = RoleForm,
    responses(
        (status = 200, description = "Role changed"),
        (status = 403, description = "Caller is not a developer", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Unknown account", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "promote_user"
)]
#[put("/admin/users/{user_id}/role")]
pub async fn promote_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<RoleForm>,
) -> ApiResult<web::Json<PromoteUserResponse>> {
    let developer_id = session.require_user_id()?;
    let response = state
        .admin
        .promote_user(PromoteUserRequest {
            developer_id,
            user_id: UserId::from_uuid(path.into_inner()),
            role: payload.into_inner().role,
        })
        .await?;
    Ok(web::Json(response))
}

/// Create a department.
#[utoipa::path(
    post,
    path = "/api/v1/admin/departments",
    responses(
        (status = 201, description = "Department created"),
        (status = 400, description = "Invalid form", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Name or code already taken", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "create_department"
)]
#[post("/admin/departments")]
pub async fn create_department(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<DepartmentForm>,
) -> ApiResult<HttpResponse> {
    let developer_id = session.require_user_id()?;
    let response = state
        .admin
        .create_department(CreateDepartmentRequest {
            developer_id,
            department: payload.into_inner(),
        })
        .await?;
    Ok(HttpResponse::Created().json(response))
}

/// Edit a department.
#[utoipa::path(
    put,
    path = "/api/v1/admin/departments/{department_id}",
    params(("department_id" = Uuid, Path, description = "Department identifier")),
    responses(
        (status = 200, description = "Department updated"),
        (status = 404, description = "Unknown department", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "update_department"
)]
#[put("/admin/departments/{department_id}")]
pub async fn update_department(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<DepartmentForm>,
) -> ApiResult<web::Json<DepartmentResponse>> {
    let developer_id = session.require_user_id()?;
    let response = state
        .admin
        .update_department(UpdateDepartmentRequest {
            developer_id,
            department_id: path.into_inner(),
            department: payload.into_inner(),
        })
        .await?;
    Ok(web::Json(response))
}

/// Delete a department; its tours keep running and lose the link.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/departments/{department_id}",
    params(("department_id" = Uuid, Path, description = "Department identifier")),
    responses(
        (status = 204, description = "Department removed"),
        (status = 404, description = "Unknown department", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "delete_department"
)]
#[delete("/admin/departments/{department_id}")]
pub async fn delete_department(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let developer_id = session.require_user_id()?;
    state
        .admin
        .delete_department(DeleteDepartmentRequest {
            developer_id,
            department_id: path.into_inner(),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete any tour, regardless of owner.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/tours/{tour_id}",
    params(("tour_id" = Uuid, Path, description = "Tour identifier")),
    responses(
        (status = 204, description = "Tour removed"),
        (status = 403, description = "Caller is not a developer", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "admin_delete_tour"
)]
#[delete("/admin/tours/{tour_id}")]
pub async fn admin_delete_tour(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let developer_id = session.require_user_id()?;
    state
        .admin
        .delete_tour(AdminDeleteTourRequest {
            developer_id,
            tour_id: path.into_inner(),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::fixtures;
    use crate::inbound::http::test_utils::{fixture_app, login_as};
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, web};
    use serde_json::Value;

    fn configure(cfg: &mut web::ServiceConfig) {
        cfg.service(delete_user)
            .service(promote_user)
            .service(create_department)
            .service(update_department)
            .service(delete_department)
            .service(admin_delete_tour);
    }

    #[actix_web::test]
    async fn delete_guards_the_acting_developer() {
        let app = actix_test::init_service(fixture_app(configure)).await;
        let cookie = login_as(&app, "admin").await;

        let uri = format!("/api/v1/admin/users/{}", fixtures::DEVELOPER_ID);
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete().uri(&uri).cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn delete_removes_another_account() {
        let app = actix_test::init_service(fixture_app(configure)).await;
        let cookie = login_as(&app, "admin").await;

        let uri = format!("/api/v1/admin/users/{}", fixtures::TOURIST_ID);
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete().uri(&uri).cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn admin_routes_refuse_non_developers() {
        let app = actix_test::init_service(fixture_app(configure)).await;
        let cookie = login_as(&app, "rahim").await;

        let uri = format!("/api/v1/admin/users/{}", fixtures::TOURIST_ID);
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete().uri(&uri).cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn create_department_uppercases_the_code() {
        let app = actix_test::init_service(fixture_app(configure)).await;
        let cookie = login_as(&app, "admin").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/admin/departments")
                .cookie(cookie)
                .set_json(serde_json::json!({
                    "name": "Marine Sciences",
                    "code": "msc",
                    "description": "The wave tank building.",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/department/code").and_then(Value::as_str),
            Some("MSC")
        );
    }

    #[actix_web::test]
    async fn create_department_rejects_blank_names() {
        let app = actix_test::init_service(fixture_app(configure)).await;
        let cookie = login_as(&app, "admin").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/admin/departments")
                .cookie(cookie)
                .set_json(serde_json::json!({
                    "name": "   ",
                    "code": "XX",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn promote_changes_a_role() {
        let app = actix_test::init_service(fixture_app(configure)).await;
        let cookie = login_as(&app, "admin").await;

        let uri = format!("/api/v1/admin/users/{}/role", fixtures::TOURIST_ID);
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&uri)
                .cookie(cookie)
                .set_json(serde_json::json!({ "role": "organizer" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("role").and_then(Value::as_str), Some("organizer"));
    }
}
