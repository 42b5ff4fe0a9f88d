//! Role dashboard handlers.
//!
//! ```text
//! GET /api/v1/dashboards/tourist
//! GET /api/v1/dashboards/organizer
//! GET /api/v1/dashboards/developer
//! ```
//!
//! Each dashboard serves the signed-in account and refuses the wrong role.

use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::domain::ports::{
    DeveloperDashboardRequest, OrganizerDashboardRequest, TouristDashboardRequest,
};
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::catalogue::PageQuery;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Query string for the developer dashboard's two independent pagers.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DeveloperPageQuery {
    pub users_page: Option<u32>,
    pub tours_page: Option<u32>,
    pub per_page: Option<u32>,
}

/// The tourist dashboard: stats plus recent bookings.
#[utoipa::path(
    get,
    path = "/api/v1/dashboards/tourist",
    params(PageQuery),
    responses(
        (status = 200, description = "Tourist stats and recent bookings"),
        (status = 401, description = "Not signed in", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["dashboards"],
    operation_id = "tourist_dashboard"
)]
#[get("/dashboards/tourist")]
pub async fn tourist_dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let tourist_id = session.require_user_id()?;
    let query = query.into_inner();
    let response = state
        .dashboards
        .tourist_dashboard(TouristDashboardRequest {
            tourist_id,
            page: query.page,
            per_page: query.per_page,
        })
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(response))
}

/// The organizer dashboard: stats plus the caller's tours.
#[utoipa::path(
    get,
    path = "/api/v1/dashboards/organizer",
    params(PageQuery),
    responses(
        (status = 200, description = "Organizer stats and tours"),
        (status = 403, description = "Caller is not an organizer", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["dashboards"],
    operation_id = "organizer_dashboard"
)]
#[get("/dashboards/organizer")]
pub async fn organizer_dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let organizer_id = session.require_user_id()?;
    let query = query.into_inner();
    let response = state
        .dashboards
        .organizer_dashboard(OrganizerDashboardRequest {
            organizer_id,
            page: query.page,
            per_page: query.per_page,
        })
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(response))
}

/// The developer dashboard: platform stats, recent users, recent tours.
#[utoipa::path(
    get,
    path = "/api/v1/dashboards/developer",
    params(DeveloperPageQuery),
    responses(
        (status = 200, description = "Platform stats and recent activity"),
        (status = 403, description = "Caller is not a developer", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["dashboards"],
    operation_id = "developer_dashboard"
)]
#[get("/dashboards/developer")]
pub async fn developer_dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<DeveloperPageQuery>,
) -> ApiResult<HttpResponse> {
    let developer_id = session.require_user_id()?;
    let query = query.into_inner();
    let response = state
        .dashboards
        .developer_dashboard(DeveloperDashboardRequest {
            developer_id,
            users_page: query.users_page,
            tours_page: query.tours_page,
            per_page: query.per_page,
        })
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{fixture_app, login_as};
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, web};
    use serde_json::Value;

    fn configure(cfg: &mut web::ServiceConfig) {
        cfg.service(tourist_dashboard)
            .service(organizer_dashboard)
            .service(developer_dashboard);
    }

    #[actix_web::test]
    async fn tourist_dashboard_serves_zeroed_stats() {
        let app = actix_test::init_service(fixture_app(configure)).await;
        let cookie = login_as(&app, "mira").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/dashboards/tourist")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/stats/totalBookings").and_then(Value::as_i64),
            Some(0)
        );
        assert_eq!(
            body.pointer("/recentBookings/totalItems").and_then(Value::as_u64),
            Some(0)
        );
    }

    #[actix_web::test]
    async fn organizer_dashboard_reports_revenue() {
        let app = actix_test::init_service(fixture_app(configure)).await;
        let cookie = login_as(&app, "rahim").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/dashboards/organizer")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/stats/totalRevenue").and_then(Value::as_str),
            Some("1000.00")
        );
    }

    #[actix_web::test]
    async fn organizer_dashboard_refuses_tourists() {
        let app = actix_test::init_service(fixture_app(configure)).await;
        let cookie = login_as(&app, "mira").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/dashboards/organizer")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn developer_dashboard_counts_the_fixture_accounts() {
        let app = actix_test::init_service(fixture_app(configure)).await;
        let cookie = login_as(&app, "admin").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/dashboards/developer")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/stats/totalUsers").and_then(Value::as_i64),
            Some(3)
        );
        assert_eq!(
            body.pointer("/stats/totalDepartments").and_then(Value::as_i64),
            Some(2)
        );
    }
}
