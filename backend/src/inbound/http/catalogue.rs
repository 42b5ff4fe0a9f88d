//! Public catalogue handlers: tour listings, detail pages, departments.
//!
//! ```text
//! GET /api/v1/tours?search=&category=&department=&priceBand=&page=&perPage=
//! GET /api/v1/tours/{tour_id}
//! GET /api/v1/departments
//! GET /api/v1/departments/{department_id}/tours
//! GET /api/v1/organizer/tours
//! ```
//!
//! The listing and detail routes are anonymous. A signed-in viewer gets the
//! detail page personalised with their wishlist state. The organizer listing
//! requires a session because it includes drafts.

use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::ports::{
    DepartmentToursRequest, DepartmentToursResponse, GetTourRequest, GetTourResponse,
    ListDepartmentsResponse, ListToursRequest, ListToursResponse, MyToursRequest, MyToursResponse,
};
use crate::domain::{PriceBand, TourCategory};
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Query string for the catalogue listing.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListToursQuery {
    /// Case-insensitive match on title and location.
    pub search: Option<String>,
    #[param(value_type = Option<String>)]
    pub category: Option<TourCategory>,
    /// Department identifier to filter by.
    pub department: Option<Uuid>,
    #[param(value_type = Option<String>)]
    pub price_band: Option<PriceBand>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Pagination query shared by the paged sub-listings.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Published upcoming tours, filtered and paged.
#[utoipa::path(
    get,
    path = "/api/v1/tours",
    params(ListToursQuery),
    responses(
        (status = 200, description = "One catalogue page"),
        (status = 400, description = "Invalid filters", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "list_tours",
    security([])
)]
#[get("/tours")]
pub async fn list_tours(
    state: web::Data<HttpState>,
    query: web::Query<ListToursQuery>,
) -> ApiResult<web::Json<ListToursResponse>> {
    let query = query.into_inner();
    let response = state
        .catalog
        .list_tours(ListToursRequest {
            search: query.search,
            category: query.category,
            department: query.department,
            price_band: query.price_band,
            page: query.page,
            per_page: query.per_page,
        })
        .await?;
    Ok(web::Json(response))
}

/// One tour's detail page with reviews and related tours.
///
/// `inWishlist` is personalised for a signed-in viewer and `false` for
/// anonymous requests.
#[utoipa::path(
    get,
    path = "/api/v1/tours/{tour_id}",
    params(("tour_id" = Uuid, Path, description = "Tour identifier")),
    responses(
        (status = 200, description = "Tour detail page"),
        (status = 404, description = "Unknown or unpublished tour", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "get_tour",
    security([])
)]
#[get("/tours/{tour_id}")]
pub async fn get_tour(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<GetTourResponse>> {
    let viewer = session.user_id()?;
    let response = state
        .catalog
        .get_tour(GetTourRequest {
            tour_id: path.into_inner(),
            viewer,
        })
        .await?;
    Ok(web::Json(response))
}

/// Every department, for the directory page and tour forms.
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    responses((status = 200, description = "Departments, alphabetical")),
    tags = ["catalogue"],
    operation_id = "list_departments",
    security([])
)]
#[get("/departments")]
pub async fn list_departments(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<ListDepartmentsResponse>> {
    let response = state.catalog.list_departments().await?;
    Ok(web::Json(response))
}

/// One department with its published upcoming tours.
#[utoipa::path(
    get,
    path = "/api/v1/departments/{department_id}/tours",
    params(
        ("department_id" = Uuid, Path, description = "Department identifier"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Department with its tours"),
        (status = 404, description = "Unknown department", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "department_tours",
    security([])
)]
#[get("/departments/{department_id}/tours")]
pub async fn department_tours(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<DepartmentToursResponse>> {
    let query = query.into_inner();
    let response = state
        .catalog
        .department_tours(DepartmentToursRequest {
            department_id: path.into_inner(),
            page: query.page,
            per_page: query.per_page,
        })
        .await?;
    Ok(web::Json(response))
}

/// The signed-in organizer's tours, drafts included, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/organizer/tours",
    params(PageQuery),
    responses(
        (status = 200, description = "The caller's tours"),
        (status = 401, description = "Not signed in", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Caller is not an organizer", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "my_tours"
)]
#[get("/organizer/tours")]
pub async fn my_tours(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let organizer_id = session.require_user_id()?;
    let query = query.into_inner();
    let response: MyToursResponse = state
        .catalog
        .my_tours(MyToursRequest {
            organizer_id,
            page: query.page,
            per_page: query.per_page,
        })
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(response))
}
