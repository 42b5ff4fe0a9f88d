//! Organizer tour management handlers.
//!
//! ```text
//! POST   /api/v1/tours
//! PUT    /api/v1/tours/{tour_id}
//! POST   /api/v1/tours/{tour_id}/status
//! POST   /api/v1/tours/{tour_id}/qr-code
//! DELETE /api/v1/tours/{tour_id}
//! GET    /api/v1/tours/{tour_id}/bookings
//! ```
//!
//! All routes require a session and act as the signed-in organizer; the port
//! layer rejects callers who do not own the tour.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::ports::{
    ChangeTourStatusRequest, ChangeTourStatusResponse, CreateTourRequest, DeleteTourRequest,
    RegenerateQrRequest, RegenerateQrResponse, TourBookingsRequest, TourBookingsResponse,
    TourForm, UpdateTourRequest,
};
use crate::domain::TourStatus;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::catalogue::PageQuery;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Body for `POST /api/v1/tours/{tour_id}/status`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusForm {
    /// Target lifecycle status.
    #[schema(value_type = String, example = "published")]
    pub status: TourStatus,
}

/// Create a draft tour owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/tours",
    responses(
        (status = 201, description = "Draft created"),
        (status = 400, description = "Invalid form", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Caller is not an organizer", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["tours"],
    operation_id = "create_tour"
)]
#[post("/tours")]
pub async fn create_tour(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<TourForm>,
) -> ApiResult<HttpResponse> {
    let organizer_id = session.require_user_id()?;
    let response = state
        .tours
        .create_tour(CreateTourRequest {
            organizer_id,
            tour: payload.into_inner(),
        })
        .await?;
    Ok(HttpResponse::Created().json(response))
}

/// Replace a tour's details.
#[utoipa::path(
    put,
    path = "/api/v1/tours/{tour_id}",
    params(("tour_id" = Uuid, Path, description = "Tour identifier")),
    responses(
        (status = 204, description = "Tour updated"),
        (status = 403, description = "Not the owning organizer", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Unknown tour", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["tours"],
    operation_id = "update_tour"
)]
#[put("/tours/{tour_id}")]
pub async fn update_tour(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<TourForm>,
) -> ApiResult<HttpResponse> {
    let organizer_id = session.require_user_id()?;
    state
        .tours
        .update_tour(UpdateTourRequest {
            organizer_id,
            tour_id: path.into_inner(),
            tour: payload.into_inner(),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Move a tour along its lifecycle.
///
/// Publishing mints the QR code link and returns it.
#[utoipa::path(
    post,
    path = "/api/v1/tours/{tour_id}/status",
    params(("tour_id" = Uuid, Path, description = "Tour identifier")),
    request_body = StatusForm,
    responses(
        (status = 200, description = "Status changed"),
        (status = 409, description = "Transition not allowed", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["tours"],
    operation_id = "change_tour_status"
)]
#[post("/tours/{tour_id}/status")]
pub async fn change_tour_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<StatusForm>,
) -> ApiResult<web::Json<ChangeTourStatusResponse>> {
    let organizer_id = session.require_user_id()?;
    let response = state
        .tours
        .change_status(ChangeTourStatusRequest {
            organizer_id,
            tour_id: path.into_inner(),
            status: payload.into_inner().status,
        })
        .await?;
    Ok(web::Json(response))
}

/// Mint a fresh QR code link for a published tour.
#[utoipa::path(
    post,
    path = "/api/v1/tours/{tour_id}/qr-code",
    params(("tour_id" = Uuid, Path, description = "Tour identifier")),
    responses(
        (status = 200, description = "QR code link minted"),
        (status = 409, description = "Tour is not published", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["tours"],
    operation_id = "regenerate_qr"
)]
#[post("/tours/{tour_id}/qr-code")]
pub async fn regenerate_qr(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<RegenerateQrResponse>> {
    let organizer_id = session.require_user_id()?;
    let response = state
        .tours
        .regenerate_qr(RegenerateQrRequest {
            organizer_id,
            tour_id: path.into_inner(),
        })
        .await?;
    Ok(web::Json(response))
}

/// Delete a tour along with its bookings and reviews.
#[utoipa::path(
    delete,
    path = "/api/v1/tours/{tour_id}",
    params(("tour_id" = Uuid, Path, description = "Tour identifier")),
    responses(
        (status = 204, description = "Tour deleted"),
        (status = 403, description = "Not the owning organizer", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["tours"],
    operation_id = "delete_tour"
)]
#[delete("/tours/{tour_id}")]
pub async fn delete_tour(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let organizer_id = session.require_user_id()?;
    state
        .tours
        .delete_tour(DeleteTourRequest {
            organizer_id,
            tour_id: path.into_inner(),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// One tour's booking roster, for its organizer.
#[utoipa::path(
    get,
    path = "/api/v1/tours/{tour_id}/bookings",
    params(("tour_id" = Uuid, Path, description = "Tour identifier"), PageQuery),
    responses(
        (status = 200, description = "Bookings, newest first"),
        (status = 403, description = "Not the owning organizer", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["tours"],
    operation_id = "tour_bookings"
)]
#[get("/tours/{tour_id}/bookings")]
pub async fn tour_bookings(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let organizer_id = session.require_user_id()?;
    let query = query.into_inner();
    let response: TourBookingsResponse = state
        .booking_query
        .tour_bookings(TourBookingsRequest {
            organizer_id,
            tour_id: path.into_inner(),
            page: query.page,
            per_page: query.per_page,
        })
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(response))
}
