//! Tourist booking handlers.
//!
//! ```text
//! POST /api/v1/bookings
//! GET  /api/v1/bookings
//! GET  /api/v1/bookings/{booking_id}
//! POST /api/v1/bookings/{booking_id}/payment
//! POST /api/v1/bookings/{booking_id}/cancel
//! ```
//!
//! Booking a free tour confirms immediately; a priced tour waits as
//! `pending` until the payment route records a method and receipt.

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::ports::{
    BookTourRequest, CancelBookingRequest, CancelBookingResponse, GetBookingRequest,
    GetBookingResponse, MyBookingsRequest, MyBookingsResponse, PayBookingRequest,
    PayBookingResponse,
};
use crate::domain::PaymentMethod;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::catalogue::PageQuery;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Body for `POST /api/v1/bookings`; the tourist comes from the session.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    pub tour_id: Uuid,
    /// Seats to reserve, at least one.
    pub participants: i32,
    #[serde(default)]
    pub special_requirements: Option<String>,
}

/// Body for `POST /api/v1/bookings/{booking_id}/payment`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentForm {
    /// Wallet or card rail used to pay.
    #[schema(value_type = String, example = "bkash")]
    pub payment_method: PaymentMethod,
    /// Wallet or card number; validated for shape and then discarded.
    #[serde(default)]
    pub payment_number: Option<String>,
}

/// Reserve seats on a published upcoming tour.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = BookingForm,
    responses(
        (status = 201, description = "Booking created"),
        (status = 409, description = "Not enough seats or already booked", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Unknown tour", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "book_tour"
)]
#[post("/bookings")]
pub async fn book_tour(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<BookingForm>,
) -> ApiResult<HttpResponse> {
    let tourist_id = session.require_user_id()?;
    let form = payload.into_inner();
    let response = state
        .booking_command
        .book_tour(BookTourRequest {
            tourist_id,
            tour_id: form.tour_id,
            participants: form.participants,
            special_requirements: form.special_requirements,
        })
        .await?;
    Ok(HttpResponse::Created().json(response))
}

/// The caller's bookings, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of bookings"),
        (status = 401, description = "Not signed in", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "my_bookings"
)]
#[get("/bookings")]
pub async fn my_bookings(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let tourist_id = session.require_user_id()?;
    let query = query.into_inner();
    let response: MyBookingsResponse = state
        .booking_query
        .my_bookings(MyBookingsRequest {
            tourist_id,
            page: query.page,
            per_page: query.per_page,
        })
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(response))
}

/// One booking with its tour context.
///
/// Visible to the booking tourist and the tour's organizer.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{booking_id}",
    params(("booking_id" = Uuid, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Booking detail"),
        (status = 404, description = "Unknown booking", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "get_booking"
)]
#[get("/bookings/{booking_id}")]
pub async fn get_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<GetBookingResponse>> {
    let viewer = session.require_user_id()?;
    let response = state
        .booking_query
        .get_booking(GetBookingRequest {
            viewer,
            booking_id: path.into_inner(),
        })
        .await?;
    Ok(web::Json(response))
}

/// Record a payment against a pending booking.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/payment",
    params(("booking_id" = Uuid, Path, description = "Booking identifier")),
    request_body = PaymentForm,
    responses(
        (status = 200, description = "Payment recorded, booking confirmed"),
        (status = 409, description = "Booking is not awaiting payment", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "pay_booking"
)]
#[post("/bookings/{booking_id}/payment")]
pub async fn pay_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<PaymentForm>,
) -> ApiResult<web::Json<PayBookingResponse>> {
    let tourist_id = session.require_user_id()?;
    let form = payload.into_inner();
    let response = state
        .booking_command
        .pay_booking(PayBookingRequest {
            tourist_id,
            booking_id: path.into_inner(),
            payment_method: form.payment_method,
            payment_number: form.payment_number,
        })
        .await?;
    Ok(web::Json(response))
}

/// Cancel a booking, freeing its seats.
///
/// A paid booking comes back `refunded`; the refund itself happens outside
/// the system.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/cancel",
    params(("booking_id" = Uuid, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Booking cancelled"),
        (status = 409, description = "Already cancelled or completed", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "cancel_booking"
)]
#[post("/bookings/{booking_id}/cancel")]
pub async fn cancel_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<CancelBookingResponse>> {
    let tourist_id = session.require_user_id()?;
    let response = state
        .booking_command
        .cancel_booking(CancelBookingRequest {
            tourist_id,
            booking_id: path.into_inner(),
        })
        .await?;
    Ok(web::Json(response))
}
