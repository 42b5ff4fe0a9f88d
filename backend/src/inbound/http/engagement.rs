//! Wishlist and review handlers.
//!
//! ```text
//! POST /api/v1/wishlist/{tour_id}
//! GET  /api/v1/wishlist
//! POST /api/v1/tours/{tour_id}/reviews
//! GET  /api/v1/account/reviews
//! ```
//!
//! The wishlist toggle is a single idempotent-feeling route: hitting it
//! twice saves and then removes the tour, and the response reports where
//! the toggle landed.

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::ports::{
    MyReviewsRequest, MyReviewsResponse, MyWishlistRequest, MyWishlistResponse,
    SubmitReviewRequest, ToggleWishlistRequest, ToggleWishlistResponse,
};
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Body for `POST /api/v1/tours/{tour_id}/reviews`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewForm {
    /// Star rating from 1 to 5.
    pub rating: i16,
    #[serde(default)]
    pub comment: String,
}

/// Toggle a tour in the caller's wishlist.
#[utoipa::path(
    post,
    path = "/api/v1/wishlist/{tour_id}",
    params(("tour_id" = Uuid, Path, description = "Tour identifier")),
    responses(
        (status = 200, description = "Where the toggle landed"),
        (status = 404, description = "Unknown or unpublished tour", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["engagement"],
    operation_id = "toggle_wishlist"
)]
#[post("/wishlist/{tour_id}")]
pub async fn toggle_wishlist(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<ToggleWishlistResponse>> {
    let tourist_id = session.require_user_id()?;
    let response = state
        .engagement_command
        .toggle_wishlist(ToggleWishlistRequest {
            tourist_id,
            tour_id: path.into_inner(),
        })
        .await?;
    Ok(web::Json(response))
}

/// The caller's saved tours, most recently saved first.
#[utoipa::path(
    get,
    path = "/api/v1/wishlist",
    responses(
        (status = 200, description = "Saved tours"),
        (status = 401, description = "Not signed in", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["engagement"],
    operation_id = "my_wishlist"
)]
#[get("/wishlist")]
pub async fn my_wishlist(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let tourist_id = session.require_user_id()?;
    let response: MyWishlistResponse = state
        .engagement_query
        .my_wishlist(MyWishlistRequest { tourist_id })
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(response))
}

/// Review a tour the caller has a confirmed or completed booking on.
///
/// Submitting again overwrites the earlier review.
#[utoipa::path(
    post,
    path = "/api/v1/tours/{tour_id}/reviews",
    params(("tour_id" = Uuid, Path, description = "Tour identifier")),
    request_body = ReviewForm,
    responses(
        (status = 201, description = "Review stored"),
        (status = 400, description = "Rating out of range", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "No booking on this tour", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["engagement"],
    operation_id = "submit_review"
)]
#[post("/tours/{tour_id}/reviews")]
pub async fn submit_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<ReviewForm>,
) -> ApiResult<HttpResponse> {
    let tourist_id = session.require_user_id()?;
    let form = payload.into_inner();
    let response = state
        .engagement_command
        .submit_review(SubmitReviewRequest {
            tourist_id,
            tour_id: path.into_inner(),
            rating: form.rating,
            comment: form.comment,
        })
        .await?;
    Ok(HttpResponse::Created().json(response))
}

/// The caller's reviews, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/account/reviews",
    responses(
        (status = 200, description = "The caller's reviews"),
        (status = 401, description = "Not signed in", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["engagement"],
    operation_id = "my_reviews"
)]
#[get("/account/reviews")]
pub async fn my_reviews(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<MyReviewsResponse>> {
    let tourist_id = session.require_user_id()?;
    let response = state
        .engagement_query
        .my_reviews(MyReviewsRequest { tourist_id })
        .await?;
    Ok(web::Json(response))
}
