//! Notification handlers: organizer sends, tourist inbox.
//!
//! ```text
//! POST /api/v1/notifications
//! POST /api/v1/notifications/quick-reminder
//! GET  /api/v1/notifications/sent
//! GET  /api/v1/notifications/recent?limit=
//! GET  /api/v1/notifications/unread-count
//! POST /api/v1/notifications/{entry_id}/read
//! POST /api/v1/notifications/read-all
//! ```
//!
//! Sending fans out inbox entries immediately; `scheduledFor` is recorded
//! for the audit trail only.

use actix_web::{get, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::ports::{
    MarkAllReadRequest, MarkAllReadResponse, MarkReadRequest, QuickReminderRequest,
    RecentNotificationsRequest, SendNotificationRequest, SendNotificationResponse,
    SentNotificationsRequest, UnreadCountRequest, UnreadCountResponse,
};
use crate::domain::NotificationKind;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::catalogue::PageQuery;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Body for `POST /api/v1/notifications`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationForm {
    pub title: String,
    pub message: String,
    /// Tone shown in tourist inboxes.
    #[schema(value_type = String, example = "announcement")]
    pub kind: NotificationKind,
    /// Deliver to every tourist instead of one tour's bookers.
    #[serde(default)]
    pub send_to_all: bool,
    /// Tour whose confirmed bookers should receive it.
    #[serde(default)]
    pub tour_id: Option<Uuid>,
    /// Recorded for the audit trail; delivery is immediate.
    #[serde(default)]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub scheduled_for: Option<DateTime<Utc>>,
}

/// Body for `POST /api/v1/notifications/quick-reminder`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuickReminderForm {
    pub tour_id: Uuid,
}

/// Query string for the recent-inbox dropdown.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RecentQuery {
    /// Entries to return; defaults to ten.
    pub limit: Option<u32>,
}

/// Author a notification and fan it out.
#[utoipa::path(
    post,
    path = "/api/v1/notifications",
    request_body = NotificationForm,
    responses(
        (status = 201, description = "Notification sent"),
        (status = 400, description = "Blank title or message", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Caller is not an organizer", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "send_notification"
)]
#[post("/notifications")]
pub async fn send_notification(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<NotificationForm>,
) -> ApiResult<HttpResponse> {
    let organizer_id = session.require_user_id()?;
    let form = payload.into_inner();
    let response = state
        .notification_command
        .send_notification(SendNotificationRequest {
            organizer_id,
            title: form.title,
            message: form.message,
            kind: form.kind,
            send_to_all: form.send_to_all,
            tour_id: form.tour_id,
            scheduled_for: form.scheduled_for,
        })
        .await?;
    Ok(HttpResponse::Created().json(response))
}

/// One-click reminder to a tour's confirmed bookers.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/quick-reminder",
    request_body = QuickReminderForm,
    responses(
        (status = 201, description = "Reminder sent"),
        (status = 404, description = "Unknown tour", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "quick_reminder"
)]
#[post("/notifications/quick-reminder")]
pub async fn quick_reminder(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<QuickReminderForm>,
) -> ApiResult<HttpResponse> {
    let organizer_id = session.require_user_id()?;
    let response: SendNotificationResponse = state
        .notification_command
        .quick_reminder(QuickReminderRequest {
            organizer_id,
            tour_id: payload.into_inner().tour_id,
        })
        .await?;
    Ok(HttpResponse::Created().json(response))
}

/// Notifications the signed-in organizer has sent, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/notifications/sent",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of sent notifications"),
        (status = 403, description = "Caller is not an organizer", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "sent_notifications"
)]
#[get("/notifications/sent")]
pub async fn sent_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let organizer_id = session.require_user_id()?;
    let query = query.into_inner();
    let response = state
        .notification_query
        .sent_notifications(SentNotificationsRequest {
            organizer_id,
            page: query.page,
            per_page: query.per_page,
        })
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(response))
}

/// The caller's recent inbox entries plus the unread badge count.
#[utoipa::path(
    get,
    path = "/api/v1/notifications/recent",
    params(RecentQuery),
    responses(
        (status = 200, description = "Recent entries and unread count"),
        (status = 401, description = "Not signed in", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "recent_notifications"
)]
#[get("/notifications/recent")]
pub async fn recent_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RecentQuery>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let response = state
        .notification_query
        .recent_notifications(RecentNotificationsRequest {
            user_id,
            limit: query.into_inner().limit,
        })
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(response))
}

/// The unread badge count alone, for cheap polling.
#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread-count",
    responses(
        (status = 200, description = "Unread count"),
        (status = 401, description = "Not signed in", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "unread_count"
)]
#[get("/notifications/unread-count")]
pub async fn unread_count(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UnreadCountResponse>> {
    let user_id = session.require_user_id()?;
    let response = state
        .notification_query
        .unread_count(UnreadCountRequest { user_id })
        .await?;
    Ok(web::Json(response))
}

/// Mark one inbox entry read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{entry_id}/read",
    params(("entry_id" = Uuid, Path, description = "Inbox entry identifier")),
    responses(
        (status = 204, description = "Entry marked read"),
        (status = 404, description = "Unknown entry", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "mark_read"
)]
#[post("/notifications/{entry_id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state
        .notification_command
        .mark_read(MarkReadRequest {
            user_id,
            entry_id: path.into_inner(),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Mark the caller's whole inbox read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/read-all",
    responses(
        (status = 200, description = "How many entries were marked"),
        (status = 401, description = "Not signed in", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "mark_all_read"
)]
#[post("/notifications/read-all")]
pub async fn mark_all_read(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<MarkAllReadResponse>> {
    let user_id = session.require_user_id()?;
    let response = state
        .notification_command
        .mark_all_read(MarkAllReadRequest { user_id })
        .await?;
    Ok(web::Json(response))
}
