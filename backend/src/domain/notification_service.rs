//! Notification domain services.
//!
//! Sending is a two-step write: the notification row first, then fan-out
//! into per-recipient inbox rows. Fan-out skips recipients who already hold
//! an entry, so replaying a send never duplicates an inbox.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::access::require_organizer;
use crate::domain::ports::{
    InboxEntryPayload, MarkAllReadRequest, MarkAllReadResponse, MarkReadRequest,
    NotificationCommand, NotificationPersistenceError, NotificationQuery, NotificationRepository,
    QuickReminderRequest, RecentNotificationsRequest, RecentNotificationsResponse,
    SendNotificationRequest, SendNotificationResponse, SentNotificationPayload,
    SentNotificationsRequest, SentNotificationsResponse, TourRepository, UnreadCountRequest,
    UnreadCountResponse, UserRepository,
};
use crate::domain::service_support::map_tour_error;
use crate::domain::{Audience, Error, Notification, NotificationContent, NotificationKind};

/// Entries the inbox dropdown shows when no limit is given.
const DEFAULT_INBOX_LIMIT: u32 = 10;

/// Upper bound on how many inbox entries one request may fetch.
const MAX_INBOX_LIMIT: u32 = 50;

fn map_notification_error(error: NotificationPersistenceError) -> Error {
    match error {
        NotificationPersistenceError::Connection { message } => Error::service_unavailable(
            format!("notification repository unavailable: {message}"),
        ),
        NotificationPersistenceError::Query { message } => {
            Error::internal(format!("notification repository error: {message}"))
        }
    }
}

/// Notification writes over the notification and tour repositories.
#[derive(Clone)]
pub struct NotificationCommandService<N, T, U> {
    notifications: Arc<N>,
    tours: Arc<T>,
    users: Arc<U>,
}

impl<N, T, U> NotificationCommandService<N, T, U> {
    /// Create a new notification command service.
    pub fn new(notifications: Arc<N>, tours: Arc<T>, users: Arc<U>) -> Self {
        Self {
            notifications,
            tours,
            users,
        }
    }
}

#[async_trait]
impl<N, T, U> NotificationCommand for NotificationCommandService<N, T, U>
where
    N: NotificationRepository,
    T: TourRepository,
    U: UserRepository,
{
    async fn send_notification(
        &self,
        request: SendNotificationRequest,
    ) -> Result<SendNotificationResponse, Error> {
        require_organizer(self.users.as_ref(), &request.organizer_id).await?;
        let content =
            NotificationContent::try_from_parts(&request.title, &request.message, request.kind)
                .map_err(|err| Error::invalid_request(err.to_string()))?;
        let audience = Audience::from_parts(request.send_to_all, request.tour_id);
        if let Some(tour_id) = audience.tour_id() {
            let tour = self
                .tours
                .find(tour_id)
                .await
                .map_err(map_tour_error)?
                .ok_or_else(|| Error::not_found(format!("tour {tour_id} not found")))?;
            if tour.organizer != request.organizer_id {
                return Err(Error::forbidden("tour does not belong to this organizer"));
            }
        }
        let now = Utc::now();
        // Delivery is immediate even when a send time was given, so the row
        // is born sent; `scheduled_for` stays on the audit trail.
        let notification = Notification {
            id: Uuid::new_v4(),
            organizer: request.organizer_id,
            audience,
            content,
            is_sent: true,
            scheduled_for: request.scheduled_for,
            created_at: now,
        };
        self.notifications
            .create(&notification)
            .await
            .map_err(map_notification_error)?;
        let recipients = self
            .notifications
            .fan_out(notification.id, audience, now)
            .await
            .map_err(map_notification_error)?;
        Ok(SendNotificationResponse {
            notification_id: notification.id,
            recipients,
        })
    }

    async fn quick_reminder(
        &self,
        request: QuickReminderRequest,
    ) -> Result<SendNotificationResponse, Error> {
        let tour = self
            .tours
            .find(request.tour_id)
            .await
            .map_err(map_tour_error)?
            .ok_or_else(|| Error::not_found(format!("tour {} not found", request.tour_id)))?;
        self.send_notification(SendNotificationRequest {
            organizer_id: request.organizer_id,
            title: format!("Reminder: {}", tour.details.title),
            message: format!(
                "Your tour {} is coming up on {}. See you at {}.",
                tour.details.title,
                tour.details.tour_date.format("%e %B"),
                tour.details.location
            ),
            kind: NotificationKind::Reminder,
            send_to_all: false,
            tour_id: Some(request.tour_id),
            scheduled_for: None,
        })
        .await
    }

    async fn mark_read(&self, request: MarkReadRequest) -> Result<(), Error> {
        let marked = self
            .notifications
            .mark_read(&request.user_id, request.entry_id, Utc::now())
            .await
            .map_err(map_notification_error)?;
        if !marked {
            return Err(Error::not_found(format!(
                "notification entry {} not found",
                request.entry_id
            )));
        }
        Ok(())
    }

    async fn mark_all_read(
        &self,
        request: MarkAllReadRequest,
    ) -> Result<MarkAllReadResponse, Error> {
        let marked = self
            .notifications
            .mark_all_read(&request.user_id, Utc::now())
            .await
            .map_err(map_notification_error)?;
        Ok(MarkAllReadResponse { marked })
    }
}

/// Notification reads over the notification repository.
#[derive(Clone)]
pub struct NotificationQueryService<N, U> {
    notifications: Arc<N>,
    users: Arc<U>,
}

impl<N, U> NotificationQueryService<N, U> {
    /// Create a new notification query service.
    pub fn new(notifications: Arc<N>, users: Arc<U>) -> Self {
        Self {
            notifications,
            users,
        }
    }
}

#[async_trait]
impl<N, U> NotificationQuery for NotificationQueryService<N, U>
where
    N: NotificationRepository,
    U: UserRepository,
{
    async fn sent_notifications(
        &self,
        request: SentNotificationsRequest,
    ) -> Result<SentNotificationsResponse, Error> {
        require_organizer(self.users.as_ref(), &request.organizer_id).await?;
        let page = PageRequest::new(request.page, request.per_page);
        let notifications = self
            .notifications
            .sent_by_organizer(&request.organizer_id, page)
            .await
            .map_err(map_notification_error)?;
        Ok(SentNotificationsResponse {
            notifications: notifications.map(SentNotificationPayload::from),
        })
    }

    async fn recent_notifications(
        &self,
        request: RecentNotificationsRequest,
    ) -> Result<RecentNotificationsResponse, Error> {
        let limit = i64::from(
            request
                .limit
                .unwrap_or(DEFAULT_INBOX_LIMIT)
                .clamp(1, MAX_INBOX_LIMIT),
        );
        let now = Utc::now();
        let entries = self
            .notifications
            .recent_for_user(&request.user_id, limit)
            .await
            .map_err(map_notification_error)?;
        let unread_count = self
            .notifications
            .unread_count(&request.user_id)
            .await
            .map_err(map_notification_error)?;
        Ok(RecentNotificationsResponse {
            notifications: entries
                .into_iter()
                .map(|entry| InboxEntryPayload::from_entry(entry, now))
                .collect(),
            unread_count,
        })
    }

    async fn unread_count(
        &self,
        request: UnreadCountRequest,
    ) -> Result<UnreadCountResponse, Error> {
        let unread_count = self
            .notifications
            .unread_count(&request.user_id)
            .await
            .map_err(map_notification_error)?;
        Ok(UnreadCountResponse { unread_count })
    }
}

#[cfg(test)]
#[path = "notification_service_tests.rs"]
mod tests;
