//! Driving port for reading notifications.
//!
//! Two views: the organizer's sent history with delivery counts, and the
//! recipient's inbox dropdown with relative timestamps.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, NotificationKind, UserId, time_ago};

use super::notification_repository::{InboxEntry, SentNotification};

/// One row in the organizer's sent history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentNotificationPayload {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    /// Tour the send was scoped to; absent means every tourist.
    pub tour_id: Option<Uuid>,
    pub recipients: i64,
    pub read_count: i64,
    pub is_sent: bool,
    pub created_at: DateTime<Utc>,
}

impl From<SentNotification> for SentNotificationPayload {
    fn from(value: SentNotification) -> Self {
        Self {
            id: value.notification.id,
            title: value.notification.content.title,
            message: value.notification.content.message,
            kind: value.notification.content.kind,
            tour_id: value.notification.audience.tour_id(),
            recipients: value.recipients,
            read_count: value.read_count,
            is_sent: value.notification.is_sent,
            created_at: value.notification.created_at,
        }
    }
}

/// One entry in the recipient's inbox dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxEntryPayload {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationKind,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    /// Relative form of `created_at`, such as `2h ago`.
    pub time_ago: String,
}

impl InboxEntryPayload {
    /// Shape an inbox entry for the dropdown, stamping the relative time.
    #[must_use]
    pub fn from_entry(entry: InboxEntry, now: DateTime<Utc>) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            message: entry.message,
            notification_type: entry.kind,
            is_read: entry.is_read,
            created_at: entry.created_at,
            time_ago: time_ago(entry.created_at, now),
        }
    }
}

/// Request for the organizer's sent history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentNotificationsRequest {
    pub organizer_id: UserId,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// Response listing sent notifications, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentNotificationsResponse {
    pub notifications: Page<SentNotificationPayload>,
}

/// Request for the caller's recent inbox entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentNotificationsRequest {
    pub user_id: UserId,
    /// Entries to return; the dropdown shows ten by default.
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Response carrying recent entries plus the unread badge count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentNotificationsResponse {
    pub notifications: Vec<InboxEntryPayload>,
    pub unread_count: i64,
}

/// Request for just the unread badge count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountRequest {
    pub user_id: UserId,
}

/// Response carrying the unread badge count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

/// Driving port for notification read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationQuery: Send + Sync {
    /// List notifications the caller has sent, newest first.
    async fn sent_notifications(
        &self,
        request: SentNotificationsRequest,
    ) -> Result<SentNotificationsResponse, Error>;

    /// List the caller's most recent inbox entries with the unread count.
    async fn recent_notifications(
        &self,
        request: RecentNotificationsRequest,
    ) -> Result<RecentNotificationsResponse, Error>;

    /// Count the caller's unread inbox entries.
    async fn unread_count(&self, request: UnreadCountRequest)
    -> Result<UnreadCountResponse, Error>;
}

/// Fixture query serving an empty inbox.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationQuery;

#[async_trait]
impl NotificationQuery for FixtureNotificationQuery {
    async fn sent_notifications(
        &self,
        request: SentNotificationsRequest,
    ) -> Result<SentNotificationsResponse, Error> {
        let page = PageRequest::new(request.page, request.per_page);
        Ok(SentNotificationsResponse {
            notifications: Page::new(Vec::new(), page, 0),
        })
    }

    async fn recent_notifications(
        &self,
        _request: RecentNotificationsRequest,
    ) -> Result<RecentNotificationsResponse, Error> {
        Ok(RecentNotificationsResponse {
            notifications: Vec::new(),
            unread_count: 0,
        })
    }

    async fn unread_count(
        &self,
        _request: UnreadCountRequest,
    ) -> Result<UnreadCountResponse, Error> {
        Ok(UnreadCountResponse { unread_count: 0 })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::Duration;

    #[test]
    fn inbox_payload_serialises_the_dropdown_shape() {
        let now = Utc::now();
        let entry = InboxEntry {
            id: Uuid::new_v4(),
            title: "Gate change".to_owned(),
            message: "Meet at the north gate instead.".to_owned(),
            kind: NotificationKind::Update,
            is_read: false,
            created_at: now - Duration::hours(2),
        };
        let payload = InboxEntryPayload::from_entry(entry, now);
        let value = serde_json::to_value(&payload).expect("payload serialises");
        assert_eq!(value["notificationType"], "update");
        assert_eq!(value["isRead"], false);
        assert_eq!(value["timeAgo"], "2h ago");
        assert!(value.get("createdAt").is_some());
    }

    #[tokio::test]
    async fn fixture_inbox_is_empty() {
        let response = FixtureNotificationQuery
            .recent_notifications(RecentNotificationsRequest {
                user_id: UserId::random(),
                limit: None,
            })
            .await
            .expect("inbox loads");
        assert!(response.notifications.is_empty());
        assert_eq!(response.unread_count, 0);
    }
}
