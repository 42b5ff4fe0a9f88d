//! Driving port for sending notifications and managing the inbox.
//!
//! Organizers author notifications and fan them out; any signed-in user
//! marks their own inbox entries read. Fan-out counts come back so the
//! organizer sees how many inboxes a send actually reached.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, NotificationContent, NotificationKind, UserId};

use super::fixtures;

/// Request to author and fan out a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationRequest {
    pub organizer_id: UserId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    /// Deliver to every tourist instead of one tour's bookers.
    #[serde(default)]
    pub send_to_all: bool,
    /// Tour whose confirmed bookers should receive it; ignored when
    /// `send_to_all` is set.
    #[serde(default)]
    pub tour_id: Option<Uuid>,
    /// Future send time recorded for the audit trail; delivery is immediate.
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
}

/// Response after a send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationResponse {
    pub notification_id: Uuid,
    /// Inbox entries created by the fan-out.
    pub recipients: u64,
}

/// Request for the one-click reminder on a tour's booking roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickReminderRequest {
    pub organizer_id: UserId,
    pub tour_id: Uuid,
}

/// Request to mark one inbox entry read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    pub user_id: UserId,
    pub entry_id: Uuid,
}

/// Request to mark the caller's whole inbox read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllReadRequest {
    pub user_id: UserId,
}

/// Response reporting how many entries were marked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllReadResponse {
    pub marked: u64,
}

/// Driving port for notification write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationCommand: Send + Sync {
    /// Author a notification and deliver one inbox entry per recipient.
    ///
    /// Scoping to a tour requires the caller to organize that tour.
    async fn send_notification(
        &self,
        request: SendNotificationRequest,
    ) -> Result<SendNotificationResponse, Error>;

    /// Send the canned reminder to a tour's confirmed bookers.
    async fn quick_reminder(
        &self,
        request: QuickReminderRequest,
    ) -> Result<SendNotificationResponse, Error>;

    /// Mark one of the caller's inbox entries read.
    async fn mark_read(&self, request: MarkReadRequest) -> Result<(), Error>;

    /// Mark every unread entry in the caller's inbox read.
    async fn mark_all_read(&self, request: MarkAllReadRequest)
    -> Result<MarkAllReadResponse, Error>;
}

/// Fixture command that validates and pretends to deliver.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationCommand;

#[async_trait]
impl NotificationCommand for FixtureNotificationCommand {
    async fn send_notification(
        &self,
        request: SendNotificationRequest,
    ) -> Result<SendNotificationResponse, Error> {
        if *request.organizer_id.as_uuid() != fixtures::ORGANIZER_ID {
            return Err(Error::forbidden("only organizers send notifications"));
        }
        NotificationContent::try_from_parts(&request.title, &request.message, request.kind)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        if let Some(tour_id) = request.tour_id.filter(|_| !request.send_to_all) {
            fixtures::tour_by_id(tour_id, Utc::now())?
                .ok_or_else(|| Error::not_found(format!("tour {tour_id} not found")))?;
        }
        Ok(SendNotificationResponse {
            notification_id: Uuid::new_v4(),
            recipients: 1,
        })
    }

    async fn quick_reminder(
        &self,
        request: QuickReminderRequest,
    ) -> Result<SendNotificationResponse, Error> {
        let tour = fixtures::tour_by_id(request.tour_id, Utc::now())?
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

    async fn mark_read(&self, _request: MarkReadRequest) -> Result<(), Error> {
        Ok(())
    }

    async fn mark_all_read(
        &self,
        _request: MarkAllReadRequest,
    ) -> Result<MarkAllReadResponse, Error> {
        Ok(MarkAllReadResponse { marked: 0 })
    }
}
