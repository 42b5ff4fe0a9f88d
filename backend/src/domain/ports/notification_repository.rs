//! Port abstraction for notification persistence adapters.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Audience, Notification, NotificationKind, UserId};
use pagination::{Page, PageRequest};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by notification repository adapters.
    pub enum NotificationPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "notification repository query failed: {message}",
    }
}

/// A sent notification with its delivery tallies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    /// The notification itself.
    pub notification: Notification,
    /// Inbox entries created by fan-out.
    pub recipients: i64,
    /// How many recipients have opened it.
    pub read_count: i64,
}

/// Inbox row shaped for the notification dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxEntry {
    /// Identifier of the recipient's inbox row, used to mark it read.
    pub id: Uuid,
    /// Notification headline.
    pub title: String,
    /// Notification body.
    pub message: String,
    /// Tone of the notification.
    pub kind: NotificationKind,
    /// Whether the recipient opened it.
    pub is_read: bool,
    /// When the notification was authored.
    pub created_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Store a notification record.
    async fn create(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationPersistenceError>;

    /// Create one inbox entry per audience member, skipping recipients who
    /// already have one so a retried fan-out never duplicates.
    ///
    /// Returns how many entries were actually inserted.
    async fn fan_out(
        &self,
        notification_id: Uuid,
        audience: Audience,
        delivered_at: DateTime<Utc>,
    ) -> Result<u64, NotificationPersistenceError>;

    /// Notifications an organizer has sent with delivery tallies, newest
    /// first.
    async fn sent_by_organizer(
        &self,
        organizer: &UserId,
        page: PageRequest,
    ) -> Result<Page<SentNotification>, NotificationPersistenceError>;

    /// The newest `limit` inbox entries for a recipient.
    async fn recent_for_user(
        &self,
        user: &UserId,
        limit: i64,
    ) -> Result<Vec<InboxEntry>, NotificationPersistenceError>;

    /// Unopened inbox entries for a recipient.
    async fn unread_count(&self, user: &UserId) -> Result<i64, NotificationPersistenceError>;

    /// Mark one inbox entry read, recording when.
    ///
    /// Returns `false` when the entry does not exist or belongs to someone
    /// else.
    async fn mark_read(
        &self,
        user: &UserId,
        entry_id: Uuid,
        read_at: DateTime<Utc>,
    ) -> Result<bool, NotificationPersistenceError>;

    /// Mark every unread inbox entry read for a recipient.
    ///
    /// Returns how many entries flipped.
    async fn mark_all_read(
        &self,
        user: &UserId,
        read_at: DateTime<Utc>,
    ) -> Result<u64, NotificationPersistenceError>;
}
