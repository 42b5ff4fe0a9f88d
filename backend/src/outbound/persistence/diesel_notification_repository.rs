//! PostgreSQL-backed `NotificationRepository` implementation using Diesel ORM.
//!
//! Fan-out resolves the audience at send time from the current `users` and
//! `bookings` tables, then writes every inbox row in one batch insert with
//! `ON CONFLICT DO NOTHING` over the `(user_id, notification_id)` unique
//! pair. Replaying a send therefore inserts only the recipients who joined
//! the audience since the last attempt.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{
    InboxEntry, NotificationPersistenceError, NotificationRepository, SentNotification,
};
use crate::domain::{
    Audience, BookingStatus, Notification, NotificationContent, NotificationKind, Role, UserId,
};
use pagination::{Page, PageRequest};

use super::diesel_error_mapping::{map_common_diesel_error, map_common_pool_error};
use super::models::{NewNotificationRow, NotificationRow, UserNotificationRow};
use super::pool::{DbPool, PoolError};
use super::schema::{bookings, notifications, user_notifications, users};

/// Diesel-backed implementation of the notification repository port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NotificationPersistenceError {
    map_common_pool_error(error, NotificationPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> NotificationPersistenceError {
    map_common_diesel_error(
        error,
        NotificationPersistenceError::query,
        NotificationPersistenceError::connection,
    )
}

fn corrupt(message: String) -> NotificationPersistenceError {
    NotificationPersistenceError::query(message)
}

/// Convert a database row into a validated domain notification.
fn row_to_notification(row: NotificationRow) -> Result<Notification, NotificationPersistenceError> {
    let kind = row
        .notification_type
        .parse::<NotificationKind>()
        .map_err(|err| corrupt(err.to_string()))?;
    let content = NotificationContent::try_from_parts(&row.title, &row.message, kind)
        .map_err(|err| corrupt(err.to_string()))?;
    Ok(Notification {
        id: row.id,
        organizer: UserId::from_uuid(row.organizer_id),
        audience: Audience::from_parts(row.send_to_all, row.tour_id),
        content,
        is_sent: row.is_sent,
        scheduled_for: row.scheduled_for,
        created_at: row.created_at,
    })
}

/// Resolve the audience to concrete recipient ids.
async fn resolve_audience(
    conn: &mut AsyncPgConnection,
    audience: Audience,
) -> Result<Vec<Uuid>, diesel::result::Error> {
    match audience {
        Audience::AllTourists => {
            users::table
                .filter(users::role.eq(Role::Tourist.as_str()))
                .select(users::id)
                .load(conn)
                .await
        }
        Audience::TourBookers(tour_id) => {
            bookings::table
                .filter(bookings::tour_id.eq(tour_id))
                .filter(bookings::status.eq(BookingStatus::Confirmed.as_str()))
                .select(bookings::tourist_id)
                .distinct()
                .load(conn)
                .await
        }
    }
}

/// Recipient and read tallies for a batch of notifications.
async fn delivery_tallies(
    conn: &mut AsyncPgConnection,
    notification_ids: &[Uuid],
) -> Result<HashMap<Uuid, (i64, i64)>, diesel::result::Error> {
    if notification_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let delivered: Vec<(Uuid, i64)> = user_notifications::table
        .filter(user_notifications::notification_id.eq_any(notification_ids))
        .group_by(user_notifications::notification_id)
        .select((
            user_notifications::notification_id,
            diesel::dsl::count(user_notifications::id),
        ))
        .load(conn)
        .await?;
    let read: Vec<(Uuid, i64)> = user_notifications::table
        .filter(user_notifications::notification_id.eq_any(notification_ids))
        .filter(user_notifications::is_read.eq(true))
        .group_by(user_notifications::notification_id)
        .select((
            user_notifications::notification_id,
            diesel::dsl::count(user_notifications::id),
        ))
        .load(conn)
        .await?;

    let read: HashMap<Uuid, i64> = read.into_iter().collect();
    Ok(delivered
        .into_iter()
        .map(|(id, recipients)| {
            let read_count = read.get(&id).copied().unwrap_or(0);
            (id, (recipients, read_count))
        })
        .collect())
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn create(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewNotificationRow {
            id: notification.id,
            organizer_id: *notification.organizer.as_uuid(),
            title: &notification.content.title,
            message: &notification.content.message,
            notification_type: notification.content.kind.as_str(),
            send_to_all: matches!(notification.audience, Audience::AllTourists),
            tour_id: notification.audience.tour_id(),
            is_sent: notification.is_sent,
            scheduled_for: notification.scheduled_for,
            created_at: notification.created_at,
        };
        diesel::insert_into(notifications::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn fan_out(
        &self,
        notification_id: Uuid,
        audience: Audience,
        delivered_at: DateTime<Utc>,
    ) -> Result<u64, NotificationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let recipients = resolve_audience(&mut conn, audience)
            .await
            .map_err(map_diesel_error)?;
        if recipients.is_empty() {
            return Ok(0);
        }

        let rows: Vec<UserNotificationRow> = recipients
            .into_iter()
            .map(|user_id| UserNotificationRow {
                id: Uuid::new_v4(),
                user_id,
                notification_id,
                is_read: false,
                read_at: None,
                created_at: delivered_at,
            })
            .collect();
        let inserted = diesel::insert_into(user_notifications::table)
            .values(&rows)
            .on_conflict((
                user_notifications::user_id,
                user_notifications::notification_id,
            ))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted as u64)
    }

    async fn sent_by_organizer(
        &self,
        organizer: &UserId,
        page: PageRequest,
    ) -> Result<Page<SentNotification>, NotificationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let authored = notifications::table.filter(notifications::organizer_id.eq(organizer.as_uuid()));

        let total: i64 = authored
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<NotificationRow> = authored
            .order(notifications::created_at.desc())
            .offset(page.offset())
            .limit(page.limit())
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let tallies = delivery_tallies(&mut conn, &ids)
            .await
            .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(|row| {
                let (recipients, read_count) = tallies.get(&row.id).copied().unwrap_or((0, 0));
                Ok(SentNotification {
                    notification: row_to_notification(row)?,
                    recipients,
                    read_count,
                })
            })
            .collect::<Result<Vec<_>, NotificationPersistenceError>>()?;
        Ok(Page::new(items, page, total.unsigned_abs()))
    }

    async fn recent_for_user(
        &self,
        user: &UserId,
        limit: i64,
    ) -> Result<Vec<InboxEntry>, NotificationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(Uuid, String, String, String, bool, DateTime<Utc>)> =
            user_notifications::table
                .inner_join(notifications::table)
                .filter(user_notifications::user_id.eq(user.as_uuid()))
                .order(notifications::created_at.desc())
                .limit(limit)
                .select((
                    user_notifications::id,
                    notifications::title,
                    notifications::message,
                    notifications::notification_type,
                    user_notifications::is_read,
                    notifications::created_at,
                ))
                .load(&mut conn)
                .await
                .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(id, title, message, kind, is_read, created_at)| {
                let kind = kind
                    .parse::<NotificationKind>()
                    .map_err(|err| corrupt(err.to_string()))?;
                Ok(InboxEntry {
                    id,
                    title,
                    message,
                    kind,
                    is_read,
                    created_at,
                })
            })
            .collect()
    }

    async fn unread_count(&self, user: &UserId) -> Result<i64, NotificationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        user_notifications::table
            .filter(user_notifications::user_id.eq(user.as_uuid()))
            .filter(user_notifications::is_read.eq(false))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn mark_read(
        &self,
        user: &UserId,
        entry_id: Uuid,
        read_at: DateTime<Utc>,
    ) -> Result<bool, NotificationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let flipped = diesel::update(
            user_notifications::table
                .find(entry_id)
                .filter(user_notifications::user_id.eq(user.as_uuid()))
                .filter(user_notifications::is_read.eq(false)),
        )
        .set((
            user_notifications::is_read.eq(true),
            user_notifications::read_at.eq(read_at),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        if flipped > 0 {
            return Ok(true);
        }

        // Already-read entries stay marked with their first read_at; only a
        // missing or foreign entry reports false.
        let exists: i64 = user_notifications::table
            .find(entry_id)
            .filter(user_notifications::user_id.eq(user.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(exists > 0)
    }

    async fn mark_all_read(
        &self,
        user: &UserId,
        read_at: DateTime<Utc>,
    ) -> Result<u64, NotificationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let flipped = diesel::update(
            user_notifications::table
                .filter(user_notifications::user_id.eq(user.as_uuid()))
                .filter(user_notifications::is_read.eq(false)),
        )
        .set((
            user_notifications::is_read.eq(true),
            user_notifications::read_at.eq(read_at),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(flipped as u64)
    }
}
