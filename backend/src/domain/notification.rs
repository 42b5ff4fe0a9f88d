//! Organizer notifications fanned out to tourist inboxes.
//!
//! A notification is authored once and delivered as one inbox row per
//! recipient. Delivery is recorded with a uniqueness guarantee so repeated
//! fan-out never duplicates an inbox entry.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// Maximum length for a notification title.
pub const NOTIFICATION_TITLE_MAX: usize = 200;

/// Tone of the notification shown in tourist inboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Announcement,
    Reminder,
    Alert,
    Update,
}

impl NotificationKind {
    /// Stable string form used in storage and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Announcement => "announcement",
            Self::Reminder => "reminder",
            Self::Alert => "alert",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = NotificationValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "announcement" => Ok(Self::Announcement),
            "reminder" => Ok(Self::Reminder),
            "alert" => Ok(Self::Alert),
            "update" => Ok(Self::Update),
            other => Err(NotificationValidationError::UnknownKind {
                value: other.to_owned(),
            }),
        }
    }
}

/// Who receives the notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Every tourist account on the platform.
    AllTourists,
    /// Tourists holding a confirmed booking on the tour.
    TourBookers(Uuid),
}

impl Audience {
    /// Resolve the audience from stored columns.
    ///
    /// A missing tour falls back to all tourists rather than silently
    /// delivering to nobody.
    #[must_use]
    pub fn from_parts(send_to_all: bool, tour_id: Option<Uuid>) -> Self {
        match (send_to_all, tour_id) {
            (false, Some(tour_id)) => Self::TourBookers(tour_id),
            _ => Self::AllTourists,
        }
    }

    /// Tour the audience is scoped to, if any.
    #[must_use]
    pub fn tour_id(self) -> Option<Uuid> {
        match self {
            Self::AllTourists => None,
            Self::TourBookers(tour_id) => Some(tour_id),
        }
    }
}

/// Validation errors for notification fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationValidationError {
    /// Title was missing or blank once trimmed.
    EmptyTitle,
    /// Title exceeded [`NOTIFICATION_TITLE_MAX`] characters.
    TitleTooLong { max: usize },
    /// Message was missing or blank once trimmed.
    EmptyMessage,
    /// Kind value was not one of the known kinds.
    UnknownKind { value: String },
}

impl fmt::Display for NotificationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "notification title must not be empty"),
            Self::TitleTooLong { max } => {
                write!(f, "notification title must be at most {max} characters")
            }
            Self::EmptyMessage => write!(f, "notification message must not be empty"),
            Self::UnknownKind { value } => write!(f, "unknown notification kind: {value}"),
        }
    }
}

impl std::error::Error for NotificationValidationError {}

/// Validated title, message, and kind for a new notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    /// Headline shown in the inbox list.
    pub title: String,
    /// Body shown when the entry is opened.
    pub message: String,
    /// Tone of the notification.
    pub kind: NotificationKind,
}

impl NotificationContent {
    /// Validate raw notification fields.
    pub fn try_from_parts(
        title: &str,
        message: &str,
        kind: NotificationKind,
    ) -> Result<Self, NotificationValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(NotificationValidationError::EmptyTitle);
        }
        if title.chars().count() > NOTIFICATION_TITLE_MAX {
            return Err(NotificationValidationError::TitleTooLong {
                max: NOTIFICATION_TITLE_MAX,
            });
        }
        let message = message.trim();
        if message.is_empty() {
            return Err(NotificationValidationError::EmptyMessage);
        }

        Ok(Self {
            title: title.to_owned(),
            message: message.to_owned(),
            kind,
        })
    }
}

/// Stored notification authored by an organizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Unique identifier.
    pub id: Uuid,
    /// Organizer who sent it.
    pub organizer: UserId,
    /// Who receives it.
    pub audience: Audience,
    /// Validated title, message, and kind.
    pub content: NotificationContent,
    /// Whether fan-out has happened.
    pub is_sent: bool,
    /// Optional future send time recorded for the audit trail.
    pub scheduled_for: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// One recipient's inbox entry for a notification.
///
/// ## Invariants
/// - `(user, notification_id)` is unique.
/// - `read_at` is set exactly when `is_read` is true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserNotification {
    /// Unique identifier.
    pub id: Uuid,
    /// Recipient.
    pub user: UserId,
    /// Notification being delivered.
    pub notification_id: Uuid,
    /// Whether the recipient opened it.
    pub is_read: bool,
    /// When the recipient opened it.
    pub read_at: Option<DateTime<Utc>>,
    /// Delivery timestamp.
    pub created_at: DateTime<Utc>,
}

/// Compact human form of how long ago `moment` was, as shown in inboxes.
///
/// Whole days collapse to `3d ago`, then hours, then minutes, and anything
/// under a minute reads `Just now`.
#[must_use]
pub fn time_ago(moment: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - moment;
    if elapsed.num_days() > 0 {
        return format!("{}d ago", elapsed.num_days());
    }
    let seconds = elapsed.num_seconds();
    if seconds > 3600 {
        return format!("{}h ago", seconds / 3600);
    }
    if seconds > 60 {
        return format!("{}m ago", seconds / 60);
    }
    "Just now".to_owned()
}

/// Elapsed time helper for callers holding a [`Duration`] already.
#[must_use]
pub fn time_ago_from(elapsed: Duration, now: DateTime<Utc>) -> String {
    time_ago(now - elapsed, now)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("announcement", NotificationKind::Announcement)]
    #[case("reminder", NotificationKind::Reminder)]
    #[case("alert", NotificationKind::Alert)]
    #[case("update", NotificationKind::Update)]
    fn kinds_round_trip(#[case] text: &str, #[case] kind: NotificationKind) {
        assert_eq!(text.parse::<NotificationKind>().expect("known kind"), kind);
        assert_eq!(kind.as_str(), text);
    }

    #[rstest]
    fn audience_defaults_to_all_tourists_without_a_tour() {
        assert_eq!(Audience::from_parts(true, None), Audience::AllTourists);
        assert_eq!(Audience::from_parts(false, None), Audience::AllTourists);
        let tour_id = Uuid::new_v4();
        assert_eq!(
            Audience::from_parts(false, Some(tour_id)),
            Audience::TourBookers(tour_id)
        );
    }

    #[rstest]
    fn audience_ignores_tour_when_sending_to_all() {
        let tour_id = Uuid::new_v4();
        assert_eq!(Audience::from_parts(true, Some(tour_id)), Audience::AllTourists);
    }

    #[rstest]
    fn content_rejects_blank_fields() {
        assert_eq!(
            NotificationContent::try_from_parts("  ", "body", NotificationKind::Alert).unwrap_err(),
            NotificationValidationError::EmptyTitle
        );
        assert_eq!(
            NotificationContent::try_from_parts("title", "  ", NotificationKind::Alert)
                .unwrap_err(),
            NotificationValidationError::EmptyMessage
        );
    }

    #[rstest]
    #[case(Duration::days(3), "3d ago")]
    #[case(Duration::hours(26), "1d ago")]
    #[case(Duration::hours(5), "5h ago")]
    #[case(Duration::minutes(61), "1h ago")]
    #[case(Duration::minutes(45), "45m ago")]
    #[case(Duration::seconds(61), "1m ago")]
    #[case(Duration::seconds(30), "Just now")]
    #[case(Duration::zero(), "Just now")]
    fn time_ago_collapses_to_largest_unit(#[case] elapsed: Duration, #[case] expected: &str) {
        let now = Utc::now();
        assert_eq!(time_ago_from(elapsed, now), expected);
    }
}
