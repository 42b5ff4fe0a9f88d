//! Campus tour catalogue entries.
//!
//! A tour starts life as a draft visible only to its organizer, is published
//! for tourists to book, and eventually ends cancelled or completed. The
//! status graph is enforced here so no adapter can skip a step.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::money::Price;
use super::user::UserId;

/// Maximum length for a tour title.
pub const TOUR_TITLE_MAX: usize = 200;
/// Maximum length for a tour location.
pub const TOUR_LOCATION_MAX: usize = 200;

/// Kind of experience a tour offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TourCategory {
    Campus,
    Academic,
    Cultural,
    Adventure,
    General,
}

impl TourCategory {
    /// Stable string form used in storage and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Campus => "campus",
            Self::Academic => "academic",
            Self::Cultural => "cultural",
            Self::Adventure => "adventure",
            Self::General => "general",
        }
    }
}

impl fmt::Display for TourCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TourCategory {
    type Err = TourValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "campus" => Ok(Self::Campus),
            "academic" => Ok(Self::Academic),
            "cultural" => Ok(Self::Cultural),
            "adventure" => Ok(Self::Adventure),
            "general" => Ok(Self::General),
            other => Err(TourValidationError::UnknownCategory {
                value: other.to_owned(),
            }),
        }
    }
}

/// Lifecycle state of a tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TourStatus {
    /// Only the organizer and developers can see it.
    Draft,
    /// Listed in the catalogue and open for booking.
    Published,
    /// Called off; bookings stay for the record.
    Cancelled,
    /// The tour took place.
    Completed,
}

impl TourStatus {
    /// Stable string form used in storage and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Whether the status graph permits moving to `next`.
    ///
    /// Drafts can only be published. Published tours can be withdrawn back to
    /// draft, cancelled, or completed. Cancelled and completed are terminal.
    #[must_use]
    pub const fn can_transition_to(self, next: TourStatus) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Published)
                | (Self::Published, Self::Draft)
                | (Self::Published, Self::Cancelled)
                | (Self::Published, Self::Completed)
        )
    }
}

impl fmt::Display for TourStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TourStatus {
    type Err = TourValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(TourValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validation errors for tour fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TourValidationError {
    /// Title was missing or blank once trimmed.
    EmptyTitle,
    /// Title exceeded [`TOUR_TITLE_MAX`] characters.
    TitleTooLong { max: usize },
    /// Location was missing or blank once trimmed.
    EmptyLocation,
    /// Location exceeded [`TOUR_LOCATION_MAX`] characters.
    LocationTooLong { max: usize },
    /// Duration must be at least one hour.
    NonPositiveDuration,
    /// Capacity must admit at least one participant.
    NonPositiveCapacity,
    /// Category value was not one of the known kinds.
    UnknownCategory { value: String },
    /// Status value was not one of the known states.
    UnknownStatus { value: String },
}

impl fmt::Display for TourValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "tour title must not be empty"),
            Self::TitleTooLong { max } => {
                write!(f, "tour title must be at most {max} characters")
            }
            Self::EmptyLocation => write!(f, "tour location must not be empty"),
            Self::LocationTooLong { max } => {
                write!(f, "tour location must be at most {max} characters")
            }
            Self::NonPositiveDuration => write!(f, "duration must be at least one hour"),
            Self::NonPositiveCapacity => {
                write!(f, "maximum participants must be at least one")
            }
            Self::UnknownCategory { value } => write!(f, "unknown tour category: {value}"),
            Self::UnknownStatus { value } => write!(f, "unknown tour status: {value}"),
        }
    }
}

impl std::error::Error for TourValidationError {}

/// Validated fields shared by tour create and update operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourDetails {
    /// Short headline shown in the catalogue.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Kind of experience.
    pub category: TourCategory,
    /// Meeting point.
    pub location: String,
    /// When the tour starts.
    pub tour_date: DateTime<Utc>,
    /// Planned length in whole hours.
    pub duration_hours: i32,
    /// Capacity across all bookings.
    pub max_participants: i32,
    /// Price per participant.
    pub price: Price,
    /// Optional cover image link.
    pub image_url: Option<String>,
}

impl TourDetails {
    /// Validate raw tour fields.
    #[expect(clippy::too_many_arguments, reason = "flat form fields arrive together")]
    pub fn try_from_parts(
        title: &str,
        description: &str,
        category: TourCategory,
        location: &str,
        tour_date: DateTime<Utc>,
        duration_hours: i32,
        max_participants: i32,
        price: Price,
        image_url: Option<&str>,
    ) -> Result<Self, TourValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TourValidationError::EmptyTitle);
        }
        if title.chars().count() > TOUR_TITLE_MAX {
            return Err(TourValidationError::TitleTooLong {
                max: TOUR_TITLE_MAX,
            });
        }
        let location = location.trim();
        if location.is_empty() {
            return Err(TourValidationError::EmptyLocation);
        }
        if location.chars().count() > TOUR_LOCATION_MAX {
            return Err(TourValidationError::LocationTooLong {
                max: TOUR_LOCATION_MAX,
            });
        }
        if duration_hours < 1 {
            return Err(TourValidationError::NonPositiveDuration);
        }
        if max_participants < 1 {
            return Err(TourValidationError::NonPositiveCapacity);
        }

        Ok(Self {
            title: title.to_owned(),
            description: description.trim().to_owned(),
            category,
            location: location.to_owned(),
            tour_date,
            duration_hours,
            max_participants,
            price,
            image_url: image_url
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned),
        })
    }
}

/// Stored tour.
///
/// ## Invariants
/// - `status` only changes along [`TourStatus::can_transition_to`].
/// - `qr_code_url` is set while the tour is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    /// Unique identifier.
    pub id: Uuid,
    /// Organizer who owns the tour.
    pub organizer: UserId,
    /// Department the tour belongs to, if any.
    pub department_id: Option<Uuid>,
    /// Validated content fields.
    pub details: TourDetails,
    /// Lifecycle state.
    pub status: TourStatus,
    /// Link encoded in the printed QR poster.
    pub qr_code_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Tour {
    /// Create a draft tour owned by `organizer`.
    #[must_use]
    pub fn new_draft(
        id: Uuid,
        organizer: UserId,
        department_id: Option<Uuid>,
        details: TourDetails,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            organizer,
            department_id,
            details,
            status: TourStatus::Draft,
            qr_code_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether tourists can book the tour at `now`.
    #[must_use]
    pub fn is_bookable(&self, now: DateTime<Utc>) -> bool {
        self.status == TourStatus::Published && self.details.tour_date > now
    }
}

/// Public link a tour's QR poster points at.
#[must_use]
pub fn qr_code_url(public_base_url: &Url, tour_id: Uuid) -> String {
    format!(
        "{}/tours/{tour_id}/",
        public_base_url.as_str().trim_end_matches('/')
    )
}
