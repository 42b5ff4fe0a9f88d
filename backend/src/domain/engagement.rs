//! Wishlists and reviews left by tourists.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::user::UserId;

/// Review score from one to five stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(i16);

/// Lowest accepted rating.
pub const RATING_MIN: i16 = 1;
/// Highest accepted rating.
pub const RATING_MAX: i16 = 5;

/// Validation errors for engagement fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngagementValidationError {
    /// Rating fell outside the one-to-five range.
    RatingOutOfRange { value: i16 },
}

impl fmt::Display for EngagementValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RatingOutOfRange { value } => write!(
                f,
                "rating must be between {RATING_MIN} and {RATING_MAX}, got {value}"
            ),
        }
    }
}

impl std::error::Error for EngagementValidationError {}

impl Rating {
    /// Validate and construct a [`Rating`].
    pub fn new(value: i16) -> Result<Self, EngagementValidationError> {
        if !(RATING_MIN..=RATING_MAX).contains(&value) {
            return Err(EngagementValidationError::RatingOutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Star count as a plain integer.
    #[must_use]
    pub const fn value(self) -> i16 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored review.
///
/// ## Invariants
/// - `(tourist, tour_id)` is unique; resubmitting replaces the old review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    /// Unique identifier.
    pub id: Uuid,
    /// Tourist who wrote the review.
    pub tourist: UserId,
    /// Tour being reviewed.
    pub tour_id: Uuid,
    /// Star score.
    pub rating: Rating,
    /// Free-form comment.
    pub comment: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp, bumped on resubmission.
    pub updated_at: DateTime<Utc>,
}

/// Stored wishlist entry.
///
/// ## Invariants
/// - `(tourist, tour_id)` is unique; toggling flips between saved and absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishlistEntry {
    /// Unique identifier.
    pub id: Uuid,
    /// Tourist keeping the wishlist.
    pub tourist: UserId,
    /// Saved tour.
    pub tour_id: Uuid,
    /// When the tour was saved.
    pub added_at: DateTime<Utc>,
}
