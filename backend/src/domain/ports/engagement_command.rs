//! Driving port for wishlist toggles and review submission.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, Rating, UserId};

use super::fixtures;

/// Request to flip a tour in or out of the caller's wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleWishlistRequest {
    pub tourist_id: UserId,
    pub tour_id: Uuid,
}

/// Response reporting the wishlist state after the toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleWishlistResponse {
    /// `true` when the toggle ended with the tour in the wishlist.
    pub added: bool,
}

/// Request to submit or replace a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewRequest {
    pub tourist_id: UserId,
    pub tour_id: Uuid,
    pub rating: i16,
    #[serde(default)]
    pub comment: String,
}

/// The caller's stored review after submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnReviewPayload {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response carrying the stored review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewResponse {
    pub review: OwnReviewPayload,
}

/// Driving port for engagement write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngagementCommand: Send + Sync {
    /// Toggle a published tour in the caller's wishlist.
    async fn toggle_wishlist(
        &self,
        request: ToggleWishlistRequest,
    ) -> Result<ToggleWishlistResponse, Error>;

    /// Submit a review for a tour the caller has a confirmed or completed
    /// booking on. Resubmitting replaces the earlier review in place.
    async fn submit_review(
        &self,
        request: SubmitReviewRequest,
    ) -> Result<SubmitReviewResponse, Error>;
}

/// Fixture command that validates and echoes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEngagementCommand;

#[async_trait]
impl EngagementCommand for FixtureEngagementCommand {
    async fn toggle_wishlist(
        &self,
        request: ToggleWishlistRequest,
    ) -> Result<ToggleWishlistResponse, Error> {
        let now = Utc::now();
        fixtures::tour_by_id(request.tour_id, now)?
            .ok_or_else(|| Error::not_found(format!("tour {} not found", request.tour_id)))?;
        // Nothing is stored, so a toggle always lands on "added".
        Ok(ToggleWishlistResponse { added: true })
    }

    async fn submit_review(
        &self,
        request: SubmitReviewRequest,
    ) -> Result<SubmitReviewResponse, Error> {
        let now = Utc::now();
        fixtures::tour_by_id(request.tour_id, now)?
            .ok_or_else(|| Error::not_found(format!("tour {} not found", request.tour_id)))?;
        let rating =
            Rating::new(request.rating).map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(SubmitReviewResponse {
            review: OwnReviewPayload {
                id: Uuid::new_v4(),
                tour_id: request.tour_id,
                rating: rating.value(),
                comment: request.comment,
                created_at: now,
                updated_at: now,
            },
        })
    }
}
