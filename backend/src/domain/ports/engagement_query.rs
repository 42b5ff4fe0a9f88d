//! Driving port for reading wishlists and the caller's reviews.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, UserId};

use super::catalog_query::TourCardPayload;
use super::engagement_repository::ReviewWithTour;
use super::fixtures;

/// One of the caller's reviews, paired with the tour title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithTourPayload {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub tour_title: String,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReviewWithTour> for ReviewWithTourPayload {
    fn from(value: ReviewWithTour) -> Self {
        Self {
            id: value.review.id,
            tour_id: value.review.tour_id,
            tour_title: value.tour_title,
            rating: value.review.rating.value(),
            comment: value.review.comment,
            created_at: value.review.created_at,
            updated_at: value.review.updated_at,
        }
    }
}

/// Request for the caller's wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyWishlistRequest {
    pub tourist_id: UserId,
}

/// Response listing saved tours, most recently saved first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyWishlistResponse {
    pub tours: Vec<TourCardPayload>,
}

/// Request for the caller's reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyReviewsRequest {
    pub tourist_id: UserId,
}

/// Response listing the caller's reviews, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyReviewsResponse {
    pub reviews: Vec<ReviewWithTourPayload>,
}

/// Driving port for engagement read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngagementQuery: Send + Sync {
    /// List the published tours the caller has saved.
    async fn my_wishlist(&self, request: MyWishlistRequest) -> Result<MyWishlistResponse, Error>;

    /// List the reviews the caller has written.
    async fn my_reviews(&self, request: MyReviewsRequest) -> Result<MyReviewsResponse, Error>;
}

/// Fixture query over the canned data.
///
/// The stateless fixture command never stores toggles or reviews, so both
/// listings come back empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEngagementQuery;

#[async_trait]
impl EngagementQuery for FixtureEngagementQuery {
    async fn my_wishlist(&self, _request: MyWishlistRequest) -> Result<MyWishlistResponse, Error> {
        Ok(MyWishlistResponse { tours: Vec::new() })
    }

    async fn my_reviews(&self, _request: MyReviewsRequest) -> Result<MyReviewsResponse, Error> {
        Ok(MyReviewsResponse {
            reviews: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{Rating, Review};

    #[tokio::test]
    async fn fixture_listings_start_empty() {
        let query = FixtureEngagementQuery;
        let tourist_id = UserId::from_uuid(fixtures::TOURIST_ID);
        let wishlist = query
            .my_wishlist(MyWishlistRequest {
                tourist_id: tourist_id.clone(),
            })
            .await
            .expect("wishlist");
        let reviews = query
            .my_reviews(MyReviewsRequest { tourist_id })
            .await
            .expect("reviews");
        assert!(wishlist.tours.is_empty());
        assert!(reviews.reviews.is_empty());
    }

    #[test]
    fn review_payload_flattens_the_join() {
        let now = Utc::now();
        let joined = ReviewWithTour {
            review: Review {
                id: Uuid::new_v4(),
                tourist: UserId::from_uuid(fixtures::TOURIST_ID),
                tour_id: fixtures::FREE_TOUR_ID,
                rating: Rating::new(4).expect("valid rating"),
                comment: "Great robots.".to_owned(),
                created_at: now,
                updated_at: now,
            },
            tour_title: "Robotics Lab Open Afternoon".to_owned(),
        };
        let payload = ReviewWithTourPayload::from(joined);
        assert_eq!(payload.rating, 4);
        assert_eq!(payload.tour_title, "Robotics Lab Open Afternoon");
    }
}
