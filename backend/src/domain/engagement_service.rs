//! Wishlist and review domain services.
//!
//! Both features hang off the tourist account: saving a published tour for
//! later and reviewing one after attending. Review eligibility is a booking
//! question, so the command service consults the booking repository for it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::access::require_tourist;
use crate::domain::ports::{
    BookingRepository, EngagementCommand, EngagementQuery, EngagementRepository, MyReviewsRequest,
    MyReviewsResponse, MyWishlistRequest, MyWishlistResponse, OwnReviewPayload,
    ReviewWithTourPayload, SubmitReviewRequest, SubmitReviewResponse, ToggleWishlistRequest,
    ToggleWishlistResponse, TourCardPayload, TourRepository, UserRepository,
};
use crate::domain::service_support::{map_booking_error, map_engagement_error, map_tour_error};
use crate::domain::{Error, Rating, Review, TourStatus, WishlistEntry};

/// Engagement writes over the engagement, booking, and tour repositories.
#[derive(Clone)]
pub struct EngagementCommandService<E, B, T, U> {
    engagement: Arc<E>,
    bookings: Arc<B>,
    tours: Arc<T>,
    users: Arc<U>,
}

impl<E, B, T, U> EngagementCommandService<E, B, T, U> {
    /// Create a new engagement command service.
    pub fn new(engagement: Arc<E>, bookings: Arc<B>, tours: Arc<T>, users: Arc<U>) -> Self {
        Self {
            engagement,
            bookings,
            tours,
            users,
        }
    }
}

#[async_trait]
impl<E, B, T, U> EngagementCommand for EngagementCommandService<E, B, T, U>
where
    E: EngagementRepository,
    B: BookingRepository,
    T: TourRepository,
    U: UserRepository,
{
    async fn toggle_wishlist(
        &self,
        request: ToggleWishlistRequest,
    ) -> Result<ToggleWishlistResponse, Error> {
        require_tourist(self.users.as_ref(), &request.tourist_id).await?;
        let tour = self
            .tours
            .find(request.tour_id)
            .await
            .map_err(map_tour_error)?
            .ok_or_else(|| Error::not_found(format!("tour {} not found", request.tour_id)))?;
        // Unpublished tours read as missing here, matching the catalogue.
        if tour.status != TourStatus::Published {
            return Err(Error::not_found(format!(
                "tour {} not found",
                request.tour_id
            )));
        }
        let saved = self
            .engagement
            .toggle_wishlist(&WishlistEntry {
                id: Uuid::new_v4(),
                tourist: request.tourist_id,
                tour_id: request.tour_id,
                added_at: Utc::now(),
            })
            .await
            .map_err(map_engagement_error)?;
        Ok(ToggleWishlistResponse { added: saved })
    }

    async fn submit_review(
        &self,
        request: SubmitReviewRequest,
    ) -> Result<SubmitReviewResponse, Error> {
        require_tourist(self.users.as_ref(), &request.tourist_id).await?;
        self.tours
            .find(request.tour_id)
            .await
            .map_err(map_tour_error)?
            .ok_or_else(|| Error::not_found(format!("tour {} not found", request.tour_id)))?;
        let rating =
            Rating::new(request.rating).map_err(|err| Error::invalid_request(err.to_string()))?;
        let attended = self
            .bookings
            .has_attended(&request.tourist_id, request.tour_id)
            .await
            .map_err(map_booking_error)?;
        if !attended {
            return Err(Error::forbidden(
                "reviews need a confirmed booking on this tour",
            ));
        }
        let now = Utc::now();
        let stored = self
            .engagement
            .upsert_review(&Review {
                id: Uuid::new_v4(),
                tourist: request.tourist_id,
                tour_id: request.tour_id,
                rating,
                comment: request.comment.trim().to_owned(),
                created_at: now,
                updated_at: now,
            })
            .await
            .map_err(map_engagement_error)?;
        Ok(SubmitReviewResponse {
            review: OwnReviewPayload {
                id: stored.id,
                tour_id: stored.tour_id,
                rating: stored.rating.value(),
                comment: stored.comment,
                created_at: stored.created_at,
                updated_at: stored.updated_at,
            },
        })
    }
}

/// Engagement reads over the engagement repository.
#[derive(Clone)]
pub struct EngagementQueryService<E, U> {
    engagement: Arc<E>,
    users: Arc<U>,
}

impl<E, U> EngagementQueryService<E, U> {
    /// Create a new engagement query service.
    pub fn new(engagement: Arc<E>, users: Arc<U>) -> Self {
        Self { engagement, users }
    }
}

#[async_trait]
impl<E, U> EngagementQuery for EngagementQueryService<E, U>
where
    E: EngagementRepository,
    U: UserRepository,
{
    async fn my_wishlist(&self, request: MyWishlistRequest) -> Result<MyWishlistResponse, Error> {
        require_tourist(self.users.as_ref(), &request.tourist_id).await?;
        let tours = self
            .engagement
            .wishlist_tours(&request.tourist_id)
            .await
            .map_err(map_engagement_error)?;
        Ok(MyWishlistResponse {
            tours: tours.into_iter().map(TourCardPayload::from).collect(),
        })
    }

    async fn my_reviews(&self, request: MyReviewsRequest) -> Result<MyReviewsResponse, Error> {
        require_tourist(self.users.as_ref(), &request.tourist_id).await?;
        let reviews = self
            .engagement
            .reviews_by_tourist(&request.tourist_id)
            .await
            .map_err(map_engagement_error)?;
        Ok(MyReviewsResponse {
            reviews: reviews.into_iter().map(ReviewWithTourPayload::from).collect(),
        })
    }
}

#[cfg(test)]
#[path = "engagement_service_tests.rs"]
mod tests;
