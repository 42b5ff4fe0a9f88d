//! Port abstraction for wishlist and review persistence adapters.
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Review, UserId, WishlistEntry};

use super::define_port_error;
use super::tour_repository::TourSummary;

define_port_error! {
    /// Persistence errors raised by engagement repository adapters.
    pub enum EngagementPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "engagement repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "engagement repository query failed: {message}",
    }
}

/// Aggregate rating for a tour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSummary {
    /// Mean rating across reviews, absent when nobody reviewed yet.
    pub average: Option<BigDecimal>,
    /// Number of reviews.
    pub count: i64,
}

/// Review joined with its author's login name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewWithAuthor {
    /// The review itself.
    pub review: Review,
    /// Login name of the tourist who wrote it.
    pub author_username: String,
}

/// Review joined with the tour it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewWithTour {
    /// The review itself.
    pub review: Review,
    /// Title of the reviewed tour.
    pub tour_title: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngagementRepository: Send + Sync {
    /// Flip a tour in and out of a tourist's wishlist.
    ///
    /// Inserts when absent and deletes when present, inside one transaction.
    /// Returns `true` when the tour ended up saved.
    async fn toggle_wishlist(
        &self,
        entry: &WishlistEntry,
    ) -> Result<bool, EngagementPersistenceError>;

    /// Whether the tourist has the tour wishlisted.
    async fn contains_wishlist(
        &self,
        tourist: &UserId,
        tour_id: Uuid,
    ) -> Result<bool, EngagementPersistenceError>;

    /// Published tours the tourist has saved, most recently saved first.
    async fn wishlist_tours(
        &self,
        tourist: &UserId,
    ) -> Result<Vec<TourSummary>, EngagementPersistenceError>;

    /// Insert a review, or replace the tourist's existing review of the same
    /// tour while keeping its original creation time.
    async fn upsert_review(&self, review: &Review) -> Result<Review, EngagementPersistenceError>;

    /// Reviews on a tour, newest first.
    async fn reviews_for_tour(
        &self,
        tour_id: Uuid,
    ) -> Result<Vec<ReviewWithAuthor>, EngagementPersistenceError>;

    /// Reviews a tourist has written, newest first.
    async fn reviews_by_tourist(
        &self,
        tourist: &UserId,
    ) -> Result<Vec<ReviewWithTour>, EngagementPersistenceError>;

    /// Mean rating and review count for a tour.
    async fn review_summary(
        &self,
        tour_id: Uuid,
    ) -> Result<ReviewSummary, EngagementPersistenceError>;
}
