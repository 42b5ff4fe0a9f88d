//! PostgreSQL-backed `EngagementRepository` implementation using Diesel ORM.
//!
//! The wishlist toggle is a delete-then-insert inside one transaction, so it
//! is its own inverse even when two toggles race: the second request waits on
//! the first one's row and observes its outcome. Review resubmission rides
//! the `(tourist_id, tour_id)` unique constraint with an upsert.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{
    EngagementPersistenceError, EngagementRepository, ReviewSummary, ReviewWithAuthor,
    ReviewWithTour, TourSummary,
};
use crate::domain::{Rating, Review, TourStatus, UserId, WishlistEntry};

use super::diesel_error_mapping::{map_common_diesel_error, map_common_pool_error};
use super::models::{NewReviewRow, ReviewRow, TourRow, WishlistItemRow};
use super::pool::{DbPool, PoolError};
use super::schema::{reviews, tours, users, wishlist_items};
use super::tour_summaries::{summarize_tours, SummaryError};

/// Diesel-backed implementation of the engagement repository port.
#[derive(Clone)]
pub struct DieselEngagementRepository {
    pool: DbPool,
}

impl DieselEngagementRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EngagementPersistenceError {
    map_common_pool_error(error, EngagementPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> EngagementPersistenceError {
    map_common_diesel_error(
        error,
        EngagementPersistenceError::query,
        EngagementPersistenceError::connection,
    )
}

fn corrupt(message: String) -> EngagementPersistenceError {
    EngagementPersistenceError::query(message)
}

/// Convert a database row into a validated domain review.
fn row_to_review(row: ReviewRow) -> Result<Review, EngagementPersistenceError> {
    let rating = Rating::new(row.rating).map_err(|err| corrupt(err.to_string()))?;
    Ok(Review {
        id: row.id,
        tourist: UserId::from_uuid(row.tourist_id),
        tour_id: row.tour_id,
        rating,
        comment: row.comment,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl EngagementRepository for DieselEngagementRepository {
    async fn toggle_wishlist(
        &self,
        entry: &WishlistEntry,
    ) -> Result<bool, EngagementPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = WishlistItemRow {
            id: entry.id,
            tourist_id: *entry.tourist.as_uuid(),
            tour_id: entry.tour_id,
            created_at: entry.added_at,
        };

        conn.transaction(|conn| {
            async move {
                let removed = diesel::delete(
                    wishlist_items::table
                        .filter(wishlist_items::tourist_id.eq(row.tourist_id))
                        .filter(wishlist_items::tour_id.eq(row.tour_id)),
                )
                .execute(conn)
                .await?;
                if removed > 0 {
                    return Ok(false);
                }
                diesel::insert_into(wishlist_items::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn contains_wishlist(
        &self,
        tourist: &UserId,
        tour_id: Uuid,
    ) -> Result<bool, EngagementPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = wishlist_items::table
            .filter(wishlist_items::tourist_id.eq(tourist.as_uuid()))
            .filter(wishlist_items::tour_id.eq(tour_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(count > 0)
    }

    async fn wishlist_tours(
        &self,
        tourist: &UserId,
    ) -> Result<Vec<TourSummary>, EngagementPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TourRow> = wishlist_items::table
            .inner_join(tours::table)
            .filter(wishlist_items::tourist_id.eq(tourist.as_uuid()))
            .filter(tours::status.eq(TourStatus::Published.as_str()))
            .order(wishlist_items::created_at.desc())
            .select(TourRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        summarize_tours(&mut conn, rows).await.map_err(|error| match error {
            SummaryError::Db(db) => map_diesel_error(db),
            SummaryError::Corrupt(message) => corrupt(message),
        })
    }

    async fn upsert_review(&self, review: &Review) -> Result<Review, EngagementPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewReviewRow {
            id: review.id,
            tourist_id: *review.tourist.as_uuid(),
            tour_id: review.tour_id,
            rating: review.rating.value(),
            comment: &review.comment,
            created_at: review.created_at,
            updated_at: review.updated_at,
        };
        // Replacement keeps the original row and its created_at; only the
        // score, comment, and updated_at move.
        let row: ReviewRow = diesel::insert_into(reviews::table)
            .values(&new_row)
            .on_conflict((reviews::tourist_id, reviews::tour_id))
            .do_update()
            .set((
                reviews::rating.eq(new_row.rating),
                reviews::comment.eq(new_row.comment),
                reviews::updated_at.eq(new_row.updated_at),
            ))
            .returning(ReviewRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_review(row)
    }

    async fn reviews_for_tour(
        &self,
        tour_id: Uuid,
    ) -> Result<Vec<ReviewWithAuthor>, EngagementPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(ReviewRow, String)> = reviews::table
            .inner_join(users::table)
            .filter(reviews::tour_id.eq(tour_id))
            .order(reviews::created_at.desc())
            .select((ReviewRow::as_select(), users::username))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(row, author_username)| {
                Ok(ReviewWithAuthor {
                    review: row_to_review(row)?,
                    author_username,
                })
            })
            .collect()
    }

    async fn reviews_by_tourist(
        &self,
        tourist: &UserId,
    ) -> Result<Vec<ReviewWithTour>, EngagementPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(ReviewRow, String)> = reviews::table
            .inner_join(tours::table)
            .filter(reviews::tourist_id.eq(tourist.as_uuid()))
            .order(reviews::created_at.desc())
            .select((ReviewRow::as_select(), tours::title))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(row, tour_title)| {
                Ok(ReviewWithTour {
                    review: row_to_review(row)?,
                    tour_title,
                })
            })
            .collect()
    }

    async fn review_summary(
        &self,
        tour_id: Uuid,
    ) -> Result<ReviewSummary, EngagementPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (average, count): (Option<BigDecimal>, i64) = reviews::table
            .filter(reviews::tour_id.eq(tour_id))
            .select((
                diesel::dsl::avg(reviews::rating),
                diesel::dsl::count(reviews::id),
            ))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(ReviewSummary { average, count })
    }
}
