//! PostgreSQL-backed `DashboardRepository` implementation using Diesel ORM.
//!
//! Every dashboard number is recomputed per request with plain filtered
//! counts and sums; there are no counters to drift out of date. The lists
//! beneath the stat cards share the card assembly used by the catalogue and
//! booking endpoints.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{
    BookingSummary, DashboardPersistenceError, DashboardRepository, OrganizerStats, PlatformStats,
    TouristStats, TourSummary,
};
use crate::domain::{BookingStatus, Role, TourStatus, User, UserId};
use pagination::{Page, PageRequest};

use super::booking_summaries::{load_summary_page, BookingScope};
use super::diesel_error_mapping::{map_common_diesel_error, map_common_pool_error};
use super::diesel_user_repository as user_rows;
use super::models::{TourRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{bookings, departments, reviews, tours, users, wishlist_items};
use super::tour_summaries::{summarize_tours, SummaryError};

/// Diesel-backed implementation of the dashboard repository port.
#[derive(Clone)]
pub struct DieselDashboardRepository {
    pool: DbPool,
}

impl DieselDashboardRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DashboardPersistenceError {
    map_common_pool_error(error, DashboardPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> DashboardPersistenceError {
    map_common_diesel_error(
        error,
        DashboardPersistenceError::query,
        DashboardPersistenceError::connection,
    )
}

fn map_summary_error(error: SummaryError) -> DashboardPersistenceError {
    match error {
        SummaryError::Db(db) => map_diesel_error(db),
        SummaryError::Corrupt(message) => DashboardPersistenceError::query(message),
    }
}

async fn count_users_with_role(
    conn: &mut AsyncPgConnection,
    role: Role,
) -> Result<i64, diesel::result::Error> {
    users::table
        .filter(users::role.eq(role.as_str()))
        .count()
        .get_result(conn)
        .await
}

/// Sum of confirmed booking totals for tours matching the filter, absent
/// when nothing is confirmed yet.
async fn confirmed_revenue(
    conn: &mut AsyncPgConnection,
    organizer: Option<Uuid>,
) -> Result<BigDecimal, diesel::result::Error> {
    let revenue: Option<BigDecimal> = match organizer {
        Some(organizer_id) => {
            bookings::table
                .inner_join(tours::table)
                .filter(tours::organizer_id.eq(organizer_id))
                .filter(bookings::status.eq(BookingStatus::Confirmed.as_str()))
                .select(diesel::dsl::sum(bookings::total_price))
                .get_result(conn)
                .await?
        }
        None => {
            bookings::table
                .filter(bookings::status.eq(BookingStatus::Confirmed.as_str()))
                .select(diesel::dsl::sum(bookings::total_price))
                .get_result(conn)
                .await?
        }
    };
    Ok(revenue.unwrap_or_else(|| BigDecimal::from(0)))
}

async fn page_of_tour_summaries(
    conn: &mut AsyncPgConnection,
    rows: Vec<TourRow>,
    total: i64,
    page: PageRequest,
) -> Result<Page<TourSummary>, DashboardPersistenceError> {
    let summaries = summarize_tours(conn, rows).await.map_err(map_summary_error)?;
    Ok(Page::new(summaries, page, total.unsigned_abs()))
}

#[async_trait]
impl DashboardRepository for DieselDashboardRepository {
    async fn tourist_stats(
        &self,
        tourist: &UserId,
    ) -> Result<TouristStats, DashboardPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let tourist_id = *tourist.as_uuid();
        let now = Utc::now();

        let total_bookings: i64 = bookings::table
            .filter(bookings::tourist_id.eq(tourist_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let upcoming_bookings: i64 = bookings::table
            .inner_join(tours::table)
            .filter(bookings::tourist_id.eq(tourist_id))
            .filter(bookings::status.eq(BookingStatus::Confirmed.as_str()))
            .filter(tours::tour_date.gt(now))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let wishlist_count: i64 = wishlist_items::table
            .filter(wishlist_items::tourist_id.eq(tourist_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let review_count: i64 = reviews::table
            .filter(reviews::tourist_id.eq(tourist_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(TouristStats {
            total_bookings,
            upcoming_bookings,
            wishlist_count,
            review_count,
        })
    }

    async fn tourist_recent_bookings(
        &self,
        tourist: &UserId,
        page: PageRequest,
    ) -> Result<Page<BookingSummary>, DashboardPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_summary_page(&mut conn, BookingScope::Tourist(*tourist.as_uuid()), page)
            .await
            .map_err(map_diesel_error)?
            .map_err(DashboardPersistenceError::query)
    }

    async fn organizer_stats(
        &self,
        organizer: &UserId,
    ) -> Result<OrganizerStats, DashboardPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let organizer_id = *organizer.as_uuid();

        let total_tours: i64 = tours::table
            .filter(tours::organizer_id.eq(organizer_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let published_tours: i64 = tours::table
            .filter(tours::organizer_id.eq(organizer_id))
            .filter(tours::status.eq(TourStatus::Published.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let total_bookings: i64 = bookings::table
            .inner_join(tours::table)
            .filter(tours::organizer_id.eq(organizer_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let total_revenue = confirmed_revenue(&mut conn, Some(organizer_id))
            .await
            .map_err(map_diesel_error)?;

        Ok(OrganizerStats {
            total_tours,
            published_tours,
            total_bookings,
            total_revenue,
        })
    }

    async fn organizer_tours(
        &self,
        organizer: &UserId,
        page: PageRequest,
    ) -> Result<Page<TourSummary>, DashboardPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let organizer_id = *organizer.as_uuid();

        let total: i64 = tours::table
            .filter(tours::organizer_id.eq(organizer_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<TourRow> = tours::table
            .filter(tours::organizer_id.eq(organizer_id))
            .order(tours::created_at.desc())
            .offset(page.offset())
            .limit(page.limit())
            .select(TourRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        page_of_tour_summaries(&mut conn, rows, total, page).await
    }

    async fn platform_stats(&self) -> Result<PlatformStats, DashboardPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total_users: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let tourists = count_users_with_role(&mut conn, Role::Tourist)
            .await
            .map_err(map_diesel_error)?;
        let organizers = count_users_with_role(&mut conn, Role::Organizer)
            .await
            .map_err(map_diesel_error)?;
        let developers = count_users_with_role(&mut conn, Role::Developer)
            .await
            .map_err(map_diesel_error)?;
        let total_tours: i64 = tours::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let total_bookings: i64 = bookings::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let total_departments: i64 = departments::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let total_revenue = confirmed_revenue(&mut conn, None)
            .await
            .map_err(map_diesel_error)?;

        Ok(PlatformStats {
            total_users,
            tourists,
            organizers,
            developers,
            total_tours,
            total_bookings,
            total_departments,
            total_revenue,
        })
    }

    async fn recent_users(
        &self,
        page: PageRequest,
    ) -> Result<Page<User>, DashboardPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<UserRow> = users::table
            .order(users::created_at.desc())
            .offset(page.offset())
            .limit(page.limit())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(|row| {
                user_rows::row_to_user(row)
                    .map_err(|err| DashboardPersistenceError::query(err.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, page, total.unsigned_abs()))
    }

    async fn recent_tours(
        &self,
        page: PageRequest,
    ) -> Result<Page<TourSummary>, DashboardPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = tours::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<TourRow> = tours::table
            .order(tours::created_at.desc())
            .offset(page.offset())
            .limit(page.limit())
            .select(TourRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        page_of_tour_summaries(&mut conn, rows, total, page).await
    }
}
