//! PostgreSQL-backed `TourRepository` implementation using Diesel ORM.
//!
//! Catalogue search builds its filter chain dynamically over a boxed query;
//! every listing shares the card assembly in [`super::tour_summaries`] so
//! `available_spots` is always derived from confirmed bookings at read time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{
    TourFilters, TourPersistenceError, TourRepository, TourSearch, TourSummary,
};
use crate::domain::{
    Price, PriceBand, Tour, TourCategory, TourDetails, TourStatus, UserId,
};
use pagination::{Page, PageRequest};

use super::diesel_error_mapping::{map_common_diesel_error, map_common_pool_error};
use super::models::{NewTourRow, TourDetailsUpdate, TourRow};
use super::pool::{DbPool, PoolError};
use super::schema::{bookings, departments, tours};
use super::tour_summaries::{summarize_tours, SummaryError};

/// Diesel-backed implementation of the tour repository port.
#[derive(Clone)]
pub struct DieselTourRepository {
    pool: DbPool,
}

impl DieselTourRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TourPersistenceError {
    map_common_pool_error(error, TourPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TourPersistenceError {
    map_common_diesel_error(
        error,
        TourPersistenceError::query,
        TourPersistenceError::connection,
    )
}

fn map_summary_error(error: SummaryError) -> TourPersistenceError {
    match error {
        SummaryError::Db(db) => map_diesel_error(db),
        SummaryError::Corrupt(message) => TourPersistenceError::query(message),
    }
}

/// Convert a database row into a validated domain tour.
fn row_to_tour(row: TourRow) -> Result<Tour, TourPersistenceError> {
    let corrupt = |message: String| TourPersistenceError::query(message);
    let category = row
        .category
        .parse::<TourCategory>()
        .map_err(|err| corrupt(err.to_string()))?;
    let status = row
        .status
        .parse::<TourStatus>()
        .map_err(|err| corrupt(err.to_string()))?;
    let price = Price::try_new(row.price).map_err(|err| corrupt(err.to_string()))?;
    let details = TourDetails::try_from_parts(
        &row.title,
        &row.description,
        category,
        &row.location,
        row.tour_date,
        row.duration_hours,
        row.max_participants,
        price,
        row.image_url.as_deref(),
    )
    .map_err(|err| corrupt(err.to_string()))?;

    Ok(Tour {
        id: row.id,
        organizer: UserId::from_uuid(row.organizer_id),
        department_id: row.department_id,
        details,
        status,
        qr_code_url: row.qr_code_url,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

type BoxedTourQuery<'a> = tours::BoxedQuery<'a, diesel::pg::Pg>;

/// Published future tours narrowed by the catalogue filters.
///
/// The free-text needle also matches department names, which needs a
/// subselect because the boxed query cannot carry a join and stay composable
/// with the other filters.
fn filtered_catalogue<'a>(
    filters: &'a TourFilters,
    now: DateTime<Utc>,
) -> BoxedTourQuery<'a> {
    let mut query = tours::table
        .filter(tours::status.eq(TourStatus::Published.as_str()))
        .filter(tours::tour_date.gt(now))
        .into_boxed();

    if let Some(needle) = filters.search.as_deref() {
        let pattern = format!("%{}%", needle.replace('%', "\\%").replace('_', "\\_"));
        let matching_departments = departments::table
            .filter(departments::name.ilike(pattern.clone()))
            .select(departments::id);
        query = query.filter(
            tours::title
                .ilike(pattern.clone())
                .or(tours::description.ilike(pattern))
                .or(tours::department_id.assume_not_null().eq_any(matching_departments)),
        );
    }
    if let Some(category) = filters.category {
        query = query.filter(tours::category.eq(category.as_str()));
    }
    if let Some(department) = filters.department {
        query = query.filter(tours::department_id.eq(department));
    }
    match filters.price_band {
        Some(PriceBand::Free) => {
            query = query.filter(tours::price.eq(bigdecimal::BigDecimal::from(0)));
        }
        Some(PriceBand::Under500) => {
            query = query.filter(tours::price.lt(bigdecimal::BigDecimal::from(500)));
        }
        Some(PriceBand::Between500And1000) => {
            query = query
                .filter(tours::price.ge(bigdecimal::BigDecimal::from(500)))
                .filter(tours::price.le(bigdecimal::BigDecimal::from(1000)));
        }
        Some(PriceBand::Over1000) => {
            query = query.filter(tours::price.gt(bigdecimal::BigDecimal::from(1000)));
        }
        None => {}
    }
    query
}

/// Load one page of rows plus the unfiltered total, then build cards.
async fn page_of_summaries(
    conn: &mut AsyncPgConnection,
    rows: Vec<TourRow>,
    total: i64,
    page: PageRequest,
) -> Result<Page<TourSummary>, TourPersistenceError> {
    let summaries = summarize_tours(conn, rows).await.map_err(map_summary_error)?;
    Ok(Page::new(summaries, page, total.unsigned_abs()))
}

#[async_trait]
impl TourRepository for DieselTourRepository {
    async fn search(
        &self,
        request: &TourSearch,
    ) -> Result<Page<TourSummary>, TourPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = filtered_catalogue(&request.filters, request.now)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<TourRow> = filtered_catalogue(&request.filters, request.now)
            .order(tours::tour_date.asc())
            .offset(request.page.offset())
            .limit(request.page.limit())
            .select(TourRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        page_of_summaries(&mut conn, rows, total, request.page).await
    }

    async fn find(&self, id: Uuid) -> Result<Option<Tour>, TourPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TourRow> = tours::table
            .find(id)
            .select(TourRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_tour).transpose()
    }

    async fn insert(&self, tour: &Tour) -> Result<(), TourPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewTourRow {
            id: tour.id,
            organizer_id: *tour.organizer.as_uuid(),
            department_id: tour.department_id,
            title: &tour.details.title,
            description: &tour.details.description,
            category: tour.details.category.as_str(),
            location: &tour.details.location,
            tour_date: tour.details.tour_date,
            duration_hours: tour.details.duration_hours,
            max_participants: tour.details.max_participants,
            price: tour.details.price.amount(),
            image_url: tour.details.image_url.as_deref(),
            status: tour.status.as_str(),
            qr_code_url: tour.qr_code_url.as_deref(),
            created_at: tour.created_at,
            updated_at: tour.updated_at,
        };
        diesel::insert_into(tours::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update_details(
        &self,
        id: Uuid,
        department_id: Option<Uuid>,
        details: &TourDetails,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, TourPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = TourDetailsUpdate {
            department_id,
            title: &details.title,
            description: &details.description,
            category: details.category.as_str(),
            location: &details.location,
            tour_date: details.tour_date,
            duration_hours: details.duration_hours,
            max_participants: details.max_participants,
            price: details.price.amount(),
            image_url: details.image_url.as_deref(),
            updated_at,
        };
        let updated = diesel::update(tours::table.find(id))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: TourStatus,
        qr_code_url: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, TourPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(tours::table.find(id))
            .set((
                tours::status.eq(status.as_str()),
                tours::qr_code_url.eq(qr_code_url.as_deref()),
                tours::updated_at.eq(updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn set_qr_code_url(
        &self,
        id: Uuid,
        qr_code_url: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, TourPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(tours::table.find(id))
            .set((
                tours::qr_code_url.eq(qr_code_url),
                tours::updated_at.eq(updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, TourPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(tours::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn list_for_organizer(
        &self,
        organizer: &UserId,
        page: PageRequest,
    ) -> Result<Page<TourSummary>, TourPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owned = tours::table.filter(tours::organizer_id.eq(organizer.as_uuid()));

        let total: i64 = owned
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<TourRow> = owned
            .order(tours::created_at.desc())
            .offset(page.offset())
            .limit(page.limit())
            .select(TourRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        page_of_summaries(&mut conn, rows, total, page).await
    }

    async fn list_for_department(
        &self,
        department: Uuid,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<TourSummary>, TourPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let listed = tours::table
            .filter(tours::department_id.eq(department))
            .filter(tours::status.eq(TourStatus::Published.as_str()))
            .filter(tours::tour_date.gt(now));

        let total: i64 = listed
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<TourRow> = listed
            .order(tours::tour_date.asc())
            .offset(page.offset())
            .limit(page.limit())
            .select(TourRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        page_of_summaries(&mut conn, rows, total, page).await
    }

    async fn related(
        &self,
        department: Uuid,
        exclude: Uuid,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<TourSummary>, TourPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TourRow> = tours::table
            .filter(tours::department_id.eq(department))
            .filter(tours::id.ne(exclude))
            .filter(tours::status.eq(TourStatus::Published.as_str()))
            .filter(tours::tour_date.gt(now))
            .order(tours::tour_date.asc())
            .limit(limit)
            .select(TourRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        summarize_tours(&mut conn, rows).await.map_err(map_summary_error)
    }

    async fn confirmed_participants(&self, id: Uuid) -> Result<i64, TourPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let taken: Option<i64> = bookings::table
            .filter(bookings::tour_id.eq(id))
            .filter(bookings::status.eq(crate::domain::BookingStatus::Confirmed.as_str()))
            .select(diesel::dsl::sum(bookings::participants))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(taken.unwrap_or(0))
    }
}
