//! PostgreSQL-backed `BookingRepository` implementation using Diesel ORM.
//!
//! Reservation and payment confirmation run inside one transaction that
//! takes `SELECT ... FOR UPDATE` on the tour row before recounting confirmed
//! seats, so two racing requests serialize on the lock and the second sees
//! the first one's insert. Capacity is therefore enforced, not advisory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{
    BookingPersistenceError, BookingRepository, BookingSummary, NewBooking,
};
use crate::domain::{Booking, BookingStatus, PaymentMethod, PaymentStatus, TourStatus, UserId};
use pagination::{Page, PageRequest};

use super::booking_summaries::{
    load_summary, load_summary_page, row_to_booking, BookingScope,
};
use super::diesel_error_mapping::{map_common_diesel_error, map_common_pool_error, TxError};
use super::models::{BookingRow, NewBookingRow};
use super::pool::{DbPool, PoolError};
use super::schema::{bookings, tours};

/// Diesel-backed implementation of the booking repository port.
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BookingPersistenceError {
    map_common_pool_error(error, BookingPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BookingPersistenceError {
    map_common_diesel_error(
        error,
        BookingPersistenceError::query,
        BookingPersistenceError::connection,
    )
}

fn map_tx_error(error: TxError<BookingPersistenceError>) -> BookingPersistenceError {
    match error {
        TxError::Db(db) => map_diesel_error(db),
        TxError::Abort(abort) => abort,
    }
}

fn corrupt(message: String) -> BookingPersistenceError {
    BookingPersistenceError::query(message)
}

/// Tour columns the capacity check needs, read under the row lock.
#[derive(Debug, Queryable)]
struct LockedTour {
    status: String,
    tour_date: DateTime<Utc>,
    max_participants: i32,
}

/// Lock the tour row and return its capacity fields.
async fn lock_tour(
    conn: &mut AsyncPgConnection,
    tour_id: Uuid,
) -> Result<LockedTour, TxError<BookingPersistenceError>> {
    tours::table
        .find(tour_id)
        .select((tours::status, tours::tour_date, tours::max_participants))
        .for_update()
        .first::<LockedTour>(conn)
        .await
        .optional()?
        .ok_or(TxError::Abort(BookingPersistenceError::TourMissing {
            tour_id,
        }))
}

/// Seats currently held by confirmed bookings on the locked tour.
async fn confirmed_seats(
    conn: &mut AsyncPgConnection,
    tour_id: Uuid,
) -> Result<i64, diesel::result::Error> {
    let taken: Option<i64> = bookings::table
        .filter(bookings::tour_id.eq(tour_id))
        .filter(bookings::status.eq(BookingStatus::Confirmed.as_str()))
        .select(diesel::dsl::sum(bookings::participants))
        .get_result(conn)
        .await?;
    Ok(taken.unwrap_or(0))
}

/// Abort unless the locked tour still has room for `participants` seats.
async fn check_capacity(
    conn: &mut AsyncPgConnection,
    tour_id: Uuid,
    max_participants: i32,
    participants: i32,
) -> Result<(), TxError<BookingPersistenceError>> {
    let taken = confirmed_seats(conn, tour_id).await?;
    let available = i64::from(max_participants) - taken;
    if i64::from(participants) > available {
        return Err(TxError::Abort(
            BookingPersistenceError::CapacityExceeded { available },
        ));
    }
    Ok(())
}

fn booking_from_row(row: BookingRow) -> Result<Booking, BookingPersistenceError> {
    row_to_booking(row).map_err(corrupt)
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn reserve(&self, booking: &NewBooking) -> Result<Booking, BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_booking = booking.clone();

        let row = conn
            .transaction(|conn| {
                async move {
                    let tour = lock_tour(conn, new_booking.tour_id).await?;
                    let status = tour
                        .status
                        .parse::<TourStatus>()
                        .map_err(|err| TxError::Abort(corrupt(err.to_string())))?;
                    if status != TourStatus::Published || tour.tour_date <= new_booking.booked_at {
                        return Err(TxError::Abort(BookingPersistenceError::not_bookable(
                            "tour is not published with a future date",
                        )));
                    }
                    check_capacity(
                        conn,
                        new_booking.tour_id,
                        tour.max_participants,
                        new_booking.participants,
                    )
                    .await?;

                    let new_row = NewBookingRow {
                        id: new_booking.id,
                        tourist_id: *new_booking.tourist.as_uuid(),
                        tour_id: new_booking.tour_id,
                        participants: new_booking.participants,
                        special_requirements: new_booking.special_requirements.as_deref(),
                        total_price: new_booking.total_price.amount(),
                        status: new_booking.status.as_str(),
                        payment_status: new_booking.payment_status.as_str(),
                        created_at: new_booking.booked_at,
                        updated_at: new_booking.booked_at,
                    };
                    let row: BookingRow = diesel::insert_into(bookings::table)
                        .values(&new_row)
                        .returning(BookingRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_tx_error)?;

        booking_from_row(row)
    }

    async fn record_payment(
        &self,
        id: Uuid,
        method: PaymentMethod,
        transaction_id: &str,
        paid_at: DateTime<Utc>,
    ) -> Result<Booking, BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let transaction_id = transaction_id.to_owned();

        let row = conn
            .transaction(|conn| {
                async move {
                    // Lock the booking first so two payment attempts on the
                    // same booking also serialize.
                    let row: Option<BookingRow> = bookings::table
                        .find(id)
                        .select(BookingRow::as_select())
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let row = row.ok_or_else(|| {
                        TxError::Abort(BookingPersistenceError::not_payable(format!(
                            "booking {id} not found"
                        )))
                    })?;
                    if row.status != BookingStatus::Pending.as_str()
                        || row.payment_status != PaymentStatus::Pending.as_str()
                    {
                        return Err(TxError::Abort(BookingPersistenceError::not_payable(
                            "booking is not awaiting payment",
                        )));
                    }

                    // Pending bookings hold no seat, so confirming one has to
                    // re-check capacity under the tour lock.
                    let tour = lock_tour(conn, row.tour_id).await?;
                    check_capacity(conn, row.tour_id, tour.max_participants, row.participants)
                        .await?;

                    let updated: BookingRow = diesel::update(bookings::table.find(id))
                        .set((
                            bookings::status.eq(BookingStatus::Confirmed.as_str()),
                            bookings::payment_status.eq(PaymentStatus::Paid.as_str()),
                            bookings::payment_method.eq(method.as_str()),
                            bookings::transaction_id.eq(transaction_id.as_str()),
                            bookings::updated_at.eq(paid_at),
                        ))
                        .returning(BookingRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok(updated)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_tx_error)?;

        booking_from_row(row)
    }

    async fn cancel(
        &self,
        id: Uuid,
        cancelled_at: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // A paid booking refunds on cancellation; an unpaid one just stops
        // waiting. The row lock keeps a racing payment from confirming a
        // booking that is in the middle of being cancelled.
        let row = conn
            .transaction(|conn| {
                async move {
                    let row: Option<BookingRow> = bookings::table
                        .find(id)
                        .select(BookingRow::as_select())
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(row) = row else {
                        return Ok(None);
                    };
                    let cancellable = row.status == BookingStatus::Pending.as_str()
                        || row.status == BookingStatus::Confirmed.as_str();
                    if !cancellable {
                        return Ok(None);
                    }
                    let payment_status = if row.payment_status == PaymentStatus::Paid.as_str() {
                        PaymentStatus::Refunded
                    } else {
                        PaymentStatus::Pending
                    };

                    let updated: BookingRow = diesel::update(bookings::table.find(id))
                        .set((
                            bookings::status.eq(BookingStatus::Cancelled.as_str()),
                            bookings::payment_status.eq(payment_status.as_str()),
                            bookings::updated_at.eq(cancelled_at),
                        ))
                        .returning(BookingRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok(Some(updated))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row.map(booking_from_row).transpose()
    }

    async fn find(&self, id: Uuid) -> Result<Option<Booking>, BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<BookingRow> = bookings::table
            .find(id)
            .select(BookingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(booking_from_row).transpose()
    }

    async fn has_attended(
        &self,
        tourist: &UserId,
        tour_id: Uuid,
    ) -> Result<bool, BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = bookings::table
            .filter(bookings::tourist_id.eq(tourist.as_uuid()))
            .filter(bookings::tour_id.eq(tour_id))
            .filter(bookings::status.eq_any([
                BookingStatus::Confirmed.as_str(),
                BookingStatus::Completed.as_str(),
            ]))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(count > 0)
    }

    async fn find_summary(
        &self,
        id: Uuid,
    ) -> Result<Option<BookingSummary>, BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_summary(&mut conn, id)
            .await
            .map_err(map_diesel_error)?
            .map(|summary| summary.map_err(corrupt))
            .transpose()
    }

    async fn list_for_tourist(
        &self,
        tourist: &UserId,
        page: PageRequest,
    ) -> Result<Page<BookingSummary>, BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_summary_page(&mut conn, BookingScope::Tourist(*tourist.as_uuid()), page)
            .await
            .map_err(map_diesel_error)?
            .map_err(corrupt)
    }

    async fn list_for_tour(
        &self,
        tour_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<BookingSummary>, BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_summary_page(&mut conn, BookingScope::Tour(tour_id), page)
            .await
            .map_err(map_diesel_error)?
            .map_err(corrupt)
    }
}
