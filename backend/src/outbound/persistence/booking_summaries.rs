//! Shared assembly of booking list rows.
//!
//! Booking lists, the booking detail view, and the tourist dashboard all
//! show a booking joined with its tour's headline fields and the holder's
//! login name, so the three-way join and the row conversion live here.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::BookingSummary;
use crate::domain::{
    Booking, BookingStatus, PaymentMethod, PaymentStatus, Price, UserId,
};
use pagination::{Page, PageRequest};

use super::models::BookingRow;
use super::schema::{bookings, tours, users};

/// Booking row joined with its display fields.
pub(crate) type JoinedBookingRow = (BookingRow, String, chrono::DateTime<chrono::Utc>, String, String);

/// Convert a bookings row into a validated domain booking.
pub(crate) fn row_to_booking(row: BookingRow) -> Result<Booking, String> {
    let status = row.status.parse::<BookingStatus>().map_err(|e| e.to_string())?;
    let payment_status = row
        .payment_status
        .parse::<PaymentStatus>()
        .map_err(|e| e.to_string())?;
    let payment_method = row
        .payment_method
        .as_deref()
        .map(str::parse::<PaymentMethod>)
        .transpose()
        .map_err(|e| e.to_string())?;
    let total_price = Price::try_new(row.total_price).map_err(|e| e.to_string())?;

    Ok(Booking {
        id: row.id,
        tourist: UserId::from_uuid(row.tourist_id),
        tour_id: row.tour_id,
        participants: row.participants,
        special_requirements: row.special_requirements,
        total_price,
        status,
        payment_status,
        payment_method,
        transaction_id: row.transaction_id,
        booked_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn joined_to_summary(joined: JoinedBookingRow) -> Result<BookingSummary, String> {
    let (row, tour_title, tour_date, tour_location, tourist_username) = joined;
    Ok(BookingSummary {
        booking: row_to_booking(row)?,
        tour_title,
        tour_date,
        tour_location,
        tourist_username,
    })
}

/// Columns selected alongside the booking row on every list query.
macro_rules! summary_select {
    () => {
        (
            BookingRow::as_select(),
            tours::title,
            tours::tour_date,
            tours::location,
            users::username,
        )
    };
}

/// One booking with its display fields, when it exists.
pub(crate) async fn load_summary(
    conn: &mut AsyncPgConnection,
    id: Uuid,
) -> Result<Option<Result<BookingSummary, String>>, diesel::result::Error> {
    let joined: Option<JoinedBookingRow> = bookings::table
        .inner_join(tours::table)
        .inner_join(users::table)
        .filter(bookings::id.eq(id))
        .select(summary_select!())
        .first(conn)
        .await
        .optional()?;
    Ok(joined.map(joined_to_summary))
}

/// A page of booking summaries for the given filter column.
///
/// `scope` restricts either by tourist or by tour; callers pass the already
/// counted total so both queries share one filter definition.
pub(crate) async fn load_summary_page(
    conn: &mut AsyncPgConnection,
    scope: BookingScope,
    page: PageRequest,
) -> Result<Result<Page<BookingSummary>, String>, diesel::result::Error> {
    let total: i64 = match scope {
        BookingScope::Tourist(id) => {
            bookings::table
                .filter(bookings::tourist_id.eq(id))
                .count()
                .get_result(conn)
                .await?
        }
        BookingScope::Tour(id) => {
            bookings::table
                .filter(bookings::tour_id.eq(id))
                .count()
                .get_result(conn)
                .await?
        }
    };

    let base = bookings::table.inner_join(tours::table).inner_join(users::table);
    let joined: Vec<JoinedBookingRow> = match scope {
        BookingScope::Tourist(id) => {
            base.filter(bookings::tourist_id.eq(id))
                .order(bookings::created_at.desc())
                .offset(page.offset())
                .limit(page.limit())
                .select(summary_select!())
                .load(conn)
                .await?
        }
        BookingScope::Tour(id) => {
            base.filter(bookings::tour_id.eq(id))
                .order(bookings::created_at.desc())
                .offset(page.offset())
                .limit(page.limit())
                .select(summary_select!())
                .load(conn)
                .await?
        }
    };

    let summaries: Result<Vec<BookingSummary>, String> =
        joined.into_iter().map(joined_to_summary).collect();
    Ok(summaries.map(|items| Page::new(items, page, total.unsigned_abs())))
}

/// Which side of the booking join a list is scoped to.
#[derive(Debug, Clone, Copy)]
pub(crate) enum BookingScope {
    /// Bookings held by one tourist.
    Tourist(Uuid),
    /// Bookings against one tour.
    Tour(Uuid),
}
