//! Shared assembly of catalogue cards from tour rows.
//!
//! Catalogue search, organizer listings, wishlists, and the dashboards all
//! return [`TourSummary`] cards. The department name and the confirmed seat
//! count come from two batched lookups, so a page of cards costs three
//! queries however long it is and `available_spots` is derived at read time
//! rather than stored.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::TourSummary;
use crate::domain::{BookingStatus, Price, TourCategory, TourStatus};

use super::models::TourRow;
use super::schema::{bookings, departments};

/// Failure while assembling summaries.
#[derive(Debug)]
pub(crate) enum SummaryError {
    /// One of the lookup queries failed.
    Db(diesel::result::Error),
    /// A stored row no longer satisfies domain validation.
    Corrupt(String),
}

impl From<diesel::result::Error> for SummaryError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Db(error)
    }
}

/// Seats held by confirmed bookings, keyed by tour.
///
/// Tours with no confirmed bookings are absent from the map.
pub(crate) async fn confirmed_seats(
    conn: &mut AsyncPgConnection,
    tour_ids: &[Uuid],
) -> Result<HashMap<Uuid, i64>, diesel::result::Error> {
    if tour_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(Uuid, Option<i64>)> = bookings::table
        .filter(bookings::tour_id.eq_any(tour_ids))
        .filter(bookings::status.eq(BookingStatus::Confirmed.as_str()))
        .group_by(bookings::tour_id)
        .select((bookings::tour_id, diesel::dsl::sum(bookings::participants)))
        .load(conn)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(tour_id, taken)| (tour_id, taken.unwrap_or(0)))
        .collect())
}

async fn department_names(
    conn: &mut AsyncPgConnection,
    department_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, String>, diesel::result::Error> {
    if department_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(Uuid, String)> = departments::table
        .filter(departments::id.eq_any(department_ids))
        .select((departments::id, departments::name))
        .load(conn)
        .await?;
    Ok(rows.into_iter().collect())
}

fn row_to_summary(
    row: TourRow,
    department_name: Option<String>,
    seats_taken: i64,
) -> Result<TourSummary, String> {
    let category = row
        .category
        .parse::<TourCategory>()
        .map_err(|error| error.to_string())?;
    let status = row
        .status
        .parse::<TourStatus>()
        .map_err(|error| error.to_string())?;
    let price = Price::try_new(row.price).map_err(|error| error.to_string())?;
    Ok(TourSummary {
        id: row.id,
        title: row.title,
        category,
        department_name,
        location: row.location,
        tour_date: row.tour_date,
        duration_hours: row.duration_hours,
        max_participants: row.max_participants,
        available_spots: i64::from(row.max_participants) - seats_taken,
        price,
        image_url: row.image_url,
        status,
    })
}

/// Assemble catalogue cards for `rows`, preserving their order.
pub(crate) async fn summarize_tours(
    conn: &mut AsyncPgConnection,
    rows: Vec<TourRow>,
) -> Result<Vec<TourSummary>, SummaryError> {
    let tour_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let department_ids: Vec<Uuid> = rows.iter().filter_map(|row| row.department_id).collect();
    let seats = confirmed_seats(conn, &tour_ids).await?;
    let names = department_names(conn, department_ids).await?;
    rows.into_iter()
        .map(|row| {
            let taken = seats.get(&row.id).copied().unwrap_or(0);
            let name = row.department_id.and_then(|id| names.get(&id).cloned());
            row_to_summary(row, name, taken)
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(SummaryError::Corrupt)
}
