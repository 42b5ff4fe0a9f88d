//! Driving port for reading bookings.
//!
//! Tourists see their own bookings; organizers see the roster for tours
//! they run. Both views pair the booking row with enough tour context to
//! render a list without extra round trips.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, UserId};

use super::booking_command::BookingPayload;
use super::booking_repository::BookingSummary;
use super::fixtures;

/// One booking with its tour context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummaryPayload {
    pub booking: BookingPayload,
    pub tour_title: String,
    pub tour_date: DateTime<Utc>,
    pub tour_location: String,
    pub tourist_username: String,
}

impl From<BookingSummary> for BookingSummaryPayload {
    fn from(value: BookingSummary) -> Self {
        Self {
            booking: value.booking.into(),
            tour_title: value.tour_title,
            tour_date: value.tour_date,
            tour_location: value.tour_location,
            tourist_username: value.tourist_username,
        }
    }
}

/// Request for one booking's detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBookingRequest {
    pub viewer: UserId,
    pub booking_id: Uuid,
}

/// Response carrying one booking with tour context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBookingResponse {
    pub booking: BookingSummaryPayload,
}

/// Request for the caller's own bookings, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyBookingsRequest {
    pub tourist_id: UserId,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// Response listing the caller's bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyBookingsResponse {
    pub bookings: Page<BookingSummaryPayload>,
}

/// Request for the roster of one tour's bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourBookingsRequest {
    pub organizer_id: UserId,
    pub tour_id: Uuid,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// Response listing one tour's bookings for its organizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourBookingsResponse {
    pub bookings: Page<BookingSummaryPayload>,
}

/// Driving port for booking read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingQuery: Send + Sync {
    /// Fetch one booking the viewer is allowed to see.
    ///
    /// Visible to the tourist who holds it, the organizer who runs the
    /// tour, and developers; everyone else gets not-found.
    async fn get_booking(&self, request: GetBookingRequest) -> Result<GetBookingResponse, Error>;

    /// List the caller's own bookings, newest first.
    async fn my_bookings(&self, request: MyBookingsRequest) -> Result<MyBookingsResponse, Error>;

    /// List bookings on a tour the caller organizes.
    async fn tour_bookings(
        &self,
        request: TourBookingsRequest,
    ) -> Result<TourBookingsResponse, Error>;
}

/// Fixture query returning empty listings.
///
/// The stateless fixture command never stores bookings, so the matching
/// query serves empty pages and not-found lookups.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookingQuery;

#[async_trait]
impl BookingQuery for FixtureBookingQuery {
    async fn get_booking(&self, request: GetBookingRequest) -> Result<GetBookingResponse, Error> {
        Err(Error::not_found(format!(
            "booking {} not found",
            request.booking_id
        )))
    }

    async fn my_bookings(&self, request: MyBookingsRequest) -> Result<MyBookingsResponse, Error> {
        let page = PageRequest::new(request.page, request.per_page);
        Ok(MyBookingsResponse {
            bookings: Page::new(Vec::new(), page, 0),
        })
    }

    async fn tour_bookings(
        &self,
        request: TourBookingsRequest,
    ) -> Result<TourBookingsResponse, Error> {
        if *request.organizer_id.as_uuid() != fixtures::ORGANIZER_ID {
            return Err(Error::forbidden("tour does not belong to this organizer"));
        }
        let page = PageRequest::new(request.page, request.per_page);
        Ok(TourBookingsResponse {
            bookings: Page::new(Vec::new(), page, 0),
        })
    }
}
