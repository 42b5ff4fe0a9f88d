//! Port abstraction for booking persistence adapters.
//!
//! Reservation and payment confirmation run inside a database transaction
//! that locks the tour row, recounts confirmed participants, and only then
//! writes. Capacity can therefore never be oversold however many requests
//! race.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Booking, BookingStatus, PaymentMethod, PaymentStatus, Price, UserId};
use pagination::{Page, PageRequest};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by booking repository adapters.
    pub enum BookingPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "booking repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "booking repository query failed: {message}",
        /// The tour disappeared between validation and reservation.
        TourMissing { tour_id: Uuid } => "tour {tour_id} no longer exists",
        /// The tour is not published with a future date.
        NotBookable { message: String } => "tour cannot be booked: {message}",
        /// Fewer seats remain than the booking asks for.
        CapacityExceeded { available: i64 } => "only {available} spots are available",
        /// The booking is not awaiting payment.
        NotPayable { message: String } => "payment cannot be recorded: {message}",
    }
}

/// Fields of a booking about to be reserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    /// Identifier assigned by the caller.
    pub id: Uuid,
    /// Tourist making the booking.
    pub tourist: UserId,
    /// Tour being booked.
    pub tour_id: Uuid,
    /// Seats requested.
    pub participants: i32,
    /// Accessibility or dietary notes.
    pub special_requirements: Option<String>,
    /// Amount owed, already multiplied out.
    pub total_price: Price,
    /// Starting lifecycle state, `confirmed` for free tours.
    pub status: BookingStatus,
    /// Starting payment state, `paid` for free tours.
    pub payment_status: PaymentStatus,
    /// Reservation instant.
    pub booked_at: DateTime<Utc>,
}

/// Booking joined with the display fields list endpoints need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSummary {
    /// The booking itself.
    pub booking: Booking,
    /// Title of the booked tour.
    pub tour_title: String,
    /// When the booked tour starts.
    pub tour_date: DateTime<Utc>,
    /// Meeting point of the booked tour.
    pub tour_location: String,
    /// Login name of the tourist holding the booking.
    pub tourist_username: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Reserve seats on a tour.
    ///
    /// Locks the tour row, rejects unless the tour is published with a
    /// future date, recounts confirmed participants, and inserts only when
    /// the requested seats fit. Free tours arrive already `confirmed`, which
    /// makes them count against capacity from this moment.
    async fn reserve(&self, booking: &NewBooking) -> Result<Booking, BookingPersistenceError>;

    /// Record a payment and confirm the booking.
    ///
    /// Locks the tour row and recounts capacity before confirming, since
    /// pending bookings hold no seat. Fails with [`BookingPersistenceError::NotPayable`]
    /// when the booking is not pending payment.
    async fn record_payment(
        &self,
        id: Uuid,
        method: PaymentMethod,
        transaction_id: &str,
        paid_at: DateTime<Utc>,
    ) -> Result<Booking, BookingPersistenceError>;

    /// Cancel a booking that is still pending or confirmed, refunding a paid
    /// one.
    ///
    /// Returns `None` when the booking exists but is no longer cancellable,
    /// so callers can distinguish a lost race from a missing booking.
    async fn cancel(
        &self,
        id: Uuid,
        cancelled_at: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingPersistenceError>;

    /// Fetch a booking by identifier.
    async fn find(&self, id: Uuid) -> Result<Option<Booking>, BookingPersistenceError>;

    /// Whether the tourist holds a confirmed or completed booking on the
    /// tour. Gates review submission.
    async fn has_attended(
        &self,
        tourist: &UserId,
        tour_id: Uuid,
    ) -> Result<bool, BookingPersistenceError>;

    /// Fetch a booking with its display fields.
    async fn find_summary(
        &self,
        id: Uuid,
    ) -> Result<Option<BookingSummary>, BookingPersistenceError>;

    /// A tourist's bookings, newest first.
    async fn list_for_tourist(
        &self,
        tourist: &UserId,
        page: PageRequest,
    ) -> Result<Page<BookingSummary>, BookingPersistenceError>;

    /// All bookings on a tour, newest first.
    async fn list_for_tour(
        &self,
        tour_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<BookingSummary>, BookingPersistenceError>;
}
