//! Booking domain services.
//!
//! Capacity truth lives behind [`BookingRepository`]: its adapter recounts
//! confirmed seats under a tour-row lock on every reservation and payment.
//! The checks here turn malformed or stale requests into errors before a
//! transaction is opened; the adapter repeats the ones that matter.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::access::{map_user_error, require_organizer, require_tourist};
use crate::domain::ports::{
    BookTourRequest, BookTourResponse, BookingCommand, BookingQuery, BookingRepository,
    BookingSummary, BookingSummaryPayload, CancelBookingRequest, CancelBookingResponse,
    GetBookingRequest, GetBookingResponse, MyBookingsRequest, MyBookingsResponse, NewBooking,
    PayBookingRequest, PayBookingResponse, TourBookingsRequest, TourBookingsResponse,
    TourRepository, UserRepository, validate_payment_number,
};
use crate::domain::service_support::{map_booking_error, map_tour_error};
use crate::domain::{
    Booking, BookingStatus, Error, new_transaction_id, PaymentStatus, Role, UserId,
};

/// Booking writes over the booking and tour repositories.
#[derive(Clone)]
pub struct BookingCommandService<B, T, U> {
    bookings: Arc<B>,
    tours: Arc<T>,
    users: Arc<U>,
}

impl<B, T, U> BookingCommandService<B, T, U> {
    /// Create a new booking command service.
    pub fn new(bookings: Arc<B>, tours: Arc<T>, users: Arc<U>) -> Self {
        Self {
            bookings,
            tours,
            users,
        }
    }
}

impl<B, T, U> BookingCommandService<B, T, U>
where
    B: BookingRepository,
    T: TourRepository,
    U: UserRepository,
{
    async fn owned_booking(&self, tourist: &UserId, booking_id: Uuid) -> Result<Booking, Error> {
        let booking = self
            .bookings
            .find(booking_id)
            .await
            .map_err(map_booking_error)?
            .ok_or_else(|| Error::not_found(format!("booking {booking_id} not found")))?;
        if booking.tourist != *tourist {
            // Foreign bookings read as missing, not forbidden.
            return Err(Error::not_found(format!("booking {booking_id} not found")));
        }
        Ok(booking)
    }
}

#[async_trait]
impl<B, T, U> BookingCommand for BookingCommandService<B, T, U>
where
    B: BookingRepository,
    T: TourRepository,
    U: UserRepository,
{
    async fn book_tour(&self, request: BookTourRequest) -> Result<BookTourResponse, Error> {
        require_tourist(self.users.as_ref(), &request.tourist_id).await?;
        if request.participants < 1 {
            return Err(Error::invalid_request("participants must be at least one"));
        }
        let now = Utc::now();
        let tour = self
            .tours
            .find(request.tour_id)
            .await
            .map_err(map_tour_error)?
            .ok_or_else(|| Error::not_found(format!("tour {} not found", request.tour_id)))?;
        if !tour.is_bookable(now) {
            return Err(Error::invalid_request("tour is not open for booking"));
        }
        let total_price = tour
            .details
            .price
            .total_for(request.participants.unsigned_abs())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let free = total_price.is_free();
        // Free bookings arrive confirmed, so they hold a seat from this call.
        let booking = self
            .bookings
            .reserve(&NewBooking {
                id: Uuid::new_v4(),
                tourist: request.tourist_id,
                tour_id: request.tour_id,
                participants: request.participants,
                special_requirements: request.special_requirements,
                total_price,
                status: if free {
                    BookingStatus::Confirmed
                } else {
                    BookingStatus::Pending
                },
                payment_status: if free {
                    PaymentStatus::Paid
                } else {
                    PaymentStatus::Pending
                },
                booked_at: now,
            })
            .await
            .map_err(map_booking_error)?;
        Ok(BookTourResponse {
            booking: booking.into(),
        })
    }

    async fn pay_booking(&self, request: PayBookingRequest) -> Result<PayBookingResponse, Error> {
        require_tourist(self.users.as_ref(), &request.tourist_id).await?;
        validate_payment_number(request.payment_method, request.payment_number.as_deref())?;
        let booking = self
            .owned_booking(&request.tourist_id, request.booking_id)
            .await?;
        if !booking.awaits_payment() {
            return Err(Error::conflict("booking is not awaiting payment"));
        }
        let paid = self
            .bookings
            .record_payment(
                request.booking_id,
                request.payment_method,
                &new_transaction_id(),
                Utc::now(),
            )
            .await
            .map_err(map_booking_error)?;
        Ok(PayBookingResponse {
            booking: paid.into(),
        })
    }

    async fn cancel_booking(
        &self,
        request: CancelBookingRequest,
    ) -> Result<CancelBookingResponse, Error> {
        require_tourist(self.users.as_ref(), &request.tourist_id).await?;
        let booking = self
            .owned_booking(&request.tourist_id, request.booking_id)
            .await?;
        if !booking.can_cancel() {
            return Err(Error::conflict("booking can no longer be cancelled"));
        }
        let cancelled = self
            .bookings
            .cancel(request.booking_id, Utc::now())
            .await
            .map_err(map_booking_error)?
            .ok_or_else(|| Error::conflict("booking can no longer be cancelled"))?;
        Ok(CancelBookingResponse {
            booking: cancelled.into(),
        })
    }
}

/// Booking reads over the booking, tour, and account repositories.
#[derive(Clone)]
pub struct BookingQueryService<B, T, U> {
    bookings: Arc<B>,
    tours: Arc<T>,
    users: Arc<U>,
}

impl<B, T, U> BookingQueryService<B, T, U> {
    /// Create a new booking query service.
    pub fn new(bookings: Arc<B>, tours: Arc<T>, users: Arc<U>) -> Self {
        Self {
            bookings,
            tours,
            users,
        }
    }
}

impl<B, T, U> BookingQueryService<B, T, U>
where
    B: BookingRepository,
    T: TourRepository,
    U: UserRepository,
{
    /// Whether the viewer holds the booking, runs its tour, or is a
    /// developer.
    async fn may_view(&self, viewer: &UserId, summary: &BookingSummary) -> Result<bool, Error> {
        if summary.booking.tourist == *viewer {
            return Ok(true);
        }
        let Some(account) = self
            .users
            .find_by_id(viewer)
            .await
            .map_err(map_user_error)?
        else {
            return Ok(false);
        };
        match account.role() {
            Role::Developer => Ok(true),
            Role::Organizer => {
                let tour = self
                    .tours
                    .find(summary.booking.tour_id)
                    .await
                    .map_err(map_tour_error)?;
                Ok(tour.is_some_and(|tour| tour.organizer == *viewer))
            }
            Role::Tourist => Ok(false),
        }
    }
}

#[async_trait]
impl<B, T, U> BookingQuery for BookingQueryService<B, T, U>
where
    B: BookingRepository,
    T: TourRepository,
    U: UserRepository,
{
    async fn get_booking(&self, request: GetBookingRequest) -> Result<GetBookingResponse, Error> {
        let summary = self
            .bookings
            .find_summary(request.booking_id)
            .await
            .map_err(map_booking_error)?
            .ok_or_else(|| Error::not_found(format!("booking {} not found", request.booking_id)))?;
        if !self.may_view(&request.viewer, &summary).await? {
            // Hidden bookings answer exactly like missing ones.
            return Err(Error::not_found(format!(
                "booking {} not found",
                request.booking_id
            )));
        }
        Ok(GetBookingResponse {
            booking: summary.into(),
        })
    }

    async fn my_bookings(&self, request: MyBookingsRequest) -> Result<MyBookingsResponse, Error> {
        require_tourist(self.users.as_ref(), &request.tourist_id).await?;
        let page = PageRequest::new(request.page, request.per_page);
        let bookings = self
            .bookings
            .list_for_tourist(&request.tourist_id, page)
            .await
            .map_err(map_booking_error)?;
        Ok(MyBookingsResponse {
            bookings: bookings.map(BookingSummaryPayload::from),
        })
    }

    async fn tour_bookings(
        &self,
        request: TourBookingsRequest,
    ) -> Result<TourBookingsResponse, Error> {
        require_organizer(self.users.as_ref(), &request.organizer_id).await?;
        let tour = self
            .tours
            .find(request.tour_id)
            .await
            .map_err(map_tour_error)?
            .ok_or_else(|| Error::not_found(format!("tour {} not found", request.tour_id)))?;
        if tour.organizer != request.organizer_id {
            return Err(Error::forbidden("tour does not belong to this organizer"));
        }
        let page = PageRequest::new(request.page, request.per_page);
        let bookings = self
            .bookings
            .list_for_tour(request.tour_id, page)
            .await
            .map_err(map_booking_error)?;
        Ok(TourBookingsResponse {
            bookings: bookings.map(BookingSummaryPayload::from),
        })
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
