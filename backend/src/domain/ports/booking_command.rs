//! Driving port for booking a tour, paying for it, and cancelling it.
//!
//! Capacity is enforced by the adapter behind [`super::booking_repository`]
//! under a row lock; this port just shapes requests and surfaces the
//! resulting booking. Free tours skip the payment step entirely and come
//! back confirmed and paid in one call.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Booking, BookingStatus, Error, PaymentMethod, PaymentStatus, Price, UserId,
    new_transaction_id,
};

use super::fixtures;

/// Serializable booking for driving ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub participants: i32,
    pub special_requirements: Option<String>,
    pub total_price: Price,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub transaction_id: Option<String>,
    pub booked_at: DateTime<Utc>,
}

impl From<Booking> for BookingPayload {
    fn from(value: Booking) -> Self {
        Self {
            id: value.id,
            tour_id: value.tour_id,
            participants: value.participants,
            special_requirements: value.special_requirements,
            total_price: value.total_price,
            status: value.status,
            payment_status: value.payment_status,
            payment_method: value.payment_method,
            transaction_id: value.transaction_id,
            booked_at: value.booked_at,
        }
    }
}

/// Request to reserve seats on a tour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookTourRequest {
    pub tourist_id: UserId,
    pub tour_id: Uuid,
    pub participants: i32,
    #[serde(default)]
    pub special_requirements: Option<String>,
}

/// Response carrying the fresh booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookTourResponse {
    pub booking: BookingPayload,
}

/// Request to record a payment against a pending booking.
///
/// `payment_number` is the mobile wallet or card number the tourist typed.
/// It is validated for shape and then discarded; only the method and the
/// generated receipt reference are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayBookingRequest {
    pub tourist_id: UserId,
    pub booking_id: Uuid,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_number: Option<String>,
}

/// Response after recording a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayBookingResponse {
    pub booking: BookingPayload,
}

/// Request to cancel a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequest {
    pub tourist_id: UserId,
    pub booking_id: Uuid,
}

/// Response after cancelling.
///
/// A paid booking reports `refunded`; the refund itself happens outside
/// the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingResponse {
    pub booking: BookingPayload,
}

/// Driving port for booking write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingCommand: Send + Sync {
    /// Reserve seats on a published upcoming tour.
    ///
    /// Fails with a conflict when fewer seats remain than requested, and
    /// with invalid-request when the tour is not open for booking at all.
    async fn book_tour(&self, request: BookTourRequest) -> Result<BookTourResponse, Error>;

    /// Record a payment against the caller's pending booking.
    async fn pay_booking(&self, request: PayBookingRequest) -> Result<PayBookingResponse, Error>;

    /// Cancel the caller's booking, releasing its seats.
    async fn cancel_booking(
        &self,
        request: CancelBookingRequest,
    ) -> Result<CancelBookingResponse, Error>;
}

/// Fixture command over the canned tours.
///
/// Stateless: it validates against the fixture catalogue and fabricates
/// booking rows without remembering them between calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookingCommand;

#[async_trait]
impl BookingCommand for FixtureBookingCommand {
    async fn book_tour(&self, request: BookTourRequest) -> Result<BookTourResponse, Error> {
        if request.participants < 1 {
            return Err(Error::invalid_request("participants must be at least one"));
        }
        let now = Utc::now();
        let tour = fixtures::tour_by_id(request.tour_id, now)?
            .ok_or_else(|| Error::not_found(format!("tour {} not found", request.tour_id)))?;
        if !tour.is_bookable(now) {
            return Err(Error::invalid_request("tour is not open for booking"));
        }
        let available =
            i64::from(tour.details.max_participants) - fixtures::confirmed_seats(tour.id);
        if i64::from(request.participants) > available {
            return Err(Error::conflict(format!(
                "only {available} spots remain on this tour"
            )));
        }
        let total_price = tour
            .details
            .price
            .total_for(request.participants.unsigned_abs())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let free = total_price.is_free();
        let booking = Booking {
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
            payment_method: None,
            transaction_id: None,
            booked_at: now,
            updated_at: now,
        };
        Ok(BookTourResponse {
            booking: booking.into(),
        })
    }

    async fn pay_booking(&self, request: PayBookingRequest) -> Result<PayBookingResponse, Error> {
        validate_payment_number(request.payment_method, request.payment_number.as_deref())?;
        let now = Utc::now();
        let heritage = fixtures::tour_by_id(fixtures::HERITAGE_TOUR_ID, now)?
            .ok_or_else(|| Error::internal("fixture heritage tour missing"))?;
        let booking = Booking {
            id: request.booking_id,
            tourist: request.tourist_id,
            tour_id: heritage.id,
            participants: 1,
            special_requirements: None,
            total_price: heritage.details.price.clone(),
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Paid,
            payment_method: Some(request.payment_method),
            transaction_id: Some(new_transaction_id()),
            booked_at: now,
            updated_at: now,
        };
        Ok(PayBookingResponse {
            booking: booking.into(),
        })
    }

    async fn cancel_booking(
        &self,
        request: CancelBookingRequest,
    ) -> Result<CancelBookingResponse, Error> {
        let now = Utc::now();
        let booking = Booking {
            id: request.booking_id,
            tourist: request.tourist_id,
            tour_id: fixtures::FREE_TOUR_ID,
            participants: 1,
            special_requirements: None,
            total_price: Price::free(),
            status: BookingStatus::Cancelled,
            payment_status: PaymentStatus::Refunded,
            payment_method: None,
            transaction_id: None,
            booked_at: now,
            updated_at: now,
        };
        Ok(CancelBookingResponse {
            booking: booking.into(),
        })
    }
}

/// Check the wallet or card number matches the chosen method's shape.
///
/// Mobile wallets want a Bangladeshi mobile number; cards want 12 to 19
/// digits. Cash needs nothing.
pub fn validate_payment_number(
    method: PaymentMethod,
    payment_number: Option<&str>,
) -> Result<(), Error> {
    let digits_of = |value: &str| -> String {
        value
            .chars()
            .filter(|ch| ch.is_ascii_digit())
            .collect::<String>()
    };
    match method {
        PaymentMethod::Cash => Ok(()),
        PaymentMethod::Card => {
            let number = payment_number
                .ok_or_else(|| Error::invalid_request("card payments need a card number"))?;
            let digits = digits_of(number);
            if (12..=19).contains(&digits.len()) {
                Ok(())
            } else {
                Err(Error::invalid_request("card number looks wrong"))
            }
        }
        PaymentMethod::Bkash | PaymentMethod::Nagad | PaymentMethod::Rocket => {
            let number = payment_number
                .ok_or_else(|| Error::invalid_request("wallet payments need a wallet number"))?;
            let digits = digits_of(number);
            if digits.len() == 11 && digits.starts_with("01") {
                Ok(())
            } else {
                Err(Error::invalid_request(
                    "wallet number must be an 11-digit mobile number",
                ))
            }
        }
    }
}
