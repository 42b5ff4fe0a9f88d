//! Bookings a tourist holds on a tour.
//!
//! The total price is frozen at booking time so later price edits never
//! change what a tourist owes. Free tours confirm immediately; priced tours
//! wait in `pending` until a payment is recorded.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::Price;
use super::user::UserId;

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Held but unpaid.
    Pending,
    /// Counted against tour capacity.
    Confirmed,
    /// Withdrawn by the tourist.
    Cancelled,
    /// The tour ran with this booking.
    Completed,
}

impl BookingStatus {
    /// Stable string form used in storage and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = BookingValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(BookingValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// Payment state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// No payment recorded yet.
    Pending,
    /// Payment recorded in full.
    Paid,
    /// Payment returned after cancellation.
    Refunded,
}

impl PaymentStatus {
    /// Stable string form used in storage and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = BookingValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "refunded" => Ok(Self::Refunded),
            other => Err(BookingValidationError::UnknownPaymentStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// Payment channels accepted at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Bkash,
    Nagad,
    Rocket,
    Card,
    Cash,
}

impl PaymentMethod {
    /// Stable string form used in storage and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bkash => "bkash",
            Self::Nagad => "nagad",
            Self::Rocket => "rocket",
            Self::Card => "card",
            Self::Cash => "cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = BookingValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bkash" => Ok(Self::Bkash),
            "nagad" => Ok(Self::Nagad),
            "rocket" => Ok(Self::Rocket),
            "card" => Ok(Self::Card),
            "cash" => Ok(Self::Cash),
            other => Err(BookingValidationError::UnknownPaymentMethod {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validation errors for booking fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingValidationError {
    /// A booking must cover at least one participant.
    NonPositiveParticipants,
    /// Status value was not one of the known states.
    UnknownStatus { value: String },
    /// Payment status value was not one of the known states.
    UnknownPaymentStatus { value: String },
    /// Payment method value was not one of the accepted channels.
    UnknownPaymentMethod { value: String },
}

impl fmt::Display for BookingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveParticipants => {
                write!(f, "participants must be at least one")
            }
            Self::UnknownStatus { value } => write!(f, "unknown booking status: {value}"),
            Self::UnknownPaymentStatus { value } => {
                write!(f, "unknown payment status: {value}")
            }
            Self::UnknownPaymentMethod { value } => {
                write!(f, "unknown payment method: {value}")
            }
        }
    }
}

impl std::error::Error for BookingValidationError {}

/// Stored booking.
///
/// ## Invariants
/// - `participants` is at least one.
/// - `total_price` equals the tour price at booking time multiplied by
///   `participants` and never changes afterwards.
/// - `transaction_id` is set exactly when `payment_status` is `paid` or
///   `refunded`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    /// Unique identifier.
    pub id: Uuid,
    /// Tourist who holds the booking.
    pub tourist: UserId,
    /// Tour being booked.
    pub tour_id: Uuid,
    /// Seats reserved.
    pub participants: i32,
    /// Accessibility or dietary notes for the organizer.
    pub special_requirements: Option<String>,
    /// Amount owed, frozen at booking time.
    pub total_price: Price,
    /// Lifecycle state.
    pub status: BookingStatus,
    /// Payment state.
    pub payment_status: PaymentStatus,
    /// Channel the payment came through.
    pub payment_method: Option<PaymentMethod>,
    /// Receipt reference shown to the tourist.
    pub transaction_id: Option<String>,
    /// When the booking was made.
    pub booked_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Whether the tourist can still cancel.
    #[must_use]
    pub fn can_cancel(&self) -> bool {
        matches!(self.status, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// Whether a payment can still be recorded.
    #[must_use]
    pub fn awaits_payment(&self) -> bool {
        self.status == BookingStatus::Pending && self.payment_status == PaymentStatus::Pending
    }
}

/// Generate a receipt reference such as `TXN1A2B3C4D`.
#[must_use]
pub fn new_transaction_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    let short: String = hex.chars().take(8).collect();
    format!("TXN{}", short.to_uppercase())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("pending", BookingStatus::Pending)]
    #[case("confirmed", BookingStatus::Confirmed)]
    #[case("cancelled", BookingStatus::Cancelled)]
    #[case("completed", BookingStatus::Completed)]
    fn booking_status_round_trips(#[case] text: &str, #[case] status: BookingStatus) {
        assert_eq!(text.parse::<BookingStatus>().expect("known status"), status);
        assert_eq!(status.as_str(), text);
    }

    #[rstest]
    #[case("bkash", PaymentMethod::Bkash)]
    #[case("nagad", PaymentMethod::Nagad)]
    #[case("rocket", PaymentMethod::Rocket)]
    #[case("card", PaymentMethod::Card)]
    #[case("cash", PaymentMethod::Cash)]
    fn payment_methods_round_trip(#[case] text: &str, #[case] method: PaymentMethod) {
        assert_eq!(text.parse::<PaymentMethod>().expect("known method"), method);
        assert_eq!(method.as_str(), text);
    }

    #[rstest]
    fn payment_method_rejects_unknown_channels() {
        let err = "paypal".parse::<PaymentMethod>().unwrap_err();
        assert_eq!(
            err,
            BookingValidationError::UnknownPaymentMethod {
                value: "paypal".to_owned()
            }
        );
    }

    #[rstest]
    fn transaction_ids_carry_prefix_and_eight_hex_chars() {
        let id = new_transaction_id();
        let suffix = id.strip_prefix("TXN").expect("TXN prefix");
        assert_eq!(suffix.len(), 8);
        assert!(
            suffix
                .chars()
                .all(|ch| ch.is_ascii_digit() || ch.is_ascii_uppercase()),
            "suffix {suffix} should be uppercase hex"
        );
    }

    #[rstest]
    fn transaction_ids_are_unique_per_call() {
        assert_ne!(new_transaction_id(), new_transaction_id());
    }

    fn booking_with(status: BookingStatus, payment_status: PaymentStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            tourist: UserId::random(),
            tour_id: Uuid::new_v4(),
            participants: 2,
            special_requirements: None,
            total_price: Price::parse("500").expect("valid price"),
            status,
            payment_status,
            payment_method: None,
            transaction_id: None,
            booked_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[rstest]
    #[case(BookingStatus::Pending, true)]
    #[case(BookingStatus::Confirmed, true)]
    #[case(BookingStatus::Cancelled, false)]
    #[case(BookingStatus::Completed, false)]
    fn cancellation_only_from_live_states(#[case] status: BookingStatus, #[case] expected: bool) {
        assert_eq!(booking_with(status, PaymentStatus::Pending).can_cancel(), expected);
    }

    #[rstest]
    fn payment_awaits_only_unpaid_pending_bookings() {
        assert!(booking_with(BookingStatus::Pending, PaymentStatus::Pending).awaits_payment());
        assert!(!booking_with(BookingStatus::Confirmed, PaymentStatus::Paid).awaits_payment());
        assert!(!booking_with(BookingStatus::Cancelled, PaymentStatus::Pending).awaits_payment());
    }
}
