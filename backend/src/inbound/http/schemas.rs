//! OpenAPI schema definitions for domain types.
//!
//! Domain and port types remain framework-agnostic by not deriving
//! `ToSchema`. This module provides the schema definitions required for
//! OpenAPI documentation using utoipa's external schema registration.
//!
//! The schema wrappers mirror the structure of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns
//! belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with the current resource state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A dependency the operation needs is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Something went wrong")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "4f2c9f17-9d8b-4a57-8f5e-1f2f4f0f8b6e")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    /// Stable user identifier.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    /// Login name chosen at registration.
    #[schema(value_type = String, example = "mira")]
    username: String,
    /// Contact email address.
    #[schema(value_type = String, example = "mira@campus.edu")]
    email: String,
    /// Account role: `tourist`, `organizer`, or `developer`.
    #[schema(value_type = String, example = "tourist")]
    role: String,
    /// Optional contact phone number.
    #[schema(value_type = Option<String>, example = "+8801712345678")]
    phone: Option<String>,
    /// When the account was created.
    #[schema(value_type = String, format = DateTime)]
    joined_at: String,
}

/// OpenAPI schema for [`crate::domain::ports::RegisterRequest`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::RegisterRequest)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RegisterRequestSchema {
    /// Login name, 3 to 32 word characters.
    #[schema(example = "nabila")]
    username: String,
    /// Contact email address.
    #[schema(example = "nabila@campus.edu")]
    email: String,
    /// Requested role: `tourist` or `organizer`.
    #[schema(example = "tourist")]
    role: String,
    /// Optional contact phone number.
    phone: Option<String>,
    /// Password, at least 8 characters.
    password: String,
    /// Must match `password`.
    password_confirmation: String,
}

/// OpenAPI schema for [`crate::domain::ports::TourCardPayload`].
///
/// Catalogue card returned by the listing endpoints.
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::TourCardPayload)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct TourCardSchema {
    /// Tour identifier.
    #[schema(value_type = String, format = Uuid)]
    id: String,
    /// Tour title.
    #[schema(example = "Old Campus Heritage Walk")]
    title: String,
    /// Tour category: `historical`, `cultural`, `academic`, `nature`, or `general`.
    #[schema(example = "historical")]
    category: String,
    /// Hosting department name, when linked.
    department_name: Option<String>,
    /// Meeting location.
    location: String,
    /// Scheduled start time.
    #[schema(value_type = String, format = DateTime)]
    tour_date: String,
    /// Length of the tour in hours.
    duration_hours: i32,
    /// Seat capacity.
    max_participants: i32,
    /// Capacity minus confirmed participants, floored at zero.
    available_spots: i64,
    /// Price per participant as a decimal string; `"0"` means free.
    #[schema(example = "500.00")]
    price: String,
    /// Optional cover image.
    image_url: Option<String>,
    /// Lifecycle status: `draft`, `published`, `cancelled`, or `completed`.
    #[schema(example = "published")]
    status: String,
}

/// OpenAPI schema for [`crate::domain::ports::BookingPayload`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::BookingPayload)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct BookingSchema {
    /// Booking identifier.
    #[schema(value_type = String, format = Uuid)]
    id: String,
    /// Booked tour.
    #[schema(value_type = String, format = Uuid)]
    tour_id: String,
    /// Seats reserved.
    participants: i32,
    /// Free-text accessibility or dietary notes.
    special_requirements: Option<String>,
    /// Price times participants as a decimal string.
    #[schema(example = "1000.00")]
    total_price: String,
    /// Booking status: `pending`, `confirmed`, `cancelled`, or `completed`.
    status: String,
    /// Payment status: `pending`, `paid`, or `refunded`.
    payment_status: String,
    /// Payment method recorded at payment time, when any.
    payment_method: Option<String>,
    /// Generated receipt reference, when paid.
    #[schema(example = "TXN1A2B3C4D")]
    transaction_id: Option<String>,
    /// When the booking was made.
    #[schema(value_type = String, format = DateTime)]
    booked_at: String,
}

/// OpenAPI schema for [`crate::domain::ports::DepartmentPayload`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::DepartmentPayload)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DepartmentSchema {
    /// Department identifier.
    #[schema(value_type = String, format = Uuid)]
    id: String,
    /// Unique display name.
    #[schema(example = "Computer Science and Engineering")]
    name: String,
    /// Short upper-case code.
    #[schema(example = "CSE")]
    code: String,
    /// Free-text blurb for the directory page.
    description: String,
}

/// OpenAPI schema for [`crate::domain::ports::ContactPayload`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::ContactPayload)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ContactSchema {
    /// Contact identifier.
    #[schema(value_type = String, format = Uuid)]
    id: String,
    /// Contact's full name.
    full_name: String,
    /// Relationship to the account holder, such as `parent` or `sibling`.
    relationship: String,
    /// Contact phone number.
    phone: String,
    /// Optional contact email.
    email: Option<String>,
    /// Optional postal address.
    address: Option<String>,
    /// Whether this is the contact dialled first.
    is_primary: bool,
    /// When the contact was added.
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}
