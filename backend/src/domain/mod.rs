//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, plus the services implementing the driving ports
//! over them. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Layout:
//! - Entity modules (`user`, `tour`, `booking`, `engagement`,
//!   `notification`, ...) hold validated domain types.
//! - [`ports`] holds the driving and driven port traits with their
//!   request/response payloads and fixture implementations.
//! - The `*_service` modules implement the driving ports; only the service
//!   structs are re-exported, handlers talk to the traits.

mod access;
mod account_service;
mod admin_service;
pub mod auth;
mod auth_service;
pub mod booking;
mod booking_service;
mod catalog_service;
mod dashboard_service;
pub mod department;
pub mod emergency_contact;
pub mod engagement;
mod engagement_service;
pub mod error;
pub mod money;
pub mod notification;
mod notification_service;
pub mod ports;
pub mod profile;
mod service_support;
pub mod tour;
mod tour_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::{AccountCommandService, AccountQueryService};
pub use self::admin_service::AdminCommandService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, RegistrationRequest, RegistrationValidationError,
};
pub use self::auth_service::{AccountRegistrationService, CredentialLoginService};
pub use self::booking::{
    Booking, BookingStatus, BookingValidationError, new_transaction_id, PaymentMethod,
    PaymentStatus,
};
pub use self::booking_service::{BookingCommandService, BookingQueryService};
pub use self::catalog_service::CatalogQueryService;
pub use self::dashboard_service::DashboardQueryService;
pub use self::department::{DEFAULT_DEPARTMENTS, Department, DepartmentDetails, DepartmentValidationError};
pub use self::emergency_contact::{
    ContactDetails, ContactValidationError, EmergencyContact, Relationship,
};
pub use self::engagement::{EngagementValidationError, Rating, Review, WishlistEntry};
pub use self::engagement_service::{EngagementCommandService, EngagementQueryService};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::money::{Price, PriceBand, PriceValidationError};
pub use self::notification::{
    Audience, Notification, NotificationContent, NotificationKind, NotificationValidationError,
    time_ago, time_ago_from, UserNotification,
};
pub use self::notification_service::{NotificationCommandService, NotificationQueryService};
pub use self::profile::{DEFAULT_ORGANIZER_DEPARTMENT, OrganizerProfile, RoleProfile, TouristProfile};
pub use self::tour::{qr_code_url, Tour, TourCategory, TourDetails, TourStatus, TourValidationError};
pub use self::tour_service::TourCommandService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EmailAddress, PhoneNumber, Role, User, UserId, Username, UserValidationError};
