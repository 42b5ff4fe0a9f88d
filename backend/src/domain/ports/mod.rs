//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

pub mod fixtures;

mod account_command;
mod account_query;
mod admin_command;
mod booking_command;
mod booking_query;
mod booking_repository;
mod catalog_query;
mod dashboard_query;
mod dashboard_repository;
mod department_repository;
mod emergency_contact_repository;
mod engagement_command;
mod engagement_query;
mod engagement_repository;
mod login_service;
mod notification_command;
mod notification_query;
mod notification_repository;
mod password_hasher;
mod registration;
mod tour_command;
mod tour_repository;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{
    AccountCommand, AddContactRequest, ContactForm, ContactResponse, DeleteContactRequest,
    FixtureAccountCommand, ProfileFieldsPayload, SetPrimaryContactRequest, UpdateAccountRequest,
    UpdateContactRequest,
};
#[cfg(test)]
pub use account_query::MockAccountQuery;
pub use account_query::{
    AccountQuery, ContactPayload, FixtureAccountQuery, GetAccountRequest, GetAccountResponse,
    ListContactsRequest, ListContactsResponse, RoleProfilePayload,
};
#[cfg(test)]
pub use admin_command::MockAdminCommand;
pub use admin_command::{
    AdminCommand, AdminDeleteTourRequest, CreateDepartmentRequest, DeleteDepartmentRequest,
    DeleteUserRequest, DepartmentForm, DepartmentResponse, FixtureAdminCommand, PromoteUserRequest,
    PromoteUserResponse, UpdateDepartmentRequest,
};
#[cfg(test)]
pub use booking_command::MockBookingCommand;
pub use booking_command::{
    BookTourRequest, BookTourResponse, BookingCommand, BookingPayload, CancelBookingRequest,
    CancelBookingResponse, FixtureBookingCommand, PayBookingRequest, PayBookingResponse,
    validate_payment_number,
};
#[cfg(test)]
pub use booking_query::MockBookingQuery;
pub use booking_query::{
    BookingQuery, BookingSummaryPayload, FixtureBookingQuery, GetBookingRequest,
    GetBookingResponse, MyBookingsRequest, MyBookingsResponse, TourBookingsRequest,
    TourBookingsResponse,
};
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{
    BookingPersistenceError, BookingRepository, BookingSummary, NewBooking,
};
#[cfg(test)]
pub use catalog_query::MockCatalogQuery;
pub use catalog_query::{
    CatalogQuery, DepartmentPayload, DepartmentToursRequest, DepartmentToursResponse,
    FixtureCatalogQuery, GetTourRequest, GetTourResponse, ListDepartmentsResponse,
    ListToursRequest, ListToursResponse, MyToursRequest, MyToursResponse, ReviewPayload,
    TourCardPayload, TourDetailPayload, average_to_f64,
};
#[cfg(test)]
pub use dashboard_query::MockDashboardQuery;
pub use dashboard_query::{
    DashboardQuery, DeveloperDashboardRequest, DeveloperDashboardResponse, FixtureDashboardQuery,
    OrganizerDashboardRequest, OrganizerDashboardResponse, OrganizerStatsPayload,
    PlatformStatsPayload, TouristDashboardRequest, TouristDashboardResponse, TouristStatsPayload,
};
#[cfg(test)]
pub use dashboard_repository::MockDashboardRepository;
pub use dashboard_repository::{
    DashboardPersistenceError, DashboardRepository, OrganizerStats, PlatformStats, TouristStats,
};
#[cfg(test)]
pub use department_repository::MockDepartmentRepository;
pub use department_repository::{DepartmentPersistenceError, DepartmentRepository};
#[cfg(test)]
pub use emergency_contact_repository::MockEmergencyContactRepository;
pub use emergency_contact_repository::{ContactPersistenceError, EmergencyContactRepository};
#[cfg(test)]
pub use engagement_command::MockEngagementCommand;
pub use engagement_command::{
    EngagementCommand, FixtureEngagementCommand, OwnReviewPayload, SubmitReviewRequest,
    SubmitReviewResponse, ToggleWishlistRequest, ToggleWishlistResponse,
};
#[cfg(test)]
pub use engagement_query::MockEngagementQuery;
pub use engagement_query::{
    EngagementQuery, FixtureEngagementQuery, MyReviewsRequest, MyReviewsResponse,
    MyWishlistRequest, MyWishlistResponse, ReviewWithTourPayload,
};
#[cfg(test)]
pub use engagement_repository::MockEngagementRepository;
pub use engagement_repository::{
    EngagementPersistenceError, EngagementRepository, ReviewSummary, ReviewWithAuthor,
    ReviewWithTour,
};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FixtureLoginService, LoginService};
#[cfg(test)]
pub use notification_command::MockNotificationCommand;
pub use notification_command::{
    FixtureNotificationCommand, MarkAllReadRequest, MarkAllReadResponse, MarkReadRequest,
    NotificationCommand, QuickReminderRequest, SendNotificationRequest, SendNotificationResponse,
};
#[cfg(test)]
pub use notification_query::MockNotificationQuery;
pub use notification_query::{
    FixtureNotificationQuery, InboxEntryPayload, NotificationQuery, RecentNotificationsRequest,
    RecentNotificationsResponse, SentNotificationPayload, SentNotificationsRequest,
    SentNotificationsResponse, UnreadCountRequest, UnreadCountResponse,
};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{
    InboxEntry, NotificationPersistenceError, NotificationRepository, SentNotification,
};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use registration::MockRegistrationService;
pub use registration::{
    FixtureRegistrationService, RegisterRequest, RegisterResponse, RegistrationService,
};
#[cfg(test)]
pub use tour_command::MockTourCommand;
pub use tour_command::{
    ChangeTourStatusRequest, ChangeTourStatusResponse, CreateTourRequest, CreateTourResponse,
    DeleteTourRequest, FixtureTourCommand, RegenerateQrRequest, RegenerateQrResponse, TourCommand,
    TourForm, UpdateTourRequest,
};
#[cfg(test)]
pub use tour_repository::MockTourRepository;
pub use tour_repository::{TourFilters, TourPersistenceError, TourRepository, TourSearch, TourSummary};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredCredentials, UserPersistenceError, UserRepository};

#[cfg(test)]
mod tests;
