//! Builders selecting fixture or database-backed ports for the HTTP state.

use std::sync::Arc;

use actix_web::web;
use url::Url;

use backend::domain::{
    AccountCommandService, AccountQueryService, AccountRegistrationService, AdminCommandService,
    BookingCommandService, BookingQueryService, CatalogQueryService, CredentialLoginService,
    DashboardQueryService, EngagementCommandService, EngagementQueryService,
    NotificationCommandService, NotificationQueryService, TourCommandService,
};
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{
    DbPool, DieselBookingRepository, DieselDashboardRepository, DieselDepartmentRepository,
    DieselEmergencyContactRepository, DieselEngagementRepository, DieselNotificationRepository,
    DieselTourRepository, DieselUserRepository,
};
use backend::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Wire every driving port against the SQL-backed repositories.
fn diesel_http_state(pool: &DbPool, public_base_url: Url) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let contacts = Arc::new(DieselEmergencyContactRepository::new(pool.clone()));
    let tours = Arc::new(DieselTourRepository::new(pool.clone()));
    let departments = Arc::new(DieselDepartmentRepository::new(pool.clone()));
    let bookings = Arc::new(DieselBookingRepository::new(pool.clone()));
    let engagement = Arc::new(DieselEngagementRepository::new(pool.clone()));
    let notifications = Arc::new(DieselNotificationRepository::new(pool.clone()));
    let dashboards = Arc::new(DieselDashboardRepository::new(pool.clone()));
    let hasher = Arc::new(Argon2PasswordHasher::new());

    HttpState {
        login: Arc::new(CredentialLoginService::new(users.clone(), hasher.clone())),
        registration: Arc::new(AccountRegistrationService::new(users.clone(), hasher)),
        account_query: Arc::new(AccountQueryService::new(users.clone(), contacts.clone())),
        account_command: Arc::new(AccountCommandService::new(users.clone(), contacts)),
        catalog: Arc::new(CatalogQueryService::new(
            tours.clone(),
            departments.clone(),
            engagement.clone(),
            users.clone(),
        )),
        tours: Arc::new(TourCommandService::new(
            tours.clone(),
            departments.clone(),
            users.clone(),
            public_base_url,
        )),
        booking_command: Arc::new(BookingCommandService::new(
            bookings.clone(),
            tours.clone(),
            users.clone(),
        )),
        booking_query: Arc::new(BookingQueryService::new(
            bookings.clone(),
            tours.clone(),
            users.clone(),
        )),
        engagement_command: Arc::new(EngagementCommandService::new(
            engagement.clone(),
            bookings,
            tours.clone(),
            users.clone(),
        )),
        engagement_query: Arc::new(EngagementQueryService::new(engagement, users.clone())),
        notification_command: Arc::new(NotificationCommandService::new(
            notifications.clone(),
            tours.clone(),
            users.clone(),
        )),
        notification_query: Arc::new(NotificationQueryService::new(notifications, users.clone())),
        dashboards: Arc::new(DashboardQueryService::new(dashboards, users.clone())),
        admin: Arc::new(AdminCommandService::new(users, tours, departments)),
    }
}

/// Build the shared HTTP state from the configured pool, or fall back to the
/// fixture ports for a database-less process.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => diesel_http_state(pool, config.public_base_url.clone()),
        None => {
            tracing::warn!("no database pool configured; serving fixture data");
            HttpState::fixture()
        }
    };
    web::Data::new(state)
}
