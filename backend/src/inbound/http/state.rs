//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AccountQuery, AdminCommand, BookingCommand, BookingQuery, CatalogQuery,
    DashboardQuery, EngagementCommand, EngagementQuery, FixtureAccountCommand,
    FixtureAccountQuery, FixtureAdminCommand, FixtureBookingCommand, FixtureBookingQuery,
    FixtureCatalogQuery, FixtureDashboardQuery, FixtureEngagementCommand, FixtureEngagementQuery,
    FixtureLoginService, FixtureNotificationCommand, FixtureNotificationQuery,
    FixtureRegistrationService, FixtureTourCommand, LoginService, NotificationCommand,
    NotificationQuery, RegistrationService, TourCommand,
};

/// Dependency bundle for HTTP handlers.
///
/// One field per driving port; handlers never see concrete adapters. The
/// [`Default`] implementation wires the fixture ports so a database-less
/// process and handler tests share the same construction path.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub account_query: Arc<dyn AccountQuery>,
    pub account_command: Arc<dyn AccountCommand>,
    pub catalog: Arc<dyn CatalogQuery>,
    pub tours: Arc<dyn TourCommand>,
    pub booking_command: Arc<dyn BookingCommand>,
    pub booking_query: Arc<dyn BookingQuery>,
    pub engagement_command: Arc<dyn EngagementCommand>,
    pub engagement_query: Arc<dyn EngagementQuery>,
    pub notification_command: Arc<dyn NotificationCommand>,
    pub notification_query: Arc<dyn NotificationQuery>,
    pub dashboards: Arc<dyn DashboardQuery>,
    pub admin: Arc<dyn AdminCommand>,
}

impl Default for HttpState {
    fn default() -> Self {
        Self {
            login: Arc::new(FixtureLoginService),
            registration: Arc::new(FixtureRegistrationService),
            account_query: Arc::new(FixtureAccountQuery),
            account_command: Arc::new(FixtureAccountCommand),
            catalog: Arc::new(FixtureCatalogQuery),
            tours: Arc::new(FixtureTourCommand),
            booking_command: Arc::new(FixtureBookingCommand),
            booking_query: Arc::new(FixtureBookingQuery),
            engagement_command: Arc::new(FixtureEngagementCommand),
            engagement_query: Arc::new(FixtureEngagementQuery),
            notification_command: Arc::new(FixtureNotificationCommand),
            notification_query: Arc::new(FixtureNotificationQuery),
            dashboards: Arc::new(FixtureDashboardQuery),
            admin: Arc::new(FixtureAdminCommand),
        }
    }
}

impl HttpState {
    /// Fixture-backed state for tests and database-less runs.
    ///
    /// # Examples
    /// ```
    /// use backend::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::fixture();
    /// let _login = state.login.clone();
    /// ```
    #[must_use]
    pub fn fixture() -> Self {
        Self::default()
    }
}
