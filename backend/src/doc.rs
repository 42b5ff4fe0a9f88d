//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct that generates the OpenAPI specification for
//! the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint exposed by the inbound layer
//! - **Schemas**: domain type wrappers from
//!   [`schemas`](crate::inbound::http::schemas) plus the handler-local request
//!   forms, keeping domain types decoupled from the utoipa framework
//! - **Security**: the session cookie authentication scheme
//!
//! The generated specification feeds Swagger UI (debug builds) and is
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{
    BookingSchema, ContactSchema, DepartmentSchema, ErrorCodeSchema, ErrorSchema,
    RegisterRequestSchema, TourCardSchema, UserSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Triptrack backend API",
        description = "HTTP interface for campus tour discovery, booking, and administration.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::register,
        crate::inbound::http::accounts::get_account,
        crate::inbound::http::accounts::update_account,
        crate::inbound::http::accounts::list_contacts,
        crate::inbound::http::accounts::add_contact,
        crate::inbound::http::accounts::update_contact,
        crate::inbound::http::accounts::delete_contact,
        crate::inbound::http::accounts::set_primary_contact,
        crate::inbound::http::catalogue::list_tours,
        crate::inbound::http::catalogue::get_tour,
        crate::inbound::http::catalogue::list_departments,
        crate::inbound::http::catalogue::department_tours,
        crate::inbound::http::catalogue::my_tours,
        crate::inbound::http::tours::create_tour,
        crate::inbound::http::tours::update_tour,
        crate::inbound::http::tours::change_tour_status,
        crate::inbound::http::tours::regenerate_qr,
        crate::inbound::http::tours::delete_tour,
        crate::inbound::http::tours::tour_bookings,
        crate::inbound::http::bookings::book_tour,
        crate::inbound::http::bookings::my_bookings,
        crate::inbound::http::bookings::get_booking,
        crate::inbound::http::bookings::pay_booking,
        crate::inbound::http::bookings::cancel_booking,
        crate::inbound::http::engagement::toggle_wishlist,
        crate::inbound::http::engagement::my_wishlist,
        crate::inbound::http::engagement::submit_review,
        crate::inbound::http::engagement::my_reviews,
        crate::inbound::http::notifications::send_notification,
        crate::inbound::http::notifications::quick_reminder,
        crate::inbound::http::notifications::sent_notifications,
        crate::inbound::http::notifications::recent_notifications,
        crate::inbound::http::notifications::unread_count,
        crate::inbound::http::notifications::mark_read,
        crate::inbound::http::notifications::mark_all_read,
        crate::inbound::http::dashboards::tourist_dashboard,
        crate::inbound::http::dashboards::organizer_dashboard,
        crate::inbound::http::dashboards::developer_dashboard,
        crate::inbound::http::admin::delete_user,
        crate::inbound::http::admin::promote_user,
        crate::inbound::http::admin::create_department,
        crate::inbound::http::admin::update_department,
        crate::inbound::http::admin::delete_department,
        crate::inbound::http::admin::admin_delete_tour,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        ErrorSchema,
        ErrorCodeSchema,
        RegisterRequestSchema,
        TourCardSchema,
        BookingSchema,
        DepartmentSchema,
        ContactSchema,
        crate::inbound::http::auth::LoginRequest,
        crate::inbound::http::accounts::UpdateAccountForm,
        crate::inbound::http::tours::StatusForm,
        crate::inbound::http::bookings::BookingForm,
        crate::inbound::http::bookings::PaymentForm,
        crate::inbound::http::engagement::ReviewForm,
        crate::inbound::http::notifications::NotificationForm,
        crate::inbound::http::notifications::QuickReminderForm,
        crate::inbound::http::admin::RoleForm,
    )),
    tags(
        (name = "auth", description = "Registration, login, and logout"),
        (name = "account", description = "Profile and emergency contacts"),
        (name = "catalogue", description = "Tour and department discovery"),
        (name = "tours", description = "Organizer tour management"),
        (name = "bookings", description = "Booking, payment, and cancellation"),
        (name = "engagement", description = "Wishlist and reviews"),
        (name = "notifications", description = "Sending and reading notifications"),
        (name = "dashboards", description = "Role-specific dashboards"),
        (name = "admin", description = "Developer-only administration"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
