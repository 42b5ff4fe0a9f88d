//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::ServerConfig;

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;
use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http::accounts::{
    add_contact, delete_contact, get_account, list_contacts, set_primary_contact, update_account,
    update_contact,
};
use backend::inbound::http::admin::{
    admin_delete_tour, create_department, delete_department, delete_user, promote_user,
    update_department,
};
use backend::inbound::http::auth::{login, logout, register};
use backend::inbound::http::bookings::{
    book_tour, cancel_booking, get_booking, my_bookings, pay_booking,
};
use backend::inbound::http::catalogue::{
    department_tours, get_tour, list_departments, list_tours, my_tours,
};
use backend::inbound::http::dashboards::{
    developer_dashboard, organizer_dashboard, tourist_dashboard,
};
use backend::inbound::http::engagement::{my_reviews, my_wishlist, submit_review, toggle_wishlist};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::notifications::{
    mark_all_read, mark_read, quick_reminder, recent_notifications, send_notification,
    sent_notifications, unread_count,
};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::tours::{
    change_tour_status, create_tour, delete_tour, regenerate_qr, tour_bookings, update_tour,
};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Everything a single worker needs to assemble the application.
#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(login)
        .service(logout)
        .service(register)
        .service(get_account)
        .service(update_account)
        .service(list_contacts)
        .service(add_contact)
        .service(update_contact)
        .service(delete_contact)
        .service(set_primary_contact)
        .service(list_tours)
        .service(get_tour)
        .service(list_departments)
        .service(department_tours)
        .service(my_tours)
        .service(create_tour)
        .service(update_tour)
        .service(change_tour_status)
        .service(regenerate_qr)
        .service(delete_tour)
        .service(tour_bookings)
        .service(book_tour)
        .service(my_bookings)
        .service(get_booking)
        .service(pay_booking)
        .service(cancel_booking)
        .service(toggle_wishlist)
        .service(my_wishlist)
        .service(submit_review)
        .service(my_reviews)
        .service(send_notification)
        .service(quick_reminder)
        .service(sent_notifications)
        .service(recent_notifications)
        .service(unread_count)
        .service(mark_read)
        .service(mark_all_read)
        .service(tourist_dashboard)
        .service(organizer_dashboard)
        .service(developer_dashboard)
        .service(delete_user)
        .service(promote_user)
        .service(create_department)
        .service(update_department)
        .service(delete_department)
        .service(admin_delete_tour);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] containing session, binding, and optional pool settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        public_base_url: _,
        db_pool: _,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
