//! End-to-end journeys over the fixture-backed HTTP stack.
//!
//! Every test drives the real handlers, session middleware, and tracing
//! middleware together, the same wiring a database-less server runs with.

use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use serde_json::Value;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use backend::Trace;
use backend::domain::ports::fixtures;
use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{
    accounts, admin, auth, bookings, catalogue, dashboards, engagement, notifications, tours,
};

fn full_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let health_state = web::Data::new(HealthState::new());
    health_state.mark_ready();

    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::register)
        .service(accounts::get_account)
        .service(accounts::list_contacts)
        .service(catalogue::list_tours)
        .service(catalogue::get_tour)
        .service(catalogue::list_departments)
        .service(catalogue::my_tours)
        .service(tours::tour_bookings)
        .service(bookings::book_tour)
        .service(bookings::my_bookings)
        .service(bookings::pay_booking)
        .service(bookings::cancel_booking)
        .service(engagement::toggle_wishlist)
        .service(engagement::my_wishlist)
        .service(engagement::submit_review)
        .service(notifications::unread_count)
        .service(dashboards::tourist_dashboard)
        .service(dashboards::organizer_dashboard)
        .service(dashboards::developer_dashboard)
        .service(admin::promote_user);

    App::new()
        .app_data(health_state)
        .app_data(web::Data::new(HttpState::fixture()))
        .wrap(Trace)
        .service(api)
        .service(backend::inbound::http::health::ready)
        .service(backend::inbound::http::health::live)
}

async fn login_as(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    username: &str,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({
            "username": username,
            "password": "password",
        }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(
        response.status().is_success(),
        "fixture login for {username} failed with {}",
        response.status()
    );
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

#[actix_web::test]
async fn health_probes_answer_without_a_session() {
    let app = actix_test::init_service(full_app()).await;

    for path in ["/health/ready", "/health/live"] {
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(path).to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }
}

#[actix_web::test]
async fn responses_carry_a_trace_id_header() {
    let app = actix_test::init_service(full_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/tours")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers().contains_key("trace-id"),
        "trace-id header missing"
    );
}

#[actix_web::test]
async fn anonymous_requests_to_private_routes_are_rejected() {
    let app = actix_test::init_service(full_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/account")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.pointer("/code").and_then(Value::as_str),
        Some("unauthorized")
    );
}

#[actix_web::test]
async fn tourist_browses_books_and_pays() {
    let app = actix_test::init_service(full_app()).await;
    let cookie = login_as(&app, "mira").await;

    // The public catalogue lists published tours.
    let listing = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/tours")
            .to_request(),
    )
    .await;
    assert_eq!(listing.status(), StatusCode::OK);
    let listing: Value = actix_test::read_body_json(listing).await;
    let total = listing
        .pointer("/tours/totalItems")
        .and_then(Value::as_u64)
        .expect("catalogue total");
    assert!(total > 0, "fixture catalogue should not be empty");

    // The heritage tour costs money, so booking waits for payment.
    let booked = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/bookings")
            .cookie(cookie.clone())
            .set_json(serde_json::json!({
                "tourId": fixtures::HERITAGE_TOUR_ID,
                "participants": 1,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(booked.status(), StatusCode::CREATED);
    let booked: Value = actix_test::read_body_json(booked).await;
    assert_eq!(
        booked.pointer("/booking/status").and_then(Value::as_str),
        Some("pending")
    );
    let booking_id = booked
        .pointer("/booking/id")
        .and_then(Value::as_str)
        .expect("booking id")
        .to_owned();

    let paid = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/bookings/{booking_id}/payment"))
            .cookie(cookie)
            .set_json(serde_json::json!({
                "paymentMethod": "bkash",
                "paymentNumber": "01712345678",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(paid.status(), StatusCode::OK);
    let paid: Value = actix_test::read_body_json(paid).await;
    assert_eq!(
        paid.pointer("/booking/paymentStatus").and_then(Value::as_str),
        Some("paid")
    );
}

#[actix_web::test]
async fn tourist_wishlists_and_reviews_a_tour() {
    let app = actix_test::init_service(full_app()).await;
    let cookie = login_as(&app, "mira").await;

    let toggled = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/wishlist/{}", fixtures::FREE_TOUR_ID))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(toggled.status(), StatusCode::OK);
    let toggled: Value = actix_test::read_body_json(toggled).await;
    assert_eq!(
        toggled.pointer("/added").and_then(Value::as_bool),
        Some(true)
    );

    let reviewed = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/tours/{}/reviews", fixtures::FREE_TOUR_ID))
            .cookie(cookie)
            .set_json(serde_json::json!({
                "rating": 5,
                "comment": "The robotics lab stole the show.",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(reviewed.status(), StatusCode::CREATED);
    let reviewed: Value = actix_test::read_body_json(reviewed).await;
    assert_eq!(
        reviewed.pointer("/review/rating").and_then(Value::as_i64),
        Some(5)
    );
}

#[actix_web::test]
async fn registration_signs_the_new_account_in() {
    let app = actix_test::init_service(full_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(serde_json::json!({
                "username": "nusrat",
                "email": "nusrat@example.edu",
                "role": "tourist",
                "password": "correct horse",
                "passwordConfirmation": "correct horse",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(
        response
            .response()
            .cookies()
            .any(|cookie| cookie.name() == "session"),
        "registration should set a session cookie"
    );
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.pointer("/username").and_then(Value::as_str),
        Some("nusrat")
    );
    assert_eq!(
        body.pointer("/role").and_then(Value::as_str),
        Some("tourist")
    );
}

#[actix_web::test]
async fn each_role_reaches_only_its_dashboard() {
    let app = actix_test::init_service(full_app()).await;

    let cases = [
        ("mira", "/api/v1/dashboards/tourist", StatusCode::OK),
        ("mira", "/api/v1/dashboards/organizer", StatusCode::FORBIDDEN),
        ("rahim", "/api/v1/dashboards/organizer", StatusCode::OK),
        ("admin", "/api/v1/dashboards/developer", StatusCode::OK),
        ("rahim", "/api/v1/dashboards/developer", StatusCode::FORBIDDEN),
    ];
    for (username, path, expected) in cases {
        let cookie = login_as(&app, username).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(path)
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), expected, "{username} -> {path}");
    }
}

#[actix_web::test]
async fn role_changes_require_the_developer() {
    let app = actix_test::init_service(full_app()).await;

    let tourist_cookie = login_as(&app, "mira").await;
    let denied = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/admin/users/{}/role", fixtures::TOURIST_ID))
            .cookie(tourist_cookie)
            .set_json(serde_json::json!({ "role": "organizer" }))
            .to_request(),
    )
    .await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let developer_cookie = login_as(&app, "admin").await;
    let allowed = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/admin/users/{}/role", fixtures::TOURIST_ID))
            .cookie(developer_cookie)
            .set_json(serde_json::json!({ "role": "organizer" }))
            .to_request(),
    )
    .await;
    assert_eq!(allowed.status(), StatusCode::OK);
}
