//! Guards the published OpenAPI surface against accidental drift.

use backend::ApiDoc;
use serde_json::Value;
use utoipa::OpenApi;

/// Flatten the document into sorted `METHOD path` lines.
///
/// Serialising through `serde_json` sorts both paths and methods, so the
/// snapshot stays stable regardless of registration order.
fn api_surface() -> String {
    let document: Value =
        serde_json::to_value(ApiDoc::openapi()).expect("OpenAPI document serialises");
    let paths = document
        .pointer("/paths")
        .and_then(Value::as_object)
        .expect("document has paths");

    let mut lines = Vec::new();
    for (path, item) in paths {
        let operations = item.as_object().expect("path item is an object");
        for method in operations.keys() {
            lines.push(format!("{} {path}", method.to_uppercase()));
        }
    }
    lines.join("\n")
}

#[test]
fn api_surface_matches_snapshot() {
    insta::assert_snapshot!("api_surface", api_surface());
}

#[test]
fn error_responses_reference_the_shared_schema() {
    let document: Value =
        serde_json::to_value(ApiDoc::openapi()).expect("OpenAPI document serialises");

    let reference = document
        .pointer("/paths/~1api~1v1~1bookings/post/responses/409/content/application~1json/schema/$ref")
        .and_then(Value::as_str)
        .expect("conflict response schema reference");
    assert_eq!(reference, "#/components/schemas/crate.domain.Error");
}

#[test]
fn session_cookie_scheme_is_declared() {
    let document: Value =
        serde_json::to_value(ApiDoc::openapi()).expect("OpenAPI document serialises");

    assert_eq!(
        document
            .pointer("/components/securitySchemes/SessionCookie/in")
            .and_then(Value::as_str),
        Some("cookie")
    );
    assert_eq!(
        document
            .pointer("/components/securitySchemes/SessionCookie/name")
            .and_then(Value::as_str),
        Some("session")
    );
}
