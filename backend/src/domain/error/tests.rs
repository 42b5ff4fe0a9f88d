//! Tests for error construction, validation, and serde round-tripping.

use super::*;
use crate::domain::TraceId;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("bad")
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("no auth"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("denied"), ErrorCode::Forbidden)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::conflict("taken"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn convenience_constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values(base_error: Error) {
    let result = base_error.try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move {
        Error::try_new(ErrorCode::InternalError, "boom")
            .expect("validation accepts non-empty message")
    })
    .await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
#[tokio::test]
async fn try_from_error_dto_clears_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let dto = ErrorDto {
        code: ErrorCode::InvalidRequest,
        message: "bad".to_string(),
        trace_id: None,
        details: None,
    };

    let error = TraceId::scope(trace_id, async move {
        Error::try_from(dto).expect("conversion succeeds for valid payload without trace")
    })
    .await;

    assert!(error.trace_id().is_none());
}

#[rstest]
fn with_details_round_trips_through_json(expected_trace_id: String) {
    let error = Error::conflict("username already taken")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "field": "username" }));

    let value = serde_json::to_value(&error).expect("serialisation succeeds");
    assert_eq!(
        value,
        json!({
            "code": "conflict",
            "message": "username already taken",
            "traceId": expected_trace_id,
            "details": { "field": "username" },
        })
    );

    let parsed: Error = serde_json::from_value(value).expect("deserialisation succeeds");
    assert_eq!(parsed, error);
}

#[rstest]
fn serialisation_omits_absent_optionals() {
    let value = serde_json::to_value(Error::not_found("missing")).expect("serialisation succeeds");
    assert_eq!(value, json!({ "code": "not_found", "message": "missing" }));
}

#[rstest]
fn deserialisation_accepts_snake_case_trace_alias() {
    let parsed: Error = serde_json::from_value(json!({
        "code": "internal_error",
        "message": "boom",
        "trace_id": TRACE_ID,
    }))
    .expect("alias deserialisation succeeds");
    assert_eq!(parsed.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn deserialisation_rejects_empty_messages() {
    let result = serde_json::from_value::<Error>(json!({
        "code": "invalid_request",
        "message": "   ",
    }));
    assert!(result.is_err());
}

#[rstest]
fn display_prints_the_message() {
    assert_eq!(Error::forbidden("organiser role required").to_string(), "organiser role required");
}
