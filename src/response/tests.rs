//! Tests for the response envelope module

use super::*;
use crate::transport::RawResponse;
use serde::{Deserialize, Serialize};
use serde_json::json;
use test_case::test_case;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Widget {
    id: u64,
    name: String,
}

fn sample_error() -> ApiError {
    ApiError::new("validation", "name is required")
}

// ============================================================================
// Invariants
// ============================================================================

#[test_case(200, false => true; "ok without errors")]
#[test_case(204, false => true; "no content without errors")]
#[test_case(299, false => true; "edge of success range")]
#[test_case(200, true => false; "ok with errors")]
#[test_case(404, false => false; "not found")]
#[test_case(500, true => false; "server error with errors")]
fn is_success_requires_success_status_and_no_errors(status: u16, with_errors: bool) -> bool {
    let response: ApiResponse<Widget> = if with_errors {
        ApiResponse::from_error(status, sample_error())
    } else {
        ApiResponse::new(status)
    };
    response.is_success()
}

#[test]
fn is_not_found_ignores_errors() {
    let empty: ApiResponse<Widget> = ApiResponse::new(404);
    let with_errors: ApiResponse<Widget> = ApiResponse::from_error(404, sample_error());

    assert!(empty.is_not_found());
    assert!(with_errors.is_not_found());

    let ok: ApiResponse<Widget> = ApiResponse::new(200);
    assert!(!ok.is_not_found());
}

// ============================================================================
// Wire shape
// ============================================================================

#[test]
fn envelope_serializes_without_status() {
    let response = ApiResponse::success(
        200,
        Widget {
            id: 1,
            name: "anvil".to_string(),
        },
    );

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(
        value,
        json!({
            "result": {"id": 1, "name": "anvil"},
            "errors": [],
        })
    );
}

#[test]
fn envelope_deserializes_with_missing_errors() {
    let body = json!({"result": {"id": 7, "name": "crate"}});
    let response: ApiResponse<Widget> = serde_json::from_value(body).unwrap();

    assert_eq!(
        response.result,
        Some(Widget {
            id: 7,
            name: "crate".to_string()
        })
    );
    assert!(response.errors.is_empty());
}

#[test]
fn api_error_detail_is_omitted_when_absent() {
    let value = serde_json::to_value(sample_error()).unwrap();
    assert_eq!(
        value,
        json!({"code": "validation", "message": "name is required"})
    );

    let with_detail = sample_error().with_detail("field 'name'");
    let value = serde_json::to_value(with_detail).unwrap();
    assert_eq!(value["detail"], "field 'name'");
}

// ============================================================================
// Raw response mapping
// ============================================================================

#[test]
fn from_raw_empty_body_success() {
    let raw = RawResponse::new(204);
    let result: ApiResult<Widget> = ApiResult::from_raw(&raw);

    assert_eq!(result.status, 204);
    assert!(result.is_success());
    assert!(result.result().is_none());
    assert!(result.errors().is_empty());
}

#[test]
fn from_raw_empty_body_failure_synthesizes_status_error() {
    let raw = RawResponse::new(503);
    let result: ApiResult<Widget> = ApiResult::from_raw(&raw);

    assert!(!result.is_success());
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].code, HTTP_ERROR);
    assert_eq!(result.errors()[0].message, "503 Service Unavailable");
}

#[test]
fn from_raw_parses_success_envelope() {
    let raw = RawResponse::json(
        200,
        &json!({"result": {"id": 123, "name": "anvil"}, "errors": []}),
    );
    let result: ApiResult<Widget> = ApiResult::from_raw(&raw);

    assert!(result.is_success());
    assert_eq!(result.response.status, 200);
    assert_eq!(result.result().unwrap().id, 123);
}

#[test]
fn from_raw_preserves_remote_errors() {
    let raw = RawResponse::json(
        400,
        &json!({
            "result": null,
            "errors": [
                {"code": "validation", "message": "name is required"},
                {"code": "validation", "message": "id must be positive", "detail": "got -3"},
            ],
        }),
    );
    let result: ApiResult<Widget> = ApiResult::from_raw(&raw);

    assert!(!result.is_success());
    assert_eq!(result.errors().len(), 2);
    assert_eq!(result.errors()[1].detail.as_deref(), Some("got -3"));
}

#[test]
fn from_raw_foreign_json_failure_gets_synthesized_error() {
    // A 404 from an API that does not speak the envelope convention
    let raw = RawResponse::json(404, &json!({"error": "no such user"}));
    let result: ApiResult<Widget> = ApiResult::from_raw(&raw);

    assert!(result.is_not_found());
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].code, HTTP_ERROR);
}

#[test]
fn from_raw_malformed_json_never_fails() {
    let raw = RawResponse::new(200)
        .with_header("content-type", "application/json")
        .with_body(&b"{not json"[..]);
    let result: ApiResult<Widget> = ApiResult::from_raw(&raw);

    assert_eq!(result.status, 200);
    assert!(!result.is_success());
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].code, DESERIALIZATION_FAILED);
    assert!(result.errors()[0].detail.is_some());
}

#[test]
fn from_raw_text_body_failure_carries_body_as_detail() {
    let raw = RawResponse::text(502, "upstream exploded");
    let result: ApiResult<Widget> = ApiResult::from_raw(&raw);

    assert!(!result.is_success());
    assert_eq!(result.errors()[0].code, HTTP_ERROR);
    assert_eq!(result.errors()[0].detail.as_deref(), Some("upstream exploded"));
}

#[test]
fn from_raw_text_body_success_is_a_mapping_error() {
    let raw = RawResponse::text(200, "<html>hello</html>");
    let result: ApiResult<Widget> = ApiResult::from_raw(&raw);

    assert!(!result.is_success());
    assert_eq!(result.errors()[0].code, DESERIALIZATION_FAILED);
}

#[test]
fn into_result_takes_the_payload() {
    let raw = RawResponse::json(200, &json!({"result": {"id": 9, "name": "crate"}}));
    let result: ApiResult<Widget> = ApiResult::from_raw(&raw);

    let widget = result.into_result().unwrap();
    assert_eq!(widget.name, "crate");
}
