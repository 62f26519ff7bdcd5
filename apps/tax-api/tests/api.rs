//! # Integration Tests for cess-api
//!
//! Drives the full router in-process: tax lookups over POST and GET, error
//! mapping, rule reload and health.

use std::path::Path;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use cess_api::state::AppState;
use cess_rules::RuleStore;

const RULES: &str = r#"{
    "cess": [
        { "hsn": "2402",     "type": "ad_valorem",  "rate_percent": "5" },
        { "hsn": "21069020", "type": "ad_valorem",  "rate_percent": "60" },
        { "hsn": "2701",     "type": "per_weight",  "rate_per_tonne": "400" },
        { "hsn": "2106",     "type": "fixed_per_unit", "fixed_rate": "10", "uom": "kg" },
        { "hsn": "3303",     "type": "ad_valorem",  "rate_percent": "3" },
        { "hsn": "3303",     "type": "ad_valorem",  "rate_percent": "4" }
    ],
    "gst": [
        { "hsn": "24", "rate": "28" },
        { "hsn": "27", "rate": "5" },
        { "hsn": "2106", "rate": "18" },
        { "hsn": "33", "rate": "18" }
    ]
}"#;

/// Helper: write a rule file and build the app over it.
fn test_app(dir: &Path, allow_reload: bool) -> axum::Router {
    let path = dir.join("cess_rules.json");
    std::fs::write(&path, RULES).unwrap();
    let store = RuleStore::open(&path).unwrap();
    cess_api::app(AppState::new(store, allow_reload))
}

/// Helper: read response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_taxes(app: axum::Router, body: Value) -> axum::http::Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/taxes")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

fn line(hsn: &str, quantity: &str, uom: &str, price: &str, from: &str, to: &str) -> Value {
    json!({
        "hsn": hsn,
        "quantity": quantity,
        "uom": uom,
        "unit_price": price,
        "origin_state": from,
        "destination_state": to,
    })
}

// -- Tax Lookups --------------------------------------------------------------

#[tokio::test]
async fn test_intra_state_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = line("2402", "10", "piece", "100.00", "MH", "MH");
    body["gst_rate"] = json!(28);

    let response = post_taxes(test_app(dir.path(), true), body).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = body_json(response).await;
    assert_eq!(body["supply_type"], "intra_state");
    assert_eq!(body["taxable_value"], "1000.00");
    assert_eq!(body["cgst"], "140.00");
    assert_eq!(body["sgst"], "140.00");
    assert_eq!(body["igst"], "0.00");
    assert_eq!(body["cess"], "50.00");
    assert_eq!(body["total_tax"], "330.00");
    assert_eq!(body["total_amount"], "1330.00");
}

#[tokio::test]
async fn test_inter_state_lookup_over_get() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_app(dir.path(), true)
        .oneshot(
            Request::builder()
                .uri("/api/taxes?hsn=2402&quantity=10&uom=pcs&unit_price=100&origin_state=MH&destination_state=DL")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["supply_type"], "inter_state");
    assert_eq!(body["cgst"], "0.00");
    assert_eq!(body["igst"], "280.00");
    assert_eq!(body["cess"], "50.00");
    assert_eq!(body["total_amount"], "1330.00");
}

#[tokio::test]
async fn test_specific_rate_with_unit_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let response = post_taxes(
        test_app(dir.path(), true),
        line("27011100", "2500", "KGS", "2", "JH", "WB"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["cess"], "1000.00");
    assert_eq!(body["igst"], "250.00");
}

#[tokio::test]
async fn test_custom_category_skips_cess() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = line("21069020", "1", "piece", "2000", "MH", "MH");
    body["category"] = json!("Custom");

    let body = body_json(post_taxes(test_app(dir.path(), true), body).await).await;
    assert_eq!(body["category"], "custom");
    assert_eq!(body["cess"], "0.00");
    assert_eq!(body["cgst"], "180.00");
}

// -- Error Mapping ------------------------------------------------------------

#[tokio::test]
async fn test_invalid_input_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let response = post_taxes(
        test_app(dir.path(), true),
        line("2402", "-1", "piece", "100", "MH", "MH"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let response = post_taxes(test_app(dir.path(), true), json!({ "hsn": "2402" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_unit_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let response = post_taxes(
        test_app(dir.path(), true),
        line("2402", "1", "furlong", "100", "MH", "MH"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unit_mismatch_is_422() {
    let dir = tempfile::tempdir().unwrap();
    let response = post_taxes(
        test_app(dir.path(), true),
        line("21061000", "3", "litre", "10", "MH", "MH"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "UNIT_MISMATCH");
}

#[tokio::test]
async fn test_rule_not_found_is_422() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = line("99999999", "1", "piece", "1", "MH", "MH");
    body["gst_rate"] = json!("18");
    let response = post_taxes(test_app(dir.path(), true), body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "RULE_NOT_FOUND");
}

#[tokio::test]
async fn test_ambiguous_rule_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let response = post_taxes(
        test_app(dir.path(), true),
        line("33030010", "1", "piece", "500", "MH", "MH"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "RULE_TABLE_MISCONFIGURED");
}

// -- Rules & Health -----------------------------------------------------------

#[tokio::test]
async fn test_health_reports_rule_counts() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_app(dir.path(), true)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["rules"]["cess_rules"], 6);
    assert_eq!(body["rules"]["gst_slabs"], 4);
    assert!(body["rules"]["loaded_at"].is_string());
}

#[tokio::test]
async fn test_reload_swaps_table() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), true);

    std::fs::write(
        dir.path().join("cess_rules.json"),
        r#"{ "cess": [ { "hsn": "2402", "type": "ad_valorem", "rate_percent": 10 } ],
             "gst": [ { "hsn": "24", "rate": 28 } ] }"#,
    )
    .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/rules/reload")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["cess_rules"], 1);

    let body = body_json(post_taxes(app, line("2402", "10", "piece", "100", "MH", "MH")).await).await;
    assert_eq!(body["cess"], "100.00");
}

#[tokio::test]
async fn test_failed_reload_keeps_serving() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), true);
    std::fs::write(dir.path().join("cess_rules.json"), "{ broken").unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/rules/reload")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "RULE_TABLE_ERROR");

    let response = post_taxes(app, line("2402", "10", "piece", "100", "MH", "MH")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_reload_disabled_is_403() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_app(dir.path(), false)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/rules/reload")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "RELOAD_DISABLED");
}
