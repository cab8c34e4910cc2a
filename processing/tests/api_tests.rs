mod mocks;

use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Request, StatusCode},
};
use common::{
    test_assert,
    test_helpers::{TestError, TestResult, test_utils},
};
use http_body_util::BodyExt;
use mocks::in_memory_shield;
use processing::executable_utils::{AppState, build_router};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app(hour: u32) -> Router {
    build_router(AppState::new(in_memory_shield(hour)), None)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> TestResult<(StatusCode, Value)> {
    let request = test_utils::build_request(method, uri, body.map(|b| b.to_string()))?;
    let (parts, body) = request.into_parts();
    let request = Request::from_parts(parts, Body::from(body));

    let response = app
        .clone()
        .oneshot(request)
        .await
        .map_err(|e| TestError::mock_failure(format!("request failed: {e}")))?;
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .map_err(|e| TestError::mock_failure(format!("body failed: {e}")))?
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    Ok((status, value))
}

fn find_order<'a>(orders: &'a Value, id: &str) -> TestResult<&'a Value> {
    orders
        .as_array()
        .and_then(|list| list.iter().find(|order| order["id"] == json!(id)))
        .ok_or_else(|| TestError::order_not_found(id))
}

#[tokio::test]
async fn health_is_ok() -> TestResult {
    let app = app(12);
    let (status, body) = send(&app, "GET", "/health", None).await?;
    test_utils::check_status_code(status, StatusCode::OK)?;
    assert_eq!(body, json!("OK"));
    Ok(())
}

#[tokio::test]
async fn submit_scores_and_stores_order() -> TestResult {
    let app = app(3);
    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        Some(json!({
            "amount": 500,
            "email": "a@tempmail.com",
            "isNewCustomer": true,
            "country": "Nigeria",
            "sku": "A-1"
        })),
    )
    .await?;

    test_utils::check_status_code(status, StatusCode::CREATED)?;
    assert_eq!(body["id"], json!("ORD-1"));
    assert_eq!(body["riskScore"], json!(100));
    assert_eq!(body["riskLevel"], json!("high"));
    assert_eq!(body["status"], json!("pending"));
    assert_eq!(body["sku"], json!("A-1"));
    assert_eq!(
        body["triggeredRules"],
        json!(["new_customer", "high_amount", "email_mismatch", "high_risk_country"])
    );

    let (status, list) = send(&app, "GET", "/api/orders", None).await?;
    test_utils::check_status_code(status, StatusCode::OK)?;
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    assert_eq!(find_order(&list, "ORD-1")?["sku"], json!("A-1"));
    Ok(())
}

#[tokio::test]
async fn order_without_amount_is_bad_request() -> TestResult {
    let app = app(12);
    let (status, body) = send(&app, "POST", "/api/orders", Some(json!({ "email": "x@y.z" }))).await?;
    test_utils::check_status_code(status, StatusCode::BAD_REQUEST)?;
    assert!(body["error"].as_str().unwrap_or_default().contains("amount"));

    let (_, list) = send(&app, "GET", "/api/orders", None).await?;
    assert_eq!(list, json!([]));
    Ok(())
}

#[tokio::test]
async fn undecodable_order_is_bad_request() -> TestResult {
    let app = app(12);
    let (status, body) = send(&app, "POST", "/api/orders", Some(json!({ "amount": "500" }))).await?;
    test_utils::check_status_code(status, StatusCode::BAD_REQUEST)?;
    assert!(body["error"].as_str().unwrap_or_default().starts_with("malformed order"));

    let (_, list) = send(&app, "GET", "/api/orders", None).await?;
    assert_eq!(list, json!([]));
    Ok(())
}

#[tokio::test]
async fn reserved_attribute_names_do_not_corrupt_history() -> TestResult {
    let app = app(12);
    send(&app, "POST", "/api/orders", Some(json!({ "amount": 10 }))).await?;
    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        Some(json!({ "amount": 20, "id": "spoofed", "riskScore": 99 })),
    )
    .await?;
    test_utils::check_status_code(status, StatusCode::CREATED)?;
    assert_eq!(body["id"], json!("ORD-2"));
    assert_eq!(body["riskScore"], json!(0));

    let (_, list) = send(&app, "GET", "/api/orders", None).await?;
    assert_eq!(list.as_array().map(Vec::len), Some(2));
    find_order(&list, "ORD-1")?;
    test_assert!(find_order(&list, "spoofed").is_err());
    Ok(())
}

#[tokio::test]
async fn review_transitions_are_enforced() -> TestResult {
    let app = app(12);
    send(&app, "POST", "/api/orders", Some(json!({ "amount": 75 }))).await?;

    let (status, body) = send(&app, "POST", "/api/orders/ORD-1/approve", None).await?;
    test_utils::check_status_code(status, StatusCode::OK)?;
    assert_eq!(body["status"], json!("approved"));
    assert!(body["reviewedAt"].is_string());

    let (status, _) = send(&app, "POST", "/api/orders/ORD-1/block", None).await?;
    test_utils::check_status_code(status, StatusCode::CONFLICT)?;

    let (_, list) = send(&app, "GET", "/api/orders", None).await?;
    assert_eq!(find_order(&list, "ORD-1")?["status"], json!("approved"));

    let (status, _) = send(&app, "POST", "/api/orders/ORD-9/approve", None).await?;
    test_utils::check_status_code(status, StatusCode::NOT_FOUND)?;
    Ok(())
}

#[tokio::test]
async fn rule_management() -> TestResult {
    let app = app(12);

    let (status, rules) = send(&app, "GET", "/api/rules", None).await?;
    test_utils::check_status_code(status, StatusCode::OK)?;
    assert_eq!(rules.as_array().map(Vec::len), Some(7));

    let (status, rule) = send(&app, "POST", "/api/rules/high_amount/toggle", None).await?;
    test_utils::check_status_code(status, StatusCode::OK)?;
    assert_eq!(rule["enabled"], json!(false));

    let (status, rule) = send(&app, "PUT", "/api/rules/new_customer/weight", Some(json!({ "weight": 50 }))).await?;
    test_utils::check_status_code(status, StatusCode::OK)?;
    assert_eq!(rule["weight"], json!(50));

    let (status, _) = send(&app, "PUT", "/api/rules/new_customer/weight", Some(json!({ "weight": -5 }))).await?;
    test_utils::check_status_code(status, StatusCode::UNPROCESSABLE_ENTITY)?;

    let (status, _) = send(&app, "POST", "/api/rules/nope/toggle", None).await?;
    test_utils::check_status_code(status, StatusCode::NOT_FOUND)?;

    let new_rule = json!({ "id": "night_owl", "name": "Night owl", "weight": 10, "enabled": true });
    let (status, _) = send(&app, "POST", "/api/rules", Some(new_rule.clone())).await?;
    test_utils::check_status_code(status, StatusCode::CREATED)?;
    let (status, _) = send(&app, "POST", "/api/rules", Some(new_rule)).await?;
    test_utils::check_status_code(status, StatusCode::CONFLICT)?;

    // 600 would trigger high_amount, which is now disabled
    let (_, order) = send(
        &app,
        "POST",
        "/api/orders",
        Some(json!({ "amount": 600, "isNewCustomer": true })),
    )
    .await?;
    assert_eq!(order["riskScore"], json!(55));
    assert_eq!(order["triggeredRules"], json!(["new_customer"]));
    Ok(())
}

#[tokio::test]
async fn analytics_reflect_history() -> TestResult {
    let app = app(12);
    let (_, empty) = send(&app, "GET", "/api/analytics", None).await?;
    assert_eq!(empty["total"], json!(0));
    assert_eq!(empty["avgRisk"], json!(0.0));
    assert_eq!(empty["blockedValue"], json!(0.0));

    send(&app, "POST", "/api/orders", Some(json!({ "amount": 40 }))).await?;
    send(&app, "POST", "/api/orders", Some(json!({ "amount": 900, "country": "Vietnam" }))).await?;
    send(&app, "POST", "/api/orders/ORD-2/block", None).await?;

    let (status, snapshot) = send(&app, "GET", "/api/analytics", None).await?;
    test_utils::check_status_code(status, StatusCode::OK)?;
    assert_eq!(snapshot["total"], json!(2));
    assert_eq!(snapshot["blocked"], json!(1));
    assert_eq!(snapshot["pending"], json!(1));
    assert_eq!(snapshot["medium"], json!(1));
    assert_eq!(snapshot["low"], json!(1));
    assert_eq!(snapshot["blockedValue"], json!(900.0));
    assert_eq!(snapshot["avgRisk"], json!(27.5));
    Ok(())
}

#[tokio::test]
async fn cors_origin_is_echoed() -> TestResult {
    let app = build_router(
        AppState::new(in_memory_shield(12)),
        Some(HeaderValue::from_static("http://localhost:5173")),
    );
    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:5173")
        .body(Body::empty())?;
    let response = app
        .oneshot(request)
        .await
        .map_err(|e| TestError::mock_failure(e.to_string()))?;
    assert_eq!(
        response.headers().get("access-control-allow-origin"),
        Some(&HeaderValue::from_static("http://localhost:5173"))
    );
    Ok(())
}
