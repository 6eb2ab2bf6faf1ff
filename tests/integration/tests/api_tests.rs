//! Integration tests for the route API
//!
//! Run with: TMB_ROUTES_API_URL=https://your-api.execute-api.eu-west-1.amazonaws.com/prod cargo test
//!
//! These tests require a deployed stack with valid planner credentials.

use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use tmbroutes_integration_tests::{
    client::{Destination, ErrorResponse, RoutesClient},
    fixtures::{id_token, ALT_WORK_LATITUDE, ALT_WORK_LONGITUDE},
    skip_if_no_api,
};

const SUCCESS_MESSAGE: &str = "Journey plan successfully retrieved";

/// Helper to get client or skip test
fn get_client() -> Option<RoutesClient> {
    if !tmbroutes_integration_tests::api_url_configured() {
        eprintln!("Skipping: TMB_ROUTES_API_URL not set");
        return None;
    }
    Some(RoutesClient::from_env())
}

// ============================================================================
// Open route
// ============================================================================

#[tokio::test]
async fn test_open_route_returns_plan() {
    let Some(client) = get_client() else { return };

    let response = client.get_open(None).await.expect("Failed to fetch plan");

    assert_eq!(response.message, SUCCESS_MESSAGE);
    assert!(response.journey_plan["plan"]["itineraries"].is_array());
}

#[tokio::test]
async fn test_open_route_with_destination_override() {
    let Some(client) = get_client() else { return };

    let response = client
        .get_open(Some(Destination {
            latitude: ALT_WORK_LATITUDE,
            longitude: ALT_WORK_LONGITUDE,
        }))
        .await
        .expect("Failed to fetch plan");

    assert_eq!(response.message, SUCCESS_MESSAGE);
    assert!(response.journey_plan.get("plan").is_some());
}

#[tokio::test]
async fn test_open_route_rejects_bad_coordinate() {
    let Some(client) = get_client() else { return };

    let err = client
        .get_open(Some(Destination {
            latitude: 123.0,
            longitude: ALT_WORK_LONGITUDE,
        }))
        .await
        .expect_err("Out-of-range latitude should fail");

    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
}

#[tokio::test]
async fn test_open_route_sets_cors_headers() {
    skip_if_no_api!();
    let client = RoutesClient::from_env();

    let headers = client.open_headers().await.expect("Failed to fetch plan");
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

// ============================================================================
// Protected route
// ============================================================================

#[tokio::test]
async fn test_root_requires_token() {
    let Some(client) = get_client() else { return };

    let err = client
        .get_root(None, None)
        .await
        .expect_err("Root without a token should be rejected");

    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    if let tmbroutes_integration_tests::client::ApiError::Http { body, .. } = &err {
        let parsed: Result<ErrorResponse, _> = serde_json::from_str(body);
        if let Ok(parsed) = parsed {
            assert!(!parsed.message.is_empty());
        }
    }
}

#[tokio::test]
async fn test_root_with_token() {
    let Some(client) = get_client() else { return };
    let Some(token) = id_token() else {
        eprintln!("Skipping: TMB_ROUTES_ID_TOKEN not set");
        return;
    };

    let response = client
        .get_root(Some(&token), None)
        .await
        .expect("Failed to fetch plan with token");

    assert_eq!(response.message, SUCCESS_MESSAGE);
}
