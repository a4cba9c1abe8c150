//! HTTP API tests
//!
//! Tests for the router running on in-memory stores:
//! - Health reports the in-memory mode
//! - Created records answer 201, rejected forms answer 400 with the field
//! - Unknown records answer 404
//! - Finance reports refuse open-ended periods
//! - Exports download as CSV attachments

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use backoffice_backend::{create_app, AppState, Config};

fn app() -> Router {
    create_app(AppState::in_memory(Config::in_memory()))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_in_memory() {
        let app = app();
        let (status, body) = send_json(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"], "in-memory");
    }

    #[tokio::test]
    async fn test_create_customer_then_list() {
        let app = app();
        let (status, created) = send_json(
            &app,
            post_json(
                "/api/v1/customers",
                json!({ "first_name": "נועה", "phone": "050-9998877" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["first_name"], "נועה");

        let (status, list) = send_json(&app, get("/api/v1/customers")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_form_names_the_field() {
        let app = app();
        let (status, body) = send_json(
            &app,
            post_json("/api/v1/customers", json!({ "first_name": "נועה" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["field"], "phone");
    }

    #[tokio::test]
    async fn test_unknown_order_is_404() {
        let app = app();
        let uri = format!("/api/v1/orders/{}", Uuid::new_v4());
        let (status, _) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_finance_summary_rejects_endless_period() {
        let app = app();
        let (status, body) = send_json(
            &app,
            get("/api/v1/finances/summary?period=custom&from=2024-01-01&to=9999-12-31"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "to");

        let (status, _) = send(
            &app,
            get("/api/v1/finances/summary?period=custom&from=2024-01-01&to=2024-12-31"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_orders_export_is_a_csv_attachment() {
        let app = app();
        let response = app
            .clone()
            .oneshot(get("/api/v1/orders/export"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"orders_"));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let content = String::from_utf8(body.to_vec()).unwrap();
        assert!(content.starts_with('\u{feff}'));
    }
}
