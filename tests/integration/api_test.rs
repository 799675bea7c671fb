//! API endpoint integration tests
//!
//! Drives the composed router end to end: accounts, profile, conversations.

#![allow(dead_code)]

mod auth;
mod common;
mod conversations;
mod profile;

use axum::http::StatusCode;

use crate::common::TestApp;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().unwrap();

    let response = app.get("/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text, "OK");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = TestApp::new().unwrap();

    let response = app.get("/nope", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
