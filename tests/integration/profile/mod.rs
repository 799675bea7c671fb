//! Profile endpoint integration tests
//!
//! - GET   /profile
//! - PATCH /profile

use axum::http::StatusCode;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_get_profile() {
    let app = TestApp::new().unwrap();
    let cookie = app.signed_in_user("a@x.com").await;

    let response = app.get("/profile", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["name"], "Test User");
    assert_eq!(response.json["email"], "a@x.com");
    assert_eq!(response.json["isVerified"], false);
    assert_eq!(response.json["id"].as_str().map(str::len), Some(24));

    // Sensitive fields are never exposed
    assert!(response.json.get("password").is_none());
    assert!(response.json.get("passwordHash").is_none());
    assert!(response.json.get("password_hash").is_none());
}

#[tokio::test]
async fn test_profile_requires_session() {
    let app = TestApp::new().unwrap();

    assert_eq!(
        app.get("/profile", None).await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.patch("/profile", None, json!({ "name": "B" })).await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_rename() {
    let app = TestApp::new().unwrap();
    let cookie = app.signed_in_user("a@x.com").await;

    let response = app
        .patch("/profile", Some(&cookie), json!({ "name": "  Renamed  " }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["name"], "Renamed");
    assert_eq!(
        app.get("/profile", Some(&cookie)).await.json["name"],
        "Renamed"
    );
}

#[tokio::test]
async fn test_rename_rejects_invalid_names() {
    let app = TestApp::new().unwrap();
    let cookie = app.signed_in_user("a@x.com").await;

    let too_long = "x".repeat(101);
    for name in ["", "   ", too_long.as_str()] {
        let response = app
            .patch("/profile", Some(&cookie), json!({ "name": name }))
            .await;
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY, "{:?}", name);
    }

    assert_eq!(
        app.get("/profile", Some(&cookie)).await.json["name"],
        "Test User"
    );
}

#[tokio::test]
async fn test_email_cannot_be_changed() {
    let app = TestApp::new().unwrap();
    let cookie = app.signed_in_user("a@x.com").await;

    let response = app
        .patch("/profile", Some(&cookie), json!({ "email": "b@x.com" }))
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        app.get("/profile", Some(&cookie)).await.json["email"],
        "a@x.com"
    );
}
