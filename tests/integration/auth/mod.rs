//! Credential and session endpoint integration tests
//!
//! Covers registration, login/logout, password reset and email verification.

use axum::http::StatusCode;
use serde_json::json;

use converse_accounts::UserStore;

use crate::common::{TestApp, PASSWORD};

mod test_registration_and_login {
    use super::*;

    #[tokio::test]
    async fn test_register_login_forgot_flow() {
        let app = TestApp::new().unwrap();

        let first = app.register("A", "a@x.com", "Abcd1234").await;
        assert_eq!(first.status, StatusCode::CREATED);
        assert_eq!(first.json["message"], "User created.");
        assert!(first.session_cookie().is_none(), "registration starts no session");

        let again = app.register("A", "a@x.com", "Abcd1234").await;
        assert_eq!(again.status, StatusCode::CONFLICT);
        assert_eq!(again.error_code(), "CONFLICT");

        let login = app.login("a@x.com", "Abcd1234").await;
        assert_eq!(login.status, StatusCode::OK);
        assert_eq!(login.json["message"], "Logged in successfully.");
        assert!(login.session_cookie().is_some());

        let wrong = app.login("a@x.com", "Wxyz9876").await;
        assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
        assert!(wrong.session_cookie().is_none());

        let forgot = app
            .post("/auth/forgot-password", None, json!({ "email": "a@x.com" }))
            .await;
        assert_eq!(forgot.status, StatusCode::OK);

        let forgot_again = app
            .post("/auth/forgot-password", None, json!({ "email": "a@x.com" }))
            .await;
        assert_eq!(forgot_again.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_fields() {
        let app = TestApp::new().unwrap();

        for (name, email, password) in [
            ("", "a@x.com", PASSWORD),
            ("A", "not-an-email", PASSWORD),
            ("A", "a@x.com", "short1A"),
            ("A", "a@x.com", "alllowercase1"),
            ("A", "a@x.com", "Has Space1"),
        ] {
            let response = app.register(name, email, password).await;
            assert_eq!(
                response.status,
                StatusCode::UNPROCESSABLE_ENTITY,
                "{} / {} / {}",
                name,
                email,
                password
            );
            assert_eq!(response.error_code(), "VALIDATION_ERROR");
        }

        assert!(app.accounts.users.find_by_email("a@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_is_422() {
        let app = TestApp::new().unwrap();

        let response = app
            .post("/auth/register", None, json!({ "name": "A" }))
            .await;

        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_password_is_stored_hashed() {
        let app = TestApp::new().unwrap();
        app.register("A", "a@x.com", PASSWORD).await;

        let user = app
            .accounts
            .users
            .find_by_email("a@x.com")
            .await
            .unwrap()
            .unwrap();

        assert!(!user.is_verified);
        assert_ne!(user.password_hash.as_str(), PASSWORD);
        assert!(user.password_hash.as_str().starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_404() {
        let app = TestApp::new().unwrap();

        let response = app.login("ghost@x.com", PASSWORD).await;

        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}

mod test_sessions {
    use super::*;

    #[tokio::test]
    async fn test_authenticated_requires_session() {
        let app = TestApp::new().unwrap();

        let anonymous = app.get("/auth/authenticated", None).await;
        assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
        assert_eq!(anonymous.json["error"]["message"], "Not authenticated");

        let cookie = app.signed_in_user("a@x.com").await;
        let authed = app.get("/auth/authenticated", Some(&cookie)).await;
        assert_eq!(authed.status, StatusCode::OK);
        assert_eq!(authed.json["message"], "Authenticated.");
    }

    #[tokio::test]
    async fn test_tampered_cookie_is_rejected() {
        let app = TestApp::new().unwrap();
        let cookie = app.signed_in_user("a@x.com").await;

        let tampered = format!("{}x", cookie);
        let response = app.get("/auth/authenticated", Some(&tampered)).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);

        let forged = app
            .get("/auth/authenticated", Some("token=eyJhbGciOiJIUzI1NiJ9.e30.abc"))
            .await;
        assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_session_cookie_attributes() {
        let app = TestApp::new().unwrap();
        app.register("A", "a@x.com", PASSWORD).await;

        let login = app.login("a@x.com", PASSWORD).await;
        let set_cookie = login
            .headers
            .get("set-cookie")
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();

        assert!(set_cookie.starts_with("token="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("Path=/"));
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let app = TestApp::new().unwrap();
        let cookie = app.signed_in_user("a@x.com").await;

        let response = app
            .request(axum::http::Method::POST, "/auth/logout", Some(&cookie), None)
            .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json["message"], "Logged out successfully.");
        let cleared = response
            .headers
            .get("set-cookie")
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(cleared.starts_with("token="));
        assert!(cleared.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_logout_without_session_is_401() {
        let app = TestApp::new().unwrap();

        let response = app
            .request(axum::http::Method::POST, "/auth/logout", None, None)
            .await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }
}

mod test_password_reset {
    use super::*;

    #[tokio::test]
    async fn test_reset_token_is_single_use() {
        let app = TestApp::new().unwrap();
        app.register("A", "a@x.com", PASSWORD).await;

        let forgot = app
            .post("/auth/forgot-password", None, json!({ "email": "a@x.com" }))
            .await;
        assert_eq!(forgot.status, StatusCode::OK);

        // verification + reset
        app.wait_for_emails(2).await;
        let token = app.email.get_reset_token_for_email("a@x.com").unwrap();

        let reset = app
            .post(
                "/auth/reset-password",
                None,
                json!({ "token": token, "password": "Newpass99" }),
            )
            .await;
        assert_eq!(reset.status, StatusCode::OK);
        assert_eq!(reset.json["message"], "Password reset successfully.");

        assert_eq!(
            app.login("a@x.com", PASSWORD).await.status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(app.login("a@x.com", "Newpass99").await.status, StatusCode::OK);

        let reused = app
            .post(
                "/auth/reset-password",
                None,
                json!({ "token": token, "password": "Other123" }),
            )
            .await;
        assert_eq!(reused.status, StatusCode::NOT_FOUND);
        assert_eq!(app.login("a@x.com", "Newpass99").await.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_new_reset_allowed_after_consumption() {
        let app = TestApp::new().unwrap();
        app.register("A", "a@x.com", PASSWORD).await;

        app.post("/auth/forgot-password", None, json!({ "email": "a@x.com" }))
            .await;
        app.wait_for_emails(2).await;
        let token = app.email.get_reset_token_for_email("a@x.com").unwrap();
        app.post(
            "/auth/reset-password",
            None,
            json!({ "token": token, "password": "Newpass99" }),
        )
        .await;

        let again = app
            .post("/auth/forgot-password", None, json!({ "email": "a@x.com" }))
            .await;
        assert_eq!(again.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_forgot_password_unknown_email_is_404() {
        let app = TestApp::new().unwrap();

        let response = app
            .post("/auth/forgot-password", None, json!({ "email": "ghost@x.com" }))
            .await;

        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reset_with_unknown_token_is_404() {
        let app = TestApp::new().unwrap();

        let response = app
            .post(
                "/auth/reset-password",
                None,
                json!({ "token": "ab".repeat(20), "password": "Newpass99" }),
            )
            .await;

        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reset_with_malformed_token_is_422() {
        let app = TestApp::new().unwrap();

        let response = app
            .post(
                "/auth/reset-password",
                None,
                json!({ "token": "not-a-token", "password": "Newpass99" }),
            )
            .await;

        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}

mod test_email_verification {
    use super::*;

    #[tokio::test]
    async fn test_verification_is_monotonic() {
        let app = TestApp::new().unwrap();
        let cookie = app.signed_in_user("a@x.com").await;
        app.wait_for_emails(1).await;

        let user_id = app
            .email
            .get_latest_verification_email("a@x.com")
            .and_then(|e| e.extract_verification_id())
            .unwrap();

        let first = app.get(&format!("/auth/verify-email/{}", user_id), None).await;
        assert_eq!(first.status, StatusCode::OK);
        assert_eq!(first.json["message"], "Email verified.");

        let second = app.get(&format!("/auth/verify-email/{}", user_id), None).await;
        assert_eq!(second.status, StatusCode::CONFLICT);

        let profile = app.get("/profile", Some(&cookie)).await;
        assert_eq!(profile.json["isVerified"], true);
    }

    #[tokio::test]
    async fn test_verify_rejects_bad_ids() {
        let app = TestApp::new().unwrap();

        let malformed = app.get("/auth/verify-email/not-an-id", None).await;
        assert_eq!(malformed.status, StatusCode::UNPROCESSABLE_ENTITY);

        let unknown = app
            .get("/auth/verify-email/507f1f77bcf86cd799439011", None)
            .await;
        assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_resend_verification_email() {
        let app = TestApp::new().unwrap();

        let anonymous = app
            .request(
                axum::http::Method::POST,
                "/auth/resend-verification-email",
                None,
                None,
            )
            .await;
        assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

        let cookie = app.signed_in_user("a@x.com").await;
        app.wait_for_emails(1).await;

        let resent = app
            .request(
                axum::http::Method::POST,
                "/auth/resend-verification-email",
                Some(&cookie),
                None,
            )
            .await;
        assert_eq!(resent.status, StatusCode::OK);
        app.wait_for_emails(2).await;
        assert_eq!(app.email.get_emails_for_recipient("a@x.com").len(), 2);

        let user_id = app
            .email
            .get_latest_verification_email("a@x.com")
            .and_then(|e| e.extract_verification_id())
            .unwrap();
        app.get(&format!("/auth/verify-email/{}", user_id), None)
            .await;

        let after_verify = app
            .request(
                axum::http::Method::POST,
                "/auth/resend-verification-email",
                Some(&cookie),
                None,
            )
            .await;
        assert_eq!(after_verify.status, StatusCode::CONFLICT);
    }
}
