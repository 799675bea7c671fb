//! Common test utilities and fixtures for integration tests
//!
//! This module provides shared infrastructure for all integration tests including:
//! - An application wired to in-memory stores and mock email/LLM services
//! - Request helpers driving the router with `oneshot`
//! - Session cookie handling
//! - Account fixtures

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use converse_accounts::{AccountsConfig, AccountsRepositories};
use converse_app::{create_app_with, AppServices};
use converse_auth::{AuthConfig, PasswordHashConfig};
use converse_conversations::{ChatConfig, ConversationsRepositories};
use converse_email::mock::MockEmailService;
use converse_llm::mock::MockLlmService;

pub const PASSWORD: &str = "Abcd1234";

/// Test application backed by in-memory stores
pub struct TestApp {
    pub router: Router,
    pub email: MockEmailService,
    pub llm: MockLlmService,
    pub accounts: AccountsRepositories,
    pub conversations: ConversationsRepositories,
}

/// Decoded response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
    pub json: Value,
}

impl TestResponse {
    /// `name=value` pair of the session cookie, ready to send back
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("token="))
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }

    pub fn error_code(&self) -> &str {
        self.json["error"]["code"].as_str().unwrap_or_default()
    }
}

fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test_jwt_secret_for_testing_only".to_string(),
        cookie_secret: "test_cookie_secret_for_testing_only".to_string(),
        cookie_secure: false,
        session_ttl_secs: 3600,
        // Cheap argon2 parameters keep the suite fast
        password: PasswordHashConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
    }
}

impl TestApp {
    /// Application with an echoing LLM
    pub fn new() -> Result<Self> {
        Self::with_llm(MockLlmService::new())
    }

    /// Application with a custom LLM mock; must run inside a tokio runtime
    pub fn with_llm(llm: MockLlmService) -> Result<Self> {
        let email = MockEmailService::new();
        let accounts = AccountsRepositories::in_memory();
        let conversations = ConversationsRepositories::in_memory();

        let services = AppServices {
            accounts: accounts.clone(),
            conversations: conversations.clone(),
            auth_config: test_auth_config(),
            accounts_config: AccountsConfig::default(),
            chat_config: ChatConfig::default(),
            email: Arc::new(email.clone()),
            llm: Arc::new(llm.clone()),
        };

        Ok(Self {
            router: create_app_with(services)?,
            email,
            llm,
            accounts,
            conversations,
        })
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            text,
            json,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, cookie, None).await
    }

    pub async fn post(&self, uri: &str, cookie: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, cookie, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, cookie: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, cookie, Some(body)).await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> TestResponse {
        self.post(
            "/auth/register",
            None,
            serde_json::json!({ "name": name, "email": email, "password": password }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.post(
            "/auth/login",
            None,
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Register an account and return its session cookie
    pub async fn signed_in_user(&self, email: &str) -> String {
        let registered = self.register("Test User", email, PASSWORD).await;
        assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.text);

        let login = self.login(email, PASSWORD).await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.text);
        login.session_cookie().expect("login sets a session cookie")
    }

    /// Create a chat and return its id
    pub async fn create_chat(&self, cookie: &str, initial_message: &str) -> String {
        let response = self
            .post(
                "/chat",
                Some(cookie),
                serde_json::json!({ "initialMessage": initial_message }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
        response.json["chatId"].as_str().unwrap().to_string()
    }

    /// Wait for the background mailer to hand `count` emails to the mock
    pub async fn wait_for_emails(&self, count: usize) {
        for _ in 0..200 {
            if self.email.email_count() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "expected {} emails, got {}",
            count,
            self.email.email_count()
        );
    }
}
