//! Conversation endpoint integration tests
//!
//! - POST /chat
//! - GET  /chat
//! - POST /chat/{chat_id}/messages
//! - GET  /chat/{chat_id}/messages

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{json, Value};

use converse_llm::mock::MockLlmService;

use crate::common::TestApp;

fn roles(messages: &Value) -> Vec<&str> {
    messages
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["role"].as_str().unwrap())
        .collect()
}

mod test_create_chat {
    use super::*;

    #[tokio::test]
    async fn test_create_then_get_messages() {
        let app = TestApp::new().unwrap();
        let cookie = app.signed_in_user("a@x.com").await;

        let created = app
            .post("/chat", Some(&cookie), json!({ "initialMessage": "Hello" }))
            .await;
        assert_eq!(created.status, StatusCode::CREATED);
        assert_eq!(created.json["message"], "Chat created successfully");
        let chat_id = created.json["chatId"].as_str().unwrap().to_string();
        assert_eq!(chat_id.len(), 24);
        assert!(!created.json["chatName"].as_str().unwrap().trim().is_empty());

        let messages = app
            .get(&format!("/chat/{}/messages", chat_id), Some(&cookie))
            .await;
        assert_eq!(messages.status, StatusCode::OK);
        assert_eq!(roles(&messages.json), vec!["user", "assistant"]);
        assert_eq!(messages.json[0]["content"], "Hello");
        assert_eq!(messages.json[1]["content"], "Mock response to: Hello");
        assert!(messages.json[0]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_system_prompt_reaches_llm_but_not_client() {
        let app = TestApp::new().unwrap();
        let cookie = app.signed_in_user("a@x.com").await;
        let chat_id = app.create_chat(&cookie, "Hello").await;

        // title request, then the first reply
        assert_eq!(app.llm.call_count(), 2);
        let requests = app.llm.requests();
        let reply_request = &requests[1];
        assert!(reply_request.messages[0]
            .content
            .contains("King Abdulaziz University"));

        let messages = app
            .get(&format!("/chat/{}/messages", chat_id), Some(&cookie))
            .await;
        assert!(!roles(&messages.json).contains(&"system"));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_message() {
        let app = TestApp::new().unwrap();
        let cookie = app.signed_in_user("a@x.com").await;

        let response = app
            .post("/chat", Some(&cookie), json!({ "initialMessage": "   " }))
            .await;

        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(app.llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_create_requires_session() {
        let app = TestApp::new().unwrap();

        let response = app
            .post("/chat", None, json!({ "initialMessage": "Hello" }))
            .await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_llm_failure_stores_nothing() {
        let app = TestApp::with_llm(MockLlmService::failing()).unwrap();
        let cookie = app.signed_in_user("a@x.com").await;

        let response = app
            .post("/chat", Some(&cookie), json!({ "initialMessage": "Hello" }))
            .await;
        assert_eq!(response.status, StatusCode::BAD_GATEWAY);
        assert_eq!(response.error_code(), "UPSTREAM_ERROR");

        let chats = app.get("/chat", Some(&cookie)).await;
        assert_eq!(chats.json, json!([]));
    }
}

mod test_list_chats {
    use super::*;

    #[tokio::test]
    async fn test_list_only_own_chats() {
        let app = TestApp::new().unwrap();
        let alice = app.signed_in_user("alice@x.com").await;
        let bob = app.signed_in_user("bob@x.com").await;

        let first = app.create_chat(&alice, "Hello").await;
        let second = app.create_chat(&alice, "Admission dates?").await;
        app.create_chat(&bob, "Hi").await;

        let chats = app.get("/chat", Some(&alice)).await;
        assert_eq!(chats.status, StatusCode::OK);
        let listed = chats.json.as_array().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0]["id"], first.as_str());
        assert_eq!(listed[1]["id"], second.as_str());
        assert!(listed[0]["chatName"].is_string());
    }

    #[tokio::test]
    async fn test_list_requires_session() {
        let app = TestApp::new().unwrap();

        assert_eq!(
            app.get("/chat", None).await.status,
            StatusCode::UNAUTHORIZED
        );
    }
}

mod test_messages {
    use super::*;

    #[tokio::test]
    async fn test_send_message_appends_turn() {
        let app = TestApp::new().unwrap();
        let cookie = app.signed_in_user("a@x.com").await;
        let chat_id = app.create_chat(&cookie, "Hello").await;
        let uri = format!("/chat/{}/messages", chat_id);

        let sent = app
            .post(&uri, Some(&cookie), json!({ "userMessage": "Where is the library?" }))
            .await;
        assert_eq!(sent.status, StatusCode::OK);
        assert_eq!(
            sent.json["assistantMessage"],
            "Mock response to: Where is the library?"
        );

        let messages = app.get(&uri, Some(&cookie)).await;
        assert_eq!(
            roles(&messages.json),
            vec!["user", "assistant", "user", "assistant"]
        );
        assert_eq!(messages.json[2]["content"], "Where is the library?");

        // Full history went to the model, system prompt first
        let last = app.llm.requests().pop().unwrap();
        assert_eq!(last.messages.len(), 4);
    }

    #[tokio::test]
    async fn test_other_users_chat_is_404() {
        let app = TestApp::new().unwrap();
        let alice = app.signed_in_user("alice@x.com").await;
        let bob = app.signed_in_user("bob@x.com").await;
        let chat_id = app.create_chat(&alice, "Hello").await;
        let uri = format!("/chat/{}/messages", chat_id);

        assert_eq!(app.get(&uri, Some(&bob)).await.status, StatusCode::NOT_FOUND);
        assert_eq!(
            app.post(&uri, Some(&bob), json!({ "userMessage": "hi" }))
                .await
                .status,
            StatusCode::NOT_FOUND
        );

        let messages = app.get(&uri, Some(&alice)).await;
        assert_eq!(messages.json.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids() {
        let app = TestApp::new().unwrap();
        let cookie = app.signed_in_user("a@x.com").await;

        let unknown = app
            .get("/chat/507f1f77bcf86cd799439011/messages", Some(&cookie))
            .await;
        assert_eq!(unknown.status, StatusCode::NOT_FOUND);

        let unknown_send = app
            .post(
                "/chat/507f1f77bcf86cd799439011/messages",
                Some(&cookie),
                json!({ "userMessage": "hi" }),
            )
            .await;
        assert_eq!(unknown_send.status, StatusCode::NOT_FOUND);
        assert_eq!(app.llm.call_count(), 0);

        let malformed = app.get("/chat/not-an-id/messages", Some(&cookie)).await;
        assert_eq!(malformed.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_blank_message_is_422() {
        let app = TestApp::new().unwrap();
        let cookie = app.signed_in_user("a@x.com").await;
        let chat_id = app.create_chat(&cookie, "Hello").await;

        let response = app
            .post(
                &format!("/chat/{}/messages", chat_id),
                Some(&cookie),
                json!({ "userMessage": "" }),
            )
            .await;

        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_failed_reply_leaves_history_unchanged() {
        // title + first reply succeed, the next turn fails
        let app = TestApp::with_llm(MockLlmService::failing_after(2)).unwrap();
        let cookie = app.signed_in_user("a@x.com").await;
        let chat_id = app.create_chat(&cookie, "Hello").await;
        let uri = format!("/chat/{}/messages", chat_id);

        let response = app
            .post(&uri, Some(&cookie), json!({ "userMessage": "Again" }))
            .await;
        assert_eq!(response.status, StatusCode::BAD_GATEWAY);

        let messages = app.get(&uri, Some(&cookie)).await;
        assert_eq!(roles(&messages.json), vec!["user", "assistant"]);
    }

    #[tokio::test]
    async fn test_concurrent_sends_drop_nothing() {
        let llm = MockLlmService::new().with_delay(Duration::from_millis(5));
        let app = Arc::new(TestApp::with_llm(llm).unwrap());
        let cookie = app.signed_in_user("a@x.com").await;
        let chat_id = app.create_chat(&cookie, "Hello").await;
        let uri = format!("/chat/{}/messages", chat_id);

        let sends = 8;
        let handles: Vec<_> = (0..sends)
            .map(|i| {
                let app = app.clone();
                let cookie = cookie.clone();
                let uri = uri.clone();
                tokio::spawn(async move {
                    app.post(
                        &uri,
                        Some(&cookie),
                        json!({ "userMessage": format!("question {}", i) }),
                    )
                    .await
                    .status
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), StatusCode::OK);
        }

        let messages = app.get(&uri, Some(&cookie)).await;
        let messages = messages.json.as_array().unwrap();
        assert_eq!(messages.len(), 2 + 2 * sends);

        // Every turn lands as an adjacent user/assistant pair
        for pair in messages.chunks(2) {
            assert_eq!(pair[0]["role"], "user");
            assert_eq!(pair[1]["role"], "assistant");
            assert_eq!(
                pair[1]["content"].as_str().unwrap(),
                format!("Mock response to: {}", pair[0]["content"].as_str().unwrap())
            );
        }
    }
}
