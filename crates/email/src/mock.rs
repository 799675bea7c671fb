//! Mock Email Service Implementation
//!
//! Provides in-memory email capture for testing without external dependencies.
//! Integration tests read verification ids and reset tokens back out of the
//! captured messages to drive the account workflows end to end.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::{EmailConfig, EmailError, EmailMessage, EmailReceipt, EmailService};

const DEFAULT_FROM: &str = "no-reply@converse.app";
const DEFAULT_BASE_URL: &str = "http://localhost:4000";

/// Email captured by the mock service
#[derive(Debug, Clone)]
pub struct CapturedEmail {
    pub message: EmailMessage,
    pub receipt: EmailReceipt,
    pub captured_at: DateTime<Utc>,
}

impl CapturedEmail {
    fn email_type(&self) -> Option<&str> {
        self.message.metadata.get("email_type").map(String::as_str)
    }

    fn extract(&self, pattern: &str) -> Option<String> {
        let re = regex::Regex::new(pattern).ok()?;
        re.captures(&self.message.body_text)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Extract the user id from a verification link
    pub fn extract_verification_id(&self) -> Option<String> {
        if let Some(user_id) = self.message.metadata.get("user_id") {
            return Some(user_id.clone());
        }

        self.extract(r"/auth/verify-email/([0-9a-f]{24})")
    }

    /// Extract the reset token from a password reset link
    pub fn extract_reset_token(&self) -> Option<String> {
        self.extract(r"reset-password\?token=([0-9a-f]{40})")
    }
}

/// Mock email service for testing
#[derive(Debug, Clone)]
pub struct MockEmailService {
    emails: Arc<Mutex<Vec<CapturedEmail>>>,
    email_by_recipient: Arc<Mutex<HashMap<String, Vec<CapturedEmail>>>>,
    enabled: bool,
    default_from: String,
    app_base_url: String,
}

impl MockEmailService {
    /// Create a new mock email service
    pub fn new() -> Self {
        Self {
            emails: Arc::new(Mutex::new(Vec::new())),
            email_by_recipient: Arc::new(Mutex::new(HashMap::new())),
            enabled: true,
            default_from: DEFAULT_FROM.to_string(),
            app_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create a mock that builds links against the configured base URL
    pub fn with_config(config: &EmailConfig) -> Self {
        Self {
            default_from: config.default_from.clone(),
            app_base_url: config.app_base_url.clone(),
            ..Self::new()
        }
    }

    /// Create a disabled mock email service (for testing)
    pub fn new_disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Get emails sent to a specific recipient
    pub fn get_emails_for_recipient(&self, email: &str) -> Vec<CapturedEmail> {
        self.email_by_recipient
            .lock()
            .unwrap()
            .get(email)
            .cloned()
            .unwrap_or_default()
    }

    fn latest_of_type(&self, email: &str, email_type: &str) -> Option<CapturedEmail> {
        self.get_emails_for_recipient(email)
            .into_iter()
            .filter(|e| e.email_type() == Some(email_type))
            .max_by_key(|e| e.captured_at)
    }

    /// Most recent verification email for a recipient
    pub fn get_latest_verification_email(&self, email: &str) -> Option<CapturedEmail> {
        self.latest_of_type(email, "email_verification")
    }

    /// Most recent password reset email for a recipient
    pub fn get_latest_reset_email(&self, email: &str) -> Option<CapturedEmail> {
        self.latest_of_type(email, "password_reset")
    }

    /// Reset token from the most recent password reset email
    pub fn get_reset_token_for_email(&self, email: &str) -> Option<String> {
        self.get_latest_reset_email(email)
            .and_then(|e| e.extract_reset_token())
    }

    /// Get count of emails sent
    pub fn email_count(&self) -> usize {
        self.emails.lock().unwrap().len()
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EmailService for MockEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        let message_id = format!("mock-{}", Utc::now().timestamp_nanos_opt().unwrap_or_default());

        if !self.enabled {
            tracing::warn!("Mock email service disabled, skipping send");
            return Ok(EmailReceipt {
                message_id: format!("disabled-{}", message_id),
                sent_at: Utc::now(),
                provider: "mock-disabled".to_string(),
                metadata: message.metadata.clone(),
            });
        }

        tracing::info!(to = %message.to, subject = %message.subject, "Mock email service capturing email");

        let receipt = EmailReceipt {
            message_id,
            sent_at: Utc::now(),
            provider: "mock".to_string(),
            metadata: message.metadata.clone(),
        };

        let captured = CapturedEmail {
            message: message.clone(),
            receipt: receipt.clone(),
            captured_at: Utc::now(),
        };

        self.emails.lock().unwrap().push(captured.clone());

        self.email_by_recipient
            .lock()
            .unwrap()
            .entry(message.to)
            .or_default()
            .push(captured);

        Ok(receipt)
    }

    fn default_from(&self) -> String {
        self.default_from.clone()
    }

    fn app_base_url(&self) -> &str {
        &self.app_base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_email_service() {
        let service = MockEmailService::new();

        let message = EmailMessage::new(
            "test@example.com".to_string(),
            "sender@converse.app".to_string(),
            "Test Subject".to_string(),
            "Test body".to_string(),
        );

        let receipt = service.send_email(message).await.unwrap();

        assert!(receipt.message_id.starts_with("mock-"));
        assert_eq!(receipt.provider, "mock");
        assert_eq!(service.email_count(), 1);

        let emails = service.get_emails_for_recipient("test@example.com");
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].message.subject, "Test Subject");
    }

    #[tokio::test]
    async fn test_verification_email_carries_user_id() {
        let service = MockEmailService::new();
        service
            .send_verification_email("a@x.com", "A", "507f1f77bcf86cd799439011")
            .await
            .unwrap();

        let captured = service.get_latest_verification_email("a@x.com").unwrap();
        assert_eq!(captured.message.from, DEFAULT_FROM);
        assert!(captured
            .message
            .body_text
            .contains("http://localhost:4000/auth/verify-email/507f1f77bcf86cd799439011"));
        assert_eq!(
            captured.extract_verification_id().as_deref(),
            Some("507f1f77bcf86cd799439011")
        );
    }

    #[tokio::test]
    async fn test_reset_email_token_extraction() {
        let service = MockEmailService::new();
        let token = "0123456789abcdef0123456789abcdef01234567";
        service.send_password_reset("a@x.com", token, 60).await.unwrap();

        assert_eq!(service.get_reset_token_for_email("a@x.com").as_deref(), Some(token));
        assert!(service.get_latest_verification_email("a@x.com").is_none());
    }

    #[tokio::test]
    async fn test_links_use_configured_base_url() {
        let config = EmailConfig {
            provider: "mock".into(),
            aws_region: None,
            aws_endpoint_url: None,
            default_from: "hello@kau.example".into(),
            enabled: true,
            app_base_url: "https://chat.kau.example/".into(),
        };
        let service = MockEmailService::with_config(&config);
        service
            .send_verification_email("a@x.com", "A", "507f1f77bcf86cd799439011")
            .await
            .unwrap();

        let captured = service.get_latest_verification_email("a@x.com").unwrap();
        assert_eq!(captured.message.from, "hello@kau.example");
        assert!(captured
            .message
            .body_text
            .contains("https://chat.kau.example/auth/verify-email/"));
    }

    #[tokio::test]
    async fn test_disabled_mock_service() {
        let service = MockEmailService::new_disabled();

        let message = EmailMessage::new(
            "test@example.com".to_string(),
            "sender@converse.app".to_string(),
            "Test Subject".to_string(),
            "Test body".to_string(),
        );

        let receipt = service.send_email(message).await.unwrap();

        assert!(receipt.message_id.starts_with("disabled-"));
        assert_eq!(receipt.provider, "mock-disabled");
        assert_eq!(service.email_count(), 0);
    }
}
