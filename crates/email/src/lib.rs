//! Converse Email Service
//!
//! Provides account email functionality with support for:
//! - AWS SES integration for production email delivery
//! - Mock email service for testing and development
//! - LocalStack integration for local E2E testing
//! - Verification and password reset templates
//! - A background `Mailer` so requests never wait on delivery

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod aws_ses;
pub mod content;
pub mod mailer;
pub mod mock;

pub use mailer::{MailJob, Mailer};

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Email configuration error: {0}")]
    Configuration(String),

    #[error("Email validation error: {0}")]
    Validation(String),

    #[error("AWS SES error: {0}")]
    AwsSes(String),
}

/// Email message to be sent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl EmailMessage {
    /// Create a new email message
    pub fn new(to: String, from: String, subject: String, body_text: String) -> Self {
        Self {
            to,
            from,
            subject,
            body_text,
            body_html: None,
            metadata: HashMap::new(),
        }
    }

    /// Add HTML body content
    pub fn with_html(mut self, body_html: String) -> Self {
        self.body_html = Some(body_html);
        self
    }

    /// Add metadata for tracking
    pub fn with_metadata(mut self, key: String, value: String) -> Self {
        self.metadata.insert(key, value);
        self
    }
}

/// Email delivery receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailReceipt {
    pub message_id: String,
    pub sent_at: DateTime<Utc>,
    pub provider: String,
    pub metadata: HashMap<String, String>,
}

/// Email service configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Email service provider (ses, mock)
    pub provider: String,
    /// AWS region for SES
    pub aws_region: Option<String>,
    /// AWS endpoint URL (for LocalStack)
    pub aws_endpoint_url: Option<String>,
    /// Default from address
    pub default_from: String,
    /// Enable email sending (can disable for testing)
    pub enabled: bool,
    /// Base URL for links in emails
    pub app_base_url: String,
}

impl EmailConfig {
    /// Create email config from environment variables
    pub fn from_env() -> Result<Self, EmailError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, EmailError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = lookup("EMAIL_PROVIDER").unwrap_or_else(|| "mock".to_string());

        let aws_region = lookup("AWS_REGION");
        let aws_endpoint_url = lookup("AWS_ENDPOINT_URL");

        let default_from =
            lookup("FROM_EMAIL").unwrap_or_else(|| "no-reply@converse.app".to_string());

        let enabled = match lookup("EMAIL_ENABLED") {
            None => true,
            Some(raw) => raw.parse().map_err(|_| {
                EmailError::Configuration(format!("EMAIL_ENABLED has an invalid value: '{}'", raw))
            })?,
        };

        let app_base_url =
            lookup("APP_BASE_URL").unwrap_or_else(|| "http://localhost:4000".to_string());

        Ok(Self {
            provider,
            aws_region,
            aws_endpoint_url,
            default_from,
            enabled,
            app_base_url,
        })
    }
}

/// Email service trait for different implementations
#[async_trait::async_trait]
pub trait EmailService: Send + Sync {
    /// Send an email message
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError>;

    /// Return the default "from" address for outgoing emails
    fn default_from(&self) -> String;

    /// Return the application base URL for building links
    fn app_base_url(&self) -> &str;

    /// Send the email-address verification link for a user
    async fn send_verification_email(
        &self,
        recipient_email: &str,
        recipient_name: &str,
        user_id: &str,
    ) -> Result<EmailReceipt, EmailError> {
        let verification_url = format!(
            "{}/auth/verify-email/{}",
            self.app_base_url().trim_end_matches('/'),
            user_id
        );

        let message = EmailMessage::new(
            recipient_email.to_string(),
            self.default_from(),
            "Verify your email address".to_string(),
            content::verification_text(recipient_name, &verification_url),
        )
        .with_html(content::verification_html(recipient_name, &verification_url))
        .with_metadata("email_type".to_string(), "email_verification".to_string())
        .with_metadata("user_id".to_string(), user_id.to_string());

        self.send_email(message).await
    }

    /// Send a single-use password reset link
    async fn send_password_reset(
        &self,
        recipient_email: &str,
        token: &str,
        expires_in_minutes: i64,
    ) -> Result<EmailReceipt, EmailError> {
        let reset_url = format!(
            "{}/reset-password?token={}",
            self.app_base_url().trim_end_matches('/'),
            token
        );

        let message = EmailMessage::new(
            recipient_email.to_string(),
            self.default_from(),
            "Reset your password".to_string(),
            content::password_reset_text(&reset_url, expires_in_minutes),
        )
        .with_html(content::password_reset_html(&reset_url, expires_in_minutes))
        .with_metadata("email_type".to_string(), "password_reset".to_string());

        self.send_email(message).await
    }
}

/// Email service factory
pub struct EmailServiceFactory;

impl EmailServiceFactory {
    /// Create email service based on configuration
    pub async fn create(config: EmailConfig) -> Result<Arc<dyn EmailService>, EmailError> {
        if !config.enabled {
            tracing::info!("Email service disabled, using mock implementation");
            return Ok(Arc::new(mock::MockEmailService::new_disabled()));
        }

        match config.provider.as_str() {
            "ses" | "aws-ses" => {
                tracing::info!("Creating AWS SES email service");
                let ses_service = aws_ses::SesEmailService::new(config).await?;
                Ok(Arc::new(ses_service))
            }
            "mock" => {
                tracing::info!("Creating mock email service");
                Ok(Arc::new(mock::MockEmailService::with_config(&config)))
            }
            provider => Err(EmailError::Configuration(format!(
                "Unknown email provider: {}. Supported providers: ses, mock",
                provider
            ))),
        }
    }
}
