//! AWS SES Email Service Implementation
//!
//! Provides production email delivery through AWS Simple Email Service (SES)
//! with support for LocalStack testing environment. Used for verification
//! and password reset mail.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_sdk_ses::config::SharedCredentialsProvider;
use aws_sdk_ses::types::{Body, Content, Destination, Message};
use aws_sdk_ses::Client as SesClient;
use chrono::Utc;

use crate::{EmailConfig, EmailError, EmailMessage, EmailReceipt, EmailService};

const DEFAULT_REGION: &str = "us-east-1";

/// AWS SES email service implementation
pub struct SesEmailService {
    client: SesClient,
    config: EmailConfig,
}

/// Shared AWS config; a custom endpoint means LocalStack, which takes dummy credentials
async fn load_aws_config(config: &EmailConfig) -> SdkConfig {
    let region = config
        .aws_region
        .clone()
        .unwrap_or_else(|| DEFAULT_REGION.to_string());
    let loader = aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region));

    match config.aws_endpoint_url.as_deref() {
        Some(endpoint_url) => {
            tracing::info!(endpoint = %endpoint_url, "Using custom AWS endpoint");
            let credentials = Credentials::new(
                "test-access-key",
                "test-secret-key",
                None,
                None,
                "localstack-email-provider",
            );
            loader
                .endpoint_url(endpoint_url)
                .credentials_provider(SharedCredentialsProvider::new(credentials))
                .load()
                .await
        }
        None => loader.load().await,
    }
}

fn utf8(data: &str, part: &str) -> Result<Content, EmailError> {
    Content::builder()
        .data(data)
        .charset("UTF-8")
        .build()
        .map_err(|e| EmailError::AwsSes(format!("Failed to build {}: {}", part, e)))
}

/// Convert email message to SES format
fn build_ses_message(message: &EmailMessage) -> Result<Message, EmailError> {
    let mut body = Body::builder().text(utf8(&message.body_text, "text content")?);
    if let Some(html) = &message.body_html {
        body = body.html(utf8(html, "HTML content")?);
    }

    Ok(Message::builder()
        .subject(utf8(&message.subject, "subject")?)
        .body(body.build())
        .build())
}

impl SesEmailService {
    /// Create a new SES email service.
    ///
    /// A failed quota probe is logged, not fatal: LocalStack may not have SES
    /// fully configured yet.
    pub async fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let client = SesClient::new(&load_aws_config(&config).await);

        match client.get_send_quota().send().await {
            Ok(_) => tracing::info!("Connected to AWS SES"),
            Err(e) => tracing::warn!(error = %e, "SES quota probe failed"),
        }

        Ok(Self { client, config })
    }
}

#[async_trait::async_trait]
impl EmailService for SesEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        tracing::info!(to = %message.to, subject = %message.subject, "Sending email via AWS SES");

        if !message.to.contains('@') || !message.from.contains('@') {
            return Err(EmailError::Validation(
                "Invalid email address format".to_string(),
            ));
        }

        let result = self
            .client
            .send_email()
            .source(&message.from)
            .destination(Destination::builder().to_addresses(&message.to).build())
            .message(build_ses_message(&message)?)
            .send()
            .await
            .map_err(|e| EmailError::AwsSes(format!("Failed to send email: {}", e)))?;

        let message_id = result.message_id().to_string();

        tracing::info!(message_id = %message_id, "Email sent via SES");

        Ok(EmailReceipt {
            message_id,
            sent_at: Utc::now(),
            provider: "aws-ses".to_string(),
            metadata: message.metadata.clone(),
        })
    }

    fn default_from(&self) -> String {
        self.config.default_from.clone()
    }

    fn app_base_url(&self) -> &str {
        &self.config.app_base_url
    }
}
