//! Background mail queue
//!
//! Handlers enqueue a `MailJob` and return immediately. A single worker task
//! drains the queue through an `EmailService`; delivery is best effort and
//! failures are only logged.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{EmailError, EmailReceipt, EmailService};

/// Outbound account email
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailJob {
    Verification {
        to: String,
        name: String,
        user_id: String,
    },
    PasswordReset {
        to: String,
        token: String,
        expires_in_minutes: i64,
    },
}

impl MailJob {
    fn kind(&self) -> &'static str {
        match self {
            MailJob::Verification { .. } => "email_verification",
            MailJob::PasswordReset { .. } => "password_reset",
        }
    }

    fn recipient(&self) -> &str {
        match self {
            MailJob::Verification { to, .. } | MailJob::PasswordReset { to, .. } => to,
        }
    }

    async fn deliver(&self, service: &dyn EmailService) -> Result<EmailReceipt, EmailError> {
        match self {
            MailJob::Verification { to, name, user_id } => {
                service.send_verification_email(to, name, user_id).await
            }
            MailJob::PasswordReset {
                to,
                token,
                expires_in_minutes,
            } => {
                service
                    .send_password_reset(to, token, *expires_in_minutes)
                    .await
            }
        }
    }
}

/// Handle to the background mail worker
#[derive(Debug, Clone)]
pub struct Mailer {
    tx: mpsc::UnboundedSender<MailJob>,
}

impl Mailer {
    /// Spawn the worker on the current tokio runtime.
    ///
    /// The worker exits once every `Mailer` clone has been dropped.
    pub fn spawn(service: Arc<dyn EmailService>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<MailJob>();

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                match job.deliver(service.as_ref()).await {
                    Ok(receipt) => tracing::info!(
                        kind = job.kind(),
                        message_id = %receipt.message_id,
                        "Email delivered"
                    ),
                    Err(e) => tracing::warn!(
                        kind = job.kind(),
                        to = %job.recipient(),
                        error = %e,
                        "Email delivery failed"
                    ),
                }
            }
            tracing::debug!("Mail worker stopped");
        });

        Self { tx }
    }

    /// Queue a job; never blocks and never fails the caller
    pub fn enqueue(&self, job: MailJob) {
        let kind = job.kind();
        if self.tx.send(job).is_err() {
            tracing::warn!(kind, "Mail worker is gone, dropping email");
        }
    }

    pub fn send_verification(&self, to: &str, name: &str, user_id: &str) {
        self.enqueue(MailJob::Verification {
            to: to.to_string(),
            name: name.to_string(),
            user_id: user_id.to_string(),
        });
    }

    pub fn send_password_reset(&self, to: &str, token: &str, expires_in_minutes: i64) {
        self.enqueue(MailJob::PasswordReset {
            to: to.to_string(),
            token: token.to_string(),
            expires_in_minutes,
        });
    }
}
