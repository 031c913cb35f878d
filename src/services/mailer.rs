use crate::config::MailSettings;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Error, Debug)]
pub enum MailError {
    #[error("mail transport is not configured")]
    NotConfigured,
    #[error("relay rejected message with status {0}")]
    Rejected(u16),
    #[error("{0}")]
    Transport(String),
}

impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MailError::Transport("relay timed out".to_string())
        } else {
            MailError::Transport(err.to_string())
        }
    }
}

/// Outbound delivery of a single message. One attempt per call; callers do not retry.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

#[derive(Serialize)]
struct RelayRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Delivers through an HTTP mail relay authenticated with a bearer token.
#[derive(Clone)]
pub struct HttpMailRelay {
    client: reqwest::Client,
    relay_url: String,
    relay_token: String,
    sender: String,
}

impl HttpMailRelay {
    pub fn new(settings: &MailSettings) -> Result<Self, MailError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            relay_url: settings.relay_url.clone(),
            relay_token: settings.relay_token.clone(),
            sender: settings.sender.clone(),
        })
    }
}

#[async_trait]
impl MailTransport for HttpMailRelay {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let payload = RelayRequest {
            from: &self.sender,
            to: &mail.to,
            subject: &mail.subject,
            text: &mail.body,
        };
        let resp = self
            .client
            .post(&self.relay_url)
            .bearer_auth(&self.relay_token)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            tracing::error!("Mail relay returned {} for {}", status, mail.to);
            return Err(MailError::Rejected(status.as_u16()));
        }
        tracing::info!("Reminder mail accepted by relay for {}", mail.to);
        Ok(())
    }
}

/// Used when no relay is configured; every send fails with `NotConfigured`.
pub struct DisabledMailer;

#[async_trait]
impl MailTransport for DisabledMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        tracing::warn!("Mail transport disabled, dropping reminder for {}", mail.to);
        Err(MailError::NotConfigured)
    }
}

pub fn from_settings(settings: Option<&MailSettings>) -> Result<std::sync::Arc<dyn MailTransport>, MailError> {
    match settings {
        Some(settings) => Ok(std::sync::Arc::new(HttpMailRelay::new(settings)?)),
        None => Ok(std::sync::Arc::new(DisabledMailer)),
    }
}

pub fn reminder_mail(email: &str, goal_label: &str) -> OutgoingMail {
    OutgoingMail {
        to: email.to_string(),
        subject: "Daily Fitness Reminder".to_string(),
        body: format!("Hello {email}, don't forget your {goal_label} plan today!"),
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use tokio::sync::Mutex;

    /// Records every message; fails while `fail_with` is set.
    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<OutgoingMail>>,
        pub fail_with: Mutex<Option<String>>,
    }

    impl RecordingMailer {
        pub fn failing(reason: &str) -> Self {
            Self {
                fail_with: Mutex::new(Some(reason.to_string())),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl MailTransport for RecordingMailer {
        async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
            if let Some(reason) = self.fail_with.lock().await.clone() {
                return Err(MailError::Transport(reason));
            }
            self.sent.lock().await.push(mail.clone());
            Ok(())
        }
    }
}
