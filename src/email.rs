// SPDX-License-Identifier: AGPL-3.0-or-later

//! Transactional email.
//!
//! Sends verification and password-reset links through an HTTP email API
//! (Brevo-compatible payload). Without an API key the mailer runs in
//! log-only mode: the message is traced instead of sent, which keeps local
//! development and tests free of network calls.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AppConfig;

const SEND_ENDPOINT: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("email request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("email provider rejected the message (status={status}): {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody {
    sender: EmailAddress,
    to: Vec<EmailAddress>,
    subject: String,
    html_content: String,
}

/// HTTP email API client.
pub struct Mailer {
    client: reqwest::Client,
    api_key: Option<String>,
    sender: String,
    client_url: String,
}

impl Mailer {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.email_api_key.clone(),
            sender: config.email_sender.clone(),
            client_url: config.client_url.clone(),
        }
    }

    /// Whether messages actually leave the process.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Email-verification link. Expires in 1 hour.
    pub async fn send_verification(
        &self,
        to_email: &str,
        to_name: &str,
        token: &str,
    ) -> Result<(), EmailError> {
        let link = format!("{}/verify-email?token={}", self.client_url, token);
        let html = format!(
            "<h2>Welcome to Realty App!</h2>\
             <p>Please verify your email by clicking the link below:</p>\
             <a href=\"{link}\">Verify Email</a>\
             <p>This link expires in 1 hour.</p>"
        );
        self.send(to_email, to_name, "Verify Your Email Address", html)
            .await
    }

    /// Password-reset link. Expires in 15 minutes.
    pub async fn send_password_reset(
        &self,
        to_email: &str,
        to_name: &str,
        token: &str,
    ) -> Result<(), EmailError> {
        let link = format!("{}/reset-password?token={}", self.client_url, token);
        let html = format!(
            "<h2>Password Reset Request</h2>\
             <p>Click the link below to choose a new password:</p>\
             <a href=\"{link}\">Reset Password</a>\
             <p>This link expires in 15 minutes. If you did not request a \
             reset, you can ignore this email.</p>"
        );
        self.send(to_email, to_name, "Password Reset Request", html)
            .await
    }

    async fn send(
        &self,
        to_email: &str,
        to_name: &str,
        subject: &str,
        html: String,
    ) -> Result<(), EmailError> {
        let Some(api_key) = &self.api_key else {
            info!(to = to_email, subject, "email not configured; logging instead of sending");
            return Ok(());
        };

        let body = SendEmailBody {
            sender: EmailAddress {
                email: self.sender.clone(),
                name: Some("Realty App".to_string()),
            },
            to: vec![EmailAddress {
                email: to_email.to_string(),
                name: Some(to_name.to_string()),
            }],
            subject: subject.to_string(),
            html_content: html,
        };

        let response = self
            .client
            .post(SEND_ENDPOINT)
            .header("api-key", api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        warn!(%status, "email provider rejected message");
        Err(EmailError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    fn unconfigured_mailer() -> Mailer {
        Mailer::from_config(&AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            data_dir: "/tmp".into(),
            jwt_secret: "secret".to_string(),
            client_url: "http://localhost:3000".to_string(),
            environment: Environment::Development,
            email_api_key: None,
            email_sender: "no-reply@realty.local".to_string(),
        })
    }

    #[tokio::test]
    async fn unconfigured_mailer_logs_instead_of_sending() {
        let mailer = unconfigured_mailer();
        assert!(!mailer.is_configured());

        // No API key: both sends are local no-ops and must succeed.
        mailer
            .send_verification("a@x.com", "A", "tok")
            .await
            .unwrap();
        mailer
            .send_password_reset("a@x.com", "A", "tok")
            .await
            .unwrap();
    }
}
