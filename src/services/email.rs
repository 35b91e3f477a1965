// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email delivery for verification codes.
//!
//! Uses an async SMTP transport via lettre. Without `MAIL_HOST` the service
//! runs in outbox mode: messages are logged and kept in memory instead of
//! being sent, which is what local development and tests use.

use crate::config::SmtpConfig;
use crate::error::AppError;
use crate::models::OtpPurpose;
use lettre::{
    message::{header::ContentType, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A message captured in outbox mode.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Email service for transactional mail.
#[derive(Clone)]
pub struct EmailService {
    mailer: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: String,
    outbox: Arc<Mutex<Vec<OutgoingEmail>>>,
}

impl EmailService {
    /// Create an email service from SMTP configuration.
    pub fn new(config: &SmtpConfig) -> Result<Self, AppError> {
        let Some(host) = config.host.as_deref() else {
            tracing::warn!("MAIL_HOST not set, emails will be logged instead of sent");
            return Ok(Self::new_outbox(&config.from_address));
        };

        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| AppError::Email(format!("Failed to configure SMTP relay: {}", e)))?
            .port(config.port)
            .credentials(credentials)
            .build();

        tracing::info!(host, port = config.port, "SMTP transport configured");

        Ok(Self {
            mailer: Some(mailer),
            from_address: config.from_address.clone(),
            outbox: Arc::default(),
        })
    }

    /// Create a service that records messages instead of sending them.
    pub fn new_outbox(from_address: &str) -> Self {
        Self {
            mailer: None,
            from_address: from_address.to_string(),
            outbox: Arc::default(),
        }
    }

    /// Messages captured so far in outbox mode.
    pub async fn sent(&self) -> Vec<OutgoingEmail> {
        self.outbox.lock().await.clone()
    }

    /// Send a one-time password email.
    pub async fn send_otp(
        &self,
        to: &str,
        code: &str,
        purpose: OtpPurpose,
        ttl_minutes: i64,
    ) -> Result<(), AppError> {
        let (subject, heading) = match purpose {
            OtpPurpose::Signup => ("Verification Email", "Please confirm your OTP"),
            OtpPurpose::PasswordReset => ("Password Reset Code", "Reset your password"),
        };

        let html = format!(
            "<h1>{heading}</h1>\n\
             <p>Here is your OTP code: <strong>{code}</strong></p>\n\
             <p>This OTP will expire in {ttl_minutes} minutes.</p>"
        );
        let text = format!(
            "{heading}\n\nHere is your OTP code: {code}\n\nThis OTP will expire in {ttl_minutes} minutes.\n"
        );

        self.send_multipart_email(to, subject, &text, &html).await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        let Some(mailer) = &self.mailer else {
            tracing::info!(
                to = %to,
                subject = %subject,
                "Email captured in outbox (SMTP disabled)"
            );
            self.outbox.lock().await.push(OutgoingEmail {
                to: to.to_string(),
                subject: subject.to_string(),
                text_body: text_body.to_string(),
                html_body: html_body.to_string(),
            });
            return Ok(());
        };

        let email = Message::builder()
            .from(self.from_address.parse().map_err(|_| {
                AppError::Email(format!("Invalid from address: {}", self.from_address))
            })?)
            .to(to
                .parse()
                .map_err(|_| AppError::BadRequest(format!("Invalid email address: {}", to)))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::Email(format!("Failed to build message: {}", e)))?;

        mailer
            .send(email)
            .await
            .map_err(|e| AppError::Email(e.to_string()))?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}
