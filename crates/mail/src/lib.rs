//! Email delivery via SMTP.
//!
//! [`Mailer`] wraps the `lettre` async SMTP transport. Configuration is
//! loaded from environment variables; if `SMTP_HOST` is not set,
//! [`MailConfig::from_env`] returns `None` and no mailer should be
//! constructed — callers then skip sending instead of failing.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@lms.local";

/// Configuration for the SMTP mailer.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl MailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default            |
    /// |-----------------|----------|--------------------|
    /// | `SMTP_HOST`     | yes      | —                  |
    /// | `SMTP_PORT`     | no       | `587`              |
    /// | `SMTP_FROM`     | no       | `noreply@lms.local`|
    /// | `SMTP_USER`     | no       | —                  |
    /// | `SMTP_PASSWORD` | no       | —                  |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// Sends plain-text emails over SMTP.
pub struct Mailer {
    config: MailConfig,
}

impl Mailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Send a plain-text email.
    pub async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), MailError> {
        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| MailError::Build(e.to_string()))?;

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(password)) = (&self.config.smtp_user, &self.config.smtp_password)
        {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        let transport = builder.build();
        transport.send(email).await?;
        tracing::debug!(to, subject, "sent email");
        Ok(())
    }

    /// Send the account-verification message carrying a one-time code.
    pub async fn send_verification_otp(
        &self,
        to: &str,
        name: &str,
        otp: &str,
    ) -> Result<(), MailError> {
        let body = verification_body(name, otp);
        self.send(to, "Verify your email", body).await
    }
}

/// Body of the verification email.
fn verification_body(name: &str, otp: &str) -> String {
    format!(
        "Hi {name},\n\n\
         Your verification code is: {otp}\n\n\
         The code expires in 5 minutes. If you did not request it, you can\n\
         safely ignore this message.\n"
    )
}
