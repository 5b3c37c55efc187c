//! Email delivery service.
//!
//! SMTP via lettre. An unconfigured service stays constructible so the rest
//! of the system works without mail; sending then fails with a clear error.

use campus_common::config::SmtpConfig;
use campus_common::{AppError, AppResult};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Email service.
#[derive(Clone)]
pub struct EmailService {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    config: Option<SmtpConfig>,
}

impl EmailService {
    /// Create a new email service from optional SMTP configuration.
    pub fn new(config: Option<SmtpConfig>) -> AppResult<Self> {
        let transport = match &config {
            Some(smtp) => {
                let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
                    .map_err(|e| AppError::Config(format!("Invalid SMTP host: {e}")))?
                    .port(smtp.port);

                if let (Some(username), Some(password)) = (&smtp.username, &smtp.password) {
                    builder =
                        builder.credentials(Credentials::new(username.clone(), password.clone()));
                }

                Some(builder.build())
            }
            None => None,
        };

        Ok(Self { transport, config })
    }

    /// Whether outgoing mail is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Send a password-reset code.
    pub async fn send_otp_code(&self, to: &str, code: &str) -> AppResult<()> {
        let (transport, config) = match (&self.transport, &self.config) {
            (Some(t), Some(c)) => (t, c),
            _ => {
                return Err(AppError::BadRequest(
                    "Email service not configured".to_string(),
                ));
            }
        };

        let from: Mailbox = format!("{} <{}>", config.from_name, config.from_address)
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid from address: {e}")))?;
        let to: Mailbox = to
            .parse()
            .map_err(|e| AppError::BadRequest(format!("Invalid recipient address: {e}")))?;

        let body = format!(
            "Your password reset code is: {code}\n\n\
            The code expires in 10 minutes. If you didn't request a reset,\n\
            you can safely ignore this email.",
        );

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject("Your password reset code")
            .body(body)
            .map_err(|e| AppError::Internal(format!("Failed to build email: {e}")))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::Email(format!("Failed to send email: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_service_rejects_send() {
        let service = EmailService::new(None).unwrap();
        assert!(!service.is_enabled());

        let result = service.send_otp_code("admin@example.com", "123456").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
