use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
    message::{Mailbox, Message, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use shared::{
    abstract_trait::EmailServiceTrait, config::EmailConfig, domain::requests::EmailRequest,
    errors::ServiceError, utils::render_email,
};
use tracing::{error, info};

type SmtpTransport = AsyncSmtpTransport<Tokio1Executor>;

#[derive(Clone)]
pub struct EmailService {
    mailer: SmtpTransport,
    from: Mailbox,
}

impl EmailService {
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let creds = Credentials::new(config.smtp_user.clone(), config.smtp_pass.clone());

        let mailer = SmtpTransport::starttls_relay(&config.smtp_server)
            .context("Failed to create SMTP relay")?
            .credentials(creds)
            .port(config.smtp_port)
            .build();

        let from: Mailbox = config
            .from_address
            .parse()
            .with_context(|| format!("Invalid sender address: {}", config.from_address))?;

        Ok(Self { mailer, from })
    }

    fn build(&self, req: &EmailRequest) -> Result<Message, ServiceError> {
        let body = render_email(&req.data).map_err(|e| {
            ServiceError::Custom(format!("Failed to render email template: {e}"))
        })?;

        let to: Mailbox = req.to.parse().map_err(|e| {
            error!("❌ Invalid recipient email {}: {}", req.to, e);
            ServiceError::Custom(format!("Invalid recipient email: {e}"))
        })?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&req.subject)
            .header(ContentType::TEXT_HTML)
            .body(body)
            .map_err(|e| {
                error!("❌ Failed to build email: {}", e);
                ServiceError::Custom(format!("Failed to build email: {e}"))
            })
    }
}

#[async_trait]
impl EmailServiceTrait for EmailService {
    async fn send(&self, req: &EmailRequest) -> Result<(), ServiceError> {
        let email = self.build(req)?;

        match self.mailer.send(email).await {
            Ok(_) => {
                info!("✅ Email sent to {}", req.to);
                Ok(())
            }
            Err(e) => {
                error!("❌ Failed to send email to {}: {}", req.to, e);
                Err(ServiceError::Custom(format!("Failed to send email: {e}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::utils::EmailTemplateData;

    fn config(from: &str) -> EmailConfig {
        EmailConfig {
            smtp_server: "smtp.parkspot.test".into(),
            smtp_port: 587,
            smtp_user: "mailer".into(),
            smtp_pass: "secret".into(),
            from_address: from.into(),
        }
    }

    fn request(to: &str) -> EmailRequest {
        EmailRequest {
            to: to.into(),
            subject: "Booking confirmed".into(),
            data: EmailTemplateData {
                title: "Booking confirmed".into(),
                message: "See you soon".into(),
                button: "View booking".into(),
                link: "https://parkspot.test/orders/1".into(),
            },
        }
    }

    #[tokio::test]
    async fn rejects_malformed_sender() {
        assert!(EmailService::new(&config("not an address")).is_err());
    }

    #[tokio::test]
    async fn builds_html_message_for_valid_recipient() {
        let service = EmailService::new(&config("Parkspot <no-reply@parkspot.test>")).unwrap();

        let message = service.build(&request("asha@example.com")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: Booking confirmed"));
        assert!(raw.contains("text/html"));

        let err = service.build(&request("nobody")).unwrap_err();
        assert!(matches!(err, ServiceError::Custom(_)));
    }
}
