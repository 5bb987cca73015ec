use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{ConfigError, SmtpConfig};
use crate::error::DeliveryError;

/// Envoi d'un message au client (email)
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DeliveryError>;
}

/// Contenu de l'email qui transporte le code
#[derive(Debug, Clone)]
pub struct MailTemplate {
    company: String,
}

impl MailTemplate {
    pub fn new(company: impl Into<String>) -> Self {
        Self { company: company.into() }
    }

    /// Renvoie (sujet, corps)
    pub fn verification(&self, client_name: &str, code: &str) -> (String, String) {
        let subject = "Seu Código de Verificação".to_string();
        let body = format!(
            "Olá, {client_name}\n\n\
             Seu número do token é: {code}\n\n\
             Este é um email automático enviado pela {company} para validar seu atendimento. \
             Por favor, informe este código ao colaborador.\n\n\
             Atenciosamente,\nEquipe {company}",
            company = self.company,
        );
        (subject, body)
    }
}

/// Envoi SMTP (STARTTLS) avec lettre
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self, ConfigError> {
        let from: Mailbox = config.from.parse().map_err(|_| ConfigError::Invalid {
            key: "MAIL_FROM",
            value: config.from.clone(),
        })?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|_| ConfigError::Invalid {
                key: "SMTP_HOST",
                value: config.host.clone(),
            })?
            .port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        let recipient: Mailbox = to
            .parse()
            .map_err(|e| DeliveryError(format!("invalid recipient {to}: {e}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| DeliveryError(format!("failed to build message: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| DeliveryError(format!("smtp send failed: {e}")))?;

        tracing::info!(%to, "📧 email sent");
        Ok(())
    }
}

/// Notifier de développement : écrit le message dans les logs au lieu de l'envoyer
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        tracing::warn!(%to, %subject, "SMTP not configured, email not sent");
        tracing::debug!(%to, %body, "email body");
        Ok(())
    }
}
