use chrono::Duration;
use rand::Rng;
use std::sync::Arc;
use validator::ValidateEmail;

use crate::error::AppError;
use crate::models::tokens::{NewToken, VerificationToken};
use crate::services::clock::Clock;
use crate::services::notifier::{MailTemplate, Notifier};
use crate::services::token_store::TokenStore;

/// Durée de validité d'un code
pub const TOKEN_TTL_MINUTES: i64 = 5;

pub fn token_ttl() -> Duration {
    Duration::minutes(TOKEN_TTL_MINUTES)
}

/// Code à 6 chiffres uniformément tiré dans 100000..=999999 (jamais de zéro en tête)
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999u32).to_string()
}

/// Génère un code, le persiste puis l'envoie au client
pub struct TokenIssuer {
    store: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    mail: MailTemplate,
}

impl TokenIssuer {
    pub fn new(
        store: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        mail: MailTemplate,
    ) -> Self {
        Self { store, notifier, clock, mail }
    }

    /// Émet un token pour le client.
    ///
    /// Le token est persisté AVANT l'envoi : si l'email échoue, on renvoie
    /// `AppError::Delivery` mais la ligne reste en base (code valide jamais reçu).
    #[tracing::instrument(name = "issue_token", skip(self, client_name))]
    pub async fn issue(
        &self,
        client_name: &str,
        client_email: &str,
    ) -> Result<VerificationToken, AppError> {
        // 1. Validation avant tout effet de bord
        if client_name.is_empty() || client_email.is_empty() {
            return Err(AppError::InvalidInput(
                "client_name and client_email are required".to_string(),
            ));
        }
        if !client_email.validate_email() {
            return Err(AppError::InvalidInput(
                "client_email is not a valid email address".to_string(),
            ));
        }

        // 2. Générer + persister + envoyer
        self.persist_and_notify(client_name, client_email, generate_code())
            .await
    }

    async fn persist_and_notify(
        &self,
        client_name: &str,
        client_email: &str,
        code: String,
    ) -> Result<VerificationToken, AppError> {
        let issued_at = self.clock.now();
        let token = self
            .store
            .put(NewToken {
                client_name: client_name.to_string(),
                client_email: client_email.to_string(),
                code,
                issued_at,
                expires_at: issued_at + token_ttl(),
            })
            .await?;

        tracing::info!(token_id = token.id, expires_at = %token.expires_at, "token saved");

        let (subject, body) = self.mail.verification(&token.client_name, &token.code);
        if let Err(e) = self.notifier.send(&token.client_email, &subject, &body).await {
            tracing::warn!(token_id = token.id, error = %e, "token saved but email not delivered");
            return Err(e.into());
        }

        Ok(token)
    }
}
