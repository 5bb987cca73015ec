use std::sync::Arc;

use crate::error::AppError;
use crate::services::clock::Clock;
use crate::services::token_store::TokenStore;

/// Vérifie qu'un code identifie un token encore vivant.
///
/// Lecture pure : un code valide le reste jusqu'à son expiration, même après
/// plusieurs validations. "Jamais émis" et "expiré" donnent tous deux `false`.
pub struct TokenValidator {
    store: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
}

impl TokenValidator {
    pub fn new(store: Arc<dyn TokenStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    #[tracing::instrument(name = "validate_token", skip_all)]
    pub async fn validate(&self, code: &str) -> Result<bool, AppError> {
        // Comparaison exacte : seul le champ vide est refusé
        if code.is_empty() {
            return Err(AppError::InvalidInput("code is required".to_string()));
        }

        let found = self.store.find_valid(code, self.clock.now()).await?;
        let valid = found.is_some();

        tracing::info!(valid, "token validated");
        Ok(valid)
    }
}
