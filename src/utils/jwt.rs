use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Deserialize, Serialize};
use chrono::{Utc, Duration};

use crate::models::users::Role;

/// Durée de la session staff
const SESSION_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,        // user_id
    pub name: String,
    pub role: Role,
    pub exp: i64,        // expiration timestamp
}

/// Clé secrète JWT partagée par le login et l'extracteur AuthUser
#[derive(Clone)]
pub struct JwtSecret(String);

impl JwtSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Génère un JWT pour un membre du staff
pub fn generate_token(secret: &JwtSecret, user_id: i32, name: &str, role: Role) -> Result<String, String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(SESSION_HOURS))
        .ok_or("Failed to calculate expiration")?
        .timestamp();

    let claims = Claims {
        sub: user_id,
        name: name.to_string(),
        role,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
        .map_err(|e| format!("Failed to generate token: {}", e))
}

/// Vérifie et décode un JWT
pub fn verify_token(secret: &JwtSecret, token: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid token: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_verify_token() {
        let secret = JwtSecret::new("test-secret");

        let token = generate_token(&secret, 123, "Carla", Role::Administrator).unwrap();
        let claims = verify_token(&secret, &token).unwrap();

        assert_eq!(claims.sub, 123);
        assert_eq!(claims.name, "Carla");
        assert_eq!(claims.role, Role::Administrator);
    }

    #[test]
    fn test_invalid_token() {
        let result = verify_token(&JwtSecret::new("test-secret"), "invalid.token.here");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = generate_token(&JwtSecret::new("a"), 1, "Carla", Role::Collaborator).unwrap();
        assert!(verify_token(&JwtSecret::new("b"), &token).is_err());
    }
}
