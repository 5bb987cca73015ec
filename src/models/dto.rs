//pour les requêtes et réponses de l'API
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::users::Role;

// Les champs manquants valent "" : le core les rejette en InvalidInput (400)
#[derive(Debug, Deserialize)]
pub struct IssueTokenRequest {
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_email: String,
}

#[derive(Debug, Serialize)]
pub struct IssueTokenResponse {
    pub ok: bool,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateTokenRequest {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateTokenResponse {
    pub valid: bool,
    pub message: String,
    pub landing: String,  // page "INÍCIO" selon le rôle de la session
}

// DTO pour créer un compte collaborateur / administrateur
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "credential is required"))]
    pub credential: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "credential is required"))]
    pub credential: String,
}

// Réponse après login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i32,
    pub name: String,
    pub role: Role,
}

// Réponse pour /auth/me
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: i32,
    pub name: String,
    pub role: Role,
}
