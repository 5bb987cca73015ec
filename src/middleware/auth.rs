use actix_web::{dev::Payload, web, Error, FromRequest, HttpRequest, HttpResponse};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::models::users::Role;
use crate::utils::jwt::{self, JwtSecret};

/// Structure qui contient les infos du membre du staff authentifié
/// Utilisée comme extracteur dans les routes protégées
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub name: String,
    pub role: Role,
}

/// Rôle de la session courante (None = pas de session)
pub fn current_role(user: Option<&AuthUser>) -> Option<Role> {
    user.map(|u| u.role)
}

/// Page "INÍCIO" après validation ; sans session on retombe sur le panneau collaborateur
pub fn landing_for(role: Option<Role>) -> &'static str {
    role.unwrap_or_default().landing_path()
}

fn unauthorized(message: String) -> Error {
    let response = HttpResponse::Unauthorized().json(serde_json::json!({
        "error": message
    }));
    actix_web::error::InternalError::from_response("", response).into()
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, Error> {
    // 1. Extraire le header Authorization
    let auth_header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| unauthorized("Missing Authorization header".to_string()))?;

    // 2. Convertir le header en string
    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header".to_string()))?;

    // 3. Extraire le token (format: "Bearer <token>")
    let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        unauthorized("Invalid Authorization format (expected: Bearer <token>)".to_string())
    })?;

    // 4. Vérifier le token JWT avec la clé de l'application
    let secret = req
        .app_data::<web::Data<JwtSecret>>()
        .ok_or_else(|| unauthorized("Authentication is not configured".to_string()))?;

    let claims = jwt::verify_token(secret, token).map_err(unauthorized)?;

    Ok(AuthUser {
        user_id: claims.sub,
        name: claims.name,
        role: claims.role,
    })
}

/// Implémentation de FromRequest pour AuthUser
/// `Option<AuthUser>` donne None au lieu d'un 401 (routes où la session est facultative)
impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
