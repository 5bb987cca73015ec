use actix_web::{post, web, HttpResponse};

use crate::error::AppError;
use crate::middleware::{current_role, landing_for, AuthUser};
use crate::models::dto::{IssueTokenRequest, IssueTokenResponse, ValidateTokenRequest, ValidateTokenResponse};
use crate::services::token_issuer::TokenIssuer;
use crate::services::token_validator::TokenValidator;

/// POST /api/tokens/issue - Générer et envoyer un code au client
#[post("/issue")]
pub async fn issue_token(
    body: web::Json<IssueTokenRequest>,
    issuer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, AppError> {
    let token = issuer.issue(&body.client_name, &body.client_email).await?;

    Ok(HttpResponse::Ok().json(IssueTokenResponse {
        ok: true,
        message: "Token sent successfully.".to_string(),
        expires_at: token.expires_at,
    }))
}

/// POST /api/tokens/validate - Vérifier le code dicté par le client
/// La session (facultative) ne sert qu'à choisir la page de retour
#[post("/validate")]
pub async fn validate_token(
    auth_user: Option<AuthUser>,
    body: web::Json<ValidateTokenRequest>,
    validator: web::Data<TokenValidator>,
) -> Result<HttpResponse, AppError> {
    let valid = validator.validate(&body.code).await?;

    let message = if valid {
        "Valid token!"
    } else {
        "Invalid or expired token."
    };

    Ok(HttpResponse::Ok().json(ValidateTokenResponse {
        valid,
        message: message.to_string(),
        landing: landing_for(current_role(auth_user.as_ref())).to_string(),
    }))
}

pub fn tokens_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tokens")
            .service(issue_token)
            .service(validate_token)
    );
}
