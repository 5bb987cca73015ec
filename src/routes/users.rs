use actix_web::{post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::error::AppError;
use crate::models::dto::{CreateUserRequest, UserResponse};
use crate::services::account_service::AccountService;

/// POST /api/users - Créer un compte staff
#[post("")]
pub async fn create_user(
    body: web::Json<CreateUserRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    if let Err(errors) = body.validate() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "All fields are required.",
            "fields": errors
        })));
    }

    let user = AccountService::create_account(
        db.get_ref(),
        &body.name,
        &body.email,
        &body.credential,
        body.role,
    )
    .await?;

    Ok(HttpResponse::Created().json(UserResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
    }))
}

pub fn users_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .service(create_user)
    );
}
