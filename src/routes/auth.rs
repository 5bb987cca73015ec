use actix_web::{post, get, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{AuthResponse, LoginRequest, MeResponse};
use crate::services::account_service::AccountService;
use crate::utils::jwt::{self, JwtSecret};

/// POST /auth/login - Se connecter (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    secret: web::Data<JwtSecret>,
) -> Result<HttpResponse, AppError> {
    if body.validate().is_err() {
        return Err(AppError::InvalidInput("email and credential are required".to_string()));
    }

    // 1. Vérifier email + credential
    let user = AccountService::authenticate(db.get_ref(), &body.email, &body.credential).await?;

    // 2. Générer le JWT (le rôle voyage dans les claims)
    let token = jwt::generate_token(&secret, user.id, &user.name, user.role)
        .map_err(session_failure)?;

    tracing::info!(user_id = user.id, "user logged in");

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user_id: user.id,
        name: user.name,
        role: user.role,
    }))
}

/// Échec d'encodage du JWT → 500
fn session_failure(e: String) -> AppError {
    AppError::Internal(format!("jwt generation failed: {e}"))
}

/// GET /auth/me - Vérifier la session (PROTÉGÉE)
#[get("/me")]
pub async fn me(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    // Le compte a pu être supprimé depuis l'émission du JWT
    let user = AccountService::find_by_id(db.get_ref(), auth_user.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(MeResponse {
        user_id: user.id,
        name: user.name,
        role: user.role,
    }))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(login)
            .service(me)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::{self, Role};
    use actix_web::{test, App};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::{json, Value};

    fn admin() -> users::Model {
        users::Model {
            id: 2,
            name: "Rita".to_string(),
            email: "rita@g3fibra.com".to_string(),
            credential: "s3nha".to_string(),
            role: Role::Administrator,
        }
    }

    #[actix_web::test]
    async fn test_login_then_me() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![admin()], vec![admin()]])
            .into_connection();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .app_data(web::Data::new(JwtSecret::new("test-secret")))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "rita@g3fibra.com", "credential": "s3nha" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["role"], "administrator");
        let token = body["token"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["user_id"], 2);
        assert_eq!(body["name"], "Rita");
    }

    #[actix_web::test]
    async fn test_login_wrong_credential() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![admin()]])
            .into_connection();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .app_data(web::Data::new(JwtSecret::new("test-secret")))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "rita@g3fibra.com", "credential": "nope" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_me_requires_session() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .app_data(web::Data::new(JwtSecret::new("test-secret")))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/auth/me").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
    }

    #[::core::prelude::v1::test]
    fn test_session_failure_is_server_error() {
        use actix_web::ResponseError;

        let err = session_failure("InvalidKeyFormat".to_string());

        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(err.status_code(), 500);
    }
}
