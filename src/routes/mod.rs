pub mod auth;
pub mod health;
pub mod tokens;
pub mod users;

use actix_web::web;

use crate::error::AppError;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // JSON invalide → {"error": ...} en 400, comme les autres erreurs d'entrée
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into());

    cfg.app_data(json_config).service(
        web::scope("/api")
            .service(health::health_check)
            .configure(users::users_routes)
            .configure(auth::auth_routes)
            .configure(tokens::tokens_routes)
    );
}
